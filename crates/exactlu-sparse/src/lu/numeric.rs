//! Numeric block updates.
//!
//! Column `j` of the factors is computed left-looking: every supernode whose
//! segment in column `j` is nonzero contributes a unit lower triangular solve
//! on the segment followed by a matrix-vector update of the rows below it.
//! Values are accumulated in a dense column indexed by original row, then
//! moved into the supernode block (`lusup`) or into `ucol`.

use std::mem;

use exactlu_field::Field;

use super::error::LuError;
use super::factor::LuStats;
use super::memory::StorageKind;
use super::store::FactorStore;
use super::workspace::Workspace;
use crate::EMPTY;

/// Applies block positions `first..=last` of the supernode starting at
/// `fsupc` to `dense_col`.
fn apply_segment<F: Field>(
    field: &F,
    store: &FactorStore<F::Element>,
    fsupc: usize,
    first: usize,
    last: usize,
    dense_col: &mut [F::Element],
    tempv: &mut [F::Element],
    stats: &mut LuStats,
) {
    let lptr = store.xlsub[fsupc];
    let nsupr = store.xlsub[fsupc + 1] - lptr;
    let rows = &store.lsub[lptr..lptr + nsupr];
    let block = &store.lusup[store.xlusup[fsupc]..];
    let below = nsupr - last - 1;

    if first == last {
        let ukj = dense_col[rows[last]].clone();
        if field.is_zero(&ukj) {
            return;
        }
        let col = &block[last * nsupr..(last + 1) * nsupr];
        for r in last + 1..nsupr {
            field.maxpyin(&mut dense_col[rows[r]], &col[r], &ukj);
        }
        stats.gemv_ops += below;
        return;
    }

    let segsze = last - first + 1;
    let seg = &mut tempv[..segsze];
    for (t, &row) in seg.iter_mut().zip(&rows[first..=last]) {
        *t = dense_col[row].clone();
    }

    // Unit lower triangular solve
    for p in 0..segsze {
        if field.is_zero(&seg[p]) {
            continue;
        }
        let (solved, rest) = seg.split_at_mut(p + 1);
        let up = &solved[p];
        let col = &block[(first + p) * nsupr..(first + p + 1) * nsupr];
        for (q, t) in rest.iter_mut().enumerate() {
            field.maxpyin(t, &col[first + p + 1 + q], up);
        }
        stats.trsv_ops += rest.len();
    }

    // Matrix-vector update of the rows below the segment
    for (p, up) in seg.iter().enumerate() {
        if field.is_zero(up) {
            continue;
        }
        let col = &block[(first + p) * nsupr..(first + p + 1) * nsupr];
        for r in last + 1..nsupr {
            field.maxpyin(&mut dense_col[rows[r]], &col[r], up);
        }
        stats.gemv_ops += below;
    }

    for (t, &row) in seg.iter().zip(&rows[first..=last]) {
        dense_col[row] = t.clone();
    }
}

/// Forward elimination inside one supernode block.
///
/// `block` starts at the first column of the supernode; `column` is the new
/// column, one value per block row. Columns `first..last` of the block are
/// applied in order.
fn update_within_block<F: Field>(
    field: &F,
    block: &[F::Element],
    nsupr: usize,
    first: usize,
    last: usize,
    column: &mut [F::Element],
    stats: &mut LuStats,
) {
    for p in first..last {
        let (head, tail) = column.split_at_mut(p + 1);
        let up = &head[p];
        if field.is_zero(up) {
            continue;
        }
        let col = &block[p * nsupr + p + 1..(p + 1) * nsupr];
        for (t, l) in tail.iter_mut().zip(col) {
            field.maxpyin(t, l, up);
        }
        stats.trsv_ops += last - p - 1;
        stats.gemv_ops += nsupr - last;
    }
}

/// Moves the block rows of `dense_col` into the storage of column `jcol`.
fn gather_column<F: Field>(
    field: &F,
    store: &mut FactorStore<F::Element>,
    jcol: usize,
    fsupc: usize,
    dense_col: &mut [F::Element],
) -> Result<usize, LuError> {
    let lptr = store.xlsub[fsupc];
    let nsupr = store.xlsub[fsupc + 1] - lptr;
    let nextlu = store.xlusup[jcol];
    store.ensure(StorageKind::Lusup, nextlu + nsupr)?;

    for i in 0..nsupr {
        let row = store.lsub[lptr + i];
        store.lusup[nextlu + i] = mem::replace(&mut dense_col[row], field.zero());
    }
    store.xlusup[jcol + 1] = nextlu + nsupr;
    Ok(nsupr)
}

/// Computes column `jcol` of a relaxed supernode starting at `fsupc`.
///
/// The rows of a relaxed supernode are never pivoted before it starts, so the
/// only updates come from its own earlier columns.
pub(crate) fn snode_bmod<F: Field>(
    field: &F,
    store: &mut FactorStore<F::Element>,
    jcol: usize,
    fsupc: usize,
    dense_col: &mut [F::Element],
    stats: &mut LuStats,
) -> Result<(), LuError> {
    let nsupr = gather_column(field, store, jcol, fsupc, dense_col)?;
    if jcol > fsupc {
        let luptr = store.xlusup[fsupc];
        let (done, column) = store.lusup.split_at_mut(store.xlusup[jcol]);
        update_within_block(
            field,
            &done[luptr..],
            nsupr,
            0,
            jcol - fsupc,
            &mut column[..nsupr],
            stats,
        );
    }
    Ok(())
}

/// Applies every segment found by `panel_dfs` to the panel columns it
/// touches.
pub(crate) fn panel_bmod<F: Field>(
    field: &F,
    store: &FactorStore<F::Element>,
    width: usize,
    ws: &mut Workspace<F::Element>,
    stats: &mut LuStats,
) {
    let m = ws.nrows;
    let n = ws.ncols;
    let Workspace {
        dense,
        tempv,
        segrep,
        repfnz,
        ..
    } = ws;

    for &krep in segrep.iter().rev() {
        let fsupc = store.xsup[store.supno[krep]];
        for k in 0..width {
            let kfnz = repfnz[k * n + krep];
            if kfnz == EMPTY {
                continue;
            }
            apply_segment(
                field,
                store,
                fsupc,
                kfnz - fsupc,
                krep - fsupc,
                &mut dense[k * m..(k + 1) * m],
                tempv,
                stats,
            );
        }
    }
}

/// Finishes column `jcol` after the panel update.
///
/// Applies the segments found by `column_dfs`, restricted to steps inside
/// the panel starting at `fpanelc`, then stores the block rows of the column
/// and eliminates it against the earlier panel columns of its own supernode.
pub(crate) fn column_bmod<F: Field>(
    field: &F,
    store: &mut FactorStore<F::Element>,
    jcol: usize,
    fpanelc: usize,
    segments: &[usize],
    repfnz_col: &[usize],
    dense_col: &mut [F::Element],
    tempv: &mut [F::Element],
    stats: &mut LuStats,
) -> Result<(), LuError> {
    let jsupno = store.supno[jcol];

    for &krep in segments.iter().rev() {
        let ksupno = store.supno[krep];
        if ksupno == jsupno {
            continue;
        }
        let fsupc = store.xsup[ksupno];
        let kfnz = repfnz_col[krep].max(fpanelc);
        apply_segment(
            field,
            store,
            fsupc,
            kfnz - fsupc,
            krep - fsupc,
            dense_col,
            tempv,
            stats,
        );
    }

    let fsupc = store.xsup[jsupno];
    let nsupr = gather_column(field, store, jcol, fsupc, dense_col)?;

    let fst_col = fsupc.max(fpanelc);
    if jcol > fst_col {
        let luptr = store.xlusup[fsupc];
        let (done, column) = store.lusup.split_at_mut(store.xlusup[jcol]);
        update_within_block(
            field,
            &done[luptr..],
            nsupr,
            fst_col - fsupc,
            jcol - fsupc,
            &mut column[..nsupr],
            stats,
        );
    }
    Ok(())
}

/// Moves the U segments of column `jcol` that lie outside its own supernode
/// into `ucol`, indexed by pivot step.
pub(crate) fn copy_to_ucol<F: Field>(
    field: &F,
    store: &mut FactorStore<F::Element>,
    jcol: usize,
    segments: &[usize],
    repfnz_col: &[usize],
    perm_r: &[usize],
    dense_col: &mut [F::Element],
) -> Result<(), LuError> {
    let jsupno = store.supno[jcol];
    let mut nextu = store.xusub[jcol];

    for &krep in segments.iter().rev() {
        let ksupno = store.supno[krep];
        if ksupno == jsupno {
            continue;
        }
        let kfnz = repfnz_col[krep];
        if kfnz == EMPTY {
            continue;
        }

        let fsupc = store.xsup[ksupno];
        let segsze = krep - kfnz + 1;
        store.ensure(StorageKind::Ucol, nextu + segsze)?;
        store.ensure(StorageKind::Usub, nextu + segsze)?;

        let isub = store.xlsub[fsupc] + (kfnz - fsupc);
        for i in 0..segsze {
            let irow = store.lsub[isub + i];
            store.usub[nextu] = perm_r[irow];
            store.ucol[nextu] = mem::replace(&mut dense_col[irow], field.zero());
            nextu += 1;
        }
    }

    store.xusub[jcol + 1] = nextu;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lu::options::LuOptions;
    use exactlu_field::Modular;

    fn field() -> Modular {
        Modular::new(101).unwrap()
    }

    /// One supernode over steps 0..2 with block rows [0, 1, 2] and
    /// L = [[1, 0], [2, 1], [3, 4]].
    fn two_column_store() -> FactorStore<u64> {
        let mut store = FactorStore::new(0);
        store.init(3, 3, 9, &LuOptions::default()).unwrap();
        store.nsuper = 1;
        store.xsup[0] = 0;
        store.xsup[1] = 2;
        store.supno[0] = 0;
        store.supno[1] = 0;
        store.supno[2] = 1;
        store.xlsub[0] = 0;
        store.xlsub[1] = 3;
        store.lsub[..3].copy_from_slice(&[0, 1, 2]);
        store.xlusup[0] = 0;
        store.xlusup[1] = 3;
        store.xlusup[2] = 6;
        // Column 0: u00 = 5, then multipliers
        store.lusup[..3].copy_from_slice(&[5, 2, 3]);
        // Column 1: u01 = 7, u11 = 6, multiplier 4
        store.lusup[3..6].copy_from_slice(&[7, 6, 4]);
        store
    }

    #[test]
    fn test_apply_segment_single() {
        let f = field();
        let store = two_column_store();
        let mut dense = vec![0, 10, 1];
        let mut tempv = vec![0; 3];
        let mut stats = LuStats::default();
        // Segment made of step 1 only: rows below get 1 - 4 * 10
        apply_segment(&f, &store, 0, 1, 1, &mut dense, &mut tempv, &mut stats);
        assert_eq!(dense, vec![0, 10, f.init(1 - 40)]);
        assert_eq!(stats.gemv_ops, 1);
    }

    #[test]
    fn test_apply_segment_solve_and_update() {
        let f = field();
        let store = two_column_store();
        let mut dense = vec![1, 1, 1];
        let mut tempv = vec![0; 3];
        let mut stats = LuStats::default();
        apply_segment(&f, &store, 0, 0, 1, &mut dense, &mut tempv, &mut stats);
        // u0 = 1, u1 = 1 - 2 = -1, row 2: 1 - 3 * 1 - 4 * (-1) = 2
        assert_eq!(dense, vec![1, f.init(-1), 2]);
        assert_eq!(stats.trsv_ops, 1);
        assert_eq!(stats.gemv_ops, 2);
    }

    #[test]
    fn test_snode_bmod_eliminates_within_block() {
        let f = field();
        let mut store = two_column_store();
        store.xlusup[2] = 6;
        // Treat the block as relaxed and compute column 2 of a 3-wide block
        store.xsup[1] = 3;
        store.supno[2] = 0;
        store.xlsub[1] = 3;
        let mut dense = vec![1, 1, 1];
        let mut stats = LuStats::default();
        snode_bmod(&f, &mut store, 2, 0, &mut dense, &mut stats).unwrap();
        assert_eq!(&store.lusup[6..9], &[1, f.init(-1), 2]);
        assert_eq!(store.xlusup[3], 9);
        assert!(dense.iter().all(|&x| x == 0));
    }

    #[test]
    fn test_copy_to_ucol_moves_segment() {
        let f = field();
        let mut store = two_column_store();
        // Step 2 starts a new supernode
        store.nsuper = 2;
        store.xsup[2] = 3;
        store.supno[2] = 1;
        store.xusub[2] = 0;
        let perm_r = vec![0, 1, EMPTY];
        let repfnz = vec![EMPTY, 0, EMPTY];
        let mut dense = vec![8, 9, 1];
        copy_to_ucol(&f, &mut store, 2, &[1], &repfnz, &perm_r, &mut dense).unwrap();
        assert_eq!(store.xusub[3], 2);
        assert_eq!(&store.usub[..2], &[0, 1]);
        assert_eq!(&store.ucol[..2], &[8, 9]);
        assert_eq!(dense, vec![0, 0, 1]);
    }
}
