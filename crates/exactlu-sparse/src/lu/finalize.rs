//! Conversion of the factor store into owned factors.

use exactlu_field::Field;

use super::factor::LFactor;
use super::store::FactorStore;
use crate::csc::CscMatrix;
use crate::EMPTY;

/// Factors extracted from a completed store.
pub(crate) struct Finalized<E> {
    pub(crate) l: LFactor<E>,
    pub(crate) u: CscMatrix<E>,
    /// `row_perm[row]` is the position of `row` in `P·A`.
    pub(crate) row_perm: Vec<usize>,
}

/// Assigns final row positions and extracts L and U.
///
/// Pivot rows take the positions `0..rank` in step order; rows that never
/// became a pivot take `rank..nrows` in increasing row order.
pub(crate) fn finalize<F: Field>(
    field: &F,
    store: &mut FactorStore<F::Element>,
) -> Finalized<F::Element> {
    let m = store.nrows;
    let n = store.ncols;

    let mut step_position = vec![EMPTY; n];
    let mut row_position = vec![EMPTY; m];
    let mut rank = 0;
    for (step, &row) in store.pivot_row.iter().enumerate() {
        if row != EMPTY {
            step_position[step] = rank;
            row_position[row] = rank;
            rank += 1;
        }
    }
    let mut next = rank;
    for position in &mut row_position {
        if *position == EMPTY {
            *position = next;
            next += 1;
        }
    }

    store.fixup_l(&row_position);

    let l = extract_l(field, store, &step_position, rank);
    let u = extract_u(store, &step_position, rank);
    Finalized {
        l,
        u,
        row_perm: row_position,
    }
}

fn extract_l<F: Field>(
    field: &F,
    store: &FactorStore<F::Element>,
    step_position: &[usize],
    rank: usize,
) -> LFactor<F::Element> {
    let mut sup_ptr = Vec::new();
    let mut row_ptr = vec![0];
    let mut rows = Vec::new();
    let mut val_ptr = vec![0];
    let mut values = Vec::new();

    for s in 0..store.nsuper {
        let fsupc = store.xsup[s];
        // Singletons of steps without a pivot have no L column
        if store.pivot_row[fsupc] == EMPTY {
            continue;
        }
        let ncols = store.xsup[s + 1] - fsupc;
        let lptr = store.xlsub[fsupc];
        let nsupr = store.xlsub[fsupc + 1] - lptr;
        let block_rows = &store.lsub[lptr..lptr + nsupr];

        let mut order: Vec<usize> = (0..nsupr).collect();
        order.sort_unstable_by_key(|&i| block_rows[i]);

        sup_ptr.push(step_position[fsupc]);
        rows.extend(order.iter().map(|&i| block_rows[i]));

        let luptr = store.xlusup[fsupc];
        for c in 0..ncols {
            let col = &store.lusup[luptr + c * nsupr..luptr + (c + 1) * nsupr];
            for (i, &src) in order.iter().enumerate() {
                let value = if i < c {
                    field.zero()
                } else if i == c {
                    field.one()
                } else {
                    col[src].clone()
                };
                values.push(value);
            }
        }

        row_ptr.push(rows.len());
        val_ptr.push(values.len());
    }
    sup_ptr.push(rank);

    LFactor {
        nrows: store.nrows,
        sup_ptr,
        row_ptr,
        rows,
        val_ptr,
        values,
    }
}

fn extract_u<E: Clone>(
    store: &FactorStore<E>,
    step_position: &[usize],
    rank: usize,
) -> CscMatrix<E> {
    let n = store.ncols;
    let mut col_ptrs = Vec::with_capacity(n + 1);
    col_ptrs.push(0);
    let mut row_indices = Vec::new();
    let mut values = Vec::new();
    let mut entries: Vec<(usize, E)> = Vec::new();

    for j in 0..n {
        entries.clear();
        for k in store.xusub[j]..store.xusub[j + 1] {
            entries.push((step_position[store.usub[k]], store.ucol[k].clone()));
        }
        if store.pivot_row[j] != EMPTY {
            let fsupc = store.xsup[store.supno[j]];
            let col = store.xlusup[j];
            for i in 0..=j - fsupc {
                entries.push((step_position[fsupc + i], store.lusup[col + i].clone()));
            }
        }
        entries.sort_unstable_by_key(|&(row, _)| row);
        for (row, value) in entries.drain(..) {
            row_indices.push(row);
            values.push(value);
        }
        col_ptrs.push(row_indices.len());
    }

    CscMatrix::from_raw_unchecked(rank, col_ptrs, row_indices, values)
}
