//! Symbolic factorization.
//!
//! The structure of column `j` of L and U is the set of rows reachable from
//! the rows of `A(:, j)` in the graph of the columns already factored. Each
//! search visits supernodes through their representative's (pruned) row list
//! and records, per supernode, the first step where the column is nonzero
//! (`repfnz`). The representatives come out in postorder, so reading
//! `segrep` backwards gives an order in which every supernode is applied
//! after the supernodes it depends on.

use super::error::LuError;
use super::memory::StorageKind;
use super::store::FactorStore;
use super::workspace::Workspace;
use crate::csc::CscRef;
use crate::EMPTY;

/// Row structure of the relaxed supernode `jcol..=kcol`.
///
/// The union of the rows of its columns becomes the block row list; for a
/// multi-column supernode a second copy becomes the representative's search
/// list. Returns `false`, leaving the supernode metadata untouched, when one
/// of the rows is already pivoted: the columns then depend on earlier steps
/// and must go through the panel path.
pub(crate) fn snode_dfs<E: Clone>(
    store: &mut FactorStore<E>,
    a: CscRef<'_, E>,
    col_perm: &[usize],
    jcol: usize,
    kcol: usize,
    perm_r: &[usize],
    marker: &mut [usize],
) -> Result<bool, LuError> {
    let head = store.xlsub[jcol];
    let mut nextl = head;

    for &col in &col_perm[jcol..=kcol] {
        for &krow in a.row_indices_of_col(col) {
            if perm_r[krow] != EMPTY {
                return Ok(false);
            }
            if marker[krow] != kcol {
                marker[krow] = kcol;
                store.set_lsub(nextl, krow)?;
                nextl += 1;
            }
        }
    }

    let nsuper = store.nsuper;
    store.nsuper += 1;
    for icol in jcol..=kcol {
        store.supno[icol] = nsuper;
    }

    if jcol < kcol {
        let len = nextl - head;
        store.ensure(StorageKind::Lsub, nextl + len)?;
        store.lsub.copy_within(head..nextl, nextl);
        for icol in jcol + 1..=kcol {
            store.xlsub[icol] = nextl;
        }
        nextl += len;
    }

    store.xsup[nsuper] = jcol;
    store.xsup[nsuper + 1] = kcol + 1;
    store.supno[kcol + 1] = nsuper;
    store.xprune[kcol] = nextl;
    store.xlsub[kcol + 1] = nextl;
    Ok(true)
}

/// Symbolic factorization of the panel `jcol..jcol + width` against the
/// supernodes completed before it.
///
/// Scatters each panel column into its dense slot and produces:
/// - `segrep`: representatives of the supernodes updating the panel, each
///   once, in postorder of the union of the searches
/// - `repfnz[k * ncols + rep]`: first nonzero step of the segment in panel
///   column `k`
/// - `panel_lsub`: for each panel column, the reached rows not yet pivoted
pub(crate) fn panel_dfs<E: Clone>(
    store: &FactorStore<E>,
    a: CscRef<'_, E>,
    col_perm: &[usize],
    jcol: usize,
    width: usize,
    perm_r: &[usize],
    ws: &mut Workspace<E>,
) {
    let m = ws.nrows;
    let n = ws.ncols;
    let stamp = jcol + 1;

    let Workspace {
        dense,
        segrep,
        repfnz,
        panel_lsub,
        panel_lsub_len,
        panel_marker,
        segment_stamp,
        parent,
        xplore,
        ..
    } = ws;
    segrep.clear();

    for k in 0..width {
        let jj = jcol + k;
        let repfnz_col = &mut repfnz[k * n..(k + 1) * n];
        let dense_col = &mut dense[k * m..(k + 1) * m];
        let lsub_col = &mut panel_lsub[k * m..(k + 1) * m];
        let mut nextl_col = 0;

        for (krow, value) in a.col_iter(col_perm[jj]) {
            dense_col[krow] = value.clone();
            if panel_marker[krow] == jj {
                continue;
            }
            panel_marker[krow] = jj;

            let kperm = perm_r[krow];
            if kperm == EMPTY {
                lsub_col[nextl_col] = krow;
                nextl_col += 1;
                continue;
            }

            let mut krep = store.rep_of(kperm);
            let myfnz = repfnz_col[krep];
            if myfnz != EMPTY {
                if myfnz > kperm {
                    repfnz_col[krep] = kperm;
                }
                continue;
            }

            parent[krep] = EMPTY;
            repfnz_col[krep] = kperm;
            let mut xdfs = store.xlsub[krep];
            let mut maxdfs = store.xprune[krep];

            loop {
                while xdfs < maxdfs {
                    let kchild = store.lsub[xdfs];
                    xdfs += 1;
                    if panel_marker[kchild] == jj {
                        continue;
                    }
                    panel_marker[kchild] = jj;

                    let chperm = perm_r[kchild];
                    if chperm == EMPTY {
                        lsub_col[nextl_col] = kchild;
                        nextl_col += 1;
                        continue;
                    }

                    let chrep = store.rep_of(chperm);
                    let myfnz = repfnz_col[chrep];
                    if myfnz != EMPTY {
                        if myfnz > chperm {
                            repfnz_col[chrep] = chperm;
                        }
                        continue;
                    }

                    // Descend
                    xplore[krep] = xdfs;
                    parent[chrep] = krep;
                    krep = chrep;
                    repfnz_col[krep] = chperm;
                    xdfs = store.xlsub[krep];
                    maxdfs = store.xprune[krep];
                }

                if segment_stamp[krep] != stamp {
                    segment_stamp[krep] = stamp;
                    segrep.push(krep);
                }

                let kpar = parent[krep];
                if kpar == EMPTY {
                    break;
                }
                krep = kpar;
                xdfs = xplore[krep];
                maxdfs = store.xprune[krep];
            }
        }

        panel_lsub_len[k] = nextl_col;
    }
}

/// Symbolic factorization of column `jcol` against the supernodes formed
/// inside its panel.
///
/// Continues from the rows `panel_dfs` left unpivoted, appends the new
/// segments to `segrep`, writes the column's row list, and decides whether
/// `jcol` joins the current supernode. It joins when the previous column has
/// a pivot, its list is exactly the previous list minus that pivot row, and
/// the supernode has fewer than `max_supernode` columns. When a new
/// supernode starts, the lists of the finished one are compacted to its block
/// row list followed by its representative's list.
pub(crate) fn column_dfs<E: Clone>(
    store: &mut FactorStore<E>,
    jcol: usize,
    perm_r: &[usize],
    lsub_col: &[usize],
    max_supernode: usize,
    segrep: &mut Vec<usize>,
    repfnz: &mut [usize],
    marker: &mut [usize],
    parent: &mut [usize],
    xplore: &mut [usize],
) -> Result<(), LuError> {
    let mut nextl = store.xlsub[jcol];
    let mut joins = jcol > 0 && store.nsuper > 0 && store.pivot_row[jcol - 1] != EMPTY;

    for &krow in lsub_col {
        let kmark = marker[krow];
        if kmark == jcol {
            continue;
        }
        marker[krow] = jcol;

        let kperm = perm_r[krow];
        if kperm == EMPTY {
            store.set_lsub(nextl, krow)?;
            nextl += 1;
            if jcol == 0 || kmark != jcol - 1 {
                joins = false;
            }
            continue;
        }

        let mut krep = store.rep_of(kperm);
        let myfnz = repfnz[krep];
        if myfnz != EMPTY {
            if myfnz > kperm {
                repfnz[krep] = kperm;
            }
            continue;
        }

        parent[krep] = EMPTY;
        repfnz[krep] = kperm;
        let mut xdfs = store.xlsub[krep];
        let mut maxdfs = store.xprune[krep];

        loop {
            while xdfs < maxdfs {
                let kchild = store.lsub[xdfs];
                xdfs += 1;
                let chmark = marker[kchild];
                if chmark == jcol {
                    continue;
                }
                marker[kchild] = jcol;

                let chperm = perm_r[kchild];
                if chperm == EMPTY {
                    store.set_lsub(nextl, kchild)?;
                    nextl += 1;
                    if jcol == 0 || chmark != jcol - 1 {
                        joins = false;
                    }
                    continue;
                }

                let chrep = store.rep_of(chperm);
                let myfnz = repfnz[chrep];
                if myfnz != EMPTY {
                    if myfnz > chperm {
                        repfnz[chrep] = chperm;
                    }
                    continue;
                }

                xplore[krep] = xdfs;
                parent[chrep] = krep;
                krep = chrep;
                repfnz[krep] = chperm;
                xdfs = store.xlsub[krep];
                maxdfs = store.xprune[krep];
            }

            segrep.push(krep);

            let kpar = parent[krep];
            if kpar == EMPTY {
                break;
            }
            krep = kpar;
            xdfs = xplore[krep];
            maxdfs = store.xprune[krep];
        }
    }

    if joins {
        let fsupc = store.xsup[store.nsuper - 1];
        let jptr = store.xlsub[jcol];
        let jm1ptr = store.xlsub[jcol - 1];
        if jcol - fsupc >= max_supernode
            || jptr == jm1ptr
            || nextl - jptr != jptr - jm1ptr - 1
        {
            joins = false;
        }
    }

    if joins {
        store.supno[jcol] = store.nsuper - 1;
    } else {
        if store.nsuper > 0 {
            let fsupc = store.xsup[store.nsuper - 1];
            let jcolm1 = jcol - 1;
            if fsupc + 1 < jcolm1 {
                // Keep the block row list and the representative's list only
                let jptr = store.xlsub[jcol];
                let jm1ptr = store.xlsub[jcolm1];
                let ito = store.xlsub[fsupc + 1];
                let istop = ito + (jptr - jm1ptr);
                store.xlsub[jcolm1] = ito;
                store.xprune[jcolm1] = istop;
                store.xlsub[jcol] = istop;
                store.lsub.copy_within(jm1ptr..nextl, ito);
                nextl = ito + (nextl - jm1ptr);
            }
        }
        store.nsuper += 1;
        store.supno[jcol] = store.nsuper - 1;
    }

    let cur = store.nsuper - 1;
    store.xsup[cur + 1] = jcol + 1;
    store.supno[jcol + 1] = cur;
    store.xprune[jcol] = nextl;
    store.xlsub[jcol + 1] = nextl;
    Ok(())
}
