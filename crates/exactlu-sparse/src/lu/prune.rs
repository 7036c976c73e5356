//! Symmetric pruning.
//!
//! Once row `pivrow` is pivoted at step `jcol`, any supernode whose list
//! contains `pivrow` and which updates column `jcol` reaches the rest of its
//! not-yet-pivoted rows through `jcol` as well. Those rows can be dropped
//! from its search list: the list is partitioned so that pivoted rows come
//! first, and `xprune` cuts the search at the partition point.

use super::store::FactorStore;
use crate::EMPTY;

/// Prunes the search lists of the supernodes that updated step `jcol`.
pub(crate) fn prune_l<E: Clone>(
    store: &mut FactorStore<E>,
    jcol: usize,
    pivrow: usize,
    perm_r: &[usize],
    segrep: &[usize],
    repfnz_col: &[usize],
) {
    let jsupno = store.supno[jcol];

    for &irep in segrep {
        if repfnz_col[irep] == EMPTY {
            continue;
        }
        let irep1 = irep + 1;
        // The supernode continues into the panel; its new representative
        // gets pruned instead
        if store.supno[irep] == store.supno[irep1] {
            continue;
        }
        if store.supno[irep] == jsupno {
            continue;
        }

        let kstart = store.xlsub[irep];
        let kend = store.xlsub[irep1];
        if store.xprune[irep] < kend {
            continue;
        }
        if !store.lsub[kstart..kend].contains(&pivrow) {
            continue;
        }

        // A singleton keeps one list for both roles, so values move too
        let movnum = irep == store.xsup[store.supno[irep]];
        let luptr = store.xlusup[irep];

        let mut kmin = kstart;
        let mut kmax = kend;
        while kmin < kmax {
            if perm_r[store.lsub[kmax - 1]] == EMPTY {
                kmax -= 1;
            } else if perm_r[store.lsub[kmin]] != EMPTY {
                kmin += 1;
            } else {
                store.lsub.swap(kmin, kmax - 1);
                if movnum {
                    store
                        .lusup
                        .swap(luptr + (kmin - kstart), luptr + (kmax - 1 - kstart));
                }
                kmin += 1;
                kmax -= 1;
            }
        }
        store.xprune[irep] = kmin;
    }
}
