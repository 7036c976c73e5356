//! Column elimination trees and postorderings.
//!
//! The column elimination tree of `A` is the elimination tree of `AᵀA`. It
//! bounds the dependencies between columns of the LU factors for every row
//! permutation, which is what makes it usable before pivoting happens.
//!
//! Trees are stored as parent arrays of length `n` where the value `n` marks a
//! root.

use crate::csc::CscRef;
use crate::EMPTY;

/// A column permutation together with its postordered elimination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preorder {
    /// `col_perm[j]` is the original column processed at step `j`.
    pub col_perm: Vec<usize>,
    /// Parent of each step in the column elimination tree, `n` for roots.
    pub etree: Vec<usize>,
}

/// Computes the column elimination tree of `A·Pc` without forming `AᵀA`.
///
/// `col_perm[j]` selects the original column used as column `j`.
#[must_use]
pub fn column_etree<E>(a: CscRef<'_, E>, col_perm: &[usize]) -> Vec<usize> {
    let n = a.ncols();
    let m = a.nrows();

    let mut etree = vec![n; n];
    let mut ancestor = vec![EMPTY; n];
    // Most recent column seen in each row
    let mut prev = vec![EMPTY; m];

    for j in 0..n {
        for &row in a.row_indices_of_col(col_perm[j]) {
            let mut i = prev[row];
            while i != EMPTY && i != j {
                let next = ancestor[i];
                ancestor[i] = j;
                if next == EMPTY {
                    etree[i] = j;
                    break;
                }
                i = next;
            }
            prev[row] = j;
        }
    }

    etree
}

/// Computes a depth-first postorder of a forest.
///
/// Returns `post` where `post[v]` is the new label of node `v`. Children are
/// visited in increasing order, so a tree that is already postordered maps to
/// the identity.
#[must_use]
pub fn postorder(etree: &[usize]) -> Vec<usize> {
    let n = etree.len();

    let mut first_kid = vec![EMPTY; n + 1];
    let mut next_kid = vec![EMPTY; n + 1];
    for v in (0..n).rev() {
        let dad = etree[v];
        next_kid[v] = first_kid[dad];
        first_kid[dad] = v;
    }

    let mut post = vec![0; n];
    let mut next = 0;
    let mut stack = vec![(n, first_kid[n])];
    while let Some(top) = stack.last_mut() {
        let (node, kid) = *top;
        if kid == EMPTY {
            stack.pop();
            if node != n {
                post[node] = next;
                next += 1;
            }
        } else {
            top.1 = next_kid[kid];
            stack.push((kid, first_kid[kid]));
        }
    }

    post
}

/// Composes `col_perm` with the postorder of its column elimination tree.
///
/// The returned tree satisfies `etree[j] > j` for every non-root and every
/// subtree occupies a contiguous range of steps ending at its root.
#[must_use]
pub fn preorder<E>(a: CscRef<'_, E>, col_perm: &[usize]) -> Preorder {
    let n = a.ncols();
    let etree = column_etree(a, col_perm);
    let post = postorder(&etree);

    let mut new_perm = vec![0; n];
    let mut new_etree = vec![n; n];
    for k in 0..n {
        new_perm[post[k]] = col_perm[k];
        if etree[k] != n {
            new_etree[post[k]] = post[etree[k]];
        }
    }

    Preorder {
        col_perm: new_perm,
        etree: new_etree,
    }
}
