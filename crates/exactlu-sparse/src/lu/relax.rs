//! Relaxed supernodes.
//!
//! Small leaf subtrees of the column elimination tree are factored as one
//! dense block without symbolic search, accepting a few explicit zeros in
//! exchange for skipping the DFS on the columns where it is least useful.

use crate::EMPTY;

/// Finds the relaxed supernodes of a postordered elimination tree.
///
/// Returns `relax_end` where `relax_end[j]` is the last step of the relaxed
/// supernode starting at `j`, or [`EMPTY`]. Starting from each leaf, the
/// supernode climbs to the parent while the parent has fewer than `relax`
/// descendants. `relax == 0` disables relaxation.
#[must_use]
pub fn relax_supernodes(etree: &[usize], relax: usize) -> Vec<usize> {
    let n = etree.len();
    let mut relax_end = vec![EMPTY; n];
    if relax == 0 {
        return relax_end;
    }

    let mut descendants = vec![0usize; n];
    for j in 0..n {
        let parent = etree[j];
        if parent != n {
            descendants[parent] += descendants[j] + 1;
        }
    }

    let mut j = 0;
    while j < n {
        let start = j;
        let mut parent = etree[j];
        while parent != n && descendants[parent] < relax {
            j = parent;
            parent = etree[j];
        }
        relax_end[start] = j;
        j += 1;
        // Next leaf
        while j < n && descendants[j] != 0 {
            j += 1;
        }
    }

    relax_end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain() {
        // 0 -> 1 -> 2 -> 3 (root)
        let etree = [1, 2, 3, 4];
        assert_eq!(relax_supernodes(&etree, 3), vec![2, EMPTY, EMPTY, EMPTY]);
        assert_eq!(relax_supernodes(&etree, 10)[0], 3);
    }

    #[test]
    fn test_disabled() {
        assert!(relax_supernodes(&[1, 2, 3], 0).iter().all(|&x| x == EMPTY));
    }

    #[test]
    fn test_forest_of_leaves() {
        // Diagonal matrix: every column is its own root
        assert_eq!(relax_supernodes(&[3, 3, 3], 1), vec![0, 1, 2]);
    }

    #[test]
    fn test_two_subtrees() {
        // {0, 1} -> 2, {3} -> 4, 2 and 4 -> 5 (root)
        let etree = [2, 2, 5, 4, 5, 6];
        let relax_end = relax_supernodes(&etree, 3);
        assert_eq!(relax_end, vec![2, EMPTY, EMPTY, 4, EMPTY, EMPTY]);
    }
}
