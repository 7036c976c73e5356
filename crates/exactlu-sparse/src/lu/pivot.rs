//! Threshold pivoting.

use std::cmp::Ordering;

use exactlu_field::Field;

use super::error::LuError;
use super::options::Threshold;
use super::store::FactorStore;

/// Result of pivot selection for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PivotOutcome {
    /// `row` was chosen; `preferred_used` tells whether it was the preferred
    /// row of a reused permutation.
    Pivot { row: usize, preferred_used: bool },
    /// Every candidate is zero.
    Zero,
}

/// Chooses the pivot row of step `jcol` and scales the column of L.
///
/// Candidates are the block rows of `jcol`'s supernode from position `nsupc`
/// on. `preferred` is tried first, then `diagonal`, each only if it passes
/// the threshold; otherwise the candidate of largest magnitude (lowest row
/// on ties) is taken. In fields without a magnitude every nonzero candidate
/// passes and the fallback is the lowest row.
pub(crate) fn pivot_l<F: Field>(
    field: &F,
    store: &mut FactorStore<F::Element>,
    jcol: usize,
    threshold: Threshold,
    preferred: Option<usize>,
    diagonal: Option<usize>,
    perm_r: &mut [usize],
) -> Result<PivotOutcome, LuError> {
    let fsupc = store.xsup[store.supno[jcol]];
    let nsupc = jcol - fsupc;
    let lptr = store.xlsub[fsupc];
    let nsupr = store.xlsub[fsupc + 1] - lptr;
    let luptr = store.xlusup[fsupc];
    let col = store.xlusup[jcol];

    let rows = &store.lsub[lptr..lptr + nsupr];
    let values = &store.lusup[col..col + nsupr];

    let mut ordered = true;
    let mut largest: Option<usize> = None;
    let mut lowest: Option<usize> = None;
    for pos in nsupc..nsupr {
        let value = &values[pos];
        if field.is_zero(value) {
            continue;
        }
        let row = rows[pos];
        if lowest.map_or(true, |p| row < rows[p]) {
            lowest = Some(pos);
        }
        if !ordered {
            continue;
        }
        match largest {
            None => largest = Some(pos),
            Some(best) => match field.compare_magnitude(value, &values[best]) {
                Some(Ordering::Greater) => largest = Some(pos),
                Some(Ordering::Equal) if row < rows[best] => largest = Some(pos),
                Some(_) => {}
                None => ordered = false,
            },
        }
    }

    let Some(lowest) = lowest else {
        return Ok(PivotOutcome::Zero);
    };
    let fallback = match largest {
        Some(best) if ordered => best,
        _ => lowest,
    };

    let num = field.init(i64::from(threshold.numerator()));
    let den = field.init(i64::from(threshold.denominator()));
    let bound = field.mul(&values[fallback], &num);
    let passes = |pos: usize| {
        if !ordered {
            return true;
        }
        let scaled = field.mul(&values[pos], &den);
        field.compare_magnitude(&scaled, &bound) != Some(Ordering::Less)
    };
    let eligible = |row: usize| {
        (nsupc..nsupr).find(|&pos| rows[pos] == row && !field.is_zero(&values[pos]))
    };

    let mut preferred_used = false;
    let mut choice = preferred.and_then(eligible).filter(|&pos| passes(pos));
    if choice.is_some() {
        preferred_used = true;
    } else {
        choice = diagonal.and_then(eligible).filter(|&pos| passes(pos));
    }
    let pivptr = choice.unwrap_or(fallback);

    let pivrow = rows[pivptr];
    perm_r[pivrow] = jcol;
    store.pivot_row[jcol] = pivrow;

    if pivptr != nsupc {
        store.lsub.swap(lptr + pivptr, lptr + nsupc);
        // The whole block keeps one row order
        for icol in 0..=nsupc {
            let base = luptr + icol * nsupr;
            store.lusup.swap(base + pivptr, base + nsupc);
        }
    }

    let inv = field.inv(&store.lusup[col + nsupc])?;
    for value in &mut store.lusup[col + nsupc + 1..col + nsupr] {
        field.mulin(value, &inv);
    }

    Ok(PivotOutcome::Pivot {
        row: pivrow,
        preferred_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lu::options::LuOptions;
    use crate::EMPTY;
    use exactlu_field::{Modular, Rational, Rationals};

    /// Single-column supernode at step 0 with block rows `rows` and values `values`.
    fn singleton<E: Clone>(zero: E, rows: &[usize], values: Vec<E>) -> FactorStore<E> {
        let n = rows.len();
        let mut store = FactorStore::new(zero);
        store.init(n, n, n, &LuOptions::default()).unwrap();
        store.nsuper = 1;
        store.xsup[1] = 1;
        store.xlsub[1] = n;
        store.lsub[..n].copy_from_slice(rows);
        store.xlusup[1] = n;
        for (slot, value) in store.lusup.iter_mut().zip(values) {
            *slot = value;
        }
        store
    }

    #[test]
    fn test_partial_pivoting_picks_largest() {
        let field = Rationals;
        let values = vec![Rational::from(1), Rational::from(-3), Rational::from(2)];
        let mut store = singleton(Rational::from(0), &[0, 1, 2], values);
        let mut perm_r = vec![EMPTY; 3];
        let outcome =
            pivot_l(&field, &mut store, 0, Threshold::ONE, None, Some(0), &mut perm_r).unwrap();
        assert_eq!(
            outcome,
            PivotOutcome::Pivot {
                row: 1,
                preferred_used: false
            }
        );
        assert_eq!(perm_r[1], 0);
        assert_eq!(&store.lsub[..3], &[1, 0, 2]);
        assert_eq!(store.lusup[0], Rational::from(-3));
        assert_eq!(store.lusup[1], Rational::new(-1, 3));
        assert_eq!(store.lusup[2], Rational::new(-2, 3));
    }

    #[test]
    fn test_threshold_keeps_diagonal() {
        let field = Rationals;
        let values = vec![Rational::from(1), Rational::from(-3), Rational::from(2)];
        let mut store = singleton(Rational::from(0), &[0, 1, 2], values);
        let mut perm_r = vec![EMPTY; 3];
        // |1| >= 1/4 * |-3|
        let outcome = pivot_l(
            &field,
            &mut store,
            0,
            Threshold::new(1, 4),
            None,
            Some(0),
            &mut perm_r,
        )
        .unwrap();
        assert!(matches!(outcome, PivotOutcome::Pivot { row: 0, .. }));
        assert_eq!(store.lusup[1], Rational::from(-3));
    }

    #[test]
    fn test_unordered_field_prefers_diagonal_then_lowest() {
        let field = Modular::new(7).unwrap();
        let mut store = singleton(0, &[2, 0, 1], vec![3, 0, 5]);
        let mut perm_r = vec![EMPTY; 3];
        let outcome =
            pivot_l(&field, &mut store, 0, Threshold::ONE, None, Some(1), &mut perm_r).unwrap();
        assert!(matches!(outcome, PivotOutcome::Pivot { row: 1, .. }));

        let mut store = singleton(0, &[2, 0, 1], vec![3, 0, 5]);
        let mut perm_r = vec![EMPTY; 3];
        // Diagonal row 0 is zero: lowest nonzero row wins
        let outcome =
            pivot_l(&field, &mut store, 0, Threshold::ONE, None, Some(0), &mut perm_r).unwrap();
        assert!(matches!(outcome, PivotOutcome::Pivot { row: 1, .. }));
    }

    #[test]
    fn test_preferred_row() {
        let field = Modular::new(7).unwrap();
        let mut store = singleton(0, &[0, 1, 2], vec![1, 1, 1]);
        let mut perm_r = vec![EMPTY; 3];
        let outcome =
            pivot_l(&field, &mut store, 0, Threshold::ONE, Some(2), Some(0), &mut perm_r).unwrap();
        assert_eq!(
            outcome,
            PivotOutcome::Pivot {
                row: 2,
                preferred_used: true
            }
        );
    }

    #[test]
    fn test_zero_column() {
        let field = Modular::new(7).unwrap();
        let mut store = singleton(0, &[0, 1], vec![0, 0]);
        let mut perm_r = vec![EMPTY; 2];
        let outcome =
            pivot_l(&field, &mut store, 0, Threshold::ONE, None, Some(0), &mut perm_r).unwrap();
        assert_eq!(outcome, PivotOutcome::Zero);
        assert_eq!(perm_r, vec![EMPTY; 2]);
        assert_eq!(store.pivot_row[0], EMPTY);
    }

    #[test]
    fn test_non_unit_pivot_is_fatal() {
        let field = Modular::new(6).unwrap();
        let mut store = singleton(0, &[0, 1], vec![2, 3]);
        let mut perm_r = vec![EMPTY; 2];
        let err = pivot_l(&field, &mut store, 0, Threshold::ONE, None, Some(0), &mut perm_r)
            .unwrap_err();
        assert!(matches!(err, LuError::Field(_)));
    }
}
