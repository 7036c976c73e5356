//! Property-based tests for the LU engine.

#[cfg(test)]
mod tests {
    use exactlu_field::{Field, Modular};
    use proptest::prelude::*;

    use crate::{CscMatrix, Factorization, LuEngine, LuOptions};

    type Triplets = Vec<(usize, usize, i64)>;

    fn gf101() -> Modular {
        Modular::new(101).unwrap()
    }

    // Random pattern with small values, duplicates summed
    fn sparse_matrix() -> impl Strategy<Value = (usize, usize, Triplets)> {
        (1usize..12, 1usize..12).prop_flat_map(|(m, n)| {
            let entry = (0..m, 0..n, -3i64..4);
            (Just(m), Just(n), prop::collection::vec(entry, 0..=2 * (m + n)))
        })
    }

    // Columns copied from a narrower random matrix, so the rank is at most `r`
    fn low_rank_matrix() -> impl Strategy<Value = (usize, usize, Triplets)> {
        (2usize..10, 1usize..4, 2usize..10).prop_flat_map(|(m, r, n)| {
            let entry = (0..m, 0..r, 1i64..50);
            (
                Just(m),
                Just(n),
                prop::collection::vec(entry, 1..=m * r),
                prop::collection::vec(0..r, n),
            )
                .prop_map(|(m, n, base, sources)| {
                    let triplets = sources
                        .iter()
                        .enumerate()
                        .flat_map(|(j, &src)| {
                            base.iter()
                                .filter(move |&&(_, c, _)| c == src)
                                .map(move |&(row, _, v)| (row, j, v))
                        })
                        .collect();
                    (m, n, triplets)
                })
        })
    }

    fn build(field: &Modular, m: usize, n: usize, triplets: &Triplets) -> CscMatrix<u64> {
        let entries: Vec<_> = triplets
            .iter()
            .map(|&(r, c, v)| (r, c, field.init(v)))
            .collect();
        CscMatrix::from_triplets(field, m, n, &entries)
    }

    fn reconstructs(field: &Modular, a: &CscMatrix<u64>, lu: &Factorization<u64>) -> bool {
        let pa = a.to_dense(field).permute(lu.row_perm(), lu.col_perm());
        let product = lu.l().to_dense(field).mm(field, &lu.u().to_dense(field));
        pa == product
    }

    fn is_bijection(perm: &[usize]) -> bool {
        let mut sorted = perm.to_vec();
        sorted.sort_unstable();
        sorted.iter().copied().eq(0..perm.len())
    }

    proptest! {
        #[test]
        fn factors_reconstruct((m, n, t) in sparse_matrix()) {
            let field = gf101();
            let a = build(&field, m, n, &t);
            let lu = LuEngine::new(field, LuOptions::default()).factorize(&a).unwrap();
            prop_assert!(reconstructs(&field, &a, &lu));
            prop_assert!(is_bijection(lu.row_perm()));
            prop_assert!(is_bijection(lu.col_perm()));
        }

        #[test]
        fn rank_matches_dense_elimination((m, n, t) in sparse_matrix()) {
            let field = gf101();
            let a = build(&field, m, n, &t);
            let lu = LuEngine::new(field, LuOptions::default()).factorize(&a).unwrap();
            prop_assert_eq!(lu.rank(), a.to_dense(&field).rank(&field).unwrap());
            prop_assert_eq!(lu.rank() + lu.nullity(), m.min(n));
        }

        #[test]
        fn low_rank_is_detected((m, n, t) in low_rank_matrix()) {
            let field = gf101();
            let a = build(&field, m, n, &t);
            let lu = LuEngine::new(field, LuOptions::default()).factorize(&a).unwrap();
            prop_assert_eq!(lu.rank(), a.to_dense(&field).rank(&field).unwrap());
            prop_assert!(reconstructs(&field, &a, &lu));
            if lu.nullity() > 0 && n <= m {
                prop_assert!(lu.info() > 0);
            }
        }

        #[test]
        fn supernode_rows_are_shared((m, n, t) in sparse_matrix()) {
            let field = gf101();
            let a = build(&field, m, n, &t);
            let lu = LuEngine::new(field, LuOptions::default()).factorize(&a).unwrap();
            let l = lu.l();
            let mut next_col = 0;
            for sn in l.supernodes() {
                prop_assert_eq!(sn.first_col, next_col);
                next_col += sn.ncols;
                // Diagonal rows lead the block, the rest are below it
                for (c, &row) in sn.rows.iter().take(sn.ncols).enumerate() {
                    prop_assert_eq!(row, sn.first_col + c);
                }
                prop_assert!(sn.rows.windows(2).all(|w| w[0] < w[1]));
            }
            prop_assert_eq!(next_col, lu.rank());
        }

        #[test]
        fn tight_capacity_matches_generous((m, n, t) in sparse_matrix()) {
            let field = gf101();
            let a = build(&field, m, n, &t);
            let generous = LuOptions { fill_ratio: 32, ..LuOptions::default() };
            let tight = LuOptions { fill_ratio: 1, ..LuOptions::default() };
            let lu1 = LuEngine::new(field, generous).factorize(&a).unwrap();
            let lu2 = LuEngine::new(field, tight).factorize(&a).unwrap();
            prop_assert_eq!(lu1.l(), lu2.l());
            prop_assert_eq!(lu1.u(), lu2.u());
            prop_assert_eq!(lu1.row_perm(), lu2.row_perm());
        }

        #[test]
        fn tuning_preserves_factors(
            (m, n, t) in sparse_matrix(),
            relax in 0usize..8,
            panel_size in 1usize..5,
            max_supernode in 1usize..5,
        ) {
            let field = gf101();
            let a = build(&field, m, n, &t);
            let reference = LuEngine::new(field, LuOptions::default()).factorize(&a).unwrap();
            let options = LuOptions { relax, panel_size, max_supernode, ..LuOptions::default() };
            let lu = LuEngine::new(field, options).factorize(&a).unwrap();
            prop_assert_eq!(lu.row_perm(), reference.row_perm());
            prop_assert_eq!(lu.l().to_dense(&field), reference.l().to_dense(&field));
            prop_assert_eq!(lu.u().to_dense(&field), reference.u().to_dense(&field));
        }

        #[test]
        fn reuse_is_idempotent((m, n, t) in sparse_matrix(), scale in 1i64..100) {
            let field = gf101();
            let a = build(&field, m, n, &t);
            let scaled: Triplets = t.iter().map(|&(r, c, v)| (r, c, v * scale)).collect();
            let b = build(&field, m, n, &scaled);

            let mut engine = LuEngine::new(field, LuOptions::default());
            let first = engine.factorize(&a).unwrap();
            let second = engine.refactorize(&b, &first).unwrap();
            prop_assert_eq!(second.row_perm(), first.row_perm());
            prop_assert_eq!(second.supernode_count(), first.supernode_count());
            prop_assert!(reconstructs(&field, &b, &second));
        }
    }
}
