//! Triangular solves with a computed factorization.

use exactlu_field::Field;

use super::error::LuError;
use super::factor::Factorization;

impl<E: Clone> Factorization<E> {
    /// Solves `A·x = b`.
    ///
    /// # Errors
    ///
    /// - [`LuError::Singular`] unless the factorization is square with full rank
    /// - [`LuError::Field`] if a diagonal entry of U has no inverse
    ///
    /// # Panics
    ///
    /// Panics if `b.len() != self.nrows()`.
    pub fn solve<F: Field<Element = E>>(&self, field: &F, b: &[E]) -> Result<Vec<E>, LuError> {
        let n = self.ncols();
        let singular = LuError::Singular {
            rank: self.rank(),
            order: self.nrows(),
        };
        if self.nrows() != n || self.rank() != n {
            return Err(singular);
        }
        assert_eq!(b.len(), n, "dimension mismatch");

        let mut y = vec![field.zero(); n];
        for (row, value) in b.iter().enumerate() {
            y[self.row_perm[row]] = value.clone();
        }

        // L y = P b, one supernode column at a time
        for sn in self.l.supernodes() {
            for c in 0..sn.ncols {
                let yc = y[sn.first_col + c].clone();
                if field.is_zero(&yc) {
                    continue;
                }
                for (i, &row) in sn.rows.iter().enumerate().skip(c + 1) {
                    field.maxpyin(&mut y[row], sn.get(i, c), &yc);
                }
            }
        }

        // U z = y
        for j in (0..n).rev() {
            let Some(diag) = self.u.get(j, j) else {
                return Err(singular);
            };
            let zj = field.div(&y[j], diag)?;
            for (row, value) in self.u.col_iter(j) {
                if row < j {
                    field.maxpyin(&mut y[row], value, &zj);
                }
            }
            y[j] = zj;
        }

        let mut x = vec![field.zero(); n];
        for (step, &col) in self.col_perm.iter().enumerate() {
            x[col] = y[step].clone();
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use crate::csc::CscMatrix;
    use crate::lu::{LuEngine, LuError, LuOptions};
    use exactlu_field::{Field, Rational, Rationals};

    fn q(n: i64) -> Rational {
        Rational::from_integer(n)
    }

    #[test]
    fn test_solve_small_system() {
        let field = Rationals::new();
        let a = CscMatrix::from_dense(
            &field,
            &[
                vec![q(2), q(1), q(0)],
                vec![q(1), q(3), q(1)],
                vec![q(0), q(1), q(4)],
            ],
        );
        let mut engine = LuEngine::new(field.clone(), LuOptions::default());
        let lu = engine.factorize(&a).unwrap();

        let x = vec![q(1), q(-2), q(3)];
        let b = a.spmv(&field, &x);
        assert_eq!(lu.solve(&field, &b).unwrap(), x);
    }

    #[test]
    fn test_solve_singular() {
        let field = Rationals::new();
        let a = CscMatrix::from_dense(&field, &[vec![q(1), q(2)], vec![q(2), q(4)]]);
        let mut engine = LuEngine::new(field.clone(), LuOptions::default());
        let lu = engine.factorize(&a).unwrap();
        assert_eq!(lu.rank(), 1);
        let err = lu.solve(&field, &[field.one(), field.zero()]).unwrap_err();
        assert_eq!(err, LuError::Singular { rank: 1, order: 2 });
    }
}
