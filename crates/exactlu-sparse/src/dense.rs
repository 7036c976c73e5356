//! Dense matrices for small sizes.
//!
//! Used to reconstruct factors and as a reference for rank computations.

use std::ops::{Index, IndexMut};

use exactlu_field::{Field, FieldError};

/// Dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMatrix<E> {
    data: Vec<E>,
    nrows: usize,
    ncols: usize,
}

impl<E: Clone> DenseMatrix<E> {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros<F: Field<Element = E>>(field: &F, nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![field.zero(); nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Creates a matrix from a 2D vector.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<E>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let data: Vec<E> = rows.into_iter().flatten().collect();
        assert_eq!(data.len(), nrows * ncols);
        Self { data, nrows, ncols }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity<F: Field<Element = E>>(field: &F, n: usize) -> Self {
        let mut m = Self::zeros(field, n, n);
        for i in 0..n {
            m[(i, i)] = field.one();
        }
        m
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns a row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> &[E] {
        &self.data[row * self.ncols..(row + 1) * self.ncols]
    }

    /// Returns the rows as owned vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<E>> {
        (0..self.nrows).map(|i| self.row(i).to_vec()).collect()
    }

    /// Matrix-matrix multiplication.
    ///
    /// # Panics
    ///
    /// Panics if the inner dimensions differ.
    #[must_use]
    pub fn mm<F: Field<Element = E>>(&self, field: &F, other: &Self) -> Self {
        assert_eq!(self.ncols, other.nrows, "dimension mismatch");
        let mut result = Self::zeros(field, self.nrows, other.ncols);
        for i in 0..self.nrows {
            for k in 0..self.ncols {
                let aik = &self[(i, k)];
                if field.is_zero(aik) {
                    continue;
                }
                for j in 0..other.ncols {
                    field.axpyin(&mut result.data[i * other.ncols + j], aik, &other[(k, j)]);
                }
            }
        }
        result
    }

    /// Matrix-vector multiplication.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != self.ncols()`.
    #[must_use]
    pub fn mv<F: Field<Element = E>>(&self, field: &F, x: &[E]) -> Vec<E> {
        assert_eq!(x.len(), self.ncols, "dimension mismatch");
        (0..self.nrows)
            .map(|i| {
                let mut acc = field.zero();
                for (a, b) in self.row(i).iter().zip(x) {
                    field.axpyin(&mut acc, a, b);
                }
                acc
            })
            .collect()
    }

    /// Returns `P·A·Q` where row `i` moves to `row_perm[i]` and column
    /// `col_perm[j]` moves to `j`.
    ///
    /// # Panics
    ///
    /// Panics if the permutations do not match the shape.
    #[must_use]
    pub fn permute(&self, row_perm: &[usize], col_perm: &[usize]) -> Self {
        assert_eq!(row_perm.len(), self.nrows);
        assert_eq!(col_perm.len(), self.ncols);
        let mut data = self.data.clone();
        for i in 0..self.nrows {
            for (j, &src) in col_perm.iter().enumerate() {
                data[row_perm[i] * self.ncols + j] = self[(i, src)].clone();
            }
        }
        Self {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Swaps two rows.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i != j {
            for col in 0..self.ncols {
                self.data.swap(i * self.ncols + col, j * self.ncols + col);
            }
        }
    }

    /// Computes the rank by Gaussian elimination.
    ///
    /// # Errors
    ///
    /// Propagates a [`FieldError`] if a nonzero pivot is not invertible.
    pub fn rank<F: Field<Element = E>>(&self, field: &F) -> Result<usize, FieldError> {
        let mut m = self.clone();
        let mut pivot_row = 0;
        let mut pivot_col = 0;

        while pivot_row < m.nrows && pivot_col < m.ncols {
            // First non-zero in column
            let Some(found) = (pivot_row..m.nrows).find(|&r| !field.is_zero(&m[(r, pivot_col)]))
            else {
                pivot_col += 1;
                continue;
            };
            m.swap_rows(pivot_row, found);

            let inv = field.inv(&m[(pivot_row, pivot_col)])?;
            for row in pivot_row + 1..m.nrows {
                if field.is_zero(&m[(row, pivot_col)]) {
                    continue;
                }
                let factor = field.mul(&m[(row, pivot_col)], &inv);
                for col in pivot_col..m.ncols {
                    let src = m[(pivot_row, col)].clone();
                    field.maxpyin(&mut m[(row, col)], &factor, &src);
                }
            }

            pivot_row += 1;
            pivot_col += 1;
        }

        Ok(pivot_row)
    }
}

impl<E> Index<(usize, usize)> for DenseMatrix<E> {
    type Output = E;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.ncols + col]
    }
}

impl<E> IndexMut<(usize, usize)> for DenseMatrix<E> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.ncols + col]
    }
}
