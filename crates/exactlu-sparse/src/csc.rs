//! Sparse matrices in Compressed Sparse Column (CSC) format.
//!
//! CSC is the natural input of left-looking factorizations, which consume
//! the matrix one column at a time.
//!
//! Two types are provided:
//! - [`CscMatrix`] owns contiguous columns (`col_ptrs` of length `ncols + 1`)
//! - [`CscRef`] borrows a matrix whose columns are described by independent
//!   `col_begin` / `col_end` offsets, so gaps between columns are allowed

use exactlu_field::Field;
use thiserror::Error;

use crate::dense::DenseMatrix;
use crate::EMPTY;

/// A structural defect in compressed-column data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// An offset array has the wrong length.
    #[error("expected {expected} column offsets, found {found}")]
    OffsetLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        found: usize,
    },
    /// Row indices and values have different lengths.
    #[error("{indices} row indices but {values} values")]
    ValueLength {
        /// Number of row indices.
        indices: usize,
        /// Number of values.
        values: usize,
    },
    /// A column ends before it begins.
    #[error("column {col} ends before it begins")]
    DecreasingOffsets {
        /// Offending column.
        col: usize,
    },
    /// A column extends past the end of the index array.
    #[error("column {col} extends past the stored entries")]
    OffsetOutOfBounds {
        /// Offending column.
        col: usize,
    },
    /// A row index is not below the row count.
    #[error("row {row} in column {col} is out of range for {nrows} rows")]
    RowOutOfBounds {
        /// Offending column.
        col: usize,
        /// Offending row index.
        row: usize,
        /// Number of rows of the matrix.
        nrows: usize,
    },
    /// A row index appears twice in one column.
    #[error("row {row} appears twice in column {col}")]
    DuplicateRow {
        /// Offending column.
        col: usize,
        /// Repeated row index.
        row: usize,
    },
}

/// Borrowed compressed-column matrix.
///
/// Construction is unchecked; call [`CscRef::check`] before trusting the data.
#[derive(Debug)]
pub struct CscRef<'a, E> {
    nrows: usize,
    ncols: usize,
    col_begin: &'a [usize],
    col_end: &'a [usize],
    row_indices: &'a [usize],
    values: &'a [E],
}

impl<E> Clone for CscRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for CscRef<'_, E> {}

impl<'a, E> CscRef<'a, E> {
    /// Creates a view over raw compressed-column arrays.
    ///
    /// Column `j` holds the entries `col_begin[j]..col_end[j]` of
    /// `row_indices` and `values`.
    #[must_use]
    pub fn new(
        nrows: usize,
        ncols: usize,
        col_begin: &'a [usize],
        col_end: &'a [usize],
        row_indices: &'a [usize],
        values: &'a [E],
    ) -> Self {
        Self {
            nrows,
            ncols,
            col_begin,
            col_end,
            row_indices,
            values,
        }
    }

    /// Validates offsets, row bounds and per-column uniqueness of rows.
    ///
    /// # Errors
    ///
    /// Returns the first [`StructureError`] found.
    pub fn check(&self) -> Result<(), StructureError> {
        for offsets in [self.col_begin, self.col_end] {
            if offsets.len() != self.ncols {
                return Err(StructureError::OffsetLength {
                    expected: self.ncols,
                    found: offsets.len(),
                });
            }
        }
        if self.row_indices.len() != self.values.len() {
            return Err(StructureError::ValueLength {
                indices: self.row_indices.len(),
                values: self.values.len(),
            });
        }

        let mut seen = vec![EMPTY; self.nrows];
        for col in 0..self.ncols {
            let (begin, end) = (self.col_begin[col], self.col_end[col]);
            if begin > end {
                return Err(StructureError::DecreasingOffsets { col });
            }
            if end > self.row_indices.len() {
                return Err(StructureError::OffsetOutOfBounds { col });
            }
            for &row in &self.row_indices[begin..end] {
                if row >= self.nrows {
                    return Err(StructureError::RowOutOfBounds {
                        col,
                        row,
                        nrows: self.nrows,
                    });
                }
                if seen[row] == col {
                    return Err(StructureError::DuplicateRow { col, row });
                }
                seen[row] = col;
            }
        }
        Ok(())
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

    /// Returns the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        (0..self.ncols)
            .map(|j| self.col_end[j] - self.col_begin[j])
            .sum()
    }

    /// Returns the row indices of column `col`.
    #[must_use]
    pub fn row_indices_of_col(&self, col: usize) -> &'a [usize] {
        &self.row_indices[self.col_begin[col]..self.col_end[col]]
    }

    /// Returns the values of column `col`.
    #[must_use]
    pub fn values_of_col(&self, col: usize) -> &'a [E] {
        &self.values[self.col_begin[col]..self.col_end[col]]
    }

    /// Iterates over `(row, value)` pairs of column `col`.
    pub fn col_iter(&self, col: usize) -> impl Iterator<Item = (usize, &'a E)> {
        self.row_indices_of_col(col)
            .iter()
            .copied()
            .zip(self.values_of_col(col))
    }
}

/// Sparse matrix in Compressed Sparse Column (CSC) format.
///
/// # Memory Layout
///
/// For an m×n matrix with nnz stored entries:
/// - `values`: Vec of nnz values
/// - `row_indices`: Vec of nnz row indices
/// - `col_ptrs`: Vec of n+1 column pointers
///
/// Column j contains entries from `col_ptrs[j]` to `col_ptrs[j+1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscMatrix<E> {
    values: Vec<E>,
    row_indices: Vec<usize>,
    col_ptrs: Vec<usize>,
    nrows: usize,
}

impl<E: Clone> CscMatrix<E> {
    /// Creates an empty (all zero) matrix.
    #[must_use]
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            values: Vec::new(),
            row_indices: Vec::new(),
            col_ptrs: vec![0; ncols + 1],
            nrows,
        }
    }

    /// Creates a matrix from raw CSC arrays, validating them.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the arrays do not describe a matrix
    /// with `nrows` rows.
    pub fn try_from_raw(
        nrows: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<E>,
    ) -> Result<Self, StructureError> {
        if col_ptrs.is_empty() {
            return Err(StructureError::OffsetLength {
                expected: 1,
                found: 0,
            });
        }
        let ncols = col_ptrs.len() - 1;
        CscRef::new(
            nrows,
            ncols,
            &col_ptrs[..ncols],
            &col_ptrs[1..],
            &row_indices,
            &values,
        )
        .check()?;
        if col_ptrs[ncols] != row_indices.len() {
            return Err(StructureError::OffsetOutOfBounds {
                col: ncols.saturating_sub(1),
            });
        }
        Ok(Self {
            values,
            row_indices,
            col_ptrs,
            nrows,
        })
    }

    /// Assembles a matrix from arrays already known to be well formed.
    pub(crate) fn from_raw_unchecked(
        nrows: usize,
        col_ptrs: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<E>,
    ) -> Self {
        debug_assert_eq!(col_ptrs.last().copied(), Some(row_indices.len()));
        Self {
            values,
            row_indices,
            col_ptrs,
            nrows,
        }
    }

    /// Creates a sparse matrix from dense rows. Zero entries are not stored.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    #[must_use]
    pub fn from_dense<F: Field<Element = E>>(field: &F, rows: &[Vec<E>]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == ncols),
            "rows must have equal length"
        );

        let mut values = Vec::new();
        let mut row_indices = Vec::new();
        let mut col_ptrs = Vec::with_capacity(ncols + 1);
        col_ptrs.push(0);
        for col in 0..ncols {
            for (row, entries) in rows.iter().enumerate() {
                if !field.is_zero(&entries[col]) {
                    values.push(entries[col].clone());
                    row_indices.push(row);
                }
            }
            col_ptrs.push(values.len());
        }

        Self {
            values,
            row_indices,
            col_ptrs,
            nrows,
        }
    }

    /// Creates a sparse matrix from triplets (row, col, value).
    ///
    /// Duplicate entries are summed and entries that sum to zero are dropped.
    /// Entries are sorted by (col, row).
    ///
    /// # Panics
    ///
    /// Panics if a triplet lies outside the `nrows × ncols` shape.
    #[must_use]
    pub fn from_triplets<F: Field<Element = E>>(
        field: &F,
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, E)],
    ) -> Self {
        let mut sorted: Vec<_> = triplets.to_vec();
        sorted.sort_by_key(|(r, c, _)| (*c, *r));

        let mut merged: Vec<(usize, usize, E)> = Vec::with_capacity(sorted.len());
        for (row, col, val) in sorted {
            assert!(row < nrows && col < ncols, "triplet ({row}, {col}) out of range");
            match merged.last_mut() {
                Some(last) if last.0 == row && last.1 == col => {
                    last.2 = field.add(&last.2, &val);
                }
                _ => merged.push((row, col, val)),
            }
        }

        let mut values = Vec::with_capacity(merged.len());
        let mut row_indices = Vec::with_capacity(merged.len());
        let mut col_ptrs = vec![0; ncols + 1];
        for (row, col, val) in merged {
            if field.is_zero(&val) {
                continue;
            }
            values.push(val);
            row_indices.push(row);
            col_ptrs[col + 1] += 1;
        }
        for col in 0..ncols {
            col_ptrs[col + 1] += col_ptrs[col];
        }

        Self {
            values,
            row_indices,
            col_ptrs,
            nrows,
        }
    }

    /// Creates an identity matrix of size n×n.
    #[must_use]
    pub fn identity<F: Field<Element = E>>(field: &F, n: usize) -> Self {
        Self {
            values: (0..n).map(|_| field.one()).collect(),
            row_indices: (0..n).collect(),
            col_ptrs: (0..=n).collect(),
            nrows: n,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.col_ptrs.len() - 1
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns the column pointers.
    #[must_use]
    pub fn col_ptrs(&self) -> &[usize] {
        &self.col_ptrs
    }

    /// Returns the row indices of all stored entries.
    #[must_use]
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Returns the values of all stored entries.
    #[must_use]
    pub fn values(&self) -> &[E] {
        &self.values
    }

    /// Returns a mutable view of the stored values. The pattern is fixed.
    pub fn values_mut(&mut self) -> &mut [E] {
        &mut self.values
    }

    /// Returns a borrowed view of this matrix.
    #[must_use]
    pub fn as_ref(&self) -> CscRef<'_, E> {
        let ncols = self.ncols();
        CscRef::new(
            self.nrows,
            ncols,
            &self.col_ptrs[..ncols],
            &self.col_ptrs[1..],
            &self.row_indices,
            &self.values,
        )
    }

    /// Iterates over `(row, value)` pairs of column `col`.
    pub fn col_iter(&self, col: usize) -> impl Iterator<Item = (usize, &E)> {
        let range = self.col_ptrs[col]..self.col_ptrs[col + 1];
        self.row_indices[range.clone()]
            .iter()
            .copied()
            .zip(&self.values[range])
    }

    /// Gets the entry at (row, col), or `None` if it is not stored.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&E> {
        self.col_iter(col).find(|(r, _)| *r == row).map(|(_, v)| v)
    }

    /// Sparse matrix-vector multiplication: y = A * x.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != self.ncols()`.
    #[must_use]
    pub fn spmv<F: Field<Element = E>>(&self, field: &F, x: &[E]) -> Vec<E> {
        assert_eq!(x.len(), self.ncols(), "dimension mismatch");
        let mut y = vec![field.zero(); self.nrows];
        for (col, xj) in x.iter().enumerate() {
            if field.is_zero(xj) {
                continue;
            }
            for (row, val) in self.col_iter(col) {
                field.axpyin(&mut y[row], val, xj);
            }
        }
        y
    }

    /// Expands into a dense matrix.
    #[must_use]
    pub fn to_dense<F: Field<Element = E>>(&self, field: &F) -> DenseMatrix<E> {
        let mut dense = DenseMatrix::zeros(field, self.nrows, self.ncols());
        for col in 0..self.ncols() {
            for (row, val) in self.col_iter(col) {
                dense[(row, col)] = val.clone();
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exactlu_field::{Modular, Rational, Rationals};

    fn q(n: i64) -> Rational {
        Rational::from_integer(n)
    }

    #[test]
    fn test_from_dense() {
        let field = Rationals::new();
        let m = CscMatrix::from_dense(
            &field,
            &[vec![q(1), q(0), q(2)], vec![q(0), q(3), q(0)]],
        );
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.get(0, 2), Some(&q(2)));
        assert_eq!(m.get(1, 0), None);
    }

    #[test]
    fn test_from_triplets_sums_duplicates() {
        let field = Modular::new(7).unwrap();
        let m = CscMatrix::from_triplets(
            &field,
            3,
            3,
            &[(0, 0, 3), (2, 1, 4), (0, 0, 4), (1, 2, 5), (2, 1, 1)],
        );
        // (0,0) sums to 0 mod 7 and is dropped
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(2, 1), Some(&5));
        assert_eq!(m.col_ptrs(), &[0, 0, 1, 2]);
    }

    #[test]
    fn test_spmv() {
        let field = Rationals::new();
        let m = CscMatrix::from_dense(
            &field,
            &[vec![q(1), q(2)], vec![q(3), q(4)], vec![q(0), q(5)]],
        );
        let y = m.spmv(&field, &[q(1), q(-1)]);
        assert_eq!(y, vec![q(-1), q(-1), q(-5)]);
    }

    #[test]
    fn test_identity_to_dense() {
        let field = Modular::new(5).unwrap();
        let id = CscMatrix::identity(&field, 3).to_dense(&field);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(id[(i, j)], u64::from(i == j));
            }
        }
    }

    #[test]
    fn test_try_from_raw_rejects_bad_row() {
        let err = CscMatrix::try_from_raw(2, vec![0, 1], vec![2], vec![1u64]).unwrap_err();
        assert_eq!(
            err,
            StructureError::RowOutOfBounds {
                col: 0,
                row: 2,
                nrows: 2
            }
        );
    }

    #[test]
    fn test_check_detects_duplicates_and_offsets() {
        let rows = [0usize, 0, 1];
        let vals = [1u64, 2, 3];
        let dup = CscRef::new(2, 1, &[0], &[2], &rows, &vals);
        assert_eq!(dup.check(), Err(StructureError::DuplicateRow { col: 0, row: 0 }));

        let backwards = CscRef::new(2, 1, &[2], &[1], &rows, &vals);
        assert_eq!(backwards.check(), Err(StructureError::DecreasingOffsets { col: 0 }));

        let past_end = CscRef::new(2, 1, &[1], &[4], &rows, &vals);
        assert_eq!(past_end.check(), Err(StructureError::OffsetOutOfBounds { col: 0 }));
    }

    #[test]
    fn test_gapped_columns() {
        // Column 0 uses entries 0..1, column 1 uses 2..3; entry 1 is unused.
        let rows = [0usize, 9, 1];
        let vals = [1u64, 7, 2];
        let view = CscRef::new(2, 2, &[0, 2], &[1, 3], &rows, &vals);
        assert!(view.check().is_ok());
        assert_eq!(view.nnz(), 2);
        let col1: Vec<_> = view.col_iter(1).collect();
        assert_eq!(col1, vec![(1, &2)]);
    }
}
