//! Factorization results.

use exactlu_field::Field;

use crate::csc::CscMatrix;
use crate::dense::DenseMatrix;

/// Counters collected during one factorization.
///
/// `trsv_ops` and `gemv_ops` count field multiplications spent in the
/// triangular solves and in the matrix-vector updates of the kernels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LuStats {
    /// Times a factor array had to grow.
    pub expansions: usize,
    /// Relaxed supernodes factored without symbolic search.
    pub relaxed_supernodes: usize,
    /// Relaxed supernodes abandoned and redone through the panel path.
    pub relaxations_rolled_back: usize,
    /// Panels processed.
    pub panels: usize,
    /// Steps without a pivot while unpivoted rows remained.
    pub zero_pivots: usize,
    /// Multiplications in unit lower triangular solves.
    pub trsv_ops: usize,
    /// Multiplications in matrix-vector updates.
    pub gemv_ops: usize,
}

/// One supernode of [`LFactor`]: a dense `rows.len() × ncols` block.
#[derive(Debug, Clone, Copy)]
pub struct Supernode<'a, E> {
    /// Column of L where the block starts.
    pub first_col: usize,
    /// Number of columns.
    pub ncols: usize,
    /// Row positions of the block in `P·A`, increasing. The first `ncols`
    /// are the diagonal rows `first_col..first_col + ncols`.
    pub rows: &'a [usize],
    /// Column-major block values, unit diagonal and zeros above it included.
    pub values: &'a [E],
}

impl<E> Supernode<'_, E> {
    /// Value at block row `i` of block column `c`.
    #[must_use]
    pub fn get(&self, i: usize, c: usize) -> &E {
        &self.values[c * self.rows.len() + i]
    }
}

/// Unit lower trapezoidal factor in supernodal form.
///
/// `nrows × rank`; column `k` belongs to the `k`-th pivot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LFactor<E> {
    pub(crate) nrows: usize,
    /// First column of each supernode, followed by the column count.
    pub(crate) sup_ptr: Vec<usize>,
    pub(crate) row_ptr: Vec<usize>,
    pub(crate) rows: Vec<usize>,
    pub(crate) val_ptr: Vec<usize>,
    pub(crate) values: Vec<E>,
}

impl<E: Clone> LFactor<E> {
    /// Returns the number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns, the rank.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.sup_ptr.last().copied().unwrap_or(0)
    }

    /// Returns the number of supernodes.
    #[must_use]
    pub fn supernode_count(&self) -> usize {
        self.sup_ptr.len().saturating_sub(1)
    }

    /// Returns supernode `s`.
    ///
    /// # Panics
    ///
    /// Panics if `s >= self.supernode_count()`.
    #[must_use]
    pub fn supernode(&self, s: usize) -> Supernode<'_, E> {
        Supernode {
            first_col: self.sup_ptr[s],
            ncols: self.sup_ptr[s + 1] - self.sup_ptr[s],
            rows: &self.rows[self.row_ptr[s]..self.row_ptr[s + 1]],
            values: &self.values[self.val_ptr[s]..self.val_ptr[s + 1]],
        }
    }

    /// Iterates over the supernodes in column order.
    pub fn supernodes(&self) -> impl Iterator<Item = Supernode<'_, E>> {
        (0..self.supernode_count()).map(move |s| self.supernode(s))
    }

    /// Number of entries on or below the diagonal.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.supernodes()
            .map(|sn| {
                let c = sn.ncols;
                sn.rows.len() * c - c * (c - 1) / 2
            })
            .sum()
    }

    /// Expands into a dense matrix.
    #[must_use]
    pub fn to_dense<F: Field<Element = E>>(&self, field: &F) -> DenseMatrix<E> {
        let mut dense = DenseMatrix::zeros(field, self.nrows, self.ncols());
        for sn in self.supernodes() {
            for c in 0..sn.ncols {
                for (i, &row) in sn.rows.iter().enumerate().skip(c) {
                    dense[(row, sn.first_col + c)] = sn.get(i, c).clone();
                }
            }
        }
        dense
    }
}

/// The factors of `P·A·Pc = L·U` and the rank information of one call.
///
/// `P` is given by [`row_perm`](Self::row_perm) (`row_perm[row]` is the
/// position of `row` in `P·A`), `Pc` by [`col_perm`](Self::col_perm)
/// (`col_perm[step]` is the original column at `step`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization<E> {
    pub(crate) l: LFactor<E>,
    pub(crate) u: CscMatrix<E>,
    pub(crate) row_perm: Vec<usize>,
    pub(crate) col_perm: Vec<usize>,
    pub(crate) etree: Vec<usize>,
    pub(crate) zero_steps: Vec<usize>,
    pub(crate) stats: LuStats,
}

impl<E: Clone> Factorization<E> {
    /// The unit lower trapezoidal factor, `nrows × rank`.
    #[must_use]
    pub fn l(&self) -> &LFactor<E> {
        &self.l
    }

    /// The upper trapezoidal factor, `rank × ncols`, columns in step order.
    #[must_use]
    pub fn u(&self) -> &CscMatrix<E> {
        &self.u
    }

    /// Final row permutation: `row_perm[row]` is the position of `row`.
    #[must_use]
    pub fn row_perm(&self) -> &[usize] {
        &self.row_perm
    }

    /// Column permutation: `col_perm[step]` is the original column.
    #[must_use]
    pub fn col_perm(&self) -> &[usize] {
        &self.col_perm
    }

    /// The column elimination tree the factorization was computed with.
    #[must_use]
    pub fn etree(&self) -> &[usize] {
        &self.etree
    }

    /// Returns the number of rows of the factored matrix.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.row_perm.len()
    }

    /// Returns the number of columns of the factored matrix.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.col_perm.len()
    }

    /// Number of pivots found.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.l.ncols()
    }

    /// `min(nrows, ncols) - rank`.
    #[must_use]
    pub fn nullity(&self) -> usize {
        self.nrows().min(self.ncols()) - self.rank()
    }

    /// One-based first step without a pivot while unpivoted rows remained,
    /// or `0` when there is none.
    #[must_use]
    pub fn info(&self) -> usize {
        self.zero_steps.first().map_or(0, |&step| step + 1)
    }

    /// Original columns whose step had no pivot, in step order.
    pub fn zero_pivot_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.zero_steps.iter().map(|&step| self.col_perm[step])
    }

    /// Returns the number of supernodes of L.
    #[must_use]
    pub fn supernode_count(&self) -> usize {
        self.l.supernode_count()
    }

    /// Entries of L, unit diagonal included.
    #[must_use]
    pub fn nnz_l(&self) -> usize {
        self.l.nnz()
    }

    /// Entries of U, diagonal included.
    #[must_use]
    pub fn nnz_u(&self) -> usize {
        self.u.nnz()
    }

    /// Counters of the call that produced this factorization.
    #[must_use]
    pub fn stats(&self) -> &LuStats {
        &self.stats
    }
}
