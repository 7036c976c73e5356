//! Persistent storage of the L and U factors.
//!
//! # Layout
//!
//! Supernode `s` owns the steps `xsup[s]..xsup[s + 1]`. For its first column
//! `fsupc`, `lsub[xlsub[fsupc]..xlsub[fsupc + 1]]` is the row set of the whole
//! block; its first `ncols` entries are the pivot rows of the supernode in
//! step order. For the last column (the representative) the list at
//! `xlsub[rep]` is the search list of the symbolic analyzer, of which only
//! `xlsub[rep]..xprune[rep]` is still scanned.
//!
//! `lusup[xlusup[j]..xlusup[j + 1]]` holds column `j` of its block, one value
//! per block row. Entries above the diagonal position belong to U. U entries
//! outside supernode blocks live in `ucol` / `usub`, with the pivot step as
//! row index.

use super::error::LuError;
use super::memory::StorageKind;
use super::options::LuOptions;
use crate::EMPTY;

/// Compressed storage of the factors, kept alive between factorizations so
/// capacity can be reused.
#[derive(Debug, Clone)]
pub struct FactorStore<E> {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    /// Number of supernodes opened so far.
    pub(crate) nsuper: usize,
    pub(crate) xsup: Vec<usize>,
    pub(crate) supno: Vec<usize>,
    pub(crate) lsub: Vec<usize>,
    pub(crate) xlsub: Vec<usize>,
    pub(crate) lusup: Vec<E>,
    pub(crate) xlusup: Vec<usize>,
    pub(crate) ucol: Vec<E>,
    pub(crate) usub: Vec<usize>,
    pub(crate) xusub: Vec<usize>,
    pub(crate) xprune: Vec<usize>,
    /// Row chosen at each step, `EMPTY` for zero pivots.
    pub(crate) pivot_row: Vec<usize>,
    pub(crate) fill: E,
    pub(crate) memory_limit: Option<usize>,
    pub(crate) expansions: usize,
}

impl<E: Clone> FactorStore<E> {
    /// Creates an empty store. `zero` fills fresh numeric capacity.
    #[must_use]
    pub fn new(zero: E) -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            nsuper: 0,
            xsup: Vec::new(),
            supno: Vec::new(),
            lsub: Vec::new(),
            xlsub: Vec::new(),
            lusup: Vec::new(),
            xlusup: Vec::new(),
            ucol: Vec::new(),
            usub: Vec::new(),
            xusub: Vec::new(),
            xprune: Vec::new(),
            pivot_row: Vec::new(),
            fill: zero,
            memory_limit: None,
            expansions: 0,
        }
    }

    /// Prepares the store for an `nrows × ncols` matrix with `nnz` entries.
    ///
    /// Metadata is reset; growable arrays keep any larger capacity left by a
    /// previous call.
    pub(crate) fn init(
        &mut self,
        nrows: usize,
        ncols: usize,
        nnz: usize,
        options: &LuOptions,
    ) -> Result<(), LuError> {
        self.nrows = nrows;
        self.ncols = ncols;
        self.nsuper = 0;
        self.memory_limit = options.memory_limit;
        self.expansions = 0;

        for meta in [
            &mut self.xsup,
            &mut self.supno,
            &mut self.xlsub,
            &mut self.xlusup,
            &mut self.xusub,
        ] {
            meta.clear();
            meta.resize(ncols + 1, 0);
        }
        self.xprune.clear();
        self.xprune.resize(ncols, 0);
        self.pivot_row.clear();
        self.pivot_row.resize(ncols, EMPTY);

        let estimate = options
            .fill_ratio
            .saturating_mul(nnz)
            .saturating_add(ncols)
            .max(1);
        let initial = options.memory_limit.map_or(estimate, |limit| estimate.min(limit));
        for kind in [
            StorageKind::Lsub,
            StorageKind::Lusup,
            StorageKind::Ucol,
            StorageKind::Usub,
        ] {
            self.ensure(kind, initial)?;
        }
        // Growth while sizing the arrays up front is not an expansion
        self.expansions = 0;
        Ok(())
    }

    /// Drops all factor arrays and their capacity.
    ///
    /// The next call sizes its arrays from scratch.
    pub fn reset(&mut self) {
        let fill = self.fill.clone();
        *self = Self::new(fill);
    }

    /// Returns the number of times a factor array had to grow in the last call.
    #[must_use]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Representative (last column so far) of the supernode owning `step`.
    #[inline]
    pub(crate) fn rep_of(&self, step: usize) -> usize {
        self.xsup[self.supno[step] + 1] - 1
    }

    /// Splits step `jcol` off the current supernode after a zero pivot.
    ///
    /// Values of `jcol` that sit in the block rows of earlier columns are U
    /// entries and move to `ucol`; `jcol` becomes a singleton supernode that
    /// nothing can join.
    pub(crate) fn detach_column(&mut self, jcol: usize) -> Result<(), LuError> {
        let cur = self.nsuper - 1;
        let fsupc = self.xsup[cur];
        if fsupc == jcol {
            return Ok(());
        }

        let nsupc = jcol - fsupc;
        let col = self.xlusup[jcol];
        let mut nextu = self.xusub[jcol + 1];
        self.ensure(StorageKind::Ucol, nextu + nsupc)?;
        self.ensure(StorageKind::Usub, nextu + nsupc)?;
        for i in 0..nsupc {
            self.usub[nextu] = fsupc + i;
            self.ucol[nextu] = self.lusup[col + i].clone();
            nextu += 1;
        }
        self.xusub[jcol + 1] = nextu;

        self.nsuper += 1;
        self.xsup[cur + 1] = jcol;
        self.supno[jcol] = cur + 1;
        self.xsup[cur + 2] = jcol + 1;
        self.supno[jcol + 1] = cur + 1;
        Ok(())
    }

    /// Rewrites the block row lists in final row positions and compacts them
    /// to the front of `lsub`. Search lists are dropped.
    ///
    /// `row_position[row]` is the final position of every row.
    pub(crate) fn fixup_l(&mut self, row_position: &[usize]) {
        let mut nextl = 0;
        for s in 0..self.nsuper {
            let fsupc = self.xsup[s];
            let lsupc = self.xsup[s + 1];
            let jstrt = self.xlsub[fsupc];
            let jend = self.xlsub[fsupc + 1];
            self.xlsub[fsupc] = nextl;
            for j in jstrt..jend {
                self.lsub[nextl] = row_position[self.lsub[j]];
                nextl += 1;
            }
            for k in fsupc + 1..lsupc {
                self.xlsub[k] = nextl;
            }
        }
        self.xlsub[self.ncols] = nextl;
    }
}
