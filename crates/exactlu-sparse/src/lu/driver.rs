//! The factorization driver.

use exactlu_field::Field;

use super::error::{Argument, LuError};
use super::factor::{Factorization, LuStats};
use super::finalize::{finalize, Finalized};
use super::numeric::{column_bmod, copy_to_ucol, panel_bmod, snode_bmod};
use super::options::{LuOptions, StructureMode};
use super::pivot::{pivot_l, PivotOutcome};
use super::prune::prune_l;
use super::relax::relax_supernodes;
use super::store::FactorStore;
use super::symbolic::{column_dfs, panel_dfs, snode_dfs};
use super::workspace::Workspace;
use crate::csc::{CscMatrix, CscRef};
use crate::etree::{column_etree, preorder, Preorder};
use crate::EMPTY;

/// Supernodal LU engine over a field.
///
/// The engine owns the factor storage, so consecutive calls reuse the
/// capacity grown by earlier ones.
///
/// # Example
///
/// ```
/// use exactlu_field::Modular;
/// use exactlu_sparse::{CscMatrix, LuEngine, LuOptions};
///
/// let field = Modular::new(101).unwrap();
/// let a = CscMatrix::from_triplets(&field, 2, 2, &[(0, 0, 2), (1, 0, 1), (1, 1, 3)]);
/// let mut engine = LuEngine::new(field, LuOptions::default());
/// let lu = engine.factorize(&a).unwrap();
/// assert_eq!(lu.rank(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LuEngine<F: Field> {
    field: F,
    options: LuOptions,
    store: FactorStore<F::Element>,
}

impl<F: Field> LuEngine<F> {
    /// Creates an engine with empty storage.
    pub fn new(field: F, options: LuOptions) -> Self {
        let store = FactorStore::new(field.zero());
        Self {
            field,
            options,
            store,
        }
    }

    /// Returns the field.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Returns the options.
    pub fn options(&self) -> &LuOptions {
        &self.options
    }

    /// Returns the options for modification, e.g. to raise the memory limit
    /// before retrying.
    pub fn options_mut(&mut self) -> &mut LuOptions {
        &mut self.options
    }

    /// Returns the factor storage kept between calls.
    pub fn store(&self) -> &FactorStore<F::Element> {
        &self.store
    }

    /// Releases the factor storage kept from earlier calls.
    pub fn release_storage(&mut self) {
        self.store.reset();
    }

    /// Factors `a` in the postorder of its column elimination tree.
    ///
    /// # Errors
    ///
    /// See [`LuEngine::factorize_with`].
    pub fn factorize(
        &mut self,
        a: &CscMatrix<F::Element>,
    ) -> Result<Factorization<F::Element>, LuError> {
        let natural: Vec<usize> = (0..a.ncols()).collect();
        let Preorder { col_perm, etree } = preorder(a.as_ref(), &natural);
        let mut row_perm = vec![EMPTY; a.nrows()];
        self.factorize_with(
            a.as_ref(),
            &etree,
            &col_perm,
            &mut row_perm,
            StructureMode::Fresh,
        )
    }

    /// Factors `a`, which has the pattern of an earlier factorization, trying
    /// that factorization's row permutation first.
    ///
    /// # Errors
    ///
    /// See [`LuEngine::factorize_with`]. A matrix of a different shape is an
    /// invalid argument.
    pub fn refactorize(
        &mut self,
        a: &CscMatrix<F::Element>,
        previous: &Factorization<F::Element>,
    ) -> Result<Factorization<F::Element>, LuError> {
        if a.nrows() != previous.nrows() || a.ncols() != previous.ncols() {
            return Err(LuError::invalid(
                Argument::Matrix,
                format!(
                    "shape {}x{} differs from the previous {}x{}",
                    a.nrows(),
                    a.ncols(),
                    previous.nrows(),
                    previous.ncols()
                ),
            ));
        }
        let etree = column_etree(a.as_ref(), previous.col_perm());
        let mut row_perm = previous.row_perm().to_vec();
        self.factorize_with(
            a.as_ref(),
            &etree,
            previous.col_perm(),
            &mut row_perm,
            StructureMode::ReuseRowPerm,
        )
    }

    /// Factors `A·Pc` where `col_perm[step]` is the original column used at
    /// `step` and `etree` is its postordered column elimination tree.
    ///
    /// On success `row_perm[row]` holds the position of `row` in `P·A`. With
    /// [`StructureMode::ReuseRowPerm`] it must hold such a permutation on
    /// entry; its rows are preferred as pivots for as long as they pass the
    /// threshold.
    ///
    /// Rank deficiency is reported by the returned factorization.
    ///
    /// # Errors
    ///
    /// - [`LuError::InvalidArgument`] when an argument is rejected
    /// - [`LuError::AllocationShortfall`] when a factor array cannot grow
    /// - [`LuError::Field`] when a nonzero pivot has no inverse
    pub fn factorize_with(
        &mut self,
        a: CscRef<'_, F::Element>,
        etree: &[usize],
        col_perm: &[usize],
        row_perm: &mut [usize],
        mode: StructureMode,
    ) -> Result<Factorization<F::Element>, LuError> {
        let m = a.nrows();
        let n = a.ncols();

        a.check()
            .map_err(|e| LuError::invalid(Argument::Matrix, e.to_string()))?;
        validate_options(&self.options)?;
        validate_etree(etree, n)?;
        if row_perm.len() != m {
            return Err(LuError::invalid(
                Argument::RowPerm,
                format!("length {} for {m} rows", row_perm.len()),
            ));
        }
        if mode == StructureMode::ReuseRowPerm && !is_permutation(row_perm) {
            return Err(LuError::invalid(
                Argument::RowPerm,
                "not a permutation of the rows",
            ));
        }
        if col_perm.len() != n || !is_permutation(col_perm) {
            return Err(LuError::invalid(
                Argument::ColPerm,
                "not a permutation of the columns",
            ));
        }
        validate_limits(&self.options)?;

        log::debug!(
            "factorizing {m}x{n} matrix with {} entries ({mode:?})",
            a.nnz()
        );

        self.store.init(m, n, a.nnz(), &self.options)?;
        let mut ws = Workspace::new(&self.field, m, n, self.options.panel_size);
        let mut relax_end = relax_supernodes(etree, self.options.relax);

        let preferred = match mode {
            StructureMode::Fresh => None,
            StructureMode::ReuseRowPerm => {
                let mut inverse = vec![EMPTY; m];
                for (row, &position) in row_perm.iter().enumerate() {
                    inverse[position] = row;
                }
                Some(inverse)
            }
        };

        let mut factorizer = Factorizer {
            field: &self.field,
            options: &self.options,
            store: &mut self.store,
            a,
            col_perm,
            perm_r: vec![EMPTY; m],
            usepr: preferred.is_some(),
            preferred,
            rank: 0,
            zero_steps: Vec::new(),
            stats: LuStats::default(),
        };

        let mut jcol = 0;
        while jcol < n {
            let kcol = relax_end[jcol];
            if kcol != EMPTY {
                if factorizer.relaxed_supernode(&mut ws, jcol, kcol)? {
                    jcol = kcol + 1;
                    continue;
                }
                relax_end[jcol] = EMPTY;
            }
            jcol = factorizer.panel(&mut ws, &relax_end, jcol)?;
        }

        let Factorizer {
            rank,
            zero_steps,
            mut stats,
            ..
        } = factorizer;
        let Finalized {
            l,
            u,
            row_perm: positions,
        } = finalize(&self.field, &mut self.store);
        row_perm.copy_from_slice(&positions);
        stats.expansions = self.store.expansions();

        log::debug!(
            "factorized {m}x{n}: rank {rank}, {} supernodes, {} expansions",
            l.supernode_count(),
            stats.expansions
        );

        Ok(Factorization {
            l,
            u,
            row_perm: positions,
            col_perm: col_perm.to_vec(),
            etree: etree.to_vec(),
            zero_steps,
            stats,
        })
    }
}

fn validate_options(options: &LuOptions) -> Result<(), LuError> {
    let threshold = options.pivot_threshold;
    if !threshold.is_valid() {
        return Err(LuError::invalid(
            Argument::PivotThreshold,
            format!(
                "{}/{} is not in [0, 1]",
                threshold.numerator(),
                threshold.denominator()
            ),
        ));
    }
    if options.panel_size == 0 {
        return Err(LuError::invalid(Argument::PanelSize, "must be positive"));
    }
    Ok(())
}

fn validate_limits(options: &LuOptions) -> Result<(), LuError> {
    if options.max_supernode == 0 {
        return Err(LuError::invalid(Argument::MaxSupernode, "must be positive"));
    }
    if options.fill_ratio == 0 {
        return Err(LuError::invalid(Argument::FillRatio, "must be positive"));
    }
    Ok(())
}

fn validate_etree(etree: &[usize], n: usize) -> Result<(), LuError> {
    if etree.len() != n {
        return Err(LuError::invalid(
            Argument::Etree,
            format!("length {} for {n} columns", etree.len()),
        ));
    }
    if let Some(j) = (0..n).find(|&j| etree[j] <= j || etree[j] > n) {
        return Err(LuError::invalid(
            Argument::Etree,
            format!("parent {} of {j} is not postordered", etree[j]),
        ));
    }
    Ok(())
}

fn is_permutation(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    perm.iter().all(|&p| p < perm.len() && !std::mem::replace(&mut seen[p], true))
}

/// State of one factorization call.
struct Factorizer<'a, F: Field> {
    field: &'a F,
    options: &'a LuOptions,
    store: &'a mut FactorStore<F::Element>,
    a: CscRef<'a, F::Element>,
    col_perm: &'a [usize],
    /// `perm_r[row]` is the step that pivoted `row`, or `EMPTY`.
    perm_r: Vec<usize>,
    /// Rows of a reused permutation by position.
    preferred: Option<Vec<usize>>,
    usepr: bool,
    rank: usize,
    zero_steps: Vec<usize>,
    stats: LuStats,
}

impl<F: Field> Factorizer<'_, F> {
    fn pivot(&mut self, jcol: usize) -> Result<PivotOutcome, LuError> {
        let preferred = if self.usepr {
            self.preferred
                .as_ref()
                .and_then(|rows| rows.get(self.rank).copied())
        } else {
            None
        };
        let col = self.col_perm[jcol];
        let diagonal = (col < self.store.nrows).then_some(col);

        let outcome = pivot_l(
            self.field,
            self.store,
            jcol,
            self.options.pivot_threshold,
            preferred,
            diagonal,
            &mut self.perm_r,
        )?;
        if let PivotOutcome::Pivot { preferred_used, .. } = outcome {
            self.rank += 1;
            if preferred.is_some() && !preferred_used {
                log::debug!("row permutation reuse abandoned at step {jcol}");
                self.usepr = false;
            }
        }
        Ok(outcome)
    }

    /// Factors the relaxed supernode `jcol..=kcol`. Returns `false` after
    /// undoing everything when it has to go through the panel path instead.
    fn relaxed_supernode(
        &mut self,
        ws: &mut Workspace<F::Element>,
        jcol: usize,
        kcol: usize,
    ) -> Result<bool, LuError> {
        let saved_nsuper = self.store.nsuper;
        let saved_rank = self.rank;
        let saved_usepr = self.usepr;

        let ok = snode_dfs(
            self.store,
            self.a,
            self.col_perm,
            jcol,
            kcol,
            &self.perm_r,
            &mut ws.relaxed_marker,
        )?;
        if !ok {
            self.stats.relaxations_rolled_back += 1;
            log::debug!("relaxed supernode {jcol}..={kcol} reaches pivoted rows");
            return Ok(false);
        }

        let m = ws.nrows;
        for icol in jcol..=kcol {
            self.store.xusub[icol + 1] = self.store.xusub[icol];
            let dense_col = &mut ws.dense[..m];
            for (row, value) in self.a.col_iter(self.col_perm[icol]) {
                dense_col[row] = value.clone();
            }
            snode_bmod(self.field, self.store, icol, jcol, dense_col, &mut self.stats)?;

            if self.pivot(icol)? == PivotOutcome::Zero {
                for step in jcol..icol {
                    let row = self.store.pivot_row[step];
                    self.perm_r[row] = EMPTY;
                    self.store.pivot_row[step] = EMPTY;
                }
                self.store.nsuper = saved_nsuper;
                self.rank = saved_rank;
                self.usepr = saved_usepr;
                self.stats.relaxations_rolled_back += 1;
                log::debug!("relaxed supernode {jcol}..={kcol} rolled back at step {icol}");
                return Ok(false);
            }
        }

        self.stats.relaxed_supernodes += 1;
        Ok(true)
    }

    /// Factors the panel starting at `jcol` and returns the next step.
    fn panel(
        &mut self,
        ws: &mut Workspace<F::Element>,
        relax_end: &[usize],
        jcol: usize,
    ) -> Result<usize, LuError> {
        let m = ws.nrows;
        let n = ws.ncols;

        let mut width = self.options.panel_size.min(n - jcol);
        if let Some(k) = (jcol + 1..jcol + width).find(|&k| relax_end[k] != EMPTY) {
            width = k - jcol;
        }

        panel_dfs(self.store, self.a, self.col_perm, jcol, width, &self.perm_r, ws);
        panel_bmod(self.field, self.store, width, ws, &mut self.stats);

        let nseg1 = ws.segrep.len();
        for k in 0..width {
            let jj = jcol + k;
            let Workspace {
                dense,
                tempv,
                segrep,
                repfnz,
                panel_lsub,
                panel_lsub_len,
                column_marker,
                parent,
                xplore,
                ..
            } = &mut *ws;
            segrep.truncate(nseg1);
            let repfnz_col = &mut repfnz[k * n..(k + 1) * n];
            let dense_col = &mut dense[k * m..(k + 1) * m];
            let lsub_col = &panel_lsub[k * m..k * m + panel_lsub_len[k]];

            column_dfs(
                self.store,
                jj,
                &self.perm_r,
                lsub_col,
                self.options.max_supernode,
                segrep,
                repfnz_col,
                column_marker,
                parent,
                xplore,
            )?;
            column_bmod(
                self.field,
                self.store,
                jj,
                jcol,
                &segrep[nseg1..],
                repfnz_col,
                dense_col,
                tempv,
                &mut self.stats,
            )?;
            copy_to_ucol(
                self.field,
                self.store,
                jj,
                segrep,
                repfnz_col,
                &self.perm_r,
                dense_col,
            )?;

            match self.pivot(jj)? {
                PivotOutcome::Pivot { row, .. } => {
                    prune_l(self.store, jj, row, &self.perm_r, segrep, repfnz_col);
                }
                PivotOutcome::Zero => {
                    self.store.detach_column(jj)?;
                    if self.rank < m {
                        self.zero_steps.push(jj);
                        self.stats.zero_pivots += 1;
                    }
                }
            }

            for &krep in segrep.iter() {
                repfnz_col[krep] = EMPTY;
            }
        }

        self.stats.panels += 1;
        log::trace!("panel {jcol}..{} done, rank {}", jcol + width, self.rank);
        Ok(jcol + width)
    }
}
