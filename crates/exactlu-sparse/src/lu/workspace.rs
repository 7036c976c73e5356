//! Scratch space of one factorization call.

use exactlu_field::Field;

use crate::EMPTY;

/// Per-call scratch arrays.
///
/// Dense slots and `repfnz` are laid out column after column for the
/// `panel_size` columns of a panel. Visited markers store the column (or
/// panel) that last touched an entry, so they never need clearing.
#[derive(Debug)]
pub(crate) struct Workspace<E> {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    /// Sparse accumulators, `panel_size × nrows`, all zero between uses.
    pub(crate) dense: Vec<E>,
    /// Gather buffer for segment solves.
    pub(crate) tempv: Vec<E>,
    /// Segment representatives in DFS postorder.
    pub(crate) segrep: Vec<usize>,
    /// First nonzero step of each segment, `panel_size × ncols`.
    pub(crate) repfnz: Vec<usize>,
    /// Rows of each panel column not yet pivoted, `panel_size × nrows`.
    pub(crate) panel_lsub: Vec<usize>,
    pub(crate) panel_lsub_len: Vec<usize>,
    pub(crate) panel_marker: Vec<usize>,
    pub(crate) column_marker: Vec<usize>,
    pub(crate) relaxed_marker: Vec<usize>,
    /// `panel start + 1` once a representative is in `segrep` for that panel.
    pub(crate) segment_stamp: Vec<usize>,
    pub(crate) parent: Vec<usize>,
    pub(crate) xplore: Vec<usize>,
}

impl<E: Clone> Workspace<E> {
    pub(crate) fn new<F: Field<Element = E>>(
        field: &F,
        nrows: usize,
        ncols: usize,
        panel_size: usize,
    ) -> Self {
        Self {
            nrows,
            ncols,
            dense: vec![field.zero(); panel_size * nrows],
            tempv: vec![field.zero(); nrows],
            segrep: Vec::with_capacity(ncols),
            repfnz: vec![EMPTY; panel_size * ncols],
            panel_lsub: vec![EMPTY; panel_size * nrows],
            panel_lsub_len: vec![0; panel_size],
            panel_marker: vec![EMPTY; nrows],
            column_marker: vec![EMPTY; nrows],
            relaxed_marker: vec![EMPTY; nrows],
            segment_stamp: vec![0; ncols],
            parent: vec![EMPTY; ncols],
            xplore: vec![0; ncols],
        }
    }
}
