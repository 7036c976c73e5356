//! # exactlu-sparse
//!
//! Supernodal sparse LU factorization over exact fields.
//!
//! This crate provides:
//! - Sparse matrices in CSC (Compressed Sparse Column) format
//! - Dense matrices for reconstruction and reference computations
//! - Column elimination trees and postorderings
//! - A left-looking supernodal LU engine with threshold pivoting that
//!   reports rank deficiency instead of failing
//!
//! ## Algorithm
//!
//! Columns are processed in panels. A symbolic depth-first search over the
//! supernodes already factored finds the structure of each column, numeric
//! kernels apply the dense supernode blocks to a scattered accumulator, and
//! symmetric pruning keeps later searches short. Leaf subtrees of the column
//! elimination tree are factored as relaxed supernodes without any search.
//!
//! All coefficient arithmetic goes through an [`exactlu_field::Field`], so the
//! same engine runs over prime fields, rationals, or any other exact domain.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::too_many_lines)]

pub mod csc;
pub mod dense;
pub mod etree;
pub mod lu;

/// Sentinel for "no index" in the index arrays of this crate.
pub const EMPTY: usize = usize::MAX;

pub use csc::{CscMatrix, CscRef, StructureError};
pub use dense::DenseMatrix;
pub use etree::{column_etree, postorder, preorder, Preorder};
pub use lu::{
    Argument, Factorization, FactorStore, LFactor, LuEngine, LuError, LuOptions, LuStats,
    StorageKind, StructureMode, Supernode, Threshold,
};
pub use lu::relax_supernodes;

#[cfg(test)]
mod proptests;
