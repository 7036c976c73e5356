//! Left-looking supernodal LU factorization.
//!
//! # Overview
//!
//! Columns are processed in steps `0..ncols` in the order given by a column
//! permutation whose column elimination tree is postordered. Consecutive steps
//! with the same row structure below the diagonal are grouped into
//! supernodes, whose L part is stored as one dense block.
//!
//! Each panel of consecutive steps goes through:
//! 1. `symbolic`: depth-first search for the row structure of each column
//!    over the supernodes already computed
//! 2. `numeric`: dense block updates from those supernodes
//! 3. `pivot`: threshold pivot selection and scaling of the L column
//! 4. `prune`: shortening of search lists that the new pivot makes
//!    redundant
//!
//! Small leaf subtrees of the elimination tree skip the search and are
//! factored directly as relaxed supernodes.
//!
//! A step without a nonzero candidate is recorded and skipped; the result
//! then has lower rank instead of failing.

mod driver;
mod error;
mod factor;
mod finalize;
mod memory;
mod numeric;
mod options;
mod pivot;
mod prune;
mod relax;
mod solve;
mod store;
mod symbolic;
mod workspace;

pub use driver::LuEngine;
pub use error::{Argument, LuError};
pub use factor::{Factorization, LFactor, LuStats, Supernode};
pub use memory::StorageKind;
pub use options::{LuOptions, StructureMode, Threshold};
pub use relax::relax_supernodes;
pub use store::FactorStore;
