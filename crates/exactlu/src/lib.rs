//! # exactlu
//!
//! Exact supernodal sparse LU factorization.
//!
//! Factors a sparse `m × n` matrix as `P·A·Pc = L·U` with every coefficient
//! computed exactly in a user-chosen field. Rank deficiency is part of the
//! result rather than an error, which makes the engine suitable for rank
//! computations and for the large eliminations of computer algebra.
//!
//! ## Features
//!
//! - **Generic Fields**: prime fields, rationals, or any [`field::Field`]
//! - **Supernodes**: dense block kernels on groups of columns with equal
//!   structure
//! - **Threshold Pivoting**: diagonal preference with a configurable
//!   threshold in ordered fields
//! - **Reuse**: refactor matrices with an unchanged pattern using the
//!   permutations of an earlier call
//!
//! ## Quick Start
//!
//! ```rust
//! use exactlu::prelude::*;
//!
//! let field = Rationals::new();
//! let a = CscMatrix::from_dense(
//!     &field,
//!     &[
//!         vec![Rational::from_integer(2), Rational::from_integer(1)],
//!         vec![Rational::from_integer(4), Rational::from_integer(2)],
//!     ],
//! );
//!
//! let mut engine = LuEngine::new(field, LuOptions::default());
//! let lu = engine.factorize(&a).unwrap();
//! assert_eq!(lu.rank(), 1);
//! assert_eq!(lu.info(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use exactlu_field as field;
pub use exactlu_sparse as sparse;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use exactlu_field::{Field, FieldError, Modular, Rational, Rationals};
    pub use exactlu_sparse::{
        preorder, CscMatrix, DenseMatrix, Factorization, LuEngine, LuError, LuOptions,
        StructureMode, Threshold,
    };
}
