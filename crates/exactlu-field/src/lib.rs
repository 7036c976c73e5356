//! # exactlu-field
//!
//! Field capabilities for exact linear algebra.
//!
//! Elimination code never calls operators on coefficients directly. It holds a
//! *field object* and routes every operation through it, so the same engine runs
//! over any domain that can describe itself with the [`Field`] trait:
//! - Integers modulo a runtime modulus ([`Modular`])
//! - Exact rationals backed by `dashu` ([`Rationals`])
//!
//! ## Rings that are not fields
//!
//! [`Modular`] accepts composite moduli. Inversion of a non-unit then fails with
//! [`FieldError::NotInvertible`], which callers treat as a fatal precondition
//! violation rather than a rank deficiency.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod modular;
pub mod rational;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use modular::Modular;
pub use rational::{Rational, Rationals};
pub use traits::{Field, FieldError};
