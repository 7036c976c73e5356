//! The field capability.
//!
//! A [`Field`] is a value describing a coefficient domain. Elements are plain
//! data; all arithmetic is performed by the field object, which lets a single
//! element type serve several domains (for example `u64` residues modulo
//! different primes).

use std::cmp::Ordering;
use std::fmt::Debug;

use thiserror::Error;

/// Errors raised by field operations.
///
/// These signal a violated precondition of the domain, never a property of the
/// matrix being factored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The element has no multiplicative inverse in this domain.
    #[error("element {element} is not invertible")]
    NotInvertible {
        /// Debug rendering of the offending element.
        element: String,
    },
    /// A modular domain was requested with modulus zero.
    #[error("modulus must be nonzero")]
    ZeroModulus,
}

/// Arithmetic capability over an exact field.
///
/// # Laws
///
/// - `add`, `mul` are associative and commutative with identities `zero()`, `one()`
/// - `mul` distributes over `add`
/// - `inv(a)` succeeds for every nonzero `a` of a field
///
/// The in-place operations have default implementations in terms of the pure
/// ones; domains with cheaper mutation may override them.
pub trait Field: Clone + Debug {
    /// The element representation.
    type Element: Clone + Debug + PartialEq;

    /// The additive identity.
    fn zero(&self) -> Self::Element;

    /// The multiplicative identity.
    fn one(&self) -> Self::Element;

    /// Maps an integer into the domain.
    fn init(&self, value: i64) -> Self::Element;

    /// Returns true if `a` is the additive identity.
    fn is_zero(&self, a: &Self::Element) -> bool;

    /// Returns true if `a` is the multiplicative identity.
    fn is_one(&self, a: &Self::Element) -> bool {
        *a == self.one()
    }

    /// Computes `a + b`.
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Computes `a - b`.
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Computes `a * b`.
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Computes `-a`.
    fn neg(&self, a: &Self::Element) -> Self::Element;

    /// Computes the multiplicative inverse of `a`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotInvertible`] if `a` is zero or a non-unit.
    fn inv(&self, a: &Self::Element) -> Result<Self::Element, FieldError>;

    /// Computes `a / b`.
    ///
    /// # Errors
    ///
    /// Fails exactly when `inv(b)` fails.
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Result<Self::Element, FieldError> {
        Ok(self.mul(a, &self.inv(b)?))
    }

    /// Computes `a * x + y`.
    fn axpy(&self, a: &Self::Element, x: &Self::Element, y: &Self::Element) -> Self::Element {
        self.add(&self.mul(a, x), y)
    }

    /// `r += a * x`.
    fn axpyin(&self, r: &mut Self::Element, a: &Self::Element, x: &Self::Element) {
        *r = self.axpy(a, x, r);
    }

    /// `r -= a * x`.
    fn maxpyin(&self, r: &mut Self::Element, a: &Self::Element, x: &Self::Element) {
        *r = self.sub(r, &self.mul(a, x));
    }

    /// `r *= a`.
    fn mulin(&self, r: &mut Self::Element, a: &Self::Element) {
        *r = self.mul(r, a);
    }

    /// `r -= a`.
    fn subin(&self, r: &mut Self::Element, a: &Self::Element) {
        *r = self.sub(r, a);
    }

    /// Compares `|a|` with `|b|` when the domain has a meaningful magnitude.
    ///
    /// Finite domains return `None`; threshold pivoting then degrades to
    /// choosing any nonzero candidate.
    fn compare_magnitude(&self, _a: &Self::Element, _b: &Self::Element) -> Option<Ordering> {
        None
    }
}
