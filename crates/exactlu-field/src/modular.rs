//! Integers modulo a runtime modulus.
//!
//! Residues are stored as reduced `u64` values. Products go through `u128`, so
//! any modulus below 2^64 is supported.

use std::cmp::Ordering;

use crate::traits::{Field, FieldError};

/// Common word-sized primes.
pub mod primes {
    /// 2^23 * 7 * 17 + 1 = 998244353
    pub const P998244353: u64 = 998_244_353;

    /// Largest prime below 2^31.
    pub const P2147483647: u64 = 2_147_483_647;

    /// Mersenne prime 2^61 - 1.
    pub const MERSENNE_61: u64 = (1 << 61) - 1;
}

/// The ring Z/nZ, a field when the modulus is prime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Modular {
    modulus: u64,
}

impl Modular {
    /// Creates the domain of residues modulo `modulus`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ZeroModulus`] if `modulus` is zero.
    pub fn new(modulus: u64) -> Result<Self, FieldError> {
        if modulus == 0 {
            return Err(FieldError::ZeroModulus);
        }
        Ok(Self { modulus })
    }

    /// Returns the modulus.
    #[must_use]
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Reduces an arbitrary `u64` into the domain.
    #[must_use]
    pub const fn reduce(&self, value: u64) -> u64 {
        value % self.modulus
    }

    /// Computes `a^exp` by binary exponentiation.
    #[must_use]
    pub fn pow(&self, a: u64, mut exp: u64) -> u64 {
        let mut base = self.reduce(a);
        let mut result = self.reduce(1);
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(&result, &base);
            }
            base = self.mul(&base, &base);
            exp >>= 1;
        }
        result
    }
}

impl Field for Modular {
    type Element = u64;

    fn zero(&self) -> u64 {
        0
    }

    fn one(&self) -> u64 {
        self.reduce(1)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn init(&self, value: i64) -> u64 {
        // rem_euclid keeps the result in [0, modulus)
        i128::from(value).rem_euclid(i128::from(self.modulus)) as u64
    }

    fn is_zero(&self, a: &u64) -> bool {
        *a == 0
    }

    fn add(&self, a: &u64, b: &u64) -> u64 {
        let (sum, overflow) = a.overflowing_add(*b);
        if overflow || sum >= self.modulus {
            sum.wrapping_sub(self.modulus)
        } else {
            sum
        }
    }

    fn sub(&self, a: &u64, b: &u64) -> u64 {
        if a >= b {
            a - b
        } else {
            self.modulus - (b - a)
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn mul(&self, a: &u64, b: &u64) -> u64 {
        ((u128::from(*a) * u128::from(*b)) % u128::from(self.modulus)) as u64
    }

    fn neg(&self, a: &u64) -> u64 {
        if *a == 0 {
            0
        } else {
            self.modulus - a
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn inv(&self, a: &u64) -> Result<u64, FieldError> {
        let not_invertible = || FieldError::NotInvertible {
            element: format!("{a} (mod {})", self.modulus),
        };
        if *a == 0 {
            return Err(not_invertible());
        }

        // Extended Euclidean algorithm
        let m = i128::from(self.modulus);
        let mut t = 0i128;
        let mut new_t = 1i128;
        let mut r = m;
        let mut new_r = i128::from(*a);

        while new_r != 0 {
            let quotient = r / new_r;
            (t, new_t) = (new_t, t - quotient * new_t);
            (r, new_r) = (new_r, r - quotient * new_r);
        }

        if r > 1 {
            return Err(not_invertible());
        }
        Ok(t.rem_euclid(m) as u64)
    }

    fn compare_magnitude(&self, _a: &u64, _b: &u64) -> Option<Ordering> {
        None
    }
}
