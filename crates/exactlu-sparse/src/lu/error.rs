//! Error type of the factorization engine.

use std::fmt;

use exactlu_field::FieldError;
use thiserror::Error;

use super::memory::StorageKind;

/// The argument of a factorization call that failed validation.
///
/// Positions follow the classic `factorize(A, threshold, relax, panel, etree,
/// perm_r, perm_c)` order so that [`LuError::info`] reproduces the usual
/// negative codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// The input matrix.
    Matrix,
    /// `LuOptions::pivot_threshold`.
    PivotThreshold,
    /// `LuOptions::relax`.
    ///
    /// Every relax value is accepted, so this is never reported; it holds
    /// position 3 of the info code numbering.
    Relax,
    /// `LuOptions::panel_size`.
    PanelSize,
    /// The column elimination tree.
    Etree,
    /// The row permutation.
    RowPerm,
    /// The column permutation.
    ColPerm,
    /// `LuOptions::max_supernode`.
    MaxSupernode,
    /// `LuOptions::fill_ratio`.
    FillRatio,
}

impl Argument {
    /// One-based position of the argument.
    #[must_use]
    pub const fn position(self) -> i64 {
        match self {
            Self::Matrix => 1,
            Self::PivotThreshold => 2,
            Self::Relax => 3,
            Self::PanelSize => 4,
            Self::Etree => 5,
            Self::RowPerm => 6,
            Self::ColPerm => 7,
            Self::MaxSupernode => 8,
            Self::FillRatio => 9,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Matrix => "matrix",
            Self::PivotThreshold => "pivot threshold",
            Self::Relax => "relax",
            Self::PanelSize => "panel size",
            Self::Etree => "elimination tree",
            Self::RowPerm => "row permutation",
            Self::ColPerm => "column permutation",
            Self::MaxSupernode => "max supernode",
            Self::FillRatio => "fill ratio",
        };
        f.write_str(name)
    }
}

/// Errors returned by the LU engine.
///
/// Rank deficiency is not an error; it is reported by
/// [`Factorization::rank`](super::Factorization::rank).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LuError {
    /// An argument was rejected before any work was done.
    #[error("invalid {argument}: {reason}")]
    InvalidArgument {
        /// The offending argument.
        argument: Argument,
        /// What is wrong with it.
        reason: String,
    },
    /// A factor array could not grow far enough.
    ///
    /// Retrying with a larger `fill_ratio` or `memory_limit` can succeed.
    #[error("{kind} needs {required} entries ({additional} more than available)")]
    AllocationShortfall {
        /// The array that could not grow.
        kind: StorageKind,
        /// Capacity the factorization asked for.
        required: usize,
        /// Entries missing beyond the current capacity.
        additional: usize,
    },
    /// The field rejected an operation, e.g. a nonzero pivot without inverse.
    #[error("field error: {0}")]
    Field(#[from] FieldError),
    /// A solve was requested from a factorization that is not invertible.
    #[error("cannot solve with a factorization of rank {rank} and order {order}")]
    Singular {
        /// Rank of the factorization.
        rank: usize,
        /// Number of rows (and columns) a solvable system would need as rank.
        order: usize,
    },
}

impl LuError {
    pub(crate) fn invalid(argument: Argument, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Maps the error to the classic integer status code.
    ///
    /// - `-k` when the k-th argument is invalid
    /// - `ncols + additional` for an allocation shortfall
    /// - `i64::MIN` for field errors and singular solves, which have no code
    #[must_use]
    pub fn info(&self, ncols: usize) -> i64 {
        match self {
            Self::InvalidArgument { argument, .. } => -argument.position(),
            Self::AllocationShortfall { additional, .. } => {
                i64::try_from(ncols.saturating_add(*additional)).unwrap_or(i64::MAX)
            }
            Self::Field(_) | Self::Singular { .. } => i64::MIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_codes() {
        let err = LuError::invalid(Argument::Etree, "parent out of range");
        assert_eq!(err.info(10), -5);
        assert_eq!(err.to_string(), "invalid elimination tree: parent out of range");

        let err = LuError::AllocationShortfall {
            kind: StorageKind::Lusup,
            required: 120,
            additional: 20,
        };
        assert_eq!(err.info(10), 30);
    }

    #[test]
    fn test_field_error_converts() {
        let err: LuError = FieldError::ZeroModulus.into();
        assert!(matches!(err, LuError::Field(FieldError::ZeroModulus)));
    }
}
