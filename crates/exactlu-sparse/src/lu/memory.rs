//! Growth of the factor arrays.
//!
//! The four growable arrays are kept at their full capacity (`len` is the
//! capacity) and written by index. Nothing holds a reference into them across
//! a write, so growing an array in place can never leave a stale pointer
//! behind.

use std::collections::TryReserveError;
use std::fmt;

use super::error::LuError;
use super::store::FactorStore;
use crate::EMPTY;

/// One of the growable arrays of the factor store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Row indices of the supernodes of L.
    Lsub,
    /// Numeric supernode blocks (L and the diagonal blocks of U).
    Lusup,
    /// Numeric U entries outside the supernode blocks.
    Ucol,
    /// Row indices (pivot steps) of the entries in `Ucol`.
    Usub,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lsub => "lsub",
            Self::Lusup => "lusup",
            Self::Ucol => "ucol",
            Self::Usub => "usub",
        };
        f.write_str(name)
    }
}

fn resize_index(v: &mut Vec<usize>, n: usize) -> Result<(), TryReserveError> {
    v.try_reserve(n.saturating_sub(v.len()))?;
    v.resize(n, EMPTY);
    Ok(())
}

fn resize_scalar<E: Clone>(v: &mut Vec<E>, n: usize, fill: &E) -> Result<(), TryReserveError> {
    v.try_reserve(n.saturating_sub(v.len()))?;
    v.resize(n, fill.clone());
    Ok(())
}

impl<E: Clone> FactorStore<E> {
    /// Returns the current capacity of one array.
    #[must_use]
    pub fn capacity(&self, kind: StorageKind) -> usize {
        match kind {
            StorageKind::Lsub => self.lsub.len(),
            StorageKind::Lusup => self.lusup.len(),
            StorageKind::Ucol => self.ucol.len(),
            StorageKind::Usub => self.usub.len(),
        }
    }

    /// Grows `kind` to hold at least `required` entries.
    ///
    /// Capacity grows by half of its current size or to `required`, whichever
    /// is larger, and never beyond the memory limit.
    pub(crate) fn expand(&mut self, kind: StorageKind, required: usize) -> Result<(), LuError> {
        let current = self.capacity(kind);
        if required <= current {
            return Ok(());
        }
        let shortfall = LuError::AllocationShortfall {
            kind,
            required,
            additional: required - current,
        };

        let mut target = (current + current / 2).max(required);
        if let Some(limit) = self.memory_limit {
            if required > limit {
                log::warn!("{kind} needs {required} entries, limit is {limit}");
                return Err(shortfall);
            }
            target = target.min(limit);
        }

        let grown = match kind {
            StorageKind::Lsub => resize_index(&mut self.lsub, target),
            StorageKind::Usub => resize_index(&mut self.usub, target),
            StorageKind::Lusup => resize_scalar(&mut self.lusup, target, &self.fill),
            StorageKind::Ucol => resize_scalar(&mut self.ucol, target, &self.fill),
        };
        if grown.is_err() {
            log::warn!("allocator refused to grow {kind} to {target} entries");
            return Err(shortfall);
        }

        self.expansions += 1;
        log::debug!("expanded {kind}: {current} -> {target}");
        Ok(())
    }

    /// Makes sure index `len - 1` of `kind` is writable.
    #[inline]
    pub(crate) fn ensure(&mut self, kind: StorageKind, len: usize) -> Result<(), LuError> {
        if len > self.capacity(kind) {
            self.expand(kind, len)?;
        }
        Ok(())
    }

    /// Writes one row index into `lsub`, growing it when needed.
    #[inline]
    pub(crate) fn set_lsub(&mut self, pos: usize, row: usize) -> Result<(), LuError> {
        self.ensure(StorageKind::Lsub, pos + 1)?;
        self.lsub[pos] = row;
        Ok(())
    }
}
