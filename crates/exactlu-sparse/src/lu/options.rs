//! Configuration of the factorization engine.

/// Exact diagonal pivoting threshold `num / den` in `[0, 1]`.
///
/// A candidate `c` passes when `|c| ≥ threshold · max|candidates|`. `ONE`
/// gives partial pivoting, `ZERO` accepts the preferred row whenever it is
/// nonzero. Fields without a magnitude accept every nonzero candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Threshold {
    num: u32,
    den: u32,
}

impl Threshold {
    /// Partial pivoting.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Always prefer the diagonal when it is nonzero.
    pub const ZERO: Self = Self { num: 0, den: 1 };

    /// Creates the threshold `num / den`. Validity is checked by the engine.
    #[must_use]
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Returns the numerator.
    #[must_use]
    pub const fn numerator(self) -> u32 {
        self.num
    }

    /// Returns the denominator.
    #[must_use]
    pub const fn denominator(self) -> u32 {
        self.den
    }

    /// Returns true if the fraction lies in `[0, 1]`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.den > 0 && self.num <= self.den
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::ONE
    }
}

/// Whether a factorization starts from scratch or reuses a row permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StructureMode {
    /// The row permutation is output only.
    #[default]
    Fresh,
    /// The row permutation of a previous call on the same pattern is tried
    /// first at every step, as long as its rows keep passing the threshold.
    ReuseRowPerm,
}

/// Tuning parameters of [`LuEngine`](super::LuEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuOptions {
    /// Diagonal pivoting threshold.
    pub pivot_threshold: Threshold,
    /// Leaf subtrees of the elimination tree with fewer descendants than this
    /// are factored as relaxed supernodes. Zero disables relaxation.
    pub relax: usize,
    /// Maximum number of columns per panel.
    pub panel_size: usize,
    /// Maximum number of columns per supernode.
    pub max_supernode: usize,
    /// Initial capacity of each factor array, in multiples of `nnz(A)`.
    pub fill_ratio: usize,
    /// Upper bound on the entries of each factor array.
    pub memory_limit: Option<usize>,
}

impl Default for LuOptions {
    fn default() -> Self {
        Self {
            pivot_threshold: Threshold::ONE,
            relax: 6,
            panel_size: 8,
            max_supernode: 64,
            fill_ratio: 4,
            memory_limit: None,
        }
    }
}
