//! Ready-made rules for common merge-game variants.
//!
//! A classic "connect equal numbers" game is:
//!
//! ```
//! use merge_grid::rules::{Adjacent, MergeRules, MinLength, NoRevisit, SameValue, SelectionRules};
//!
//! let mut selection = SelectionRules::new();
//! selection.add(NoRevisit);
//! selection.add(Adjacent::orthogonal());
//! selection.add(SameValue);
//!
//! let mut merge = MergeRules::new();
//! merge.add(MinLength(2));
//! # assert_eq!(selection.len(), 3);
//! ```

use super::rule::{MergeRule, SelectionRule};
use crate::core::{Block, Grid};

/// A block may be selected at most once per gesture.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRevisit;

impl SelectionRule for NoRevisit {
    fn name(&self) -> &str {
        "no-revisit"
    }

    fn allows(&self, candidate: &Block, selection: &[Block], _grid: &Grid) -> bool {
        selection.iter().all(|b| b.id != candidate.id)
    }
}

/// The candidate must touch the last selected block.
#[derive(Clone, Copy, Debug, Default)]
pub struct Adjacent {
    /// Whether diagonal neighbours count.
    pub diagonal: bool,
}

impl Adjacent {
    /// Up, down, left, right only.
    #[must_use]
    pub const fn orthogonal() -> Self {
        Self { diagonal: false }
    }

    /// All eight neighbours.
    #[must_use]
    pub const fn with_diagonals() -> Self {
        Self { diagonal: true }
    }
}

impl SelectionRule for Adjacent {
    fn name(&self) -> &str {
        "adjacent"
    }

    fn allows(&self, candidate: &Block, selection: &[Block], _grid: &Grid) -> bool {
        selection
            .last()
            .map_or(true, |last| last.position.is_adjacent(candidate.position, self.diagonal))
    }
}

/// Every selected block shares the first block's value.
#[derive(Clone, Copy, Debug, Default)]
pub struct SameValue;

impl SelectionRule for SameValue {
    fn name(&self) -> &str {
        "same-value"
    }

    fn allows(&self, candidate: &Block, selection: &[Block], _grid: &Grid) -> bool {
        selection.first().map_or(true, |first| first.value == candidate.value)
    }
}

/// Caps the selection length.
#[derive(Clone, Copy, Debug)]
pub struct MaxLength(pub usize);

impl SelectionRule for MaxLength {
    fn name(&self) -> &str {
        "max-length"
    }

    fn allows(&self, _candidate: &Block, selection: &[Block], _grid: &Grid) -> bool {
        selection.len() < self.0
    }
}

/// Require at least N blocks to merge.
#[derive(Clone, Copy, Debug)]
pub struct MinLength(pub usize);

impl MergeRule for MinLength {
    fn name(&self) -> &str {
        "min-length"
    }

    fn allows(&self, selection: &[Block], _grid: &Grid) -> bool {
        selection.len() >= self.0
    }
}

/// Every selected block must carry the same value.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformValue;

impl MergeRule for UniformValue {
    fn name(&self) -> &str {
        "uniform-value"
    }

    fn allows(&self, selection: &[Block], _grid: &Grid) -> bool {
        selection.windows(2).all(|pair| pair[0].value == pair[1].value)
    }
}

/// Consecutive selected blocks must be neighbours on the grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct Connected {
    pub diagonal: bool,
}

impl MergeRule for Connected {
    fn name(&self) -> &str {
        "connected"
    }

    fn allows(&self, selection: &[Block], _grid: &Grid) -> bool {
        selection
            .windows(2)
            .all(|pair| pair[0].position.is_adjacent(pair[1].position, self.diagonal))
    }
}
