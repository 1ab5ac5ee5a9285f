//! Block identity and positions.
//!
//! Every numbered tile on the grid is a [`Block`]. A block keeps its
//! [`BlockId`] for its whole lifetime, which is how hosts correlate it with
//! its rendered representation.
//!
//! ## Snapshots
//!
//! History never stores live blocks. [`BlockSnapshot`] is the value-type
//! projection of a block without its render handle, produced by an explicit
//! conversion rather than a serialize round-trip.
//!
//! ```
//! use merge_grid::core::{Block, BlockId, BlockSnapshot, Position};
//!
//! let block = Block::new(BlockId(7), 8, Position::new(1, 2));
//! let snapshot = BlockSnapshot::from(&block);
//!
//! assert_eq!(snapshot.value, 8);
//! assert_eq!(Block::from(snapshot).handle, None);
//! ```

use serde::{Deserialize, Serialize};

use crate::render::RenderHandle;

/// Unique identifier for a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u64);

impl BlockId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BlockId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

/// A (row, col) cell coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check whether two positions touch, orthogonally or diagonally.
    #[must_use]
    pub fn is_adjacent(self, other: Position, diagonal: bool) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        match (dr, dc) {
            (0, 1) | (1, 0) => true,
            (1, 1) => diagonal,
            _ => false,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A single numbered tile occupying one grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Stable identity.
    pub id: BlockId,

    /// Current value. Generated values are `min * p^k`; merged values are
    /// whatever the merge aggregation produced.
    pub value: u64,

    /// Cell the block occupies.
    pub position: Position,

    /// Handle to the rendered representation, owned by the gateway.
    /// `None` until the block has been rendered.
    pub handle: Option<RenderHandle>,
}

impl Block {
    /// Create an unrendered block.
    #[must_use]
    pub fn new(id: BlockId, value: u64, position: Position) -> Self {
        Self {
            id,
            value,
            position,
            handle: None,
        }
    }

    /// Row index.
    #[must_use]
    pub fn row(&self) -> usize {
        self.position.row
    }

    /// Column index.
    #[must_use]
    pub fn col(&self) -> usize {
        self.position.col
    }

    /// Check if the block has been rendered.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.handle.is_some()
    }
}

/// Handle-free copy of a block, as stored in history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub id: BlockId,
    pub value: u64,
    pub row: usize,
    pub col: usize,
}

impl From<&Block> for BlockSnapshot {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id,
            value: block.value,
            row: block.position.row,
            col: block.position.col,
        }
    }
}

impl From<BlockSnapshot> for Block {
    fn from(snapshot: BlockSnapshot) -> Self {
        Block::new(
            snapshot.id,
            snapshot.value,
            Position::new(snapshot.row, snapshot.col),
        )
    }
}
