//! The board: a fixed-size, row-major arena of cells.
//!
//! Each cell is either [`Cell::Occupied`] by a [`Block`] or [`Cell::Empty`].
//! Positions outside the board are simply absent (`get` returns `None`),
//! so callers never index out of bounds.

use serde::{Deserialize, Serialize};

use super::block::{Block, BlockId, BlockSnapshot, Position};
use super::config::GridDimensions;

/// One grid cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    /// A live block.
    Occupied(Block),
    /// Nothing here.
    #[default]
    Empty,
}

impl Cell {
    /// The block in this cell, if any.
    #[must_use]
    pub fn block(&self) -> Option<&Block> {
        match self {
            Cell::Occupied(block) => Some(block),
            Cell::Empty => None,
        }
    }

    /// Check if the cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Live grid state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![Cell::Empty; dimensions.cell_count()],
        }
    }

    /// Board size.
    #[must_use]
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    fn index(&self, position: Position) -> Option<usize> {
        (position.row < self.dimensions.rows && position.col < self.dimensions.cols)
            .then(|| position.row * self.dimensions.cols + position.col)
    }

    /// Check whether a position lies on the board.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// The cell at a position.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|i| &self.cells[i])
    }

    /// The block at a position.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&Block> {
        self.cell(position).and_then(Cell::block)
    }

    /// Mutable access to the block at a position.
    pub fn get_mut(&mut self, position: Position) -> Option<&mut Block> {
        let index = self.index(position)?;
        match &mut self.cells[index] {
            Cell::Occupied(block) => Some(block),
            Cell::Empty => None,
        }
    }

    /// Install a block at its own position, returning whatever was there.
    ///
    /// Returns `None` without installing if the position is off the board.
    pub fn place(&mut self, block: Block) -> Option<Cell> {
        let index = self.index(block.position)?;
        Some(std::mem::replace(&mut self.cells[index], Cell::Occupied(block)))
    }

    /// Empty a cell, returning the block that occupied it.
    pub fn clear(&mut self, position: Position) -> Option<Block> {
        let index = self.index(position)?;
        match std::mem::take(&mut self.cells[index]) {
            Cell::Occupied(block) => Some(block),
            Cell::Empty => None,
        }
    }

    /// Find a live block by id.
    #[must_use]
    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.blocks().find(|block| block.id == id)
    }

    /// Every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.dimensions.cols;
        (0..self.dimensions.cell_count()).map(move |i| Position::new(i / cols, i % cols))
    }

    /// Every live block in row-major order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.cells.iter().filter_map(Cell::block)
    }

    /// Mutable iteration over live blocks in row-major order.
    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.cells.iter_mut().filter_map(|cell| match cell {
            Cell::Occupied(block) => Some(block),
            Cell::Empty => None,
        })
    }

    /// Positions of empty cells in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|&p| self.get(p).is_none())
            .collect()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.blocks().count()
    }

    /// Handle-free copy for history.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            dimensions: self.dimensions,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.block().map(BlockSnapshot::from))
                .collect(),
        }
    }

    /// Rebuild a grid from a snapshot. Restored blocks are unrendered.
    #[must_use]
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Self {
        let mut grid = Grid::new(snapshot.dimensions);
        for block in snapshot.cells.iter().flatten() {
            grid.place(Block::from(*block));
        }
        grid
    }
}

/// Handle-free, serializable copy of a grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub dimensions: GridDimensions,
    /// Row-major cells; `None` for empty.
    pub cells: Vec<Option<BlockSnapshot>>,
}

impl GridSnapshot {
    /// The block recorded at a position.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&BlockSnapshot> {
        if position.row >= self.dimensions.rows || position.col >= self.dimensions.cols {
            return None;
        }
        self.cells
            .get(position.row * self.dimensions.cols + position.col)
            .and_then(Option::as_ref)
    }

    /// Row-major values, `None` for empty cells.
    #[must_use]
    pub fn values(&self) -> Vec<Option<u64>> {
        self.cells.iter().map(|c| c.map(|b| b.value)).collect()
    }
}
