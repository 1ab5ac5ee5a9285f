//! Bounded history of past grid states.
//!
//! Snapshots are appended immediately before a merge mutates the grid.
//! Once the history holds more than `depth` entries the oldest is evicted.
//! Uses an `im` vector so hosts can clone the whole history cheaply for
//! auditing.

use im::Vector;

use super::grid::GridSnapshot;

/// FIFO-evicting list of grid snapshots, oldest first.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vector<GridSnapshot>,
    depth: usize,
}

impl History {
    /// Create an empty history holding at most `depth` snapshots.
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            entries: Vector::new(),
            depth,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append a snapshot, evicting the oldest entries past the limit.
    pub fn push(&mut self, snapshot: GridSnapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.depth {
            let _ = self.entries.pop_front();
        }
    }

    /// Remove and return the newest snapshot.
    pub fn pop(&mut self) -> Option<GridSnapshot> {
        self.entries.pop_back()
    }

    /// The newest snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<&GridSnapshot> {
        self.entries.back()
    }

    /// Iterate snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &GridSnapshot> {
        self.entries.iter()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
