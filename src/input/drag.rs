//! Gesture state: Idle or Dragging, plus the selection being built.
//!
//! This is pure bookkeeping. Rule evaluation, events and highlighting live
//! in `game::gesture`, which drives this controller.

use crate::core::{Block, BlockId};

/// Gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Selection bookkeeping for one gesture at a time.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
    selection: Vec<Block>,
    current: Option<BlockId>,
}

impl DragController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Check if a gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Blocks accepted so far, oldest first.
    #[must_use]
    pub fn selection(&self) -> &[Block] {
        &self.selection
    }

    /// The most recently accepted block.
    #[must_use]
    pub fn current(&self) -> Option<BlockId> {
        self.current
    }

    /// Start a gesture with an empty selection.
    pub fn begin(&mut self) {
        self.selection.clear();
        self.current = None;
        self.state = DragState::Dragging;
    }

    /// Check whether `id` is the block the pointer was last accepted on.
    #[must_use]
    pub fn is_current(&self, id: BlockId) -> bool {
        self.current == Some(id)
    }

    /// Append a block that passed every selection rule.
    pub fn accept(&mut self, block: Block) {
        self.current = Some(block.id);
        self.selection.push(block);
    }

    /// End the gesture, handing back the selection.
    pub fn finish(&mut self) -> Vec<Block> {
        self.state = DragState::Idle;
        self.current = None;
        std::mem::take(&mut self.selection)
    }

    /// Drop any gesture in progress.
    pub fn clear(&mut self) {
        let _ = self.finish();
    }
}
