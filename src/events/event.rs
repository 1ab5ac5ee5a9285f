//! Typed lifecycle events.
//!
//! Every observable step of the game publishes a `Before*` event, which
//! handlers may cancel, and an `After*` event whose payload handlers may
//! replace. Names and payloads are closed enums so a misspelled event is a
//! compile error rather than a silently ignored string.

use crate::core::{Block, GameError, Grid, GridDimensions, GridSnapshot, Position, Result};
use crate::input::Point;

/// Lifecycle event names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventName {
    BeforeInitialize,
    AfterInitialize,
    BeforeReset,
    AfterReset,
    BeforeGenerateState,
    AfterGenerateState,
    BeforeGenerateBlock,
    AfterGenerateBlock,
    BeforeRenderBlock,
    AfterRenderBlock,
    BeforeHighlight,
    AfterHighlight,
    BeforeRemoveHighlight,
    AfterRemoveHighlight,
    BeforeDrag,
    AfterDrag,
    BeforeSelect,
    AfterSelect,
    BeforeDragEnd,
    AfterDragEnd,
    BeforeCalculateMergeValue,
    AfterCalculateMergeValue,
    BeforeProcessMerge,
    AfterProcessMerge,
    BeforeFillEmptyPositions,
    AfterFillEmptyPositions,
    BeforeUndo,
    AfterUndo,
}

impl EventName {
    /// Stable kebab-case name, for logs and host-side tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventName::BeforeInitialize => "before-initialize",
            EventName::AfterInitialize => "after-initialize",
            EventName::BeforeReset => "before-reset",
            EventName::AfterReset => "after-reset",
            EventName::BeforeGenerateState => "before-generate-state",
            EventName::AfterGenerateState => "after-generate-state",
            EventName::BeforeGenerateBlock => "before-generate-block",
            EventName::AfterGenerateBlock => "after-generate-block",
            EventName::BeforeRenderBlock => "before-render-block",
            EventName::AfterRenderBlock => "after-render-block",
            EventName::BeforeHighlight => "before-highlight",
            EventName::AfterHighlight => "after-highlight",
            EventName::BeforeRemoveHighlight => "before-remove-highlight",
            EventName::AfterRemoveHighlight => "after-remove-highlight",
            EventName::BeforeDrag => "before-drag",
            EventName::AfterDrag => "after-drag",
            EventName::BeforeSelect => "before-select",
            EventName::AfterSelect => "after-select",
            EventName::BeforeDragEnd => "before-drag-end",
            EventName::AfterDragEnd => "after-drag-end",
            EventName::BeforeCalculateMergeValue => "before-calculate-merge-value",
            EventName::AfterCalculateMergeValue => "after-calculate-merge-value",
            EventName::BeforeProcessMerge => "before-process-merge",
            EventName::AfterProcessMerge => "after-process-merge",
            EventName::BeforeFillEmptyPositions => "before-fill-empty-positions",
            EventName::AfterFillEmptyPositions => "after-fill-empty-positions",
            EventName::BeforeUndo => "before-undo",
            EventName::AfterUndo => "after-undo",
        }
    }

    /// Check if this is a cancelable `Before*` event.
    #[must_use]
    pub const fn is_before(self) -> bool {
        matches!(
            self,
            EventName::BeforeInitialize
                | EventName::BeforeReset
                | EventName::BeforeGenerateState
                | EventName::BeforeGenerateBlock
                | EventName::BeforeRenderBlock
                | EventName::BeforeHighlight
                | EventName::BeforeRemoveHighlight
                | EventName::BeforeDrag
                | EventName::BeforeSelect
                | EventName::BeforeDragEnd
                | EventName::BeforeCalculateMergeValue
                | EventName::BeforeProcessMerge
                | EventName::BeforeFillEmptyPositions
                | EventName::BeforeUndo
        )
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a completed merge did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The target block after receiving the merged value.
    pub target: Block,
    /// Cells emptied by the merge, in selection order.
    pub vacated: Vec<Position>,
    /// Blocks generated to backfill the vacated cells.
    pub filled: Vec<Block>,
}

/// Discriminant of [`EventPayload`], used in mismatch errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    None,
    Dimensions,
    Grid,
    Snapshot,
    Position,
    Positions,
    Block,
    Blocks,
    Point,
    Select,
    DragEnd,
    MergeValue,
    Merge,
}

/// Event payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// No data.
    None,
    /// Grid size (`BeforeGenerateState`).
    Dimensions(GridDimensions),
    /// A whole grid (`AfterGenerateState`, `AfterReset`, `AfterUndo`).
    Grid(Grid),
    /// The snapshot about to be restored (`BeforeUndo`).
    Snapshot(GridSnapshot),
    /// One cell (`BeforeGenerateBlock`).
    Position(Position),
    /// Cells to backfill (`BeforeFillEmptyPositions`).
    Positions(Vec<Position>),
    /// One block (generation, rendering, highlighting).
    Block(Block),
    /// A list of blocks (the selection, or backfilled blocks).
    Blocks(Vec<Block>),
    /// Pointer location that started a drag.
    Point(Point),
    /// A candidate block and the selection it joins.
    Select { block: Block, selection: Vec<Block> },
    /// Outcome of a gesture.
    DragEnd { merged: bool, selection: Vec<Block> },
    /// Aggregated merge value.
    MergeValue(u64),
    /// Completed merge.
    Merge(MergeOutcome),
}

impl EventPayload {
    /// The payload's discriminant.
    #[must_use]
    pub fn kind(&self) -> PayloadKind {
        match self {
            EventPayload::None => PayloadKind::None,
            EventPayload::Dimensions(_) => PayloadKind::Dimensions,
            EventPayload::Grid(_) => PayloadKind::Grid,
            EventPayload::Snapshot(_) => PayloadKind::Snapshot,
            EventPayload::Position(_) => PayloadKind::Position,
            EventPayload::Positions(_) => PayloadKind::Positions,
            EventPayload::Block(_) => PayloadKind::Block,
            EventPayload::Blocks(_) => PayloadKind::Blocks,
            EventPayload::Point(_) => PayloadKind::Point,
            EventPayload::Select { .. } => PayloadKind::Select,
            EventPayload::DragEnd { .. } => PayloadKind::DragEnd,
            EventPayload::MergeValue(_) => PayloadKind::MergeValue,
            EventPayload::Merge(_) => PayloadKind::Merge,
        }
    }

    /// Borrow the block, if this is a block payload.
    #[must_use]
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            EventPayload::Block(block) | EventPayload::Select { block, .. } => Some(block),
            _ => None,
        }
    }

    /// Borrow the block list carried by this payload, if any.
    #[must_use]
    pub fn as_blocks(&self) -> Option<&[Block]> {
        match self {
            EventPayload::Blocks(blocks)
            | EventPayload::Select { selection: blocks, .. }
            | EventPayload::DragEnd { selection: blocks, .. } => Some(blocks.as_slice()),
            _ => None,
        }
    }

    /// Take a grid out of the payload.
    pub fn into_grid(self, event: EventName) -> Result<Grid> {
        match self {
            EventPayload::Grid(grid) => Ok(grid),
            _ => Err(mismatch(event, PayloadKind::Grid)),
        }
    }

    /// Take a block out of the payload.
    pub fn into_block(self, event: EventName) -> Result<Block> {
        match self {
            EventPayload::Block(block) => Ok(block),
            _ => Err(mismatch(event, PayloadKind::Block)),
        }
    }

    /// Take a block list out of the payload.
    pub fn into_blocks(self, event: EventName) -> Result<Vec<Block>> {
        match self {
            EventPayload::Blocks(blocks) => Ok(blocks),
            _ => Err(mismatch(event, PayloadKind::Blocks)),
        }
    }

    /// Take a merge value out of the payload.
    pub fn into_merge_value(self, event: EventName) -> Result<u64> {
        match self {
            EventPayload::MergeValue(value) => Ok(value),
            _ => Err(mismatch(event, PayloadKind::MergeValue)),
        }
    }
}

fn mismatch(event: EventName, expected: PayloadKind) -> GameError {
    GameError::PayloadMismatch { event, expected }
}

/// The mutable record handed to each handler.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEvent {
    name: EventName,
    /// Handlers may read or replace the payload.
    pub payload: EventPayload,
    cancelled: bool,
}

impl GameEvent {
    /// Create a new, uncancelled event.
    #[must_use]
    pub fn new(name: EventName, payload: EventPayload) -> Self {
        Self {
            name,
            payload,
            cancelled: false,
        }
    }

    /// The event's name.
    #[must_use]
    pub fn name(&self) -> EventName {
        self.name
    }

    /// Cancel the event. Later handlers for this publish are skipped.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Check if a handler cancelled the event.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Result of one publish.
#[derive(Clone, Debug, PartialEq)]
pub struct EventResult {
    pub cancelled: bool,
    /// The payload as the last handler left it.
    pub payload: EventPayload,
}

impl EventResult {
    /// Check whether dispatch completed without cancellation.
    #[must_use]
    pub fn proceed(&self) -> bool {
        !self.cancelled
    }
}
