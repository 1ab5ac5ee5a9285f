//! # merge-grid
//!
//! An event-hookable state machine for grid-based "merge" puzzle games.
//!
//! ## Design Principles
//!
//! 1. **Rules Are Pluggable**: The engine never decides what a legal
//!    selection or merge is. Hosts register `SelectionRule`s and
//!    `MergeRule`s.
//!
//! 2. **Everything Is an Event**: Each step publishes a cancelable
//!    `Before*` event and a rewritable `After*` event on a per-game bus.
//!
//! 3. **Rendering Is Someone Else's Job**: Visuals and hit boxes live
//!    behind the async `Renderer` / `BoundsQuery` gateway.
//!
//! ## Architecture
//!
//! - **Sequential Input**: Every entry point takes `&mut self` across its
//!   awaits, so one game processes one pointer event at a time.
//!
//! - **Bounded History**: Handle-free grid snapshots are pushed before each
//!   merge and kept in an `im::Vector`, oldest evicted first.
//!
//! - **Deterministic Boards**: Block values come from a seeded ChaCha8 RNG.
//!
//! ## Modules
//!
//! - `core`: Blocks, grid, history, RNG, configuration, errors
//! - `events`: Typed lifecycle events and the event bus
//! - `factory`: Block generation from the value ladder
//! - `rules`: Selection and merge rule traits, built-in rules
//! - `input`: Pointer events, hit testing, drag state
//! - `render`: Gateway traits and an in-memory recording gateway
//! - `game`: `MergeGame` and its builder

pub mod core;
pub mod events;
pub mod factory;
pub mod rules;
pub mod input;
pub mod render;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    Block, BlockId, BlockSnapshot, Position,
    Cell, Grid, GridSnapshot, History,
    GameConfig, GridDimensions, ValueRange,
    GameRng, GameRngState,
    ConfigError, GameError, RenderError, Result,
};

pub use crate::events::{
    async_handler, handler_fn,
    EventBus, EventHandler, EventName, EventPayload, EventResult,
    GameEvent, MergeOutcome, SubscriptionId,
};

pub use crate::factory::BlockFactory;

pub use crate::rules::{MergeRule, MergeRules, SelectionRule, SelectionRules};

pub use crate::input::{DragState, Point, PointerEvent, PointerPhase, Rect};

pub use crate::render::{BoundsQuery, RecordingGateway, RenderHandle, Renderer};

pub use crate::game::{GameBuilder, MergeGame};
