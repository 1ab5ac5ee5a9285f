//! Core engine types: blocks, grid, history, RNG, configuration, errors.
//!
//! These are plain data structures with no event emission and no rendering.
//! The `game` module composes them into the event-hookable state machine.

pub mod block;
pub mod config;
pub mod error;
pub mod grid;
pub mod history;
pub mod rng;

pub use block::{Block, BlockId, BlockSnapshot, Position};
pub use config::{GameConfig, GridDimensions, ValueRange};
pub use error::{BoxError, ConfigError, GameError, RenderError, Result};
pub use grid::{Cell, Grid, GridSnapshot};
pub use history::History;
pub use rng::{GameRng, GameRngState};
