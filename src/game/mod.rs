//! The merge game: grid lifecycle, gestures and merge resolution.
//!
//! [`MergeGame`] composes the core types, the event bus, the block factory,
//! the rule sets and a rendering gateway into one state machine:
//!
//! - `engine`: initialize, reset, state generation, rendering, undo
//! - `gesture`: pointer start / move / end, selection and highlights
//! - `merge`: merge validation, value aggregation, backfill
//!
//! ```
//! # futures_util::FutureExt::now_or_never(async {
//! use merge_grid::core::GameConfig;
//! use merge_grid::game::GameBuilder;
//! use merge_grid::render::RecordingGateway;
//!
//! let mut game = GameBuilder::new(RecordingGateway::default())
//!     .config(GameConfig::new().with_dimensions(3, 3).with_seed(1))
//!     .build()
//!     .unwrap();
//! game.initialize().await.unwrap();
//! assert_eq!(game.grid().occupied_count(), 9);
//! # }).unwrap();
//! ```

mod builder;
mod engine;
mod gesture;
mod merge;

pub use builder::GameBuilder;
pub use engine::MergeGame;
