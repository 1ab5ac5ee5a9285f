//! Error taxonomy.
//!
//! Only genuine faults surface as errors. A rule that says "no" is policy,
//! not failure: rejected selections and merges look like "nothing happened"
//! at the API boundary and are only observable through events.

use thiserror::Error;

use crate::events::{EventName, PayloadKind};
use crate::render::RenderHandle;

/// Boxed error type returned by event handlers.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;

/// Invalid configuration. Fatal at construction/generation time.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The value range is empty.
    #[error("invalid value range: min {min} is greater than max {max}")]
    InvalidRange { min: u64, max: u64 },

    /// Block values must be positive.
    #[error("minimum block value must be positive")]
    ZeroMinimum,

    /// The increment power must be positive.
    #[error("increment power must be positive")]
    NonPositiveIncrement,

    /// The grid needs at least one row and one column.
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    NonPositiveDimensions { rows: usize, cols: usize },

    /// Hit box scale must be finite and non-negative.
    #[error("hit box scale must be finite and non-negative, got {0}")]
    InvalidHitBoxScale(f64),
}

/// Failure reported by a rendering gateway.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The gateway does not know the handle it was given.
    #[error("unknown render handle {0}")]
    UnknownHandle(RenderHandle),

    /// Backend-specific failure.
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// Top-level error for every game operation.
#[derive(Debug, Error)]
pub enum GameError {
    /// Invalid configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A rendering-dependent operation ran without a host surface.
    #[error("no target element configured for rendering")]
    NoTargetElement,

    /// A subscribed event handler failed; dispatch was aborted.
    #[error("handler for {event} failed")]
    Handler {
        event: EventName,
        #[source]
        source: BoxError,
    },

    /// A handler replaced an event payload with a variant of the wrong kind.
    #[error("{event} expected a {expected:?} payload")]
    PayloadMismatch {
        event: EventName,
        expected: PayloadKind,
    },

    /// A replacement grid does not match the configured dimensions.
    #[error("generated grid is {actual_rows}x{actual_cols}, expected {rows}x{cols}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// The rendering gateway failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl GameError {
    /// Wrap a handler failure for the given event.
    pub fn handler(event: EventName, source: impl Into<BoxError>) -> Self {
        Self::Handler {
            event,
            source: source.into(),
        }
    }
}
