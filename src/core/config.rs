//! Game configuration types.
//!
//! Hosts configure the engine at construction by providing:
//! - `GridDimensions`: Rows and columns of the board
//! - `ValueRange`: The geometric ladder block values are drawn from
//! - `GameConfig`: Combines everything, plus hit testing and history limits
//!
//! Configuration is immutable once a game has been built.
//!
//! ## Defaults
//!
//! `GameConfig` deserializes with `#[serde(default)]`: a field that is
//! missing falls back to its default, but a field that is present is kept
//! as-is, zero included, and then checked by [`GameConfig::validate`].
//!
//! ```
//! use merge_grid::core::GameConfig;
//!
//! let config: GameConfig = serde_json::from_str(r#"{ "hit_box_scale": 0.0 }"#).unwrap();
//! assert_eq!(config.hit_box_scale, 0.0);
//! assert_eq!(config.dimensions.rows, 6);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Board size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: usize,
    pub cols: usize,
}

impl GridDimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows * self.cols
    }

    /// Validate that both sides are non-zero.
    pub fn validate(self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::NonPositiveDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(6, 5)
    }
}

impl std::fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Range of generated block values: `{min, min*p, min*p^2, ...}` up to `max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u64,
    pub max: u64,
    pub increment_power: u64,
}

impl ValueRange {
    /// Create a new value range.
    #[must_use]
    pub const fn new(min: u64, max: u64, increment_power: u64) -> Self {
        Self {
            min,
            max,
            increment_power,
        }
    }

    /// Validate the range without building the ladder.
    pub fn validate(self) -> Result<(), ConfigError> {
        if self.min == 0 {
            return Err(ConfigError::ZeroMinimum);
        }
        if self.increment_power == 0 {
            return Err(ConfigError::NonPositiveIncrement);
        }
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Every legal generated value, ascending.
    ///
    /// Always non-empty for a valid range. An increment power of 1 yields
    /// just `[min]`; the ladder also stops before it would overflow.
    pub fn legal_values(self) -> Result<Vec<u64>, ConfigError> {
        self.validate()?;

        let mut values = vec![self.min];
        if self.increment_power == 1 {
            return Ok(values);
        }

        let mut current = self.min;
        while let Some(next) = current.checked_mul(self.increment_power) {
            if next > self.max {
                break;
            }
            values.push(next);
            current = next;
        }
        Ok(values)
    }

    /// Check whether a value lies on the ladder.
    #[must_use]
    pub fn contains(self, value: u64) -> bool {
        self.legal_values()
            .map(|values| values.contains(&value))
            .unwrap_or(false)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(2, 64, 2)
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board size (default 6 rows x 5 columns).
    pub dimensions: GridDimensions,

    /// Generated value ladder.
    pub value_range: ValueRange,

    /// Multiplier applied to a rendered block's bounds for hit testing.
    /// Values above 1.0 are forgiving, below 1.0 precise, 0.0 never hits.
    ///
    /// Scaled bounds are half-open: a point exactly on the left or top edge
    /// hits, one exactly on the right or bottom edge does not. At 2.0 a hit
    /// reaches half a block past the left/top edge and just short of half a
    /// block past the right/bottom edge.
    pub hit_box_scale: f64,

    /// Maximum number of snapshots kept for undo. 0 disables history.
    pub history_depth: usize,

    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dimensions: GridDimensions::default(),
            value_range: ValueRange::default(),
            hit_box_scale: 1.0,
            history_depth: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.dimensions = GridDimensions::new(rows, cols);
        self
    }

    /// Set the value range.
    #[must_use]
    pub fn with_value_range(mut self, min: u64, max: u64, increment_power: u64) -> Self {
        self.value_range = ValueRange::new(min, max, increment_power);
        self
    }

    /// Set the hit box scale.
    #[must_use]
    pub fn with_hit_box_scale(mut self, scale: f64) -> Self {
        self.hit_box_scale = scale;
        self
    }

    /// Set the history depth.
    #[must_use]
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Seed the RNG for reproducible games.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dimensions.validate()?;
        self.value_range.validate()?;
        if !self.hit_box_scale.is_finite() || self.hit_box_scale < 0.0 {
            return Err(ConfigError::InvalidHitBoxScale(self.hit_box_scale));
        }
        Ok(())
    }
}
