//! Game construction.

use tracing::debug;

use super::engine::MergeGame;
use crate::core::{GameConfig, GameRng, GameRngState, Grid, History, Result};
use crate::events::{EventBus, EventHandler, EventName};
use crate::factory::BlockFactory;
use crate::input::DragController;
use crate::render::{BoundsQuery, Renderer};
use crate::rules::{MergeRule, MergeRules, SelectionRule, SelectionRules};

/// Builder for a [`MergeGame`].
///
/// ```
/// use merge_grid::core::GameConfig;
/// use merge_grid::game::GameBuilder;
/// use merge_grid::render::RecordingGateway;
/// use merge_grid::rules::{Adjacent, MinLength, SameValue};
///
/// let game = GameBuilder::new(RecordingGateway::default())
///     .config(GameConfig::new().with_dimensions(4, 4).with_seed(7))
///     .selection_rule(Adjacent::orthogonal())
///     .selection_rule(SameValue)
///     .merge_rule(MinLength(2))
///     .build()
///     .unwrap();
///
/// assert_eq!(game.grid().dimensions().cell_count(), 16);
/// assert_eq!(game.grid().occupied_count(), 0);
/// ```
pub struct GameBuilder<G> {
    config: GameConfig,
    selection_rules: SelectionRules,
    merge_rules: MergeRules,
    events: EventBus,
    rng_state: Option<GameRngState>,
    gateway: G,
}

impl<G: Renderer + BoundsQuery> GameBuilder<G> {
    /// Start a builder with default configuration and no rules.
    pub fn new(gateway: G) -> Self {
        Self {
            config: GameConfig::default(),
            selection_rules: SelectionRules::new(),
            merge_rules: MergeRules::new(),
            events: EventBus::new(),
            rng_state: None,
            gateway,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a selection rule.
    #[must_use]
    pub fn selection_rule(mut self, rule: impl SelectionRule + 'static) -> Self {
        self.selection_rules.add(rule);
        self
    }

    /// Append a merge rule.
    #[must_use]
    pub fn merge_rule(mut self, rule: impl MergeRule + 'static) -> Self {
        self.merge_rules.add(rule);
        self
    }

    /// Resume the block value RNG from a captured state instead of the
    /// configured seed.
    #[must_use]
    pub fn rng_state(mut self, state: GameRngState) -> Self {
        self.rng_state = Some(state);
        self
    }

    /// Subscribe a handler before the game exists, so it also sees the
    /// events of the first `initialize`.
    #[must_use]
    pub fn on<H: EventHandler + 'static>(mut self, name: EventName, handler: H) -> Self {
        let _ = self.events.subscribe(name, handler);
        self
    }

    /// Validate the configuration and build the game.
    ///
    /// The grid starts empty; call `initialize` to populate and draw it.
    pub fn build(self) -> Result<MergeGame<G>> {
        self.config.validate()?;

        let rng = match &self.rng_state {
            Some(state) => GameRng::from_state(state),
            None => self.config.seed.map_or_else(GameRng::from_entropy, GameRng::new),
        };
        debug!(
            dimensions = %self.config.dimensions,
            seed = rng.seed(),
            "building game"
        );

        Ok(MergeGame {
            grid: Grid::new(self.config.dimensions),
            history: History::new(self.config.history_depth),
            factory: BlockFactory::new(self.config.value_range, rng)?,
            events: self.events,
            drag: DragController::new(),
            selection_rules: self.selection_rules,
            merge_rules: self.merge_rules,
            gateway: self.gateway,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConfigError, GameError};
    use crate::events::handler_fn;
    use crate::render::RecordingGateway;

    #[test]
    fn test_build_defaults() {
        let game = GameBuilder::new(RecordingGateway::default()).build().unwrap();
        assert_eq!(game.config(), &GameConfig::default());
        assert_eq!(game.history().depth(), 10);
        assert!(game.selection().is_empty());
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let result = GameBuilder::new(RecordingGateway::default())
            .config(GameConfig::new().with_value_range(64, 2, 2))
            .build();

        assert!(matches!(
            result,
            Err(GameError::Configuration(ConfigError::InvalidRange { min: 64, max: 2 }))
        ));
    }

    #[test]
    fn test_seed_is_kept() {
        let game = GameBuilder::new(RecordingGateway::default())
            .config(GameConfig::new().with_seed(99))
            .build()
            .unwrap();
        assert_eq!(game.rng_seed(), 99);
    }

    #[test]
    fn test_rng_state_overrides_seed() {
        let state = GameRng::new(5).state();
        let game = GameBuilder::new(RecordingGateway::default())
            .config(GameConfig::new().with_seed(99))
            .rng_state(state.clone())
            .build()
            .unwrap();
        assert_eq!(game.rng_seed(), 5);
        assert_eq!(game.rng_state(), state);
    }

    #[test]
    fn test_handlers_registered_up_front() {
        let mut game = GameBuilder::new(RecordingGateway::default())
            .on(EventName::AfterReset, handler_fn(|_| Ok(())))
            .build()
            .unwrap();
        assert_eq!(game.events_mut().subscriber_count(EventName::AfterReset), 1);
    }
}
