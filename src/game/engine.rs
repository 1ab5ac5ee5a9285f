//! The game state machine: grid lifecycle, rendering and accessors.
//!
//! ## Lifecycle
//!
//! ```text
//! initialize ─► reset ─► generate_state ─► generate_block (per cell)
//!                  └──► retire old visuals ─► draw surface ─► render_block (per block)
//! ```
//!
//! Every step publishes its `Before*` / `After*` pair on the game's own
//! [`EventBus`]. Cancelling a `Before*` event skips the step.

use tracing::{debug, trace, warn};

use crate::core::{
    Block, GameConfig, GameError, GameRngState, Grid, History, Position, RenderError, Result,
};
use crate::events::{EventBus, EventHandler, EventName, EventPayload, SubscriptionId};
use crate::factory::BlockFactory;
use crate::input::{DragController, DragState};
use crate::render::{BoundsQuery, Renderer};
use crate::rules::{MergeRules, SelectionRules};

/// An event-hookable merge puzzle bound to one rendering gateway.
///
/// Every entry point takes `&mut self` for its whole duration, awaits
/// included, so a single instance processes one operation at a time.
/// Build one with [`GameBuilder`](super::GameBuilder).
pub struct MergeGame<G> {
    pub(super) config: GameConfig,
    pub(super) grid: Grid,
    pub(super) history: History,
    pub(super) factory: BlockFactory,
    pub(super) events: EventBus,
    pub(super) drag: DragController,
    pub(super) selection_rules: SelectionRules,
    pub(super) merge_rules: MergeRules,
    pub(super) gateway: G,
}

impl<G: Renderer + BoundsQuery> MergeGame<G> {
    // === Lifecycle ===

    /// Populate and draw the board for the first time.
    ///
    /// Returns `false` if a `BeforeInitialize` handler cancelled.
    pub async fn initialize(&mut self) -> Result<bool> {
        let before = self
            .events
            .publish(EventName::BeforeInitialize, EventPayload::Dimensions(self.config.dimensions))
            .await?;
        if before.cancelled {
            debug!("initialize cancelled");
            return Ok(false);
        }
        if !self.gateway.has_target() {
            return Err(GameError::NoTargetElement);
        }

        self.reset().await?;

        self.events
            .publish(EventName::AfterInitialize, EventPayload::Grid(self.grid.clone()))
            .await?;
        Ok(true)
    }

    /// Discard the board and generate a fresh one.
    ///
    /// History is left alone. Returns `false` when a `BeforeReset` or
    /// `BeforeGenerateState` handler cancelled; in both cases the current
    /// grid, selection and highlights stay as they were. A drag in progress
    /// is dropped only once a new grid exists.
    pub async fn reset(&mut self) -> Result<bool> {
        if !self.gateway.has_target() {
            return Err(GameError::NoTargetElement);
        }

        let before = self
            .events
            .publish(EventName::BeforeReset, EventPayload::Dimensions(self.config.dimensions))
            .await?;
        if before.cancelled {
            debug!("reset cancelled");
            return Ok(false);
        }

        let Some(grid) = self.generate_state().await? else {
            return Ok(false);
        };
        self.drag.clear();
        self.replace_grid(grid).await?;

        self.events
            .publish(EventName::AfterReset, EventPayload::Grid(self.grid.clone()))
            .await?;
        debug!(
            dimensions = %self.config.dimensions,
            blocks = self.grid.occupied_count(),
            "grid reset"
        );
        Ok(true)
    }

    /// Build a complete, unrendered grid, one factory call per cell in
    /// row-major order.
    ///
    /// An `AfterGenerateState` handler may swap in a different grid of the
    /// same dimensions. Returns `None` if `BeforeGenerateState` was
    /// cancelled.
    pub async fn generate_state(&mut self) -> Result<Option<Grid>> {
        let dimensions = self.config.dimensions;
        let before = self
            .events
            .publish(EventName::BeforeGenerateState, EventPayload::Dimensions(dimensions))
            .await?;
        if before.cancelled {
            trace!("state generation cancelled");
            return Ok(None);
        }

        let mut grid = Grid::new(dimensions);
        for row in 0..dimensions.rows {
            for col in 0..dimensions.cols {
                if let Some(block) = self.generate_block(Position::new(row, col)).await? {
                    grid.place(block);
                }
            }
        }

        let after = self
            .events
            .publish(EventName::AfterGenerateState, EventPayload::Grid(grid))
            .await?;
        let grid = after.payload.into_grid(EventName::AfterGenerateState)?;

        let actual = grid.dimensions();
        if actual != dimensions {
            return Err(GameError::DimensionMismatch {
                rows: dimensions.rows,
                cols: dimensions.cols,
                actual_rows: actual.rows,
                actual_cols: actual.cols,
            });
        }
        Ok(Some(grid))
    }

    /// Generate one block for `position` through the block factory.
    pub async fn generate_block(&mut self, position: Position) -> Result<Option<Block>> {
        self.factory.generate(&mut self.events, position).await
    }

    /// Create the visual for a block and attach its handle.
    ///
    /// A cancelled `BeforeRenderBlock` returns the block unrendered; it
    /// still occupies its cell but can never be hit.
    pub async fn render_block(&mut self, mut block: Block) -> Result<Block> {
        let before = self
            .events
            .publish(EventName::BeforeRenderBlock, EventPayload::Block(block.clone()))
            .await?;
        if before.cancelled {
            trace!(block = %block.id, "render cancelled");
            return Ok(block);
        }

        let handle = self.gateway.render_block(&block).await?;
        block.handle = Some(handle);

        let after = self
            .events
            .publish(EventName::AfterRenderBlock, EventPayload::Block(block.clone()))
            .await?;
        let mut rendered = after.payload.into_block(EventName::AfterRenderBlock)?;
        rendered.handle = Some(handle);
        rendered.position = block.position;
        Ok(rendered)
    }

    /// Restore the grid as it was before the most recent merge.
    ///
    /// Restored blocks keep their ids and get fresh visuals. Returns
    /// `false` if history is empty or `BeforeUndo` was cancelled.
    pub async fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.latest().cloned() else {
            trace!("nothing to undo");
            return Ok(false);
        };

        let before = self
            .events
            .publish(EventName::BeforeUndo, EventPayload::Snapshot(snapshot))
            .await?;
        if before.cancelled {
            debug!("undo cancelled");
            return Ok(false);
        }
        let Some(snapshot) = self.history.pop() else {
            return Ok(false);
        };

        self.drag.clear();
        self.replace_grid(Grid::from_snapshot(&snapshot)).await?;

        self.events
            .publish(EventName::AfterUndo, EventPayload::Grid(self.grid.clone()))
            .await?;
        debug!(remaining = self.history.len(), "undo applied");
        Ok(true)
    }

    /// Swap in a new, unrendered grid: retire the old visuals, redraw the
    /// surface and render every new block.
    async fn replace_grid(&mut self, grid: Grid) -> Result<()> {
        let old = std::mem::replace(&mut self.grid, grid);
        for handle in old.blocks().filter_map(|block| block.handle) {
            match self.gateway.retire_block(handle).await {
                Ok(()) => {}
                Err(RenderError::UnknownHandle(handle)) => {
                    warn!(%handle, "visual already retired");
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.gateway.render_grid_surface(self.config.dimensions).await?;

        let blocks: Vec<Block> = self.grid.blocks().cloned().collect();
        for block in blocks {
            let rendered = self.render_block(block).await?;
            self.grid.place(rendered);
        }
        Ok(())
    }

    // === Accessors ===

    /// The live grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Merge history, oldest first.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Blocks selected by the current gesture.
    #[must_use]
    pub fn selection(&self) -> &[Block] {
        self.drag.selection()
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed of the block value RNG, for replaying a game.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.factory.rng().seed()
    }

    /// Position of the block value RNG. A game built from this state
    /// draws the same values from here on.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.factory.rng().state()
    }

    /// The game's event bus.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Subscribe to an event. Shorthand for `events_mut().subscribe`.
    pub fn subscribe<H: EventHandler + 'static>(&mut self, name: EventName, handler: H) -> SubscriptionId {
        self.events.subscribe(name, handler)
    }

    /// Subscribe for a single publish of an event.
    pub fn subscribe_once<H: EventHandler + 'static>(&mut self, name: EventName, handler: H) -> SubscriptionId {
        self.events.subscribe_once(name, handler)
    }

    /// Remove one subscription, or all of them for `name`.
    pub fn unsubscribe(&mut self, name: EventName, id: Option<SubscriptionId>) -> usize {
        self.events.unsubscribe(name, id)
    }

    /// Selection rules, for registering more at runtime.
    pub fn selection_rules_mut(&mut self) -> &mut SelectionRules {
        &mut self.selection_rules
    }

    /// Merge rules, for registering more at runtime.
    pub fn merge_rules_mut(&mut self) -> &mut MergeRules {
        &mut self.merge_rules
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }
}

impl<G> std::fmt::Debug for MergeGame<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeGame")
            .field("config", &self.config)
            .field("blocks", &self.grid.occupied_count())
            .field("history", &self.history.len())
            .field("drag", &self.drag.state())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
