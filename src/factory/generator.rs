//! Block generation.

use tracing::trace;

use crate::core::{Block, BlockId, ConfigError, GameRng, Position, Result, ValueRange};
use crate::events::{EventBus, EventName, EventPayload};

/// Produces new blocks with values drawn uniformly from the value ladder.
///
/// Ids are allocated from a monotonically increasing counter and never
/// reused by the factory, so every generated block has a unique id.
#[derive(Clone, Debug)]
pub struct BlockFactory {
    values: Vec<u64>,
    rng: GameRng,
    next_id: u64,
}

impl BlockFactory {
    /// Build a factory for `range`. Fails if the range has no legal value.
    pub fn new(range: ValueRange, rng: GameRng) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            values: range.legal_values()?,
            rng,
            next_id: 1,
        })
    }

    /// The legal values, ascending.
    #[must_use]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// The factory's RNG, for state capture.
    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// Reserve the next id.
    pub fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Draw a value and allocate an id, without events.
    pub fn create(&mut self, position: Position) -> Block {
        // `values` is never empty: `legal_values` always yields `min`.
        let value = self.rng.choose(&self.values).unwrap_or(self.values[0]);
        Block::new(self.allocate_id(), value, position)
    }

    /// Generate a block for a cell, publishing the generation events.
    ///
    /// `BeforeGenerateBlock` may cancel (no block is produced).
    /// `AfterGenerateBlock` may replace the block; the replacement is
    /// pinned to the requested position.
    pub async fn generate(&mut self, events: &mut EventBus, position: Position) -> Result<Option<Block>> {
        let before = events
            .publish(EventName::BeforeGenerateBlock, EventPayload::Position(position))
            .await?;
        if before.cancelled {
            trace!(%position, "block generation cancelled");
            return Ok(None);
        }

        let block = self.create(position);
        let after = events
            .publish(EventName::AfterGenerateBlock, EventPayload::Block(block))
            .await?;

        let mut block = after.payload.into_block(EventName::AfterGenerateBlock)?;
        block.position = position;
        Ok(Some(block))
    }
}
