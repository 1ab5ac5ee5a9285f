//! Merge resolution.
//!
//! A merge collapses a selection into its last block (the target):
//!
//! 1. Aggregate the merge value (sum by default)
//! 2. Snapshot the grid into history
//! 3. Remove every other selected block and retire its visual
//! 4. Write the value into the target and refresh its visual in place
//! 5. Backfill the vacated cells with fresh blocks

use tracing::{debug, trace, warn};

use super::engine::MergeGame;
use crate::core::{Block, Position, Result};
use crate::events::{EventName, EventPayload, MergeOutcome};
use crate::render::{BoundsQuery, Renderer};

impl<G: Renderer + BoundsQuery> MergeGame<G> {
    /// Check whether a selection may merge: at least two blocks, and every
    /// merge rule agrees.
    #[must_use]
    pub fn validate_merge(&self, selection: &[Block]) -> bool {
        selection.len() >= 2 && self.merge_rules.evaluate(selection, &self.grid)
    }

    /// Apply a merge. Returns `false` without touching state (or history)
    /// for fewer than two blocks, a target that is no longer on the grid,
    /// or a cancelled `BeforeProcessMerge`.
    pub async fn process_merge(&mut self, selection: &[Block]) -> Result<bool> {
        if selection.len() < 2 {
            return Ok(false);
        }
        let Some(last) = selection.last() else {
            return Ok(false);
        };
        let Some(mut target) = self.grid.find(last.id).cloned() else {
            trace!(block = %last.id, "merge target is gone");
            return Ok(false);
        };

        let before = self
            .events
            .publish(EventName::BeforeProcessMerge, EventPayload::Blocks(selection.to_vec()))
            .await?;
        if before.cancelled {
            trace!("merge cancelled");
            return Ok(false);
        }

        let value = self.calculate_merge_value(selection).await?;

        // Nothing has changed yet; the snapshot goes in right before the
        // first cell is cleared so a failed aggregation leaves no entry.
        self.history.push(self.grid.snapshot());
        let mut vacated = Vec::with_capacity(selection.len() - 1);
        for block in &selection[..selection.len() - 1] {
            if block.id == target.id {
                continue;
            }
            let Some(position) = self.grid.find(block.id).map(|b| b.position) else {
                continue;
            };
            if let Some(removed) = self.grid.clear(position) {
                if let Some(handle) = removed.handle {
                    self.gateway.retire_block(handle).await?;
                }
                vacated.push(position);
            }
        }

        target.value = value;
        if let Some(handle) = target.handle {
            self.gateway.update_block(&target, handle).await?;
        }
        self.grid.place(target.clone());

        let filled = self.fill_empty_positions(vacated.clone()).await?;

        debug!(
            target = %target.id,
            value,
            removed = vacated.len(),
            history = self.history.len(),
            "merge processed"
        );
        self.events
            .publish(
                EventName::AfterProcessMerge,
                EventPayload::Merge(MergeOutcome {
                    target,
                    vacated,
                    filled,
                }),
            )
            .await?;
        Ok(true)
    }

    /// Aggregate a selection's values.
    ///
    /// The default is the sum of every selected value. Cancelling
    /// `BeforeCalculateMergeValue` skips the sum and keeps the target's
    /// current value; an `AfterCalculateMergeValue` handler may override
    /// the result either way.
    pub async fn calculate_merge_value(&mut self, selection: &[Block]) -> Result<u64> {
        let before = self
            .events
            .publish(
                EventName::BeforeCalculateMergeValue,
                EventPayload::Blocks(selection.to_vec()),
            )
            .await?;

        let value = if before.cancelled {
            selection.last().map_or(0, |target| target.value)
        } else {
            selection
                .iter()
                .fold(0u64, |sum, block| sum.saturating_add(block.value))
        };

        let after = self
            .events
            .publish(EventName::AfterCalculateMergeValue, EventPayload::MergeValue(value))
            .await?;
        after.payload.into_merge_value(EventName::AfterCalculateMergeValue)
    }

    /// Generate, render and install a block in each position, in order.
    ///
    /// Positions that are off the grid or already occupied are skipped.
    /// A `BeforeFillEmptyPositions` handler may cancel or rewrite the list;
    /// an `AfterFillEmptyPositions` handler may rewrite the returned blocks.
    pub async fn fill_empty_positions(&mut self, positions: Vec<Position>) -> Result<Vec<Block>> {
        let before = self
            .events
            .publish(
                EventName::BeforeFillEmptyPositions,
                EventPayload::Positions(positions.clone()),
            )
            .await?;
        if before.cancelled {
            trace!(count = positions.len(), "backfill cancelled");
            return Ok(Vec::new());
        }
        let positions = match before.payload {
            EventPayload::Positions(positions) => positions,
            other => {
                warn!(kind = ?other.kind(), "unexpected backfill payload, using original positions");
                positions
            }
        };

        let mut filled = Vec::with_capacity(positions.len());
        for position in positions {
            if !self.grid.contains(position) || self.grid.get(position).is_some() {
                trace!(%position, "skipping backfill");
                continue;
            }
            let Some(block) = self.generate_block(position).await? else {
                continue;
            };
            let block = self.render_block(block).await?;
            self.grid.place(block.clone());
            filled.push(block);
        }

        let after = self
            .events
            .publish(EventName::AfterFillEmptyPositions, EventPayload::Blocks(filled))
            .await?;
        after.payload.into_blocks(EventName::AfterFillEmptyPositions)
    }
}
