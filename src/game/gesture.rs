//! Pointer gestures: drag start, selection on move, merge on release.
//!
//! ```text
//!            start (primary button / first touch)
//!   Idle ───────────────────────────────────────────► Dragging
//!     ▲                                                  │ move: hit test,
//!     │              end / cancel: merge attempt         │ rules, select
//!     └──────────────────────────────────────────────────┘
//! ```
//!
//! Moves and releases are ignored while Idle; a start is ignored while
//! already Dragging.

use tracing::{debug, trace};

use super::engine::MergeGame;
use crate::core::{Block, RenderError, Result};
use crate::events::{EventName, EventPayload};
use crate::input::{hit_test, PointerEvent, PointerPhase};
use crate::render::{BoundsQuery, Renderer};

impl<G: Renderer + BoundsQuery> MergeGame<G> {
    /// Route a pointer event to the matching handler.
    ///
    /// Returns `true` when the event changed game state: a drag started, a
    /// block was selected, or a release merged.
    pub async fn handle_pointer(&mut self, event: &mut PointerEvent) -> Result<bool> {
        match event.phase {
            PointerPhase::Start => self.on_pointer_start(event).await,
            PointerPhase::Move => self.on_pointer_move(event).await,
            PointerPhase::End => self.on_pointer_end().await,
            PointerPhase::Cancel => self.on_pointer_cancel().await,
        }
    }

    /// Begin a gesture. Suppresses the host's default handling of the
    /// pointer event once the drag is accepted.
    pub async fn on_pointer_start(&mut self, event: &mut PointerEvent) -> Result<bool> {
        if self.drag.is_dragging() || !event.is_gesture_start() {
            return Ok(false);
        }

        let payload = event.point().map_or(EventPayload::None, EventPayload::Point);
        let before = self.events.publish(EventName::BeforeDrag, payload.clone()).await?;
        if before.cancelled {
            trace!("drag cancelled");
            return Ok(false);
        }

        self.drag.begin();
        event.prevent_default();
        debug!("drag started");

        self.events.publish(EventName::AfterDrag, payload).await?;
        Ok(true)
    }

    /// Extend the selection with the block under the pointer, if the
    /// selection rules accept it.
    pub async fn on_pointer_move(&mut self, event: &PointerEvent) -> Result<bool> {
        if !self.drag.is_dragging() {
            return Ok(false);
        }
        let Some(point) = event.point() else {
            return Ok(false);
        };

        let Some(candidate) = hit_test(&self.grid, &self.gateway, point, self.config.hit_box_scale).cloned() else {
            return Ok(false);
        };
        if self.drag.is_current(candidate.id) {
            return Ok(false);
        }
        if !self
            .selection_rules
            .evaluate(&candidate, self.drag.selection(), &self.grid)
        {
            return Ok(false);
        }

        self.select(candidate).await
    }

    /// Finish the gesture and try to merge the selection.
    ///
    /// Returns whether a merge was applied.
    pub async fn on_pointer_end(&mut self) -> Result<bool> {
        if !self.drag.is_dragging() {
            return Ok(false);
        }
        let selection = self.drag.finish();

        if selection.is_empty() {
            self.events
                .publish(
                    EventName::AfterDragEnd,
                    EventPayload::DragEnd {
                        merged: false,
                        selection,
                    },
                )
                .await?;
            debug!(merged = false, "drag ended");
            return Ok(false);
        }

        let before = self
            .events
            .publish(EventName::BeforeDragEnd, EventPayload::Blocks(selection.clone()))
            .await?;

        let merged = if before.cancelled {
            trace!("merge skipped by handler");
            false
        } else if self.validate_merge(&selection) {
            self.process_merge(&selection).await?
        } else {
            false
        };

        for block in &selection {
            self.remove_highlight(block).await?;
        }

        debug!(merged, len = selection.len(), "drag ended");
        self.events
            .publish(EventName::AfterDragEnd, EventPayload::DragEnd { merged, selection })
            .await?;
        Ok(merged)
    }

    /// A cancelled pointer ends the gesture exactly like a release.
    pub async fn on_pointer_cancel(&mut self) -> Result<bool> {
        self.on_pointer_end().await
    }

    async fn select(&mut self, candidate: Block) -> Result<bool> {
        let before = self
            .events
            .publish(
                EventName::BeforeSelect,
                EventPayload::Select {
                    block: candidate.clone(),
                    selection: self.drag.selection().to_vec(),
                },
            )
            .await?;
        if before.cancelled {
            trace!(block = %candidate.id, "selection cancelled");
            return Ok(false);
        }

        self.drag.accept(candidate.clone());
        self.apply_highlight(&candidate).await?;
        trace!(block = %candidate.id, len = self.drag.selection().len(), "block selected");

        self.events
            .publish(
                EventName::AfterSelect,
                EventPayload::Select {
                    block: candidate,
                    selection: self.drag.selection().to_vec(),
                },
            )
            .await?;
        Ok(true)
    }

    /// Mark a block as selected on screen.
    pub async fn apply_highlight(&mut self, block: &Block) -> Result<()> {
        let before = self
            .events
            .publish(EventName::BeforeHighlight, EventPayload::Block(block.clone()))
            .await?;
        if before.cancelled {
            return Ok(());
        }
        if let Some(handle) = block.handle {
            self.gateway.apply_highlight(handle).await?;
        }
        self.events
            .publish(EventName::AfterHighlight, EventPayload::Block(block.clone()))
            .await?;
        Ok(())
    }

    /// Clear a block's selected mark. Blocks whose visual was already
    /// retired by a merge are tolerated.
    pub async fn remove_highlight(&mut self, block: &Block) -> Result<()> {
        let before = self
            .events
            .publish(EventName::BeforeRemoveHighlight, EventPayload::Block(block.clone()))
            .await?;
        if before.cancelled {
            return Ok(());
        }
        if let Some(handle) = block.handle {
            match self.gateway.remove_highlight(handle).await {
                Ok(()) | Err(RenderError::UnknownHandle(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        self.events
            .publish(EventName::AfterRemoveHighlight, EventPayload::Block(block.clone()))
            .await?;
        Ok(())
    }
}
