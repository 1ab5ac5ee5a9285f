//! In-memory gateway for headless hosts, tests and benches.
//!
//! Lays blocks out on a uniform square lattice (`cell_size` per cell, no
//! gaps), keeps track of which handles are live and highlighted, and
//! records every call in order.

use rustc_hash::{FxHashMap, FxHashSet};

use super::gateway::{BoundsQuery, RenderHandle, Renderer};
use crate::core::{Block, GridDimensions, Position, RenderError};
use crate::input::{Point, Rect};

/// One recorded gateway call.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    Surface(GridDimensions),
    Render { handle: RenderHandle, value: u64, position: Position },
    Update { handle: RenderHandle, value: u64 },
    Retire(RenderHandle),
    Highlight(RenderHandle),
    RemoveHighlight(RenderHandle),
}

#[derive(Clone, Debug)]
struct Visual {
    value: u64,
    position: Position,
}

/// Recording, layout-only gateway.
#[derive(Clone, Debug)]
pub struct RecordingGateway {
    cell_size: f64,
    attached: bool,
    next_handle: u64,
    visuals: FxHashMap<RenderHandle, Visual>,
    highlighted: FxHashSet<RenderHandle>,
    calls: Vec<RenderCall>,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl RecordingGateway {
    /// Create a gateway attached to a surface, with square cells of
    /// `cell_size` pixels.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            attached: true,
            next_handle: 1,
            visuals: FxHashMap::default(),
            highlighted: FxHashSet::default(),
            calls: Vec::new(),
        }
    }

    /// Create a gateway with no host surface.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            attached: false,
            ..Self::default()
        }
    }

    /// Screen-space box of a cell.
    #[must_use]
    pub fn cell_rect(&self, position: Position) -> Rect {
        Rect::new(
            position.col as f64 * self.cell_size,
            position.row as f64 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Center of a cell, handy for synthesizing pointer input.
    #[must_use]
    pub fn cell_center(&self, position: Position) -> Point {
        self.cell_rect(position).center()
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of live visuals.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    /// Check whether a handle is live.
    #[must_use]
    pub fn is_live(&self, handle: RenderHandle) -> bool {
        self.visuals.contains_key(&handle)
    }

    /// Value currently displayed by a live visual.
    #[must_use]
    pub fn displayed_value(&self, handle: RenderHandle) -> Option<u64> {
        self.visuals.get(&handle).map(|v| v.value)
    }

    /// Check whether a handle is highlighted.
    #[must_use]
    pub fn is_highlighted(&self, handle: RenderHandle) -> bool {
        self.highlighted.contains(&handle)
    }

    /// Number of highlighted visuals.
    #[must_use]
    pub fn highlighted_count(&self) -> usize {
        self.highlighted.len()
    }
}

impl Renderer for RecordingGateway {
    fn has_target(&self) -> bool {
        self.attached
    }

    async fn render_grid_surface(&mut self, dimensions: GridDimensions) -> Result<(), RenderError> {
        self.calls.push(RenderCall::Surface(dimensions));
        Ok(())
    }

    async fn render_block(&mut self, block: &Block) -> Result<RenderHandle, RenderError> {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        self.visuals.insert(
            handle,
            Visual {
                value: block.value,
                position: block.position,
            },
        );
        self.calls.push(RenderCall::Render {
            handle,
            value: block.value,
            position: block.position,
        });
        Ok(handle)
    }

    async fn update_block(&mut self, block: &Block, handle: RenderHandle) -> Result<(), RenderError> {
        let visual = self
            .visuals
            .get_mut(&handle)
            .ok_or(RenderError::UnknownHandle(handle))?;
        visual.value = block.value;
        visual.position = block.position;
        self.calls.push(RenderCall::Update {
            handle,
            value: block.value,
        });
        Ok(())
    }

    async fn retire_block(&mut self, handle: RenderHandle) -> Result<(), RenderError> {
        self.visuals
            .remove(&handle)
            .ok_or(RenderError::UnknownHandle(handle))?;
        self.highlighted.remove(&handle);
        self.calls.push(RenderCall::Retire(handle));
        Ok(())
    }

    async fn apply_highlight(&mut self, handle: RenderHandle) -> Result<(), RenderError> {
        if !self.is_live(handle) {
            return Err(RenderError::UnknownHandle(handle));
        }
        self.highlighted.insert(handle);
        self.calls.push(RenderCall::Highlight(handle));
        Ok(())
    }

    async fn remove_highlight(&mut self, handle: RenderHandle) -> Result<(), RenderError> {
        self.highlighted.remove(&handle);
        self.calls.push(RenderCall::RemoveHighlight(handle));
        Ok(())
    }
}

impl BoundsQuery for RecordingGateway {
    fn block_bounds(&self, handle: RenderHandle) -> Option<Rect> {
        self.visuals.get(&handle).map(|v| self.cell_rect(v.position))
    }
}
