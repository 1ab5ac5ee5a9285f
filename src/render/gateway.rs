//! Rendering gateway contracts.
//!
//! The core never draws anything. It asks a gateway to create, update,
//! retire and highlight visual blocks, and asks it where those visuals are
//! on screen for hit testing. Every visual operation is async: a gateway
//! that animates a transition only resolves once the transition is done,
//! so the core never mutates state underneath a running animation.

use crate::core::{Block, GridDimensions, RenderError};
use crate::input::Rect;

/// Opaque handle to a rendered block, issued by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u64);

impl RenderHandle {
    /// Get the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RenderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

/// Visual side of the game.
///
/// ## Implementation Notes
///
/// - `retire_block` resolves only when the visual is fully gone
/// - `remove_highlight` may be called for a handle that was already
///   retired during the same gesture; treat it as a no-op
/// - `has_target` reports whether a host surface is attached; without one
///   the game refuses to initialize or reset
#[allow(async_fn_in_trait)]
pub trait Renderer {
    /// Check whether a host surface is attached.
    fn has_target(&self) -> bool {
        true
    }

    /// Create or resize the grid surface.
    async fn render_grid_surface(&mut self, dimensions: GridDimensions) -> Result<(), RenderError>;

    /// Create the visual for a block.
    async fn render_block(&mut self, block: &Block) -> Result<RenderHandle, RenderError>;

    /// Refresh a block's visual in place (same identity, same cell).
    async fn update_block(&mut self, block: &Block, handle: RenderHandle) -> Result<(), RenderError>;

    /// Remove a block's visual, resolving once removal has finished.
    async fn retire_block(&mut self, handle: RenderHandle) -> Result<(), RenderError>;

    /// Mark a block as selected.
    async fn apply_highlight(&mut self, handle: RenderHandle) -> Result<(), RenderError>;

    /// Clear a block's selected mark.
    async fn remove_highlight(&mut self, handle: RenderHandle) -> Result<(), RenderError>;
}

/// Screen-space bounds of rendered blocks, for hit testing.
pub trait BoundsQuery {
    /// Bounding box of the visual behind `handle`, if it is still live.
    fn block_bounds(&self, handle: RenderHandle) -> Option<Rect>;
}
