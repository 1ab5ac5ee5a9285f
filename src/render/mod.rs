//! Rendering gateway: the contract between the core and whatever draws it.
//!
//! - [`Renderer`]: async visual operations (create, update, retire, highlight)
//! - [`BoundsQuery`]: where a rendered block sits on screen
//! - [`RecordingGateway`]: in-memory implementation of both

mod gateway;
mod recording;

pub use gateway::{BoundsQuery, RenderHandle, Renderer};
pub use recording::{RecordingGateway, RenderCall};
