//! Input handling: normalized pointer events, hit testing, drag state.

mod drag;
mod pointer;

pub use drag::{DragController, DragState};
pub use hit_test::hit_test;
pub use pointer::{MouseButton, Point, PointerEvent, PointerPhase, PointerShape, Rect};
