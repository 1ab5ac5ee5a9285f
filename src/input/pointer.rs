//! Normalized pointer and touch input.
//!
//! Hosts translate whatever their platform delivers into a [`PointerEvent`].
//! Mouse-style events carry one point and a button; touch-style events carry
//! the currently active touch points, of which the first is used.

use smallvec::SmallVec;

/// A screen-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned screen-space box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow or shrink symmetrically about the center.
    #[must_use]
    pub fn scaled(&self, scale: f64) -> Rect {
        let center = self.center();
        let width = self.width * scale;
        let height = self.height * scale;
        Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Half-open containment: left/top edges are inside, right/bottom are
    /// not. A zero-sized rectangle contains nothing.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Mouse buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
    Other(u8),
}

/// Where in a gesture an input event falls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// The device-specific shape of an input event.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerShape {
    /// Single point with a button.
    Mouse { point: Point, button: MouseButton },
    /// Active touch points, first one is primary.
    Touch { touches: SmallVec<[Point; 2]> },
}

/// One raw input event.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub shape: PointerShape,
    default_prevented: bool,
}

impl PointerEvent {
    /// Primary-button mouse event.
    #[must_use]
    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self::mouse_button(phase, x, y, MouseButton::Primary)
    }

    /// Mouse event with an explicit button.
    #[must_use]
    pub fn mouse_button(phase: PointerPhase, x: f64, y: f64, button: MouseButton) -> Self {
        Self {
            phase,
            shape: PointerShape::Mouse {
                point: Point::new(x, y),
                button,
            },
            default_prevented: false,
        }
    }

    /// Touch event with the currently active touch points.
    #[must_use]
    pub fn touch(phase: PointerPhase, touches: impl IntoIterator<Item = Point>) -> Self {
        Self {
            phase,
            shape: PointerShape::Touch {
                touches: touches.into_iter().collect(),
            },
            default_prevented: false,
        }
    }

    /// The point this event refers to: the mouse position, or the first
    /// active touch. `None` for a touch event with no active touches.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        match &self.shape {
            PointerShape::Mouse { point, .. } => Some(*point),
            PointerShape::Touch { touches } => touches.first().copied(),
        }
    }

    /// Check whether this event may start a gesture: a primary-button press
    /// or a touch contact.
    #[must_use]
    pub fn is_gesture_start(&self) -> bool {
        if self.phase != PointerPhase::Start {
            return false;
        }
        match &self.shape {
            PointerShape::Mouse { button, .. } => *button == MouseButton::Primary,
            PointerShape::Touch { touches } => !touches.is_empty(),
        }
    }

    /// Ask the host to skip its default handling (scrolling, text selection).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Check whether default handling was suppressed.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
