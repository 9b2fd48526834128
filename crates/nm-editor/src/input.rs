//! Raw pointer input in canvas pixel space.
//!
//! Hosts translate their native events (DOM `MouseEvent`/`WheelEvent`, winit
//! `WindowEvent`) into `InputEvent`s with canvas-relative pixel coordinates.

use kurbo::{Point, Vec2};
use nm_core::model::PointerEventKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    /// Wheel or trackpad scroll. Negative `dy` scrolls up.
    Wheel { x: f64, y: f64, dx: f64, dy: f64 },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn wheel(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self::Wheel { x, y, dx, dy }
    }

    /// Rebase an event carrying page coordinates onto a canvas whose
    /// top-left corner sits at `canvas_offset` on the page.
    pub fn from_page(self, canvas_offset: Vec2) -> Self {
        let p = self.position() - canvas_offset;
        match self {
            Self::PointerDown { .. } => Self::pointer_down(p.x, p.y),
            Self::PointerUp { .. } => Self::pointer_up(p.x, p.y),
            Self::PointerMove { .. } => Self::pointer_move(p.x, p.y),
            Self::Wheel { dx, dy, .. } => Self::wheel(p.x, p.y, dx, dy),
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            Self::PointerDown { x, y }
            | Self::PointerUp { x, y }
            | Self::PointerMove { x, y }
            | Self::Wheel { x, y, .. } => Point::new(x, y),
        }
    }

    pub fn kind(&self) -> PointerEventKind {
        match self {
            Self::PointerDown { .. } => PointerEventKind::Down,
            Self::PointerUp { .. } => PointerEventKind::Up,
            Self::PointerMove { .. } => PointerEventKind::Move,
            Self::Wheel { .. } => PointerEventKind::Wheel,
        }
    }
}
