//! The drawing surface boundary.
//!
//! Painters talk to a [`Surface`] in pixel space. Backends (Canvas2D via
//! wasm, Vello, a test recorder) implement it. Transient paint state (global
//! alpha, shadow) is scoped by `save`/`restore`, the way Canvas2D scopes it.

use kurbo::{Circle, Rect, Vec2};
use peniko::Color;

/// A drop shadow already converted to pixels.
#[derive(Debug, Clone, Copy)]
pub struct PixelShadow {
    pub offset: Vec2,
    pub blur: f64,
    pub color: Color,
}

pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    /// Multiplies the alpha of everything drawn until the matching `restore`.
    fn set_alpha(&mut self, alpha: f64);
    fn set_shadow(&mut self, shadow: Option<PixelShadow>);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
    fn fill_circle(&mut self, circle: Circle, color: Color);
    fn stroke_circle(&mut self, circle: Circle, color: Color, width: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintShape {
    Rect(Rect),
    Circle(Circle),
}

/// One recorded surface call. `alpha` is the effective global alpha at the time of the call.
#[derive(Debug, Clone)]
pub enum DrawOp {
    Save,
    Restore,
    Fill {
        shape: PaintShape,
        color: Color,
        alpha: f64,
        shadowed: bool,
    },
    Stroke {
        shape: PaintShape,
        color: Color,
        width: f64,
        alpha: f64,
    },
}

#[derive(Debug, Clone, Copy)]
struct PaintState {
    alpha: f64,
    shadow: Option<PixelShadow>,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            shadow: None,
        }
    }
}

/// A surface that records every call. Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current global alpha (1.0 outside any entity scope).
    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    /// Depth of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.state = PaintState::default();
        self.stack.clear();
    }

    /// Shapes filled, in paint order.
    pub fn filled_shapes(&self) -> Vec<PaintShape> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { shape, .. } => Some(*shape),
                _ => None,
            })
            .collect()
    }

    fn fill(&mut self, shape: PaintShape, color: Color) {
        self.ops.push(DrawOp::Fill {
            shape,
            color,
            alpha: self.state.alpha,
            shadowed: self.state.shadow.is_some(),
        });
    }

    fn stroke(&mut self, shape: PaintShape, color: Color, width: f64) {
        self.ops.push(DrawOp::Stroke {
            shape,
            color,
            width,
            alpha: self.state.alpha,
        });
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.state);
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        // Unbalanced restore is a no-op, as in Canvas2D
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.ops.push(DrawOp::Restore);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_shadow(&mut self, shadow: Option<PixelShadow>) {
        self.state.shadow = shadow;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill(PaintShape::Rect(rect), color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.stroke(PaintShape::Rect(rect), color, width);
    }

    fn fill_circle(&mut self, circle: Circle, color: Color) {
        self.fill(PaintShape::Circle(circle), color);
    }

    fn stroke_circle(&mut self, circle: Circle, color: Color, width: f64) {
        self.stroke(PaintShape::Circle(circle), color, width);
    }
}
