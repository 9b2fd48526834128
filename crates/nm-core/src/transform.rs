//! The affine map between abstract map coordinates and canvas pixels.
//!
//! A view is an origin (the abstract point sitting at pixel `(0, 0)`) and a
//! uniform scale in pixels per abstract unit:
//!
//! ```text
//! px = (x - origin.x) * scale        x = origin.x + px / scale
//! ```
//!
//! Only `origin` and `scale` are stored; both directions are computed from
//! them on every call, so the inverse is always the exact algebraic inverse.

use crate::error::ViewError;
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    origin: Point,
    scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    /// Build a view. `scale` must be finite and strictly positive.
    pub fn new(origin: Point, scale: f64) -> Result<Self, ViewError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ViewError::InvalidScale(scale));
        }
        if !(origin.x.is_finite() && origin.y.is_finite()) {
            return Err(ViewError::InvalidOrigin(origin.x, origin.y));
        }
        Ok(Self { origin, scale })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    // ─── Abstract → pixel ────────────────────────────────────────────────

    pub fn x_to_px(&self, x: f64) -> f64 {
        (x - self.origin.x) * self.scale
    }

    pub fn y_to_px(&self, y: f64) -> f64 {
        (y - self.origin.y) * self.scale
    }

    pub fn d_to_px(&self, d: f64) -> f64 {
        d * self.scale
    }

    pub fn to_px(&self, p: Point) -> Point {
        Point::new(self.x_to_px(p.x), self.y_to_px(p.y))
    }

    // ─── Pixel → abstract ────────────────────────────────────────────────

    pub fn x_from_px(&self, px: f64) -> f64 {
        self.origin.x + px / self.scale
    }

    pub fn y_from_px(&self, py: f64) -> f64 {
        self.origin.y + py / self.scale
    }

    pub fn d_from_px(&self, d: f64) -> f64 {
        d / self.scale
    }

    pub fn from_px(&self, p: Point) -> Point {
        Point::new(self.x_from_px(p.x), self.y_from_px(p.y))
    }

    // ─── Derived views ───────────────────────────────────────────────────

    /// The view at `new_scale` that keeps `pivot` on the same pixel.
    ///
    /// Solves `(pivot - origin') * new_scale == to_px(pivot)` for `origin'`.
    pub fn zoomed_around(&self, pivot: Point, new_scale: f64) -> Result<Self, ViewError> {
        let px = self.to_px(pivot);
        let origin = Point::new(pivot.x - px.x / new_scale, pivot.y - px.y / new_scale);
        Self::new(origin, new_scale)
    }

    /// The view at the current scale that puts `point` exactly on `pixel`.
    pub fn panned_to_align(&self, point: Point, pixel: Point) -> Self {
        let offset = Vec2::new(pixel.x / self.scale, pixel.y / self.scale);
        Self {
            origin: point - offset,
            scale: self.scale,
        }
    }
}
