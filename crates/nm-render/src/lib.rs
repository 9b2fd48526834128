//! Render-side plumbing for nodemap: the drawing surface boundary,
//! z-ordered painting, hit testing, and frame scheduling.

pub mod frame;
pub mod hit;
pub mod paint;
pub mod surface;

pub use frame::{CountingFrameHost, FrameHost, FrameScheduler};
pub use hit::{hit_index, hit_test};
pub use paint::{PixelMapper, paint_entity, paint_scene};
pub use surface::{DrawOp, PaintShape, PixelShadow, RecordingSurface, Surface};
