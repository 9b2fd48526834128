//! Nodemap core: entities, styles, the view transform, configuration, and
//! the JSON field lists a map is saved as.

pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod serialize;
pub mod style;
pub mod transform;

pub use config::EditorConfig;
pub use error::{ConfigError, ViewError};
pub use id::EntityId;
pub use model::*;
pub use serialize::{parse_entities, serialize_entities};
pub use style::{Color, Interaction, Shadow, StyleRecord, StyleTable, resolve_style};
pub use transform::ViewTransform;

// Re-export kurbo geometry so downstream crates agree on one Point/Vec2
pub use kurbo::{Point, Vec2};
