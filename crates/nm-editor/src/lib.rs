//! Interactive editing for nodemap: raw input in, entity and view mutations out.
//!
//! ```text
//! InputEvent (pixels) → Viewport::dispatch → EditorEvent (abstract) → Editor → active Tool
//! ```

pub mod editor;
pub mod error;
pub mod event;
pub mod input;
pub mod tools;
pub mod viewport;

pub use editor::Editor;
pub use error::{EditorError, ToolError};
pub use event::{EditorEvent, Source};
pub use input::InputEvent;
pub use tools::{Held, PointerAffordance, Tool, ToolKind};
pub use viewport::{EntityKey, Viewport};
