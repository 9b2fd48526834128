//! Semantic editor events: raw input after hit dispatch.
//!
//! Coordinates are abstract. `source` says whether an entity claimed the
//! event or it fell through to the background.

use kurbo::{Point, Vec2};
use nm_core::model::PointerEventKind;

use crate::viewport::EntityKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Entity(EntityKey),
    Background,
}

impl Source {
    pub fn entity(self) -> Option<EntityKey> {
        match self {
            Source::Entity(id) => Some(id),
            Source::Background => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    MouseDown { source: Source, at: Point },
    MouseUp { source: Source, at: Point },
    MouseMove { source: Source, at: Point },
    Wheel { source: Source, at: Point, delta: Vec2 },
}

impl EditorEvent {
    pub fn source(&self) -> Source {
        match *self {
            Self::MouseDown { source, .. }
            | Self::MouseUp { source, .. }
            | Self::MouseMove { source, .. }
            | Self::Wheel { source, .. } => source,
        }
    }

    pub fn at(&self) -> Point {
        match *self {
            Self::MouseDown { at, .. }
            | Self::MouseUp { at, .. }
            | Self::MouseMove { at, .. }
            | Self::Wheel { at, .. } => at,
        }
    }

    pub fn kind(&self) -> PointerEventKind {
        match self {
            Self::MouseDown { .. } => PointerEventKind::Down,
            Self::MouseUp { .. } => PointerEventKind::Up,
            Self::MouseMove { .. } => PointerEventKind::Move,
            Self::Wheel { .. } => PointerEventKind::Wheel,
        }
    }
}
