//! Entities: the spatial objects that live on a map.
//!
//! An [`Entity`] is shared interaction state (id, z order, hover/active
//! flags, drag handle) around a closed set of geometries in [`EntityKind`].
//! Behavior that differs per geometry (center, hit test, style table,
//! accepted events) is a `match` on the kind rather than an override chain.
//!
//! All coordinates here are abstract map coordinates. Entities know nothing
//! about the view transform or about each other.

use crate::id::EntityId;
use crate::style::{
    Color, EDGE_STYLES, Interaction, NODE_STYLES, RECT_STYLES, StyleRecord, StyleTable,
    resolve_style,
};
use kurbo::{Point, Rect, Vec2};

/// Discriminant tag, also used as the serialized `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Rect,
    Node,
    Edge,
}

impl EntityTag {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityTag::Rect => "rect",
            EntityTag::Node => "node",
            EntityTag::Edge => "edge",
        }
    }
}

/// Pointer events an entity may claim during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Up,
    Move,
    Wheel,
}

/// Variant-specific geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Axis-aligned box stored by its top-left corner.
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: Color,
    },
    /// Circle of style-defined radius around `center`.
    Node { center: Point },
    /// Connector between two entities. Placeholder until edge drawing lands:
    /// it has no area, so it is never hit and never dragged.
    Edge {
        from: Option<EntityId>,
        to: Option<EntityId>,
    },
}

impl EntityKind {
    pub fn tag(&self) -> EntityTag {
        match self {
            EntityKind::Rect { .. } => EntityTag::Rect,
            EntityKind::Node { .. } => EntityTag::Node,
            EntityKind::Edge { .. } => EntityTag::Edge,
        }
    }

    pub fn style_table(&self) -> &'static StyleTable {
        match self {
            EntityKind::Rect { .. } => &RECT_STYLES,
            EntityKind::Node { .. } => &NODE_STYLES,
            EntityKind::Edge { .. } => &EDGE_STYLES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Higher draws later and is hit-tested first. Fixed once the entity is
    /// in a collection, which keeps its order keyed on this value.
    z_index: i32,
    pub kind: EntityKind,
    /// Locked entities still occlude what is below them but decline every
    /// pointer event, so input over them reaches the background.
    pub locked: bool,
    hovered: bool,
    active: bool,
    /// Grab point minus center, set only while the entity is being dragged.
    move_handle_offset: Option<Vec2>,
}

impl Entity {
    /// Wrap `kind` with a fresh random id at z 0.
    pub fn new(kind: EntityKind) -> Self {
        Self::with_id(EntityId::random(), kind)
    }

    pub fn with_id(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            z_index: 0,
            kind,
            locked: false,
            hovered: false,
            active: false,
            move_handle_offset: None,
        }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64, color: Color) -> Self {
        Self::new(EntityKind::Rect {
            origin: Point::new(x, y),
            width,
            height,
            color,
        })
    }

    pub fn node(x: f64, y: f64) -> Self {
        Self::new(EntityKind::Node {
            center: Point::new(x, y),
        })
    }

    pub fn edge(from: Option<EntityId>, to: Option<EntityId>) -> Self {
        Self::new(EntityKind::Edge { from, to })
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn tag(&self) -> EntityTag {
        self.kind.tag()
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// The point drag logic moves. Rectangles derive it from their corner.
    pub fn center(&self) -> Point {
        match &self.kind {
            EntityKind::Rect {
                origin,
                width,
                height,
                ..
            } => Point::new(origin.x + width / 2.0, origin.y + height / 2.0),
            EntityKind::Node { center } => *center,
            EntityKind::Edge { .. } => Point::ORIGIN,
        }
    }

    pub fn set_center(&mut self, c: Point) {
        match &mut self.kind {
            EntityKind::Rect {
                origin,
                width,
                height,
                ..
            } => *origin = Point::new(c.x - *width / 2.0, c.y - *height / 2.0),
            EntityKind::Node { center } => *center = c,
            EntityKind::Edge { .. } => {}
        }
    }

    /// Geometric hit test in abstract coordinates. Rectangle edges count as inside.
    pub fn contains_point(&self, p: Point) -> bool {
        match &self.kind {
            EntityKind::Rect {
                origin,
                width,
                height,
                ..
            } => {
                let r = Rect::from_origin_size(*origin, (*width, *height));
                p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
            }
            EntityKind::Node { center } => center.distance(p) < self.style().radius,
            EntityKind::Edge { .. } => false,
        }
    }

    /// Whether this entity claims `event` once it has been hit.
    ///
    /// Rectangles and nodes take the press/release/move gestures they can be
    /// dragged with. The wheel is never claimed, so zooming always reaches the
    /// background. Locked entities and edges claim nothing.
    pub fn handles(&self, event: PointerEventKind) -> bool {
        if self.locked {
            return false;
        }
        match self.kind {
            EntityKind::Rect { .. } | EntityKind::Node { .. } => matches!(
                event,
                PointerEventKind::Down | PointerEventKind::Up | PointerEventKind::Move
            ),
            EntityKind::Edge { .. } => false,
        }
    }

    // ─── Interaction state ───────────────────────────────────────────────

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_held(&self) -> bool {
        self.move_handle_offset.is_some()
    }

    pub fn move_handle_offset(&self) -> Option<Vec2> {
        self.move_handle_offset
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn interaction(&self) -> Interaction {
        Interaction {
            held: self.is_held(),
            active: self.active,
            hovered: self.hovered,
        }
    }

    /// Current style, resolved from the interaction flags.
    pub fn style(&self) -> &'static StyleRecord {
        resolve_style(self.interaction(), self.kind.style_table())
    }

    // ─── Dragging ────────────────────────────────────────────────────────

    /// Begin a drag grabbed at `grab`.
    pub fn start_move(&mut self, grab: Point) {
        self.move_handle_offset = Some(grab - self.center());
    }

    /// Follow the pointer so the grab point stays under it. No-op unless held.
    pub fn move_to(&mut self, pointer: Point) {
        if let Some(offset) = self.move_handle_offset {
            self.set_center(pointer - offset);
        }
    }

    pub fn end_move(&mut self) {
        self.move_handle_offset = None;
    }
}
