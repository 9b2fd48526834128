//! Entity field lists for saving a map as JSON.
//!
//! Each variant writes a fixed list of fields: always `type` and `id`, then
//! geometry and `zIndex`. Hover, active and drag state are never written, so
//! the output is stable across repaints and interactions.

use crate::id::EntityId;
use crate::model::{Entity, EntityKind};
use crate::style::Color;
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityRecord {
    Rect {
        id: EntityId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        #[serde(rename = "zIndex", default)]
        z_index: i32,
        #[serde(default, skip_serializing_if = "is_false")]
        locked: bool,
    },
    Node {
        id: EntityId,
        x: f64,
        y: f64,
        #[serde(rename = "zIndex", default)]
        z_index: i32,
        #[serde(default, skip_serializing_if = "is_false")]
        locked: bool,
    },
    Edge {
        id: EntityId,
        from: Option<EntityId>,
        to: Option<EntityId>,
        #[serde(rename = "zIndex", default)]
        z_index: i32,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<&Entity> for EntityRecord {
    fn from(e: &Entity) -> Self {
        let id = e.id;
        let z_index = e.z_index();
        let locked = e.locked;
        match &e.kind {
            EntityKind::Rect {
                origin,
                width,
                height,
                color,
            } => EntityRecord::Rect {
                id,
                x: origin.x,
                y: origin.y,
                width: *width,
                height: *height,
                color: *color,
                z_index,
                locked,
            },
            EntityKind::Node { center } => EntityRecord::Node {
                id,
                x: center.x,
                y: center.y,
                z_index,
                locked,
            },
            EntityKind::Edge { from, to } => EntityRecord::Edge {
                id,
                from: *from,
                to: *to,
                z_index,
            },
        }
    }
}

impl From<EntityRecord> for Entity {
    fn from(r: EntityRecord) -> Self {
        let (id, z_index, locked, kind) = match r {
            EntityRecord::Rect {
                id,
                x,
                y,
                width,
                height,
                color,
                z_index,
                locked,
            } => (
                id,
                z_index,
                locked,
                EntityKind::Rect {
                    origin: Point::new(x, y),
                    width,
                    height,
                    color,
                },
            ),
            EntityRecord::Node {
                id,
                x,
                y,
                z_index,
                locked,
            } => (
                id,
                z_index,
                locked,
                EntityKind::Node {
                    center: Point::new(x, y),
                },
            ),
            EntityRecord::Edge {
                id,
                from,
                to,
                z_index,
            } => (id, z_index, false, EntityKind::Edge { from, to }),
        };
        Entity::with_id(id, kind)
            .with_z_index(z_index)
            .with_locked(locked)
    }
}

/// Serialize entities, in the given order, as a JSON array indented by `indent` spaces.
/// An indent of 0 produces compact output.
pub fn serialize_entities<'a, I>(entities: I, indent: usize) -> Result<String, serde_json::Error>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let records: Vec<EntityRecord> = entities.into_iter().map(EntityRecord::from).collect();
    if indent == 0 {
        return serde_json::to_string(&records);
    }

    let pad = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read entities back from [`serialize_entities`] output. Interaction state starts cleared.
pub fn parse_entities(json: &str) -> Result<Vec<Entity>, serde_json::Error> {
    let records: Vec<EntityRecord> = serde_json::from_str(json)?;
    log::debug!("parsed {} entities", records.len());
    Ok(records.into_iter().map(Entity::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_lists_per_variant() {
        let rect = Entity::with_id(
            EntityId::from_raw(7),
            EntityKind::Rect {
                origin: Point::new(30.0, 81.0),
                width: 100.0,
                height: 50.0,
                color: Color::rgb(100, 100, 100),
            },
        );
        let node = Entity::with_id(
            EntityId::from_raw(8),
            EntityKind::Node {
                center: Point::new(200.0, 200.0),
            },
        )
        .with_z_index(3);

        let json = serialize_entities([&rect, &node], 0).unwrap();
        assert_eq!(
            json,
            r##"[{"type":"rect","id":7,"x":30.0,"y":81.0,"width":100.0,"height":50.0,"color":"#646464","zIndex":0},{"type":"node","id":8,"x":200.0,"y":200.0,"zIndex":3}]"##
        );
    }

    #[test]
    fn transient_state_is_not_serialized() {
        let mut node = Entity::with_id(
            EntityId::from_raw(1),
            EntityKind::Node {
                center: Point::new(1.0, 2.0),
            },
        );
        let quiet = serialize_entities([&node], 2).unwrap();
        node.set_hovered(true);
        node.set_active(true);
        node.start_move(Point::new(1.5, 2.0));
        assert_eq!(serialize_entities([&node], 2).unwrap(), quiet);
    }

    #[test]
    fn indent_width_is_honoured() {
        let node = Entity::with_id(
            EntityId::from_raw(1),
            EntityKind::Node {
                center: Point::new(0.0, 0.0),
            },
        );
        let json = serialize_entities([&node], 4).unwrap();
        assert!(json.starts_with("[\n    {\n        \"type\": \"node\""));
    }

    #[test]
    fn parse_restores_geometry_and_ids() {
        let json = r##"[
  {"type": "edge", "id": 3, "from": 1, "to": null},
  {"type": "rect", "id": 9, "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0, "color": "#ff0000", "zIndex": 5}
]"##;
        let entities = parse_entities(json).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(
            entities[0].kind,
            EntityKind::Edge {
                from: Some(EntityId::from_raw(1)),
                to: None
            }
        );
        assert_eq!(entities[1].id, EntityId::from_raw(9));
        assert_eq!(entities[1].z_index(), 5);
        assert!(!entities[1].locked);
        assert!(!entities[1].is_held());
    }

    #[test]
    fn locked_flag_written_only_when_set() {
        let node = Entity::with_id(
            EntityId::from_raw(2),
            EntityKind::Node {
                center: Point::new(0.0, 0.0),
            },
        )
        .with_locked(true);
        let json = serialize_entities([&node], 0).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"node","id":2,"x":0.0,"y":0.0,"zIndex":0,"locked":true}]"#
        );
        assert!(parse_entities(&json).unwrap()[0].locked);
    }

    #[test]
    fn parse_rejects_unknown_type() {
        assert!(parse_entities(r#"[{"type": "blob", "id": 1}]"#).is_err());
    }
}
