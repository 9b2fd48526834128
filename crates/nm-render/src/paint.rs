//! Entities → surface calls.
//!
//! Painters receive only the abstract→pixel mapping, never a global
//! transform. The scene is painted back-to-front: the entity list is kept
//! in hit-test order (highest z first), so painting walks it in reverse.

use kurbo::{Circle, Point, Rect, Vec2};
use nm_core::model::{Entity, EntityKind};
use nm_core::style::{Color as MapColor, StyleRecord};
use nm_core::ViewTransform;
use peniko::Color;

use crate::surface::{PixelShadow, Surface};

/// Abstract → pixel conversions handed to painters.
pub trait PixelMapper {
    fn x_to_px(&self, x: f64) -> f64;
    fn y_to_px(&self, y: f64) -> f64;
    fn d_to_px(&self, d: f64) -> f64;

    fn point_to_px(&self, p: Point) -> Point {
        Point::new(self.x_to_px(p.x), self.y_to_px(p.y))
    }
}

impl PixelMapper for ViewTransform {
    fn x_to_px(&self, x: f64) -> f64 {
        ViewTransform::x_to_px(self, x)
    }

    fn y_to_px(&self, y: f64) -> f64 {
        ViewTransform::y_to_px(self, y)
    }

    fn d_to_px(&self, d: f64) -> f64 {
        ViewTransform::d_to_px(self, d)
    }
}

/// Paint the whole scene: background first, then entities lowest z first.
///
/// `entities` must be in hit-test order (descending z). Each entity is
/// painted inside its own `save`/`restore` pair. Returns the number of
/// entities painted.
pub fn paint_scene<S: Surface + ?Sized, M: PixelMapper + ?Sized>(
    surface: &mut S,
    entities: &[Entity],
    mapper: &M,
    background: Option<(Rect, MapColor)>,
) -> usize {
    if let Some((rect, color)) = background {
        surface.fill_rect(rect, to_peniko(color));
    }

    for entity in entities.iter().rev() {
        surface.save();
        paint_entity(surface, entity, mapper);
        surface.restore();
    }
    entities.len()
}

/// Paint one entity in its current style.
pub fn paint_entity<S: Surface + ?Sized, M: PixelMapper + ?Sized>(
    surface: &mut S,
    entity: &Entity,
    mapper: &M,
) {
    let style = entity.style();
    match &entity.kind {
        EntityKind::Rect {
            origin,
            width,
            height,
            color,
        } => {
            let top_left = mapper.point_to_px(*origin);
            let rect = Rect::from_origin_size(
                top_left,
                (mapper.d_to_px(*width), mapper.d_to_px(*height)),
            );
            log::trace!("PAINT rect {} at {:?}", entity.id, rect);
            apply_state(surface, style, mapper);
            surface.fill_rect(rect, to_peniko(style.fill.unwrap_or(*color)));
            if let Some(stroke) = style.stroke {
                surface.stroke_rect(rect, to_peniko(stroke), style.stroke_width);
            }
        }
        EntityKind::Node { center } => {
            let circle = Circle::new(mapper.point_to_px(*center), mapper.d_to_px(style.radius));
            log::trace!("PAINT node {} at {:?}", entity.id, circle.center);
            apply_state(surface, style, mapper);
            if let Some(fill) = style.fill {
                surface.fill_circle(circle, to_peniko(fill));
            }
            if let Some(stroke) = style.stroke {
                surface.stroke_circle(circle, to_peniko(stroke), style.stroke_width);
            }
        }
        EntityKind::Edge { from, to } => {
            // Endpoints live in other entities; edges get geometry once the edge tool exists.
            log::trace!("PAINT edge {} ({from:?} -> {to:?}) skipped", entity.id);
        }
    }
}

fn apply_state<S: Surface + ?Sized, M: PixelMapper + ?Sized>(
    surface: &mut S,
    style: &StyleRecord,
    mapper: &M,
) {
    surface.set_alpha(style.alpha);
    surface.set_shadow(style.shadow.map(|s| PixelShadow {
        offset: Vec2::new(mapper.d_to_px(s.offset_x), mapper.d_to_px(s.offset_y)),
        blur: mapper.d_to_px(s.blur),
        color: to_peniko(s.color),
    }));
}

pub(crate) fn to_peniko(c: MapColor) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, PaintShape, RecordingSurface};
    use nm_core::style::NODE_STYLES;

    fn view(scale: f64) -> ViewTransform {
        ViewTransform::new(Point::new(10.0, 20.0), scale).unwrap()
    }

    #[test]
    fn rect_painted_through_mapper() {
        let mut s = RecordingSurface::new();
        let r = Entity::rect(30.0, 40.0, 100.0, 50.0, MapColor::rgb(100, 200, 100));
        paint_entity(&mut s, &r, &view(2.0));

        match &s.ops[0] {
            DrawOp::Fill {
                shape: PaintShape::Rect(rect),
                color,
                alpha,
                ..
            } => {
                assert_eq!(*rect, Rect::new(40.0, 40.0, 240.0, 140.0));
                let c = color.to_rgba8();
                assert_eq!((c.r, c.g, c.b), (100, 200, 100));
                assert_eq!(*alpha, 0.4);
            }
            other => panic!("expected rect fill, got {other:?}"),
        }
    }

    #[test]
    fn node_radius_scales_with_view() {
        let mut s = RecordingSurface::new();
        let n = Entity::node(10.0, 20.0);
        paint_entity(&mut s, &n, &view(3.0));
        assert_eq!(
            s.filled_shapes(),
            vec![PaintShape::Circle(Circle::new(
                Point::ORIGIN,
                NODE_STYLES.default.radius * 3.0
            ))]
        );
    }

    #[test]
    fn held_node_casts_scaled_shadow() {
        let mut s = RecordingSurface::new();
        let mut n = Entity::node(10.0, 20.0);
        n.start_move(Point::new(10.0, 20.0));
        paint_entity(&mut s, &n, &view(1.0));
        match &s.ops[0] {
            DrawOp::Fill {
                shadowed, alpha, ..
            } => {
                assert!(*shadowed);
                assert_eq!(*alpha, NODE_STYLES.held.alpha);
            }
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn scene_paints_lowest_z_first_in_scopes() {
        let front = Entity::node(0.0, 0.0).with_z_index(10);
        let back = Entity::rect(0.0, 0.0, 5.0, 5.0, MapColor::rgb(0, 0, 0)).with_z_index(5);
        // hit-test order: front first
        let entities = vec![front, back];

        let mut s = RecordingSurface::new();
        let bg = Rect::new(0.0, 0.0, 800.0, 600.0);
        let painted = paint_scene(
            &mut s,
            &entities,
            &view(1.0),
            Some((bg, nm_core::style::BACKGROUND)),
        );
        assert_eq!(painted, 2);

        let shapes = s.filled_shapes();
        assert_eq!(shapes[0], PaintShape::Rect(bg));
        assert!(matches!(shapes[1], PaintShape::Rect(_)));
        assert!(matches!(shapes[2], PaintShape::Circle(_)));

        let saves = s.ops.iter().filter(|op| matches!(op, DrawOp::Save)).count();
        let restores = s.ops.iter().filter(|op| matches!(op, DrawOp::Restore)).count();
        assert_eq!((saves, restores), (2, 2));
        assert_eq!(s.alpha(), 1.0);
    }

    #[test]
    fn edge_paints_nothing() {
        let mut s = RecordingSurface::new();
        paint_entity(&mut s, &Entity::edge(None, None), &view(1.0));
        assert!(s.ops.is_empty());
    }
}
