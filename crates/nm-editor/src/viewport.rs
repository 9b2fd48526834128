//! The viewport: view transform, entity collection, redraw coalescing, and
//! hit dispatch from raw pixels to semantic events.

use kurbo::{Point, Rect};
use nm_core::model::Entity;
use nm_core::style::{BACKGROUND, Color};
use nm_core::{EditorConfig, EntityId, ViewError, ViewTransform};
use nm_render::{FrameHost, FrameScheduler, Surface, hit_index, paint_scene};
use std::fmt;

use crate::event::{EditorEvent, Source};
use crate::input::InputEvent;

/// Handle for one entity inserted into a [`Viewport`].
///
/// Keys are handed out in insertion order and never reused, so two entities
/// sharing an [`EntityId`] still resolve to themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(u64);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[derive(Debug)]
pub struct Viewport {
    transform: ViewTransform,
    /// Sorted by descending z index: hit-test order. Painting walks it backwards.
    entities: Vec<Entity>,
    /// `keys[i]` is the key of `entities[i]`.
    keys: Vec<EntityKey>,
    next_key: u64,
    frames: FrameScheduler,
    canvas: Rect,
    background: Color,
}

impl Viewport {
    /// An empty viewport at scale 1 with the origin on pixel `(0, 0)` and the
    /// default canvas size. Use [`Viewport::with_config`] for the configured view.
    pub fn new(host: Box<dyn FrameHost>) -> Self {
        let config = EditorConfig::default();
        Self {
            transform: ViewTransform::default(),
            entities: Vec::new(),
            keys: Vec::new(),
            next_key: 0,
            frames: FrameScheduler::new(host),
            canvas: Rect::new(0.0, 0.0, config.canvas_width, config.canvas_height),
            background: BACKGROUND,
        }
    }

    pub fn with_config(config: &EditorConfig, host: Box<dyn FrameHost>) -> Result<Self, ViewError> {
        let (ox, oy) = config.initial_origin;
        let mut viewport = Self::new(host);
        viewport.set_view(Point::new(ox, oy), config.initial_scale)?;
        viewport.set_canvas_size(config.canvas_width, config.canvas_height);
        Ok(viewport)
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale()
    }

    pub fn origin(&self) -> Point {
        self.transform.origin()
    }

    /// Replace the view. Leaves the current view untouched on error.
    pub fn set_view(&mut self, origin: Point, scale: f64) -> Result<(), ViewError> {
        self.transform = ViewTransform::new(origin, scale)?;
        log::debug!("view set: origin={origin:?} scale={scale}");
        Ok(())
    }

    /// Change scale while keeping `pivot` on the same pixel.
    pub fn zoom_around_point(&mut self, pivot: Point, new_scale: f64) -> Result<(), ViewError> {
        self.transform = self.transform.zoomed_around(pivot, new_scale)?;
        log::trace!("zoom around {pivot:?} -> scale {new_scale}");
        Ok(())
    }

    /// Move the view so abstract `point` lands exactly on `pixel`.
    pub fn pan_to_align_point(&mut self, point: Point, pixel: Point) {
        self.transform = self.transform.panned_to_align(point, pixel);
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = Rect::new(0.0, 0.0, width, height);
    }

    // ─── Entities ────────────────────────────────────────────────────────

    /// Insert an entity, keeping the list sorted by descending z. Among equal
    /// z, earlier insertions stay ahead. Ids are not de-duplicated; the
    /// returned key is what identifies this entity from now on.
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        let key = EntityKey(self.next_key);
        self.next_key += 1;
        log::debug!(
            "add {} {} as {key} z={}",
            entity.tag().as_str(),
            entity.id,
            entity.z_index()
        );
        self.insert_sorted(key, entity);
        key
    }

    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let idx = self.index_of(key)?;
        log::debug!("remove {key}");
        self.keys.remove(idx);
        Some(self.entities.remove(idx))
    }

    /// Move an entity to a new z index. It goes behind any entities already at
    /// that z. Returns `false` if the key is unknown.
    pub fn set_z_index(&mut self, key: EntityKey, z_index: i32) -> bool {
        let Some(entity) = self.remove_entity(key) else {
            return false;
        };
        self.insert_sorted(key, entity.with_z_index(z_index));
        true
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.index_of(key).map(|i| &self.entities[i])
    }

    /// Mutable access to one entity. Its z index stays fixed; use
    /// [`Viewport::set_z_index`] to reorder.
    pub fn entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.index_of(key).map(|i| &mut self.entities[i])
    }

    /// The key of the topmost entity carrying `id`.
    pub fn key_of(&self, id: EntityId) -> Option<EntityKey> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.keys[idx])
    }

    /// Entities in hit-test order (highest z first).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Keys in the same order as [`Viewport::entities`].
    pub fn keys(&self) -> &[EntityKey] {
        &self.keys
    }

    fn index_of(&self, key: EntityKey) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }

    fn insert_sorted(&mut self, key: EntityKey, entity: Entity) {
        let z = entity.z_index();
        let at = self.entities.partition_point(|e| e.z_index() >= z);
        self.entities.insert(at, entity);
        self.keys.insert(at, key);
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Ask for a paint on the next frame. Repeated calls before that frame are no-ops.
    pub fn request_draw(&mut self) {
        if self.frames.request() {
            log::trace!("frame requested");
        }
    }

    pub fn draw_requested(&self) -> bool {
        self.frames.is_pending()
    }

    /// The host's frame callback. Clears the request flag, then paints.
    pub fn on_paint_due<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        self.frames.begin_frame();
        self.paint(surface)
    }

    /// Paint immediately, regardless of pending requests.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        paint_scene(
            surface,
            &self.entities,
            &self.transform,
            Some((self.canvas, self.background)),
        )
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Turn raw pixel input into a semantic event.
    ///
    /// The first entity (in z order) whose geometry contains the point gets
    /// the event if it accepts it. If it declines, or nothing is hit, the
    /// event goes to the background. At most one entity is ever the source.
    pub fn dispatch(&self, input: &InputEvent) -> EditorEvent {
        let at = self.transform.from_px(input.position());
        let source = match hit_index(&self.entities, at) {
            Some(i) if self.entities[i].handles(input.kind()) => Source::Entity(self.keys[i]),
            _ => Source::Background,
        };
        log::trace!("{:?} at {at:?} -> {source:?}", input.kind());

        match *input {
            InputEvent::PointerDown { .. } => EditorEvent::MouseDown { source, at },
            InputEvent::PointerUp { .. } => EditorEvent::MouseUp { source, at },
            InputEvent::PointerMove { .. } => EditorEvent::MouseMove { source, at },
            InputEvent::Wheel { dx, dy, .. } => EditorEvent::Wheel {
                source,
                at,
                delta: kurbo::Vec2::new(dx, dy),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nm_core::model::EntityKind;
    use nm_render::{CountingFrameHost, RecordingSurface};

    fn viewport() -> (Viewport, std::rc::Rc<std::cell::Cell<usize>>) {
        let host = CountingFrameHost::new();
        let count = host.counter();
        (Viewport::new(Box::new(host)), count)
    }

    #[test]
    fn bare_viewport_is_unit_scale_until_configured() {
        let (vp, _) = viewport();
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.origin(), Point::ORIGIN);

        let config = EditorConfig::default();
        let vp = Viewport::with_config(&config, Box::new(CountingFrameHost::new())).unwrap();
        assert_eq!(vp.scale(), config.initial_scale);
    }

    #[test]
    fn set_view_rejects_non_positive_scale() {
        let (mut vp, _) = viewport();
        vp.set_view(Point::new(3.0, 4.0), 2.0).unwrap();
        assert_eq!(vp.set_view(Point::ORIGIN, 0.0), Err(ViewError::InvalidScale(0.0)));
        assert_eq!(vp.set_view(Point::ORIGIN, -1.0), Err(ViewError::InvalidScale(-1.0)));
        assert_eq!(vp.scale(), 2.0);
        assert_eq!(vp.origin(), Point::new(3.0, 4.0));
    }

    #[test]
    fn entities_sorted_by_descending_z() {
        let (mut vp, _) = viewport();
        let a = vp.add_entity(Entity::node(0.0, 0.0));
        let b = vp.add_entity(Entity::node(0.0, 0.0).with_z_index(10));
        let c = vp.add_entity(Entity::node(0.0, 0.0).with_z_index(5));
        let d = vp.add_entity(Entity::node(0.0, 0.0));
        assert_eq!(vp.keys(), &[b, c, a, d]);
        let zs: Vec<i32> = vp.entities().iter().map(Entity::z_index).collect();
        assert_eq!(zs, vec![10, 5, 0, 0]);
    }

    #[test]
    fn set_z_index_reorders_hit_testing() {
        let (mut vp, _) = viewport();
        let low = vp.add_entity(Entity::node(0.0, 0.0));
        let high = vp.add_entity(Entity::node(0.0, 0.0).with_z_index(1));
        assert_eq!(vp.keys(), &[high, low]);

        assert!(vp.set_z_index(low, 10));
        assert_eq!(vp.keys(), &[low, high]);
        assert_eq!(vp.entity(low).unwrap().z_index(), 10);
        let ev = vp.dispatch(&InputEvent::pointer_down(0.0, 0.0));
        assert_eq!(ev.source(), Source::Entity(low));

        vp.remove_entity(high);
        assert!(!vp.set_z_index(high, 3));
    }

    #[test]
    fn shared_ids_stay_distinct() {
        let (mut vp, _) = viewport();
        let id = EntityId::from_raw(7);
        let upper = vp.add_entity(
            Entity::with_id(id, EntityKind::Node { center: Point::ORIGIN }).with_z_index(5),
        );
        let lower = vp.add_entity(Entity::with_id(
            id,
            EntityKind::Node {
                center: Point::new(300.0, 0.0),
            },
        ));
        assert_ne!(upper, lower);
        assert_eq!(vp.key_of(id), Some(upper));

        let ev = vp.dispatch(&InputEvent::pointer_down(300.0, 0.0));
        assert_eq!(ev.source(), Source::Entity(lower));
        assert_eq!(vp.entity(lower).unwrap().center(), Point::new(300.0, 0.0));

        vp.remove_entity(upper);
        assert_eq!(vp.key_of(id), Some(lower));
    }

    #[test]
    fn dispatch_prefers_highest_z() {
        let (mut vp, _) = viewport();
        let low = vp.add_entity(
            Entity::rect(0.0, 0.0, 100.0, 100.0, Color::rgb(0, 0, 0)).with_z_index(5),
        );
        let high = vp.add_entity(
            Entity::rect(40.0, 40.0, 20.0, 20.0, Color::rgb(0, 0, 0)).with_z_index(10),
        );

        let ev = vp.dispatch(&InputEvent::pointer_down(50.0, 50.0));
        assert_eq!(ev.source(), Source::Entity(high));
        let ev = vp.dispatch(&InputEvent::pointer_down(10.0, 10.0));
        assert_eq!(ev.source(), Source::Entity(low));
        let ev = vp.dispatch(&InputEvent::pointer_down(500.0, 10.0));
        assert_eq!(ev.source(), Source::Background);
    }

    #[test]
    fn dispatch_converts_pixels_to_abstract() {
        let (mut vp, _) = viewport();
        vp.set_view(Point::new(100.0, -50.0), 2.0).unwrap();
        let ev = vp.dispatch(&InputEvent::wheel(40.0, 20.0, 1.0, -3.0));
        assert_eq!(
            ev,
            EditorEvent::Wheel {
                source: Source::Background,
                at: Point::new(120.0, -40.0),
                delta: kurbo::Vec2::new(1.0, -3.0),
            }
        );
    }

    #[test]
    fn declining_entity_yields_background_not_next_entity() {
        let (mut vp, _) = viewport();
        let node = vp.add_entity(Entity::node(0.0, 0.0));
        vp.add_entity(
            Entity::rect(-50.0, -50.0, 100.0, 100.0, Color::rgb(0, 0, 0))
                .with_z_index(10)
                .with_locked(true),
        );
        let ev = vp.dispatch(&InputEvent::pointer_down(0.0, 0.0));
        assert_eq!(ev.source(), Source::Background);

        vp.remove_entity(vp.keys()[0]);
        let ev = vp.dispatch(&InputEvent::pointer_down(0.0, 0.0));
        assert_eq!(ev.source(), Source::Entity(node));
    }

    #[test]
    fn edges_are_transparent_to_dispatch() {
        let (mut vp, _) = viewport();
        vp.add_entity(Entity::edge(None, None).with_z_index(10));
        let node = vp.add_entity(Entity::node(0.0, 0.0));
        let ev = vp.dispatch(&InputEvent::pointer_move(0.0, 0.0));
        assert_eq!(ev.source(), Source::Entity(node));
    }

    #[test]
    fn draw_requests_coalesce_per_frame() {
        let (mut vp, count) = viewport();
        vp.request_draw();
        vp.request_draw();
        vp.request_draw();
        assert_eq!(count.get(), 1);
        assert!(vp.draw_requested());

        let mut surface = RecordingSurface::new();
        vp.on_paint_due(&mut surface);
        assert!(!vp.draw_requested());

        vp.request_draw();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn remove_returns_entity() {
        let (mut vp, _) = viewport();
        let id = vp.add_entity(Entity::node(1.0, 1.0));
        assert!(vp.remove_entity(id).is_some());
        assert!(vp.entity(id).is_none());
        assert!(vp.remove_entity(id).is_none());
    }
}
