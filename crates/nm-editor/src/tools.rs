//! Tool system for canvas interactions.
//!
//! Every tool runs the same state machine over semantic [`EditorEvent`]s.
//! Only the active tool receives events. While active, the sub-state is
//! whatever is held:
//!
//! | Held            | Mouse move               | Mouse up                      |
//! |-----------------|--------------------------|-------------------------------|
//! | nothing         | hover highlighting       | nothing                       |
//! | background      | pan, re-anchored         | stop panning                  |
//! | entity `e`      | drag `e`                 | drop `e` (only if up is on `e`) |
//!
//! Wheel zooms around the pointer in every sub-state. Tool kinds differ only
//! in what a mouse-down does:
//!
//! | Tool      | Entity down        | Background down                |
//! |-----------|--------------------|--------------------------------|
//! | `Pointer` | select + drag      | deselect + pan                 |
//! | `AddNode` | select + drag      | create node + drag it          |
//! | `AddEdge` | ignored            | ignored                        |

use kurbo::Point;
use nm_core::model::Entity;
use nm_core::EditorConfig;
use std::fmt;
use std::str::FromStr;

use crate::error::ToolError;
use crate::event::{EditorEvent, Source};
use crate::viewport::{EntityKey, Viewport};

/// Named tool slots. The names are the strings hosts pass to `select_tool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Pointer,
    AddNode,
    AddEdge,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Pointer, ToolKind::AddNode, ToolKind::AddEdge];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pointer => "pointer",
            ToolKind::AddNode => "addNode",
            ToolKind::AddEdge => "addEdge",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// What a tool is currently holding down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Held {
    Background,
    Entity(EntityKey),
}

/// The pointer look the UI layer should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerAffordance {
    #[default]
    None,
    /// Over the background while panning.
    Move,
    /// Over an entity that can be picked up.
    Grab,
    /// Dragging an entity.
    Grabbing,
}

#[derive(Debug, Clone)]
pub struct Tool {
    kind: ToolKind,
    active: bool,
    held: Option<Held>,
    hovered: Option<EntityKey>,
    selected: Option<EntityKey>,
    /// Abstract point grabbed when a background drag began.
    pan_anchor: Option<Point>,
    affordance: PointerAffordance,
}

impl Tool {
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            active: false,
            held: None,
            hovered: None,
            selected: None,
            pan_anchor: None,
            affordance: PointerAffordance::None,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn held(&self) -> Option<Held> {
        self.held
    }

    pub fn hovered(&self) -> Option<EntityKey> {
        self.hovered
    }

    pub fn selected(&self) -> Option<EntityKey> {
        self.selected
    }

    pub fn pan_anchor(&self) -> Option<Point> {
        self.pan_anchor
    }

    pub fn affordance(&self) -> PointerAffordance {
        self.affordance
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Inactive → Active with all transient state cleared.
    pub fn activate(&mut self) {
        self.active = true;
        self.held = None;
        self.hovered = None;
        self.selected = None;
        self.pan_anchor = None;
        self.affordance = PointerAffordance::None;
        log::debug!("tool {} activated", self.kind);
    }

    /// Active → Inactive. Drops anything held and clears the hover and
    /// selection flags this tool set, so no entity stays marked after a switch.
    pub fn deactivate(&mut self, viewport: &mut Viewport) {
        let mut dirty = false;
        if let Some(Held::Entity(id)) = self.held
            && let Some(e) = viewport.entity_mut(id)
        {
            e.end_move();
            dirty = true;
        }
        if let Some(id) = self.hovered
            && let Some(e) = viewport.entity_mut(id)
        {
            e.set_hovered(false);
            dirty = true;
        }
        if let Some(id) = self.selected
            && let Some(e) = viewport.entity_mut(id)
        {
            e.set_active(false);
            dirty = true;
        }
        if dirty {
            viewport.request_draw();
        }

        self.active = false;
        self.held = None;
        self.hovered = None;
        self.selected = None;
        self.pan_anchor = None;
        self.affordance = PointerAffordance::None;
        log::debug!("tool {} deactivated", self.kind);
    }

    // ─── Event handling ──────────────────────────────────────────────────

    /// Feed one semantic event to the tool. Inactive tools ignore events.
    ///
    /// `config` should have passed [`EditorConfig::validate`], as the
    /// [`Editor`](crate::Editor) guarantees. An invalid zoom range does not
    /// panic, but the wheel then lands on whatever scale clamping yields.
    pub fn handle(&mut self, event: &EditorEvent, viewport: &mut Viewport, config: &EditorConfig) {
        if !self.active {
            log::trace!("tool {} inactive, dropping {event:?}", self.kind);
            return;
        }
        match *event {
            EditorEvent::MouseDown { source, at } => self.mouse_down(source, at, viewport),
            EditorEvent::MouseUp { source, .. } => self.mouse_up(source, viewport),
            EditorEvent::MouseMove { source, at } => self.mouse_move(source, at, viewport),
            EditorEvent::Wheel { at, delta, .. } => {
                let scale = config.clamp_scale(viewport.scale() - delta.y * config.wheel_rate);
                match viewport.zoom_around_point(at, scale) {
                    Ok(()) => viewport.request_draw(),
                    Err(err) => log::warn!("wheel zoom ignored: {err}"),
                }
            }
        }
    }

    fn mouse_down(&mut self, source: Source, at: Point, viewport: &mut Viewport) {
        if self.kind == ToolKind::AddEdge {
            log::trace!("edge tool ignores mouse down on {source:?}");
            return;
        }
        if self.held.is_some() {
            // A second press while something is held keeps the current gesture.
            return;
        }
        match source {
            Source::Entity(id) => self.grab(id, at, viewport),
            Source::Background => match self.kind {
                ToolKind::AddNode => {
                    let id = viewport.add_entity(Entity::node(at.x, at.y));
                    self.grab(id, at, viewport);
                }
                _ => {
                    self.select(None, viewport);
                    self.held = Some(Held::Background);
                    self.pan_anchor = Some(at);
                    self.affordance = PointerAffordance::Move;
                    viewport.request_draw();
                }
            },
        }
    }

    fn mouse_up(&mut self, source: Source, viewport: &mut Viewport) {
        match self.held {
            None => {}
            Some(Held::Background) => {
                self.held = None;
                self.pan_anchor = None;
                self.affordance = Self::idle_affordance(source);
            }
            Some(Held::Entity(id)) => {
                if source != Source::Entity(id) {
                    log::debug!("mouse up on {source:?} while holding {id}, ignored");
                    return;
                }
                if let Some(e) = viewport.entity_mut(id) {
                    e.end_move();
                }
                self.held = None;
                self.affordance = PointerAffordance::Grab;
                viewport.request_draw();
            }
        }
    }

    fn mouse_move(&mut self, source: Source, at: Point, viewport: &mut Viewport) {
        match self.held {
            None => self.update_hover(source.entity(), viewport),
            Some(Held::Background) => {
                let Some(anchor) = self.pan_anchor else {
                    return;
                };
                let pixel = viewport.transform().to_px(at);
                viewport.pan_to_align_point(anchor, pixel);
                viewport.request_draw();
            }
            Some(Held::Entity(id)) => match viewport.entity_mut(id) {
                Some(e) => {
                    e.move_to(at);
                    viewport.request_draw();
                }
                None => {
                    log::debug!("held entity {id} vanished, releasing");
                    self.held = None;
                    self.affordance = Self::idle_affordance(source);
                }
            },
        }
    }

    // ─── Helpers ─────────────────────────────────────────────────────────

    fn grab(&mut self, id: EntityKey, at: Point, viewport: &mut Viewport) {
        self.select(Some(id), viewport);
        let Some(e) = viewport.entity_mut(id) else {
            return;
        };
        e.start_move(at);
        self.held = Some(Held::Entity(id));
        self.affordance = PointerAffordance::Grabbing;
        viewport.request_draw();
    }

    /// Move the selection highlight. The old entity is cleared before the new one is set.
    fn select(&mut self, id: Option<EntityKey>, viewport: &mut Viewport) {
        if self.selected == id {
            return;
        }
        if let Some(old) = self.selected
            && let Some(e) = viewport.entity_mut(old)
        {
            e.set_active(false);
        }
        if let Some(new) = id
            && let Some(e) = viewport.entity_mut(new)
        {
            e.set_active(true);
        }
        self.selected = id;
        viewport.request_draw();
    }

    /// Diff the entity under the pointer against the last hovered one.
    fn update_hover(&mut self, under: Option<EntityKey>, viewport: &mut Viewport) {
        if under == self.hovered {
            return;
        }
        if let Some(old) = self.hovered
            && let Some(e) = viewport.entity_mut(old)
        {
            e.set_hovered(false);
        }
        if let Some(new) = under
            && let Some(e) = viewport.entity_mut(new)
        {
            e.set_hovered(true);
        }
        self.hovered = under;
        self.affordance = if under.is_some() {
            PointerAffordance::Grab
        } else {
            PointerAffordance::None
        };
        viewport.request_draw();
    }

    fn idle_affordance(source: Source) -> PointerAffordance {
        match source {
            Source::Entity(_) => PointerAffordance::Grab,
            Source::Background => PointerAffordance::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use nm_render::CountingFrameHost;

    fn setup(kind: ToolKind) -> (Tool, Viewport, EditorConfig) {
        let mut tool = Tool::new(kind);
        tool.activate();
        let vp = Viewport::new(Box::new(CountingFrameHost::new()));
        (tool, vp, EditorConfig::default())
    }

    fn down(source: Source, x: f64, y: f64) -> EditorEvent {
        EditorEvent::MouseDown {
            source,
            at: Point::new(x, y),
        }
    }

    fn up(source: Source, x: f64, y: f64) -> EditorEvent {
        EditorEvent::MouseUp {
            source,
            at: Point::new(x, y),
        }
    }

    fn mv(source: Source, x: f64, y: f64) -> EditorEvent {
        EditorEvent::MouseMove {
            source,
            at: Point::new(x, y),
        }
    }

    #[test]
    fn names_round_trip_and_unknown_fails() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.name().parse::<ToolKind>(), Ok(kind));
        }
        assert_eq!(
            "lasso".parse::<ToolKind>(),
            Err(ToolError::UnknownTool("lasso".into()))
        );
    }

    #[test]
    fn inactive_tool_ignores_events() {
        let (mut tool, mut vp, config) = setup(ToolKind::Pointer);
        tool.deactivate(&mut vp);
        let id = vp.add_entity(Entity::node(0.0, 0.0));
        tool.handle(&down(Source::Entity(id), 0.0, 0.0), &mut vp, &config);
        assert_eq!(tool.held(), None);
        assert!(!vp.entity(id).unwrap().is_held());
    }

    #[test]
    fn pointer_drag_lifecycle() {
        let (mut tool, mut vp, config) = setup(ToolKind::Pointer);
        let id = vp.add_entity(Entity::node(100.0, 100.0));
        let src = Source::Entity(id);

        tool.handle(&down(src, 110.0, 95.0), &mut vp, &config);
        assert_eq!(tool.held(), Some(Held::Entity(id)));
        assert_eq!(tool.affordance(), PointerAffordance::Grabbing);
        assert!(vp.entity(id).unwrap().is_active());

        tool.handle(&mv(src, 130.0, 125.0), &mut vp, &config);
        assert_eq!(vp.entity(id).unwrap().center(), Point::new(120.0, 130.0));

        tool.handle(&up(src, 130.0, 125.0), &mut vp, &config);
        assert_eq!(tool.held(), None);
        assert!(!vp.entity(id).unwrap().is_held());
        assert_eq!(tool.affordance(), PointerAffordance::Grab);
    }

    #[test]
    fn mouse_up_on_other_source_keeps_drag() {
        let (mut tool, mut vp, config) = setup(ToolKind::Pointer);
        let a = vp.add_entity(Entity::node(0.0, 0.0));
        let b = vp.add_entity(Entity::node(500.0, 0.0));

        tool.handle(&down(Source::Entity(a), 0.0, 0.0), &mut vp, &config);
        tool.handle(&up(Source::Entity(b), 500.0, 0.0), &mut vp, &config);
        assert_eq!(tool.held(), Some(Held::Entity(a)));
        tool.handle(&up(Source::Background, 900.0, 0.0), &mut vp, &config);
        assert_eq!(tool.held(), Some(Held::Entity(a)));
        assert!(vp.entity(a).unwrap().is_held());

        tool.handle(&up(Source::Entity(a), 0.0, 0.0), &mut vp, &config);
        assert_eq!(tool.held(), None);
    }

    #[test]
    fn hover_moves_between_entities() {
        let (mut tool, mut vp, config) = setup(ToolKind::Pointer);
        let a = vp.add_entity(Entity::node(0.0, 0.0));
        let b = vp.add_entity(Entity::node(100.0, 0.0));

        tool.handle(&mv(Source::Entity(a), 0.0, 0.0), &mut vp, &config);
        assert!(vp.entity(a).unwrap().is_hovered());
        assert_eq!(tool.affordance(), PointerAffordance::Grab);

        tool.handle(&mv(Source::Entity(b), 100.0, 0.0), &mut vp, &config);
        assert!(!vp.entity(a).unwrap().is_hovered());
        assert!(vp.entity(b).unwrap().is_hovered());
        assert_eq!(tool.hovered(), Some(b));

        tool.handle(&mv(Source::Background, 50.0, 50.0), &mut vp, &config);
        assert!(!vp.entity(b).unwrap().is_hovered());
        assert_eq!(tool.hovered(), None);
        assert_eq!(tool.affordance(), PointerAffordance::None);
    }

    #[test]
    fn background_pan_tracks_anchor() {
        let (mut tool, mut vp, config) = setup(ToolKind::Pointer);
        vp.set_view(Point::ORIGIN, 2.0).unwrap();

        // Pixel (20, 20) grabs abstract (10, 10).
        tool.handle(&down(Source::Background, 10.0, 10.0), &mut vp, &config);
        assert_eq!(tool.held(), Some(Held::Background));
        assert_eq!(tool.pan_anchor(), Some(Point::new(10.0, 10.0)));
        assert_eq!(tool.affordance(), PointerAffordance::Move);

        // Pointer moved to pixel (60, 40): the viewport computes the abstract
        // point under it with the current transform before the tool sees it.
        let at = vp.transform().from_px(Point::new(60.0, 40.0));
        tool.handle(&mv(Source::Background, at.x, at.y), &mut vp, &config);
        assert_eq!(vp.transform().to_px(Point::new(10.0, 10.0)), Point::new(60.0, 40.0));

        tool.handle(&up(Source::Background, at.x, at.y), &mut vp, &config);
        assert_eq!(tool.held(), None);
        assert_eq!(tool.pan_anchor(), None);
    }

    #[test]
    fn wheel_zoom_clamps_and_pivots() {
        let (mut tool, mut vp, config) = setup(ToolKind::AddNode);
        vp.set_view(Point::ORIGIN, 1.0).unwrap();
        let pivot = Point::new(50.0, 50.0);
        let before = vp.transform().to_px(pivot);

        let wheel = EditorEvent::Wheel {
            source: Source::Background,
            at: pivot,
            delta: Vec2::new(0.0, -300.0),
        };
        tool.handle(&wheel, &mut vp, &config);
        assert_eq!(vp.scale(), 10.0);
        let after = vp.transform().to_px(pivot);
        assert!((after.x - before.x).abs() < 1e-9 && (after.y - before.y).abs() < 1e-9);
        assert_eq!(tool.held(), None);
    }

    #[test]
    fn add_node_creates_and_drags() {
        let (mut tool, mut vp, config) = setup(ToolKind::AddNode);
        tool.handle(&down(Source::Background, 40.0, 60.0), &mut vp, &config);

        assert_eq!(vp.entities().len(), 1);
        let id = vp.keys()[0];
        assert_eq!(tool.held(), Some(Held::Entity(id)));
        assert!(vp.entity(id).unwrap().is_held());

        tool.handle(&mv(Source::Entity(id), 45.0, 70.0), &mut vp, &config);
        assert_eq!(vp.entity(id).unwrap().center(), Point::new(45.0, 70.0));

        tool.handle(&up(Source::Entity(id), 45.0, 70.0), &mut vp, &config);
        assert!(!vp.entity(id).unwrap().is_held());
    }

    #[test]
    fn edge_tool_is_inert_on_press() {
        let (mut tool, mut vp, config) = setup(ToolKind::AddEdge);
        let id = vp.add_entity(Entity::node(0.0, 0.0));
        tool.handle(&down(Source::Background, 300.0, 300.0), &mut vp, &config);
        tool.handle(&down(Source::Entity(id), 0.0, 0.0), &mut vp, &config);
        assert_eq!(tool.held(), None);
        assert_eq!(vp.entities().len(), 1);
        assert!(!vp.entity(id).unwrap().is_held());
    }

    #[test]
    fn deactivate_mid_drag_releases_entity() {
        let (mut tool, mut vp, config) = setup(ToolKind::Pointer);
        let id = vp.add_entity(Entity::node(0.0, 0.0));
        tool.handle(&mv(Source::Entity(id), 0.0, 0.0), &mut vp, &config);
        tool.handle(&down(Source::Entity(id), 0.0, 0.0), &mut vp, &config);

        tool.deactivate(&mut vp);
        let e = vp.entity(id).unwrap();
        assert_eq!(e.move_handle_offset(), None);
        assert!(!e.is_hovered());
        assert!(!e.is_active());
        assert!(!tool.is_active());
        assert_eq!(tool.affordance(), PointerAffordance::None);
    }

    #[test]
    fn selecting_another_entity_clears_previous() {
        let (mut tool, mut vp, config) = setup(ToolKind::Pointer);
        let a = vp.add_entity(Entity::node(0.0, 0.0));
        let b = vp.add_entity(Entity::node(100.0, 0.0));

        tool.handle(&down(Source::Entity(a), 0.0, 0.0), &mut vp, &config);
        tool.handle(&up(Source::Entity(a), 0.0, 0.0), &mut vp, &config);
        tool.handle(&down(Source::Entity(b), 100.0, 0.0), &mut vp, &config);
        assert!(!vp.entity(a).unwrap().is_active());
        assert!(vp.entity(b).unwrap().is_active());
        assert_eq!(tool.selected(), Some(b));

        tool.handle(&up(Source::Entity(b), 100.0, 0.0), &mut vp, &config);
        tool.handle(&down(Source::Background, 500.0, 500.0), &mut vp, &config);
        assert!(!vp.entity(b).unwrap().is_active());
        assert_eq!(tool.selected(), None);
    }
}
