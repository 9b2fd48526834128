//! The editor: one viewport, a fixed set of tools, exactly one of them active.
//!
//! The editor holds no interaction logic of its own. It turns raw input into
//! semantic events through the viewport and hands every event to the active
//! tool.

use nm_core::model::Entity;
use nm_core::style::Color;
use nm_core::EditorConfig;
use nm_render::{FrameHost, Surface};

use crate::error::{EditorError, ToolError};
use crate::event::EditorEvent;
use crate::input::InputEvent;
use crate::tools::{PointerAffordance, Tool, ToolKind};
use crate::viewport::Viewport;

pub struct Editor {
    viewport: Viewport,
    config: EditorConfig,
    /// One tool per `ToolKind`, indexed by discriminant.
    tools: [Tool; 3],
    active: ToolKind,
    on_tool_changed: Option<Box<dyn FnMut(ToolKind)>>,
}

impl Editor {
    /// An empty editor with the pointer tool active.
    pub fn new(config: EditorConfig, host: Box<dyn FrameHost>) -> Result<Self, EditorError> {
        config.validate()?;
        let viewport = Viewport::with_config(&config, host)?;
        let mut editor = Self {
            viewport,
            config,
            tools: ToolKind::ALL.map(Tool::new),
            active: ToolKind::Pointer,
            on_tool_changed: None,
        };
        editor.tools[ToolKind::Pointer as usize].activate();
        Ok(editor)
    }

    /// An editor seeded with two overlapping rectangles and one node.
    pub fn with_demo_scene(config: EditorConfig, host: Box<dyn FrameHost>) -> Result<Self, EditorError> {
        let mut editor = Self::new(config, host)?;
        let vp = &mut editor.viewport;
        vp.add_entity(Entity::rect(30.0, 81.0, 100.0, 50.0, Color::rgb(100, 100, 100)));
        vp.add_entity(Entity::rect(50.0, 100.0, 100.0, 150.0, Color::rgb(100, 200, 100)));
        vp.add_entity(Entity::node(200.0, 200.0));
        vp.request_draw();
        Ok(editor)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    pub fn active_tool(&self) -> ToolKind {
        self.active
    }

    pub fn tool(&self, kind: ToolKind) -> &Tool {
        &self.tools[kind as usize]
    }

    /// Switch tools by name (`pointer`, `addNode`, `addEdge`).
    pub fn select_tool(&mut self, name: &str) -> Result<(), ToolError> {
        let kind = name.parse()?;
        self.select_tool_kind(kind);
        Ok(())
    }

    /// Deactivate the current tool, then activate `kind`.
    pub fn select_tool_kind(&mut self, kind: ToolKind) {
        self.tools[self.active as usize].deactivate(&mut self.viewport);
        self.active = kind;
        self.tools[kind as usize].activate();
        log::debug!("selected tool {kind}");
        if let Some(cb) = self.on_tool_changed.as_mut() {
            cb(kind);
        }
    }

    /// Register the "which tool is selected" indicator, e.g. a toolbar.
    pub fn on_tool_changed(&mut self, cb: impl FnMut(ToolKind) + 'static) {
        self.on_tool_changed = Some(Box::new(cb));
    }

    /// The pointer look the UI should show right now.
    pub fn affordance(&self) -> PointerAffordance {
        self.tools[self.active as usize].affordance()
    }

    // ─── Input & paint ───────────────────────────────────────────────────

    /// Dispatch raw input and forward the resulting event to the active tool.
    pub fn handle_input(&mut self, input: &InputEvent) -> EditorEvent {
        let event = self.viewport.dispatch(input);
        self.tools[self.active as usize].handle(&event, &mut self.viewport, &self.config);
        event
    }

    /// The host's frame callback.
    pub fn on_paint_due<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        self.viewport.on_paint_due(surface)
    }

    /// The scene as JSON, in hit-test order.
    pub fn serialize_entities(&self, indent: usize) -> Result<String, serde_json::Error> {
        nm_core::serialize_entities(self.viewport.entities(), indent)
    }
}
