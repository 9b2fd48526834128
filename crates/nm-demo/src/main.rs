//! Nodemap headless demo.
//!
//! Builds the demo scene, replays a short scripted pointer session against
//! it (hover, drag a node, pan, wheel zoom, add a node), painting into a
//! recording surface whenever a frame was requested, then prints the scene
//! as JSON.
//!
//! ```text
//! nodemap                          # default config, 2-space JSON
//! nodemap --config view.json       # override view/zoom settings
//! nodemap --indent 0               # compact JSON
//! RUST_LOG=debug nodemap           # trace tool transitions
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nm_core::{EditorConfig, Vec2};
use nm_editor::{Editor, InputEvent};
use nm_render::{CountingFrameHost, RecordingSurface};

#[derive(Parser, Debug)]
#[clap(
    name = "nodemap",
    version,
    about = "Replay a scripted editing session and print the resulting map"
)]
struct Args {
    /// JSON editor config. Missing keys take their defaults.
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// JSON indentation width; 0 prints compact JSON.
    #[clap(long, short = 'i', default_value_t = 2)]
    indent: usize,

    /// Page position of the canvas' left edge. Script coordinates are page coordinates.
    #[clap(long, default_value_t = 0.0)]
    canvas_left: f64,

    /// Page position of the canvas' top edge.
    #[clap(long, default_value_t = 0.0)]
    canvas_top: f64,
}

/// One step of the scripted session, in page pixels.
enum Step {
    Input(InputEvent),
    Tool(&'static str),
}

fn script() -> Vec<Step> {
    use Step::{Input, Tool};
    vec![
        // Hover, then drag the demo node 60px right and 20px down.
        Input(InputEvent::pointer_move(400.0, 400.0)),
        Input(InputEvent::pointer_down(400.0, 400.0)),
        Input(InputEvent::pointer_move(430.0, 410.0)),
        Input(InputEvent::pointer_move(460.0, 420.0)),
        Input(InputEvent::pointer_up(460.0, 420.0)),
        // Pan by grabbing empty background.
        Input(InputEvent::pointer_down(700.0, 100.0)),
        Input(InputEvent::pointer_move(680.0, 120.0)),
        Input(InputEvent::pointer_move(650.0, 150.0)),
        Input(InputEvent::pointer_up(650.0, 150.0)),
        // Zoom in around the canvas center.
        Input(InputEvent::wheel(400.0, 300.0, 0.0, -15.0)),
        // Drop a node and nudge it, then go back to the pointer.
        Tool("addNode"),
        Input(InputEvent::pointer_down(720.0, 560.0)),
        Input(InputEvent::pointer_move(740.0, 570.0)),
        Input(InputEvent::pointer_up(740.0, 570.0)),
        Tool("pointer"),
    ]
}

fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    EditorConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let host = CountingFrameHost::new();
    let frame_requests = host.counter();
    let mut editor = Editor::with_demo_scene(config, Box::new(host))?;
    editor.on_tool_changed(|kind| log::info!("tool: {kind}"));

    let offset = Vec2::new(args.canvas_left, args.canvas_top);
    let mut surface = RecordingSurface::new();
    let mut frames = 0usize;

    for step in script() {
        match step {
            Step::Input(input) => {
                let event = editor.handle_input(&input.from_page(offset));
                log::debug!("{event:?} -> {:?}", editor.affordance());
            }
            Step::Tool(name) => editor.select_tool(name)?,
        }
        if editor.viewport().draw_requested() {
            surface.clear();
            editor.on_paint_due(&mut surface);
            frames += 1;
        }
    }

    let view = editor.viewport();
    log::info!(
        "{frames} frames painted for {} requests; view origin {:?} scale {}",
        frame_requests.get(),
        view.origin(),
        view.scale()
    );

    println!("{}", editor.serialize_entities(args.indent)?);
    Ok(())
}
