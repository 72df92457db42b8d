use std::error::Error;
use std::fs;
use std::path::Path;

use engine::{resolve_app_paths, AssetStore, InputSnapshot, RecordingRenderer, Session};
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;

use app::gameplay;

const FIXED_DT_SECONDS: f32 = 1.0 / 60.0;
const CONFIG_FILE: &str = "config.json";
const SMOKE_RUN_FRAMES: u32 = 600;

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GameConfig {
    start_scene: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_scene: gameplay::SCENE_VILLAGE.to_string(),
        }
    }
}

fn main() {
    init_tracing();
    info!("=== Tilevale Startup ===");

    if let Err(err) = run() {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

/// Headless bring-up: load assets, enter the configured start scene, tick a
/// few seconds of idle frames, and record one rendered frame. A windowed host
/// drives the same `Session` API with real input.
fn run() -> Result<(), Box<dyn Error>> {
    let paths = resolve_app_paths()?;
    let config = load_config(&paths.root.join(CONFIG_FILE))?;

    let mut assets = AssetStore::new();
    assets.load_dir(&paths.assets_dir)?;

    let mut session = Session::new(assets, gameplay::build_script_registry());
    session.enter_scene(&config.start_scene)?;

    let idle = InputSnapshot::empty();
    for _ in 0..SMOKE_RUN_FRAMES {
        session.update(FIXED_DT_SECONDS, &idle)?;
    }

    let mut renderer = RecordingRenderer::default();
    session.render(&mut renderer);
    info!(
        scene = session.scene_name(),
        tiles = session.scene().tile_count(),
        objects = session.scene().objects().len(),
        draw_calls = renderer.calls.len(),
        "smoke_run_ok"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Missing config is not an error; a malformed one is, reported with the
/// JSON path of the offending field.
fn load_config(path: &Path) -> Result<GameConfig, Box<dyn Error>> {
    if !path.is_file() {
        return Ok(GameConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    let config = serde_path_to_error::deserialize(&mut deserializer)?;
    Ok(config)
}
