use anyhow::{Context, Result, bail};
use carscene_car::{AppState, SceneConfig};
use carscene_input::{Action, KeyId, KeyMap};
use carscene_render::{DebugTextRenderer, Renderer};
use carscene_tools::{NodeInfo, SceneInspector, SceneSummary};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Frame length used for headless runs.
const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "carscene-cli", about = "Headless driver for the car scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, scene contents and key bindings
    Info,
    /// Drive the car with a key script and report where it ends up
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Comma-separated `key:frames` segments. A key is an action name
        /// (forward, back, left, right, up, down), `idle`, a key text such
        /// as `w` or `ArrowUp`, or a legacy code such as `#87`.
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the scene tree after startup
    Dump {
        /// Print the node list as JSON
        #[arg(long)]
        json: bool,
    },
}

/// One step of a key script: hold `key` (or nothing) for `frames` frames.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    key: Option<KeyId>,
    frames: u64,
}

fn parse_key(token: &str) -> Result<Option<KeyId>> {
    let token = token.trim();
    if token.is_empty() {
        bail!("empty key in script");
    }
    if token.eq_ignore_ascii_case("idle") {
        return Ok(None);
    }
    if let Ok(action) = token.parse::<Action>() {
        return Ok(Some(KeyMap::default_key(action)));
    }
    if let Some(code) = token.strip_prefix('#') {
        let code = code
            .parse::<u32>()
            .with_context(|| format!("bad key code `{token}`"))?;
        return Ok(Some(KeyId::code(code)));
    }
    Ok(Some(KeyId::text(token)))
}

fn parse_script(script: &str) -> Result<Vec<Segment>> {
    script.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|segment| {
            let (key, frames) = segment
                .rsplit_once(':')
                .with_context(|| format!("segment `{segment}` is not `key:frames`"))?;
            let frames = frames
                .trim()
                .parse::<u64>()
                .with_context(|| format!("bad frame count in `{segment}`"))?;
            Ok(Segment {
                key: parse_key(key)?,
                frames,
            })
        })
        .collect()
}

#[derive(Serialize)]
struct RunReport {
    frames: u64,
    ticks: u64,
    car: Option<NodeInfo>,
    camera: [f32; 3],
    summary: SceneSummary,
}

/// Play `script` for `frames` frames, idling once the script runs out.
fn run_script(app: &mut AppState, script: &[Segment], frames: u64) {
    let mut remaining = frames;
    for segment in script {
        if remaining == 0 {
            break;
        }
        match &segment.key {
            Some(key) => {
                if !app.is_bound(key) {
                    tracing::warn!(%key, "key is not bound to any action");
                }
                app.key_down(key.clone());
            }
            None => app.key_up(),
        }
        let n = segment.frames.min(remaining);
        for _ in 0..n {
            app.frame(FRAME_DT);
        }
        remaining -= n;
        app.key_up();
    }
    for _ in 0..remaining {
        app.frame(FRAME_DT);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;
    let mut app = AppState::new(&config, config.window.width, config.window.height);

    match cli.command {
        Commands::Info => {
            println!("carscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", SceneInspector::summary(&app.scene));
            println!("tick rate: {} Hz", config.tick_rate_hz);
            println!("lights: {}", if config.lights { "on" } else { "off" });
            for action in Action::ALL {
                println!("  {action}: {}", app.keymap.keys_for(action).join(" "));
            }
        }
        Commands::Run { frames, keys, json } => {
            let script = parse_script(&keys)?;
            tracing::info!(frames, segments = script.len(), "running key script");
            run_script(&mut app, &script, frames);

            let car = app
                .rig
                .body
                .and_then(|body| SceneInspector::inspect_node(&app.scene, body.car));
            let report = RunReport {
                frames: app.frames(),
                ticks: app.ticks(),
                car,
                camera: app.camera.position.to_array(),
                summary: SceneInspector::summary(&app.scene),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("frames={} ticks={}", report.frames, report.ticks);
                match &report.car {
                    Some(car) => println!("{car}"),
                    None => println!("car not built"),
                }
                println!("{}", report.summary);
            }
        }
        Commands::Dump { json } => {
            if json {
                let nodes = SceneInspector::list_nodes(&app.scene);
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                print!("{}", DebugTextRenderer::new().render(&app.scene, &app.camera));
            }
        }
    }

    Ok(())
}
