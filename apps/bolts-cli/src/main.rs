mod script;

use anyhow::Result;
use bolts_assets::FileAssetLoader;
use bolts_common::{EngineConfig, ObjectId};
use bolts_engine::scene::spawn_demo_scene;
use bolts_engine::{Engine, EngineState, FrameReport, NoGameplay};
use bolts_render::RecordingRenderer;
use clap::{Parser, Subcommand};
use script::{KeyPress, build_script};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bolts-cli", about = "Headless tools for the bolts engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default configuration
    Info,
    /// Report overlapping objects in the demo scene
    Collide {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the frame loop against a recording renderer
    Simulate {
        /// Number of scripted frames before the close request
        #[arg(short, long, default_value = "10")]
        frames: usize,
        /// Hold a key, as KEY@FRAME or KEY@FIRST-LAST (repeatable)
        #[arg(long = "press")]
        presses: Vec<KeyPress>,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Load a skybox from this directory
        #[arg(long)]
        skybox: Option<PathBuf>,
        /// Print every frame report as JSON
        #[arg(long)]
        json: bool,
        /// Dump the recorded command stream
        #[arg(long)]
        trace: bool,
    },
}

#[derive(Serialize)]
struct CollisionReport {
    objects: usize,
    pairs: Vec<(ObjectId, ObjectId)>,
}

fn collide(json: bool) -> Result<()> {
    let mut state = EngineState::new(EngineConfig::default());
    spawn_demo_scene(&mut state.world)?;
    let report = CollisionReport {
        objects: state.world.len(),
        pairs: state.world.collision_pairs(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("Demo scene: {} objects", report.objects);
    if report.pairs.is_empty() {
        println!("No collisions");
    }
    for (a, b) in &report.pairs {
        println!("  {a} <-> {b}");
    }
    Ok(())
}

fn simulate(
    frames: usize,
    presses: &[KeyPress],
    dt: f32,
    skybox: Option<PathBuf>,
    json: bool,
    trace: bool,
) -> Result<()> {
    let mut config = EngineConfig::default();
    if let Some(dir) = skybox {
        config.skybox_enabled = true;
        config.skybox_dir = dir;
    }

    let mut renderer = RecordingRenderer::new();
    let mut engine = Engine::start(config, &mut renderer, &FileAssetLoader::new())?;
    spawn_demo_scene(&mut engine.state_mut().world)?;

    let mut input = build_script(frames, presses);
    // One extra frame observes the close request.
    let reports = engine.run(&mut input, &mut renderer, &mut NoGameplay, frames + 2, dt)?;
    tracing::debug!(frames = reports.len(), draws = renderer.draw_count(), "simulation finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (i, report) in reports.iter().enumerate() {
            print_report(i, report);
        }
        let camera = &engine.state().camera;
        println!(
            "Final: {:?}, frames presented={}, draws={}, camera=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1}",
            engine.frame_state(),
            renderer.frame_count(),
            renderer.draw_count(),
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.yaw(),
            camera.pitch()
        );
    }
    if trace {
        print!("{}", renderer.describe());
    }
    Ok(())
}

fn print_report(index: usize, report: &FrameReport) {
    let pairs: Vec<String> = report
        .collisions
        .iter()
        .map(|(a, b)| format!("{a}-{b}"))
        .collect();
    println!(
        "frame {index:>3}: {:<10} draws={:<3} collisions=[{}]",
        format!("{:?}", report.state),
        report.draw_calls,
        pairs.join(", ")
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("bolts-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("default config:");
            println!("{}", serde_json::to_string_pretty(&EngineConfig::default())?);
        }
        Commands::Collide { json } => collide(json)?,
        Commands::Simulate {
            frames,
            presses,
            dt,
            skybox,
            json,
            trace,
        } => simulate(frames, &presses, dt, skybox, json, trace)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolts_input::Key;

    #[test]
    fn simulate_accepts_repeated_presses() {
        let cli = Cli::parse_from([
            "bolts-cli", "simulate", "--frames", "5", "--press", "esc@1", "--press", "w@2-4",
        ]);
        let Commands::Simulate { frames, presses, .. } = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(frames, 5);
        assert_eq!(presses.len(), 2);
        assert_eq!(presses[1].key, Key::W);
    }

    #[test]
    fn simulate_runs_to_termination() {
        let presses = ["esc@1".parse().unwrap(), "esc@3".parse().unwrap()];
        simulate(5, &presses, 0.016, None, false, false).unwrap();
    }
}
