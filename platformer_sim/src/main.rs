//! Standalone simulation binary.
//!
//! Usage:
//!   cargo run -p platformer_sim -- [--config sim.json] [--script input.json]
//!       [--frames 300] [--frame-hz 60] [--tick-hz 50] [--realtime]
//!
//! Runs the player movement component against a headless physics world,
//! driven by a scripted keyboard timeline, and prints the final snapshot as
//! JSON. Without `--script` a short demo (walk right, jump, walk left) runs.

use std::env;

use anyhow::Context;
use platformer_client::input::Key;
use platformer_sim::{config::SimConfig, script::InputScript, Simulation};
use tracing::info;

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<String>,
    script: Option<String>,
    frames: Option<u64>,
    frame_hz: Option<u32>,
    tick_hz: Option<u32>,
    realtime: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                cli.config = Some(args[i + 1].clone());
                i += 2;
            }
            "--script" if i + 1 < args.len() => {
                cli.script = Some(args[i + 1].clone());
                i += 2;
            }
            "--frames" if i + 1 < args.len() => {
                cli.frames = Some(args[i + 1].parse().context("parse --frames")?);
                i += 2;
            }
            "--frame-hz" if i + 1 < args.len() => {
                cli.frame_hz = Some(args[i + 1].parse().context("parse --frame-hz")?);
                i += 2;
            }
            "--tick-hz" if i + 1 < args.len() => {
                cli.tick_hz = Some(args[i + 1].parse().context("parse --tick-hz")?);
                i += 2;
            }
            "--realtime" => {
                cli.realtime = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(cli)
}

fn load_config(cli: &CliArgs) -> anyhow::Result<SimConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            SimConfig::from_json_str(&text).with_context(|| format!("load {path}"))?
        }
        None => SimConfig::default(),
    };
    if let Some(hz) = cli.frame_hz {
        cfg.frame_hz = hz;
    }
    if let Some(hz) = cli.tick_hz {
        cfg.tick_hz = hz;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_script(cli: &CliArgs) -> anyhow::Result<InputScript> {
    match &cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            InputScript::from_json_str(&text).with_context(|| format!("load {path}"))
        }
        None => Ok(demo_script()),
    }
}

fn demo_script() -> InputScript {
    InputScript::new()
        .hold(0, 90, Key::Right)
        .tap(30, Key::Space)
        .hold(150, 240, Key::Left)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = parse_args()?;
    let cfg = load_config(&cli)?;
    let script = load_script(&cli)?;
    let frames = cli
        .frames
        .unwrap_or_else(|| script.last_frame().map_or(300, |last| last + 60));

    info!(frames, realtime = cli.realtime, "Starting simulation");

    let mut sim = Simulation::new(cfg, script).context("create simulation")?;
    let snapshot = if cli.realtime {
        sim.run_realtime(frames).await
    } else {
        sim.run_frames(frames)
    };

    info!(
        tick = snapshot.tick,
        x = snapshot.position.x,
        y = snapshot.position.y,
        jumps = snapshot.jumps,
        "Simulation finished"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
