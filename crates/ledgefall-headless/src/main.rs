//! ledgefall-headless: run a level without a renderer.
//!
//! Usage:
//!   ledgefall-headless [level.json] [config.json] [frames]
//! Example:
//!   RUST_LOG=ledgefall_core=debug ledgefall-headless demos/arena.json
//!
//! Without a level the built-in demo arena is used; without a config the
//! defaults apply. The player is driven by a fixed input script at 60 fps and
//! a JSON summary of the run is printed to stdout.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use glam::Vec2;
use ledgefall_core::config::{EnemySpawn, LevelLayout, SimConfig};
use ledgefall_core::error::SimError;
use ledgefall_core::geometry::Aabb;
use ledgefall_core::input::{Buttons, InputFrame};
use ledgefall_core::player::Pose;
use ledgefall_core::world::{FrameEvent, World};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 1800;

#[derive(Debug, Serialize)]
struct EnemySummary {
    id: u64,
    profile: String,
    position: Vec2,
    health: f32,
}

#[derive(Debug, Serialize)]
struct Summary {
    frames: u64,
    player_position: Vec2,
    player_health: f32,
    player_pose: Pose,
    enemies_left: Vec<EnemySummary>,
    event_counts: BTreeMap<&'static str, u64>,
    diagnostics: Vec<String>,
    state_hash: u64,
}

fn demo_layout() -> LevelLayout {
    LevelLayout {
        platforms: vec![
            Aabb::new(0.0, 0.0, 3000.0, 20.0),
            Aabb::new(600.0, 20.0, 400.0, 10.0),
            Aabb::new(1400.0, 120.0, 240.0, 20.0),
            Aabb::new(2960.0, 20.0, 40.0, 600.0),
        ],
        player_spawn: Some(Vec2::new(100.0, 20.0)),
        enemies: vec![
            EnemySpawn {
                profile: "goblin".into(),
                position: Vec2::new(800.0, 30.0),
            },
            EnemySpawn {
                profile: "spider".into(),
                position: Vec2::new(1800.0, 20.0),
            },
        ],
        bounds: Some(Vec2::new(3000.0, 1000.0)),
    }
}

/// Walks right, swinging every half second and hopping now and then.
fn scripted_input(frame: u64) -> InputFrame {
    let mut input = InputFrame::new().hold(Buttons::RIGHT);
    if frame % 30 == 0 {
        input = input.press(Buttons::ATTACK);
    }
    if frame % 150 == 75 {
        input = input.press(Buttons::JUMP);
    }
    input
}

fn event_name(event: &FrameEvent) -> &'static str {
    match event {
        FrameEvent::Damaged { .. } => "damaged",
        FrameEvent::Killed { .. } => "killed",
        FrameEvent::Removed { .. } => "removed",
        FrameEvent::ProjectileReleased { .. } => "projectile_released",
        FrameEvent::Respawned { .. } => "respawned",
    }
}

fn load<T>(path: Option<&String>, parse: impl Fn(&str) -> Result<T, SimError>) -> Result<Option<T>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let value = parse(&text).with_context(|| format!("parse {path}"))?;
    Ok(Some(value))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let layout = load(args.first(), LevelLayout::from_json)?.unwrap_or_else(demo_layout);
    let config = load(args.get(1), SimConfig::from_json)?.unwrap_or_default();
    let frames = match args.get(2) {
        Some(n) => n.parse().with_context(|| format!("frame count '{n}'"))?,
        None => DEFAULT_FRAMES,
    };

    let mut world = World::new(config, layout).context("build world")?;
    tracing::info!(
        frames,
        platforms = world.platforms().len(),
        enemies = world.enemies().len(),
        "running"
    );

    let mut event_counts = BTreeMap::new();
    for frame in 0..frames {
        for event in world.step(DT, &scripted_input(frame))? {
            *event_counts.entry(event_name(event)).or_insert(0) += 1;
        }
    }

    let player = world.player();
    let summary = Summary {
        frames: world.tick(),
        player_position: player.bounds().min(),
        player_health: player.health(),
        player_pose: player.pose(),
        enemies_left: world
            .enemies()
            .iter()
            .map(|e| EnemySummary {
                id: e.id().as_u64(),
                profile: e.profile_name().to_string(),
                position: e.bounds().min(),
                health: e.health(),
            })
            .collect(),
        event_counts,
        diagnostics: world.diagnostics().iter().map(ToString::to_string).collect(),
        state_hash: world.state_hash(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
