//! Level and input factories shared by the crate-level tests.

use glam::Vec2;

use crate::config::{EnemySpawn, LevelLayout, SimConfig};
use crate::geometry::Aabb;
use crate::input::{Buttons, InputFrame};
use crate::world::{FrameEvent, World};

/// Fixed frame delta used by every scenario.
pub const DT: f32 = 1.0 / 60.0;

// =============================================================================
// Levels
// =============================================================================

/// A 2000 px wide floor whose top is at y = 20.
pub fn flat_floor() -> Vec<Aabb> {
    vec![Aabb::new(0.0, 0.0, 2000.0, 20.0)]
}

/// Flat floor with the player standing at x = 100.
pub fn flat_layout(enemies: Vec<EnemySpawn>) -> LevelLayout {
    LevelLayout {
        platforms: flat_floor(),
        player_spawn: Some(Vec2::new(100.0, 20.0)),
        enemies,
        bounds: Some(Vec2::new(2000.0, 1000.0)),
    }
}

/// A small level with a ledge, a wall and both enemy kinds.
pub fn arena_layout() -> LevelLayout {
    LevelLayout {
        platforms: vec![
            Aabb::new(0.0, 0.0, 2000.0, 20.0),
            Aabb::new(400.0, 20.0, 300.0, 10.0),
            Aabb::new(1200.0, 20.0, 40.0, 400.0),
            Aabb::new(800.0, 140.0, 200.0, 20.0),
        ],
        player_spawn: Some(Vec2::new(100.0, 20.0)),
        enemies: vec![enemy_at("goblin", 500.0), enemy_at("spider", 950.0)],
        bounds: Some(Vec2::new(2000.0, 1000.0)),
    }
}

/// Enemy placement standing on the flat floor.
pub fn enemy_at(profile: &str, x: f32) -> EnemySpawn {
    EnemySpawn {
        profile: profile.into(),
        position: Vec2::new(x, 20.0),
    }
}

/// Builds a world or panics.
pub fn world_with(config: SimConfig, layout: LevelLayout) -> World {
    World::new(config, layout).unwrap()
}

// =============================================================================
// Input
// =============================================================================

/// Deterministic input script exercising walking, jumping, dashing,
/// attacking and weapon swaps.
pub fn scripted_input(frame: u32) -> InputFrame {
    let mut input = InputFrame::new();
    match frame % 240 {
        0..=89 => input = input.hold(Buttons::RIGHT),
        90..=119 => input = input.hold(Buttons::LEFT),
        _ => {}
    }
    if frame % 45 == 10 {
        input = input.press(Buttons::JUMP);
    }
    if frame % 30 == 5 {
        input = input.press(Buttons::ATTACK);
    }
    if frame % 200 == 150 {
        input = input.press(Buttons::DASH);
    }
    if frame % 300 == 299 {
        input = input.select(crate::weapon::WeaponKind::Ballistic);
    }
    input
}

/// Steps `frames` times with the same input and collects every event.
pub fn run(world: &mut World, frames: usize, input: &InputFrame) -> Vec<FrameEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        events.extend_from_slice(world.step(DT, input).unwrap());
    }
    events
}
