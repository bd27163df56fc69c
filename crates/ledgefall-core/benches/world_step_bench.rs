use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use ledgefall_core::config::{BodyConfig, EnemySpawn, LevelLayout, SimConfig};
use ledgefall_core::geometry::Aabb;
use ledgefall_core::input::{Buttons, InputFrame};
use ledgefall_core::physics::KinematicBody;
use ledgefall_core::world::World;

fn populated_layout(enemies: usize) -> LevelLayout {
    // Floor plus a staircase of floating platforms
    let mut platforms = vec![Aabb::new(0.0, 0.0, 20_000.0, 20.0)];
    for i in 0..100 {
        let x = i as f32 * 200.0;
        platforms.push(Aabb::new(x, 120.0 + (i % 5) as f32 * 60.0, 120.0, 16.0));
    }

    let enemies = (0..enemies)
        .map(|i| EnemySpawn {
            profile: if i % 2 == 0 { "goblin" } else { "spider" }.to_string(),
            position: Vec2::new(300.0 + i as f32 * 400.0, 20.0),
        })
        .collect();

    LevelLayout {
        platforms,
        player_spawn: Some(Vec2::new(100.0, 20.0)),
        enemies,
        bounds: Some(Vec2::new(20_000.0, 2000.0)),
    }
}

fn bench_world_step(c: &mut Criterion) {
    let mut world = World::new(SimConfig::default(), populated_layout(40)).unwrap();
    let inputs = [
        InputFrame::new().hold(Buttons::RIGHT),
        InputFrame::new().hold(Buttons::RIGHT).press(Buttons::ATTACK),
        InputFrame::new().press(Buttons::JUMP),
        InputFrame::new().hold(Buttons::LEFT),
    ];
    let mut frame = 0usize;

    c.bench_function("world_step_40_enemies", |b| {
        b.iter(|| {
            let input = &inputs[frame % inputs.len()];
            frame += 1;
            black_box(world.step(black_box(1.0 / 60.0), input).unwrap().len())
        })
    });
}

fn bench_body_collisions(c: &mut Criterion) {
    let layout = populated_layout(0);
    let config = BodyConfig::default();
    let mut body = KinematicBody::new(&config, Vec2::new(500.0, 20.0), Vec2::new(33.0, 52.0)).unwrap();

    c.bench_function("body_integrate_resolve_101_platforms", |b| {
        b.iter(|| {
            body.integrate(black_box(1.0 / 60.0)).unwrap();
            black_box(body.resolve_collisions(&layout.platforms))
        })
    });
}

criterion_group!(benches, bench_world_step, bench_body_collisions);
criterion_main!(benches);
