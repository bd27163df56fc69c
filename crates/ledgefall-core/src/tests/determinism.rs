//! Determinism verification tests.
//!
//! Two worlds built from the same config and layout and fed the same inputs
//! must agree on every frame: same events, same state hash. This is what
//! replays and input-log bug reports rely on.

use crate::config::SimConfig;
use crate::input::{Buttons, InputFrame};
use crate::world::FrameEvent;

use super::helpers::{arena_layout, scripted_input, world_with, DT};

#[test]
fn identical_inputs_produce_identical_frames() {
    let mut a = world_with(SimConfig::default(), arena_layout());
    let mut b = world_with(SimConfig::default(), arena_layout());

    for frame in 0..900 {
        let input = scripted_input(frame);
        let events_a: Vec<FrameEvent> = a.step(DT, &input).unwrap().to_vec();
        let events_b: Vec<FrameEvent> = b.step(DT, &input).unwrap().to_vec();
        assert_eq!(events_a, events_b, "events diverged at frame {frame}");
        assert_eq!(a.state_hash(), b.state_hash(), "state diverged at frame {frame}");
    }
    assert_eq!(a.tick(), 900);
}

#[test]
fn replaying_a_serialized_input_log_matches() {
    let inputs: Vec<InputFrame> = (0..600).map(scripted_input).collect();
    let log = serde_json::to_string(&inputs).unwrap();

    let mut live = world_with(SimConfig::default(), arena_layout());
    let mut hashes = Vec::with_capacity(inputs.len());
    for input in &inputs {
        live.step(DT, input).unwrap();
        hashes.push(live.state_hash());
    }

    let replayed: Vec<InputFrame> = serde_json::from_str(&log).unwrap();
    let mut replay = world_with(SimConfig::default(), arena_layout());
    for (frame, input) in replayed.iter().enumerate() {
        replay.step(DT, input).unwrap();
        assert_eq!(replay.state_hash(), hashes[frame], "frame {frame}");
    }
}

#[test]
fn different_inputs_diverge() {
    let mut a = world_with(SimConfig::default(), arena_layout());
    let mut b = world_with(SimConfig::default(), arena_layout());
    assert_eq!(a.state_hash(), b.state_hash());

    let right = InputFrame::new().hold(Buttons::RIGHT);
    let left = InputFrame::new().hold(Buttons::LEFT);
    for _ in 0..30 {
        a.step(DT, &right).unwrap();
        b.step(DT, &left).unwrap();
    }
    assert_ne!(a.state_hash(), b.state_hash());
}

#[test]
fn config_round_trip_preserves_behavior() {
    let config = SimConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let parsed = SimConfig::from_json(&json).unwrap();

    let mut a = world_with(config, arena_layout());
    let mut b = world_with(parsed, arena_layout());
    for frame in 0..300 {
        let input = scripted_input(frame);
        a.step(DT, &input).unwrap();
        b.step(DT, &input).unwrap();
    }
    assert_eq!(a.state_hash(), b.state_hash());
}
