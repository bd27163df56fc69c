//! # Ledgefall Core
//!
//! Frame-stepped simulation core for a 2D side-scrolling action-platformer.
//!
//! The crate owns everything that has to be frame-coherent: kinematic bodies
//! under gravity, axis-aligned collision against static level rectangles,
//! weapon timing and hitbox geometry, and enemy behavior. Rendering, audio,
//! asset and tile-map loading live outside; they hand in plain rectangles and
//! spawn points and read back poses, hitboxes and lifecycle state.
//!
//! ## Architecture
//!
//! - **Bodies** ([`physics::KinematicBody`]): gravity integration and
//!   minimal-axis collision resolution
//! - **Weapons** ([`weapon::Weapon`]): arc, thrust and ballistic variants behind
//!   the [`weapon::Armament`] capability
//! - **Controllers** ([`player::Player`], [`enemy::Enemy`]): intent, state
//!   machines and damage gating
//! - **World** ([`world::World`]): owns entities and fixes the per-frame order
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use ledgefall_core::config::{LevelLayout, SimConfig};
//! use ledgefall_core::geometry::Aabb;
//! use ledgefall_core::input::InputFrame;
//! use ledgefall_core::world::World;
//!
//! let layout = LevelLayout {
//!     platforms: vec![Aabb::new(0.0, 0.0, 2000.0, 20.0)],
//!     player_spawn: Some(Vec2::new(100.0, 20.0)),
//!     ..LevelLayout::default()
//! };
//! let mut world = World::new(SimConfig::default(), layout).unwrap();
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0, &InputFrame::default()).unwrap();
//! }
//! assert!((world.player().bounds().y - 20.0).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod enemy;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod player;
pub mod weapon;
pub mod world;

#[cfg(test)]
mod tests;

pub use config::{LevelLayout, SimConfig};
pub use entity::{EntityId, Facing};
pub use error::SimError;
pub use geometry::Aabb;
pub use input::{Buttons, InputFrame};
pub use world::{FrameEvent, World};
