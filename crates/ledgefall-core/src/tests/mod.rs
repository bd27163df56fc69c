//! Crate-level tests that drive whole frames.
//!
//! - `scenarios.rs`: end-to-end behavior through [`crate::world::World`]
//!   and the individual controllers
//! - `determinism.rs`: identical inputs produce identical frames
//! - `properties.rs`: `proptest` properties over delta sequences and damage
//! - `helpers.rs`: level and input factories

mod determinism;
mod helpers;

pub use helpers::*;
