//! Kinematic bodies moving through static level geometry.
//!
//! A [`KinematicBody`] is updated in two calls per frame, always in this
//! order:
//!
//! 1. [`KinematicBody::integrate`]: gravity, fall clamp, drag, displacement
//! 2. [`KinematicBody::resolve_collisions`]: push out of every overlapping
//!    platform along its axis of minimal penetration
//!
//! Controllers set velocities and request step-ups or climbing before
//! integrating. Probes ([`KinematicBody::probe_ahead`],
//! [`KinematicBody::has_ground_ahead`], [`KinematicBody::wall_contact`]) are
//! pure queries.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgefall_core::config::BodyConfig;
//! use ledgefall_core::geometry::Aabb;
//! use ledgefall_core::physics::{Contacts, KinematicBody};
//!
//! let floor = [Aabb::new(0.0, 0.0, 200.0, 20.0)];
//! let mut body =
//!     KinematicBody::new(&BodyConfig::default(), Vec2::new(10.0, 22.0), Vec2::new(16.0, 16.0))
//!         .unwrap();
//!
//! let mut contacts = Contacts::empty();
//! for _ in 0..10 {
//!     body.integrate(1.0 / 60.0).unwrap();
//!     contacts = body.resolve_collisions(&floor);
//! }
//! assert!(contacts.contains(Contacts::FLOOR));
//! assert_eq!(body.bounds().y, 20.0);
//! ```

mod body;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::entity::Facing;

pub use body::KinematicBody;

/// Frame length the drag factor is expressed against.
pub const REFERENCE_DT: f32 = 1.0 / 60.0;

/// Velocity component selector for [`KinematicBody::set_velocity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal component (setting it counts as driving the body)
    X,
    /// Vertical component
    Y,
}

bitflags! {
    /// Surfaces touched during one collision pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Contacts: u8 {
        /// Landed on a top surface
        const FLOOR = 1 << 0;
        /// Bumped a bottom surface
        const CEILING = 1 << 1;
        /// Blocked by something on the left
        const WALL_LEFT = 1 << 2;
        /// Blocked by something on the right
        const WALL_RIGHT = 1 << 3;
    }
}

/// What lies directly ahead of a body's leading edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    /// Nothing in the way.
    None,
    /// A ledge low enough to step onto, with its top height.
    Step(f32),
    /// Too tall, or no room on top.
    Wall,
}

/// Side of a body a touched wall is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// Wall on the left
    Left,
    /// Wall on the right
    Right,
}

impl WallSide {
    /// Direction pointing into the wall.
    #[must_use]
    pub const fn towards(self) -> Facing {
        match self {
            WallSide::Left => Facing::Left,
            WallSide::Right => Facing::Right,
        }
    }

    /// Direction pointing away from the wall.
    #[must_use]
    pub const fn away(self) -> Facing {
        self.towards().flipped()
    }
}
