//! Player state machines.
//!
//! Two orthogonal machines are tracked: [`Lifecycle`] (alive, dying, waiting
//! for respawn) and [`Movement`] (what the body is doing while alive). The
//! presentation layer only needs the combined [`Pose`].

use serde::{Deserialize, Serialize};

use crate::entity::Facing;

/// Alive / dead progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Accepting input and damage.
    Alive,
    /// Health hit zero; playing out the death delay.
    Dying {
        /// Seconds until respawn becomes possible
        remaining: f32,
    },
    /// Death delay over; waiting for a respawn.
    RespawnPending,
}

impl Lifecycle {
    /// True only for [`Lifecycle::Alive`].
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Alive)
    }
}

/// Movement sub-state while alive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Standing still on the ground
    #[default]
    Idle,
    /// Walking on the ground
    Walk,
    /// In the air
    Airborne,
    /// Sliding down or clinging to a wall
    WallSlide,
    /// Dashing
    Dash,
    /// Swinging, thrusting or drawing
    Attack,
}

/// Everything presentation needs to pick an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pose {
    /// See [`Movement::Idle`]
    Idle,
    /// See [`Movement::Walk`]
    Walk,
    /// See [`Movement::Airborne`]
    Airborne,
    /// See [`Movement::WallSlide`]
    WallSlide,
    /// See [`Movement::Dash`]
    Dash,
    /// See [`Movement::Attack`]
    Attack,
    /// Death delay in progress
    Dying,
    /// Waiting for respawn
    Dead,
}

impl Pose {
    /// Combines the two machines.
    #[must_use]
    pub const fn from_states(lifecycle: Lifecycle, movement: Movement) -> Self {
        match lifecycle {
            Lifecycle::Dying { .. } => Pose::Dying,
            Lifecycle::RespawnPending => Pose::Dead,
            Lifecycle::Alive => match movement {
                Movement::Idle => Pose::Idle,
                Movement::Walk => Pose::Walk,
                Movement::Airborne => Pose::Airborne,
                Movement::WallSlide => Pose::WallSlide,
                Movement::Dash => Pose::Dash,
                Movement::Attack => Pose::Attack,
            },
        }
    }
}

/// Who owns horizontal velocity this frame, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Authority {
    /// Dash speed in the dash direction
    Dash,
    /// Wall-jump push, decaying under drag
    WallJump,
    /// Reduced walk speed during an attack
    Attack,
    /// Plain walking
    Input,
}

/// Detects two same-direction presses inside a time window.
///
/// Times are simulation seconds accumulated from frame deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DoubleTap {
    last: Option<(Facing, f32)>,
}

impl DoubleTap {
    /// Records a press at `now`; returns `true` when it completes a double
    /// tap. A completed double tap is consumed.
    pub fn press(&mut self, direction: Facing, now: f32, window: f32) -> bool {
        match self.last {
            Some((previous, at)) if previous == direction && now - at <= window => {
                self.last = None;
                true
            }
            _ => {
                self.last = Some((direction, now));
                false
            }
        }
    }

    /// Forgets any pending first tap.
    pub fn clear(&mut self) {
        self.last = None;
    }
}
