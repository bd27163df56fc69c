//! Sword-like sweep geometry.

use glam::Vec2;

use crate::config::ArcParams;
use crate::entity::Facing;
use crate::geometry::Aabb;

/// A square hitbox riding a circular arc around the pivot.
///
/// Facing right the centre moves from `start_angle` through `sweep`
/// (counter-clockwise positive). Facing left the angle is mirrored across the
/// vertical axis (`a -> 180° - a`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSweep {
    start_angle_deg: f32,
    sweep_deg: f32,
    radius: f32,
    size: f32,
}

impl ArcSweep {
    /// Builds the sweep from config.
    #[must_use]
    pub fn new(params: &ArcParams) -> Self {
        Self {
            start_angle_deg: params.start_angle_deg,
            sweep_deg: params.sweep_deg,
            radius: params.radius,
            size: params.size,
        }
    }

    /// Angle of the hitbox centre at `progress`, in degrees.
    #[must_use]
    pub fn angle_at(&self, progress: f32, facing: Facing) -> f32 {
        let a = self.start_angle_deg + self.sweep_deg * progress;
        match facing {
            Facing::Right => a,
            Facing::Left => 180.0 - a,
        }
    }

    /// Hitbox at `progress` for the given pivot and facing.
    #[must_use]
    pub fn hitbox_at(&self, progress: f32, pivot: Vec2, facing: Facing) -> Aabb {
        let rad = self.angle_at(progress, facing).to_radians();
        let center = pivot + Vec2::new(rad.cos(), rad.sin()) * self.radius;
        Aabb::from_center(center, Vec2::splat(self.size))
    }
}
