//! Spear-like thrust geometry.

use glam::Vec2;

use crate::config::ThrustParams;
use crate::entity::Facing;
use crate::geometry::Aabb;

/// A shaft anchored at the pivot that extends linearly with progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustReach {
    max_reach: f32,
    width: f32,
}

impl ThrustReach {
    /// Builds the reach from config.
    #[must_use]
    pub fn new(params: &ThrustParams) -> Self {
        Self {
            max_reach: params.max_reach,
            width: params.width,
        }
    }

    /// Hitbox at `progress`; zero length at progress 0.
    #[must_use]
    pub fn hitbox_at(&self, progress: f32, pivot: Vec2, facing: Facing) -> Aabb {
        let length = self.max_reach * progress;
        let x = match facing {
            Facing::Right => pivot.x,
            Facing::Left => pivot.x - length,
        };
        Aabb::new(x, pivot.y - self.width * 0.5, length, self.width)
    }
}
