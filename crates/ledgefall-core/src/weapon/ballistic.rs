//! Bow-like projectiles on a ballistic path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::BallisticParams;
use crate::entity::Facing;
use crate::geometry::Aabb;

/// An in-flight projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    bounds: Aabb,
    velocity: Vec2,
    travelled: f32,
}

impl Projectile {
    /// Current hitbox.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Cumulative path length since release.
    #[must_use]
    pub fn travelled(&self) -> f32 {
        self.travelled
    }
}

/// Launch and flight parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launcher {
    launch_speed: f32,
    launch_angle_deg: f32,
    gravity: f32,
    projectile_size: Vec2,
    max_range: f32,
    floor_y: f32,
}

impl Launcher {
    /// Builds the launcher from config.
    #[must_use]
    pub fn new(params: &BallisticParams) -> Self {
        Self {
            launch_speed: params.launch_speed,
            launch_angle_deg: params.launch_angle_deg,
            gravity: params.gravity,
            projectile_size: params.projectile_size,
            max_range: params.max_range,
            floor_y: params.floor_y,
        }
    }

    /// Maximum path length before expiry.
    #[must_use]
    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    /// Spawns a projectile leaving the pivot towards `facing`.
    #[must_use]
    pub fn launch(&self, pivot: Vec2, facing: Facing) -> Projectile {
        let rad = self.launch_angle_deg.to_radians();
        let velocity = Vec2::new(
            rad.cos() * self.launch_speed * facing.sign(),
            rad.sin() * self.launch_speed,
        );
        let size = self.projectile_size;
        let x = match facing {
            Facing::Right => pivot.x,
            Facing::Left => pivot.x - size.x,
        };
        Projectile {
            bounds: Aabb::new(x, pivot.y - size.y * 0.5, size.x, size.y),
            velocity,
            travelled: 0.0,
        }
    }

    /// Advances one projectile; returns `false` once it has expired.
    pub fn advance(&self, projectile: &mut Projectile, dt: f32) -> bool {
        projectile.velocity.y -= self.gravity * dt;
        let step = projectile.velocity * dt;
        projectile.bounds = projectile.bounds.translated(step);
        projectile.travelled += step.length();
        projectile.travelled < self.max_range && projectile.bounds.top() >= self.floor_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher() -> Launcher {
        Launcher::new(&BallisticParams::default())
    }

    #[test]
    fn launch_velocity_mirrors_with_facing() {
        let l = launcher();
        let right = l.launch(Vec2::new(0.0, 100.0), Facing::Right);
        let left = l.launch(Vec2::new(0.0, 100.0), Facing::Left);
        assert!(right.velocity().x > 0.0);
        assert!((right.velocity().x + left.velocity().x).abs() < 1e-4);
        assert!((right.velocity().y - left.velocity().y).abs() < 1e-4);
        assert!((right.velocity().length() - 500.0).abs() < 1e-2);
        assert_eq!(left.bounds().right(), 0.0);
        assert_eq!(right.bounds().left(), 0.0);
    }

    #[test]
    fn gravity_bends_the_path() {
        let l = launcher();
        let mut p = l.launch(Vec2::new(0.0, 500.0), Facing::Right);
        let vy0 = p.velocity().y;
        assert!(l.advance(&mut p, 0.1));
        assert!((p.velocity().y - (vy0 - 80.0)).abs() < 1e-3);
        assert!(p.travelled() > 0.0);
    }

    #[test]
    fn expires_below_floor() {
        let params = BallisticParams {
            launch_angle_deg: -45.0,
            ..BallisticParams::default()
        };
        let l = Launcher::new(&params);
        let mut p = l.launch(Vec2::new(0.0, 5.0), Facing::Right);
        assert!(!l.advance(&mut p, 0.1));
    }
}
