//! The kinematic body itself.

use glam::Vec2;

use crate::config::BodyConfig;
use crate::entity::Facing;
use crate::error::{check_delta, SimError};
use crate::geometry::{Aabb, Side};

use super::{Axis, Contacts, Obstacle, WallSide, REFERENCE_DT};

/// Axis-aligned body with gravity, drag and push-out collision.
///
/// Position is the bottom-left corner of the box in a y-up world.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    bounds: Aabb,
    velocity: Vec2,
    config: BodyConfig,
    climbing: bool,
    climb_speed: f32,
    jumps_used: u32,
    grounded: bool,
    /// Horizontal velocity was set by a controller this frame
    driven: bool,
    /// A step-up was requested for this frame
    stepping: bool,
    fall_cap: Option<f32>,
}

impl KinematicBody {
    /// Creates a body at rest.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidBodySize`] unless both dimensions are
    /// positive.
    pub fn new(config: &BodyConfig, position: Vec2, size: Vec2) -> Result<Self, SimError> {
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(SimError::InvalidBodySize {
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self {
            bounds: Aabb::from_min_size(position, size),
            velocity: Vec2::ZERO,
            config: *config,
            climbing: false,
            climb_speed: 0.0,
            jumps_used: 0,
            grounded: false,
            driven: false,
            stepping: false,
            fall_cap: None,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Bottom-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.bounds.min()
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.bounds.size()
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Physical constants.
    #[must_use]
    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Landed on a top surface during the last collision pass.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Climbing mode is active.
    #[must_use]
    pub fn is_climbing(&self) -> bool {
        self.climbing
    }

    /// Jumps spent since the last landing.
    #[must_use]
    pub fn jumps_used(&self) -> u32 {
        self.jumps_used
    }

    // =========================================================================
    // Controller inputs
    // =========================================================================

    /// Sets one velocity component. Setting `X` suppresses drag this frame.
    pub fn set_velocity(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => {
                self.velocity.x = value;
                self.driven = true;
            }
            Axis::Y => self.velocity.y = value,
        }
    }

    /// Launches upwards and spends one jump.
    pub fn jump(&mut self, speed: f32) {
        self.velocity.y = speed;
        self.jumps_used += 1;
        self.grounded = false;
    }

    /// Overrides the spent-jump counter.
    pub fn set_jumps_used(&mut self, jumps: u32) {
        self.jumps_used = jumps;
    }

    /// Enters or leaves climbing mode. Leaving stops the climb and resumes
    /// gravity next frame.
    pub fn set_climbing(&mut self, climbing: bool) {
        if self.climbing && !climbing {
            self.velocity.y = 0.0;
        }
        self.climbing = climbing;
        if !climbing {
            self.climb_speed = 0.0;
        }
    }

    /// Vertical speed while climbing: positive ascends, zero holds.
    pub fn set_climb_speed(&mut self, speed: f32) {
        self.climb_speed = speed;
    }

    /// Caps downward speed for the next integration only.
    pub fn cap_fall_speed(&mut self, cap: f32) {
        self.fall_cap = Some(cap.abs());
    }

    /// Moves the box so its bottom-left corner is at `position`.
    pub fn set_position(&mut self, position: Vec2) {
        self.bounds.x = position.x;
        self.bounds.y = position.y;
    }

    /// Teleports and clears all motion state.
    pub fn reset(&mut self, position: Vec2) {
        self.set_position(position);
        self.velocity = Vec2::ZERO;
        self.climbing = false;
        self.climb_speed = 0.0;
        self.jumps_used = 0;
        self.grounded = false;
        self.driven = false;
        self.stepping = false;
        self.fall_cap = None;
    }

    // =========================================================================
    // Per-frame update
    // =========================================================================

    /// Applies gravity, the fall clamp and drag, then moves the box.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NegativeDelta`] for a negative or non-finite `dt`.
    pub fn integrate(&mut self, dt: f32) -> Result<(), SimError> {
        let dt = check_delta(dt)?;

        if self.climbing {
            self.velocity.y = self.climb_speed;
        } else if self.stepping {
            self.velocity.y = self.config.step_climb_speed;
        } else {
            self.velocity.y += self.config.gravity * dt;
        }

        let mut floor = -self.config.max_fall_speed;
        if let Some(cap) = self.fall_cap.take() {
            floor = floor.max(-cap);
        }
        self.velocity.y = self.velocity.y.max(floor);

        if !self.driven {
            self.velocity.x *= self.config.drag.powf(dt / REFERENCE_DT);
        }

        self.bounds = self.bounds.translated(self.velocity * dt);
        self.grounded = false;
        self.driven = false;
        Ok(())
    }

    /// Pushes the box out of every overlapping platform, in order.
    ///
    /// Each overlap resolves along its axis of minimal positive penetration
    /// and zeroes the matching velocity component. On a step-up frame a top
    /// penetration within the step height counts as a landing.
    pub fn resolve_collisions(&mut self, platforms: &[Aabb]) -> Contacts {
        let mut contacts = Contacts::empty();
        for platform in platforms {
            let Some((mut side, _)) = self.bounds.push_out(platform) else {
                continue;
            };
            if self.stepping
                && side != Side::Top
                && self.bounds.penetration(platform, Side::Top) <= self.config.max_step_height
            {
                side = Side::Top;
            }
            match side {
                Side::Top => {
                    self.bounds.y = platform.top();
                    self.velocity.y = 0.0;
                    self.jumps_used = 0;
                    self.grounded = true;
                    contacts |= Contacts::FLOOR;
                }
                Side::Bottom => {
                    self.bounds.y = platform.bottom() - self.bounds.h;
                    self.velocity.y = 0.0;
                    contacts |= Contacts::CEILING;
                }
                Side::Left => {
                    self.bounds.x = platform.left() - self.bounds.w;
                    self.velocity.x = 0.0;
                    contacts |= Contacts::WALL_RIGHT;
                }
                Side::Right => {
                    self.bounds.x = platform.right();
                    self.velocity.x = 0.0;
                    contacts |= Contacts::WALL_LEFT;
                }
            }
        }
        if self.stepping && !contacts.contains(Contacts::FLOOR) {
            self.velocity.y = self.velocity.y.min(0.0);
        }
        self.stepping = false;
        contacts
    }

    /// Pushes the box out of `other` without landing semantics.
    ///
    /// Used for body-vs-body overlap: jumps and grounding are untouched.
    pub fn separate_from(&mut self, other: &Aabb) -> Option<Side> {
        let (side, _) = self.bounds.push_out(other)?;
        match side {
            Side::Top => {
                self.bounds.y = other.top();
                self.velocity.y = 0.0;
            }
            Side::Bottom => {
                self.bounds.y = other.bottom() - self.bounds.h;
                self.velocity.y = 0.0;
            }
            Side::Left => {
                self.bounds.x = other.left() - self.bounds.w;
                self.velocity.x = 0.0;
            }
            Side::Right => {
                self.bounds.x = other.right();
                self.velocity.x = 0.0;
            }
        }
        Some(side)
    }

    /// Keeps the box inside `[0, extent.x]` horizontally and below
    /// `extent.y`.
    pub fn clamp_to(&mut self, extent: Vec2) {
        let max_x = (extent.x - self.bounds.w).max(0.0);
        if self.bounds.x < 0.0 || self.bounds.x > max_x {
            self.bounds.x = self.bounds.x.clamp(0.0, max_x);
            self.velocity.x = 0.0;
        }
        let max_y = extent.y - self.bounds.h;
        if self.bounds.y > max_y {
            self.bounds.y = max_y;
            self.velocity.y = self.velocity.y.min(0.0);
        }
    }

    // =========================================================================
    // Probes
    // =========================================================================

    fn probe_strip(&self, facing: Facing) -> Aabb {
        let width = self.config.probe_width;
        let x = match facing {
            Facing::Right => self.bounds.right(),
            Facing::Left => self.bounds.left() - width,
        };
        Aabb::new(x, self.bounds.bottom(), width, self.bounds.h)
    }

    /// Classifies whatever is directly ahead of the leading edge.
    ///
    /// A ledge rising at most the max step height with body-sized clear space
    /// on top is a [`Obstacle::Step`]; anything else in the way is a wall.
    #[must_use]
    pub fn probe_ahead(&self, platforms: &[Aabb], facing: Facing) -> Obstacle {
        let strip = self.probe_strip(facing);
        let mut step_top: Option<f32> = None;
        for platform in platforms.iter().filter(|p| strip.overlaps(p)) {
            let rise = platform.top() - self.bounds.bottom();
            if rise > self.config.max_step_height {
                return Obstacle::Wall;
            }
            step_top = Some(step_top.map_or(platform.top(), |t| t.max(platform.top())));
        }
        let Some(top) = step_top else {
            return Obstacle::None;
        };

        let landing = Aabb::new(
            self.bounds.x + self.config.probe_width * facing.sign(),
            top,
            self.bounds.w,
            self.bounds.h,
        );
        if platforms.iter().any(|p| landing.overlaps(p)) {
            Obstacle::Wall
        } else {
            Obstacle::Step(top)
        }
    }

    /// True when there is floor just below and ahead of the leading edge.
    #[must_use]
    pub fn has_ground_ahead(&self, platforms: &[Aabb], facing: Facing) -> bool {
        let depth = self.config.ground_probe_depth;
        let strip = self.probe_strip(facing);
        let below = Aabb::new(strip.x, self.bounds.bottom() - depth, strip.w, depth);
        platforms.iter().any(|p| below.overlaps(p))
    }

    /// Requests a step-up onto a low ledge ahead.
    ///
    /// Only grounded bodies step. On success the next integration climbs at
    /// the step-climb speed and the following collision pass lands on the
    /// ledge.
    pub fn try_step_up(&mut self, platforms: &[Aabb], moving_right: bool) -> bool {
        if !self.grounded {
            return false;
        }
        let facing = if moving_right {
            Facing::Right
        } else {
            Facing::Left
        };
        match self.probe_ahead(platforms, facing) {
            Obstacle::Step(_) => {
                self.stepping = true;
                self.velocity.y = self.config.step_climb_speed;
                true
            }
            Obstacle::None | Obstacle::Wall => false,
        }
    }

    /// Side of a platform within `threshold` of either flank that overlaps
    /// the body vertically. Left wins when both flanks touch.
    ///
    /// Platforms topping out within the max step height of the feet are
    /// steps, not walls.
    #[must_use]
    pub fn wall_contact(&self, platforms: &[Aabb], threshold: f32) -> Option<WallSide> {
        let b = self.bounds;
        let left = Aabb::new(b.left() - threshold, b.bottom(), threshold, b.h);
        let right = Aabb::new(b.right(), b.bottom(), threshold, b.h);
        let mut walls = platforms
            .iter()
            .filter(|p| p.top() - b.bottom() > self.config.max_step_height);
        if walls.clone().any(|p| left.overlaps(p)) {
            Some(WallSide::Left)
        } else if walls.any(|p| right.overlaps(p)) {
            Some(WallSide::Right)
        } else {
            None
        }
    }
}
