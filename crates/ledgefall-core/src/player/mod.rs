//! The input-driven player character.
//!
//! A [`Player`] combines a [`KinematicBody`], one equipped [`Weapon`], health
//! and two state machines (see [`Lifecycle`] and [`Movement`]).
//!
//! # Frame phases
//!
//! The world calls the phases individually so that every entity finishes a
//! phase before any entity starts the next one:
//!
//! 1. [`Player::intent`]: lifecycle timers, input, jump/dash/attack triggers
//! 2. [`Player::update_weapon`]: weapon timers and queued-attack chaining
//! 3. [`Player::move_body`]: integration, collision, level clamp
//! 4. [`Player::strike`]: damage-window gated hits on enemies
//!
//! [`Player::advance`] runs all of them for a standalone player.
//!
//! # Horizontal authority
//!
//! Exactly one of dash, wall-jump, attack and input owns horizontal velocity
//! in a given frame, in that priority order (see [`Authority`]).
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgefall_core::config::SimConfig;
//! use ledgefall_core::entity::EntityId;
//! use ledgefall_core::geometry::Aabb;
//! use ledgefall_core::input::{Buttons, InputFrame};
//! use ledgefall_core::player::{Player, Pose};
//!
//! let floor = [Aabb::new(0.0, 0.0, 1000.0, 20.0)];
//! let mut player = Player::new(EntityId::new(1), &SimConfig::default(), Vec2::new(100.0, 20.0))
//!     .unwrap();
//!
//! let walk = InputFrame::new().hold(Buttons::RIGHT);
//! for _ in 0..10 {
//!     player.advance(1.0 / 60.0, &walk, &floor, &mut []).unwrap();
//! }
//! assert_eq!(player.pose(), Pose::Walk);
//! assert!(player.bounds().x > 100.0);
//! ```

mod state;

use glam::Vec2;
use tracing::{debug, info, trace};

use crate::config::{BodyConfig, PlayerConfig, RespawnPolicy, SimConfig, WeaponSet};
use crate::enemy::Enemy;
use crate::entity::{EntityId, Facing};
use crate::error::{check_delta, SimError};
use crate::geometry::Aabb;
use crate::input::{Buttons, InputFrame};
use crate::physics::{Axis, Contacts, KinematicBody, WallSide};
use crate::weapon::{
    tick_down, Armament, DamageOutcome, Hit, Projectile, Target, Weapon, WeaponKind,
};

pub use state::{Authority, DoubleTap, Lifecycle, Movement, Pose};

/// The player character.
#[derive(Debug, Clone)]
pub struct Player {
    id: EntityId,
    body: KinematicBody,
    config: PlayerConfig,
    weapons: WeaponSet,
    weapon: Weapon,
    health: f32,
    lifecycle: Lifecycle,
    movement: Movement,
    facing: Facing,
    spawn: Vec2,
    level_extent: Option<Vec2>,
    /// Simulation time in seconds, accumulated from deltas
    clock: f32,
    taps: DoubleTap,
    dash_timer: f32,
    dash_cooldown: f32,
    dash_direction: Facing,
    wall_jump_timer: f32,
    wall: Option<WallSide>,
    attack_queued: bool,
    walking: bool,
}

impl Player {
    /// Creates a player at `spawn` (bottom-left corner).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidBodySize`] if the configured size is not
    /// positive.
    pub fn new(id: EntityId, config: &SimConfig, spawn: Vec2) -> Result<Self, SimError> {
        Self::with_parts(
            id,
            &config.player_body,
            &config.player,
            &config.weapons,
            spawn,
        )
    }

    /// Creates a player from individual config sections.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidBodySize`] if `config.size` is not positive.
    pub fn with_parts(
        id: EntityId,
        body: &BodyConfig,
        config: &PlayerConfig,
        weapons: &WeaponSet,
        spawn: Vec2,
    ) -> Result<Self, SimError> {
        let body = KinematicBody::new(body, spawn, config.size)?;
        Ok(Self {
            id,
            body,
            config: *config,
            weapons: *weapons,
            weapon: Weapon::from_kind(config.starting_weapon, weapons),
            health: config.max_health,
            lifecycle: Lifecycle::Alive,
            movement: Movement::Idle,
            facing: Facing::Right,
            spawn,
            level_extent: None,
            clock: 0.0,
            taps: DoubleTap::default(),
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            dash_direction: Facing::Right,
            wall_jump_timer: 0.0,
            wall: None,
            attack_queued: false,
            walking: false,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Hitbox.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    /// Weapon pivot: the centre of the body.
    #[must_use]
    pub fn pivot(&self) -> Vec2 {
        self.body.center()
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    /// Underlying body.
    #[must_use]
    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    /// Facing direction.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Current health in `[0, max_health]`.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Health on spawn.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.config.max_health
    }

    /// Lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// True while alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }

    /// Movement sub-state as of the last movement phase.
    #[must_use]
    pub fn movement(&self) -> Movement {
        self.movement
    }

    /// Combined pose for presentation.
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::from_states(self.lifecycle, self.movement)
    }

    /// Equipped weapon.
    #[must_use]
    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Active melee hitbox, if any.
    #[must_use]
    pub fn hitbox(&self) -> Option<Aabb> {
        self.weapon.hitbox()
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        self.weapon.projectiles()
    }

    /// True while a follow-up attack waits for the current one to end.
    #[must_use]
    pub fn is_attack_queued(&self) -> bool {
        self.attack_queued
    }

    /// Seconds until the next dash is allowed.
    #[must_use]
    pub fn dash_cooldown_remaining(&self) -> f32 {
        self.dash_cooldown
    }

    /// Spawn point used by respawns.
    #[must_use]
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Moves the spawn point used by later respawns.
    pub fn set_spawn(&mut self, spawn: Vec2) {
        self.spawn = spawn;
    }

    /// Restricts the player to `[0, extent.x]` by `(-inf, extent.y]`.
    pub fn set_level_extent(&mut self, extent: Option<Vec2>) {
        self.level_extent = extent;
    }

    /// Projectiles released since the last call.
    pub fn take_releases(&mut self) -> u32 {
        self.weapon.take_releases()
    }

    /// Who owns horizontal velocity this frame.
    #[must_use]
    pub fn authority(&self) -> Authority {
        if self.dash_timer > 0.0 {
            Authority::Dash
        } else if self.wall_jump_timer > 0.0 {
            Authority::WallJump
        } else if self.weapon.is_attacking() {
            Authority::Attack
        } else {
            Authority::Input
        }
    }

    /// Wall currently gripped: touched while descending or climbing.
    #[must_use]
    pub fn gripped_wall(&self) -> Option<WallSide> {
        let descending = !self.body.is_grounded() && self.body.velocity().y <= 0.0;
        self.wall
            .filter(|_| self.body.is_climbing() || descending)
    }

    // =========================================================================
    // Phase 1: intent
    // =========================================================================

    /// Reads input and sets up this frame's motion and attacks.
    ///
    /// `dt` must already be validated; [`Player::advance`] and the world do so.
    pub fn intent(&mut self, dt: f32, input: &InputFrame, platforms: &[Aabb]) {
        self.clock += dt;
        if !self.update_lifecycle(dt) {
            self.walking = false;
            return;
        }

        self.dash_timer = tick_down(self.dash_timer, dt);
        self.dash_cooldown = tick_down(self.dash_cooldown, dt);
        self.wall_jump_timer = tick_down(self.wall_jump_timer, dt);

        if let Some(kind) = input.weapon_select {
            self.select_weapon(kind);
        }

        let direction = input.move_direction();
        self.wall = self.body.wall_contact(platforms, self.config.wall_threshold);

        let mut dash = input.pressed.contains(Buttons::DASH);
        let mut tapped = None;
        for (button, side) in [(Buttons::LEFT, Facing::Left), (Buttons::RIGHT, Facing::Right)] {
            if input.pressed.contains(button)
                && self
                    .taps
                    .press(side, self.clock, self.config.double_tap_window)
            {
                dash = true;
                tapped = Some(side);
            }
        }
        if dash {
            self.try_dash(tapped.or(direction).unwrap_or(self.facing));
        }

        if input.pressed.contains(Buttons::JUMP) {
            self.jump();
        }
        if input.pressed.contains(Buttons::ATTACK) {
            self.trigger_attack();
        }

        self.drive(direction, platforms);
        self.update_wall_grip(direction, input.climb_axis());
    }

    fn update_lifecycle(&mut self, dt: f32) -> bool {
        match self.lifecycle {
            Lifecycle::Alive => true,
            Lifecycle::Dying { remaining } => {
                let remaining = tick_down(remaining, dt);
                if remaining > 0.0 {
                    self.lifecycle = Lifecycle::Dying { remaining };
                } else {
                    debug!(player = %self.id, "respawn pending");
                    self.lifecycle = Lifecycle::RespawnPending;
                }
                false
            }
            Lifecycle::RespawnPending => match self.config.respawn {
                RespawnPolicy::Automatic => self.respawn(),
                RespawnPolicy::Manual => false,
            },
        }
    }

    /// Starts a dash if neither a dash nor its cooldown is running.
    pub fn try_dash(&mut self, direction: Facing) -> bool {
        if self.dash_timer > 0.0 || self.dash_cooldown > 0.0 {
            return false;
        }
        self.dash_timer = self.config.dash_duration;
        self.dash_cooldown = self.config.dash_cooldown;
        self.dash_direction = direction;
        self.facing = direction;
        self.body.set_climbing(false);
        debug!(player = %self.id, ?direction, "dash");
        true
    }

    /// Wall-jump when gripping a wall, otherwise a ground or air jump.
    ///
    /// Returns `false` when no jumps are left and no wall is gripped.
    pub fn jump(&mut self) -> bool {
        if let Some(wall) = self.gripped_wall() {
            let away = wall.away();
            self.body.set_climbing(false);
            self.body
                .set_velocity(Axis::Y, self.config.jump_speed + self.config.wall_jump_bonus);
            self.body
                .set_velocity(Axis::X, away.sign() * self.config.wall_jump_push);
            self.body.set_jumps_used(self.config.max_jumps);
            self.facing = away;
            self.wall_jump_timer = self.config.wall_jump_lock;
            trace!(player = %self.id, ?wall, "wall jump");
            return true;
        }
        if self.body.jumps_used() < self.config.max_jumps {
            self.body.jump(self.config.jump_speed);
            return true;
        }
        false
    }

    /// Arms the weapon, or queues one follow-up if an attack is running.
    pub fn trigger_attack(&mut self) -> bool {
        if self.weapon.is_attacking() {
            if !self.attack_queued {
                trace!(player = %self.id, "attack queued");
                self.attack_queued = true;
            }
            return true;
        }
        let pivot = self.pivot();
        self.weapon.arm(pivot, self.facing)
    }

    /// Equips a fresh weapon of `kind`.
    ///
    /// Ignored while an attack is running or queued, or if `kind` is already
    /// equipped.
    pub fn select_weapon(&mut self, kind: WeaponKind) -> bool {
        if self.weapon.is_attacking() || self.attack_queued || self.weapon.kind() == kind {
            return false;
        }
        debug!(player = %self.id, from = %self.weapon.kind(), to = %kind, "weapon swap");
        self.weapon = Weapon::from_kind(kind, &self.weapons);
        true
    }

    fn drive(&mut self, direction: Option<Facing>, platforms: &[Aabb]) {
        self.walking = false;
        match self.authority() {
            Authority::Dash => {
                let vx = self.dash_direction.sign() * self.config.dash_speed;
                self.body.set_velocity(Axis::X, vx);
            }
            Authority::WallJump => {}
            Authority::Attack => {
                if let Some(direction) = direction {
                    let vx =
                        direction.sign() * self.config.move_speed * self.config.attack_move_factor;
                    self.body.set_velocity(Axis::X, vx);
                    self.body.try_step_up(platforms, direction.is_right());
                }
            }
            Authority::Input => {
                if let Some(direction) = direction {
                    self.facing = direction;
                    self.body
                        .set_velocity(Axis::X, direction.sign() * self.config.move_speed);
                    self.walking = true;
                    self.body.try_step_up(platforms, direction.is_right());
                }
            }
        }
    }

    fn update_wall_grip(&mut self, direction: Option<Facing>, climb_axis: f32) {
        let wall = self.wall.filter(|_| !self.body.is_grounded());
        let Some(wall) = wall.filter(|_| self.dash_timer <= 0.0) else {
            self.body.set_climbing(false);
            return;
        };
        let pressing = direction == Some(wall.towards());
        let climb_speed = climb_axis * self.config.climb_speed;

        if self.body.is_climbing() {
            if pressing {
                self.body.set_climb_speed(climb_speed);
            } else {
                self.body.set_climbing(false);
            }
        } else if self.body.velocity().y <= 0.0 {
            if pressing {
                self.body.set_climbing(true);
                self.body.set_climb_speed(climb_speed);
            } else {
                self.body.cap_fall_speed(self.config.wall_slide_speed);
            }
        }
    }

    // =========================================================================
    // Phase 2: weapon
    // =========================================================================

    /// Advances the weapon and starts a queued follow-up the instant the
    /// running attack ends.
    pub fn update_weapon(&mut self, dt: f32) {
        let pivot = self.pivot();
        self.weapon.update(dt, pivot, self.facing);
        if self.attack_queued && self.weapon.just_finished() {
            self.attack_queued = false;
            if self.is_alive() {
                self.weapon.chain_attack(pivot, self.facing);
            }
        }
    }

    // =========================================================================
    // Phase 3: movement
    // =========================================================================

    /// Integrates and collides the body, then refreshes the movement state.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NegativeDelta`] for an invalid `dt`.
    pub fn move_body(&mut self, dt: f32, platforms: &[Aabb]) -> Result<Contacts, SimError> {
        self.body.integrate(dt)?;
        let contacts = self.body.resolve_collisions(platforms);
        if let Some(extent) = self.level_extent {
            self.body.clamp_to(extent);
        }
        self.wall = self.body.wall_contact(platforms, self.config.wall_threshold);
        self.refresh_movement();
        Ok(contacts)
    }

    /// Pushes the player out of another body along the shallowest axis.
    pub fn separate_from(&mut self, other: &Aabb) -> bool {
        self.body.separate_from(other).is_some()
    }

    fn refresh_movement(&mut self) {
        let next = if self.dash_timer > 0.0 {
            Movement::Dash
        } else if self.weapon.is_attacking() {
            Movement::Attack
        } else if self.gripped_wall().is_some() {
            Movement::WallSlide
        } else if !self.body.is_grounded() {
            Movement::Airborne
        } else if self.walking {
            Movement::Walk
        } else {
            Movement::Idle
        };
        if next != self.movement {
            trace!(player = %self.id, from = ?self.movement, to = ?next, "movement");
            self.movement = next;
        }
    }

    // =========================================================================
    // Phase 4: damage
    // =========================================================================

    /// Applies the weapon to `targets`, gated by the damage window.
    pub fn strike<T: Target>(&mut self, targets: &mut [T]) -> Vec<Hit> {
        self.weapon.strike(targets)
    }

    /// Takes damage while alive; reaching zero starts dying.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health > 0.0 {
            return DamageOutcome::Wounded;
        }
        self.lifecycle = Lifecycle::Dying {
            remaining: self.config.death_delay,
        };
        self.attack_queued = false;
        self.body.set_climbing(false);
        debug!(player = %self.id, "died");
        DamageOutcome::Killed
    }

    // =========================================================================
    // Respawn
    // =========================================================================

    /// Resets the player at the spawn point if a respawn is pending.
    pub fn respawn(&mut self) -> bool {
        if self.lifecycle != Lifecycle::RespawnPending {
            return false;
        }
        self.reset();
        info!(player = %self.id, x = self.spawn.x, y = self.spawn.y, "respawned");
        true
    }

    fn reset(&mut self) {
        self.body.reset(self.spawn);
        self.health = self.config.max_health;
        self.lifecycle = Lifecycle::Alive;
        self.movement = Movement::Idle;
        self.facing = Facing::Right;
        self.taps.clear();
        self.dash_timer = 0.0;
        self.dash_cooldown = 0.0;
        self.wall_jump_timer = 0.0;
        self.wall = None;
        self.attack_queued = false;
        self.walking = false;
        self.weapon.reset();
    }

    // =========================================================================
    // Standalone tick
    // =========================================================================

    /// Runs one complete frame for this player against `enemies`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NegativeDelta`] for a negative or non-finite `dt`.
    pub fn advance(
        &mut self,
        dt: f32,
        input: &InputFrame,
        platforms: &[Aabb],
        enemies: &mut [Enemy],
    ) -> Result<Vec<Hit>, SimError> {
        let dt = check_delta(dt)?;
        self.intent(dt, input, platforms);
        self.update_weapon(dt);
        self.move_body(dt, platforms)?;
        for enemy in enemies.iter().filter(|e| e.is_alive()) {
            self.separate_from(&enemy.bounds());
        }
        Ok(self.strike(enemies))
    }
}

impl Target for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }

    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        Player::take_damage(self, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Vec<Aabb> {
        vec![Aabb::new(0.0, 0.0, 2000.0, 20.0)]
    }

    fn walled() -> Vec<Aabb> {
        vec![
            Aabb::new(0.0, 0.0, 2000.0, 20.0),
            Aabb::new(500.0, 0.0, 40.0, 1000.0),
        ]
    }

    fn player_with(config: SimConfig, spawn: Vec2) -> Player {
        Player::new(EntityId::new(1), &config, spawn).unwrap()
    }

    fn player_at(spawn: Vec2) -> Player {
        player_with(SimConfig::default(), spawn)
    }

    fn tick(player: &mut Player, input: &InputFrame, platforms: &[Aabb]) {
        player.advance(DT, input, platforms, &mut []).unwrap();
    }

    fn idle(player: &mut Player, platforms: &[Aabb], frames: usize) {
        for _ in 0..frames {
            tick(player, &InputFrame::default(), platforms);
        }
    }

    #[test]
    fn negative_delta_is_rejected() {
        let mut player = player_at(Vec2::new(100.0, 20.0));
        let err = player.advance(-DT, &InputFrame::default(), &floor(), &mut []);
        assert!(matches!(err, Err(SimError::NegativeDelta(_))));
    }

    #[test]
    fn walks_and_faces_input() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 2);
        tick(&mut player, &InputFrame::new().hold(Buttons::LEFT), &platforms);
        assert_eq!(player.facing(), Facing::Left);
        assert_eq!(player.velocity().x, -200.0);
        assert_eq!(player.pose(), Pose::Walk);

        // Released: drag takes over.
        tick(&mut player, &InputFrame::default(), &platforms);
        assert!(player.velocity().x > -200.0);
        assert!(player.velocity().x < 0.0);
    }

    #[test]
    fn double_jump_then_nothing() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 2);
        let jump = InputFrame::new().press(Buttons::JUMP);

        assert!(player.jump());
        assert!(player.jump());
        assert!(!player.jump());
        assert_eq!(player.body().jumps_used(), 2);

        tick(&mut player, &jump, &platforms);
        assert_eq!(player.pose(), Pose::Airborne);
        idle(&mut player, &platforms, 120);
        assert_eq!(player.body().jumps_used(), 0);
        assert_eq!(player.pose(), Pose::Idle);
    }

    #[test]
    fn lethal_damage_dies_once() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(100.0, 20.0));
        assert_eq!(player.take_damage(1100.0), DamageOutcome::Killed);
        assert_eq!(player.health(), 0.0);
        assert!(matches!(player.lifecycle(), Lifecycle::Dying { .. }));
        assert_eq!(player.take_damage(5.0), DamageOutcome::Ignored);
        assert_eq!(player.pose(), Pose::Dying);

        for _ in 0..59 {
            tick(&mut player, &InputFrame::default(), &platforms);
            assert!(matches!(player.lifecycle(), Lifecycle::Dying { .. }));
        }
        tick(&mut player, &InputFrame::default(), &platforms);
        assert_eq!(player.lifecycle(), Lifecycle::RespawnPending);
        assert_eq!(player.pose(), Pose::Dead);

        tick(&mut player, &InputFrame::default(), &platforms);
        assert!(player.is_alive());
        assert_eq!(player.health(), 100.0);
    }

    #[test]
    fn manual_respawn_waits_for_host() {
        let platforms = floor();
        let mut config = SimConfig::default();
        config.player.respawn = RespawnPolicy::Manual;
        config.player.death_delay = 0.1;
        let mut player = player_with(config, Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 5);
        player.take_damage(200.0);
        idle(&mut player, &platforms, 30);
        assert_eq!(player.lifecycle(), Lifecycle::RespawnPending);

        assert!(player.respawn());
        assert!(player.is_alive());
        assert_eq!(player.bounds().min(), Vec2::new(100.0, 20.0));
        assert!(!player.respawn());
    }

    #[test]
    fn partial_damage_wounds() {
        let mut player = player_at(Vec2::new(100.0, 20.0));
        assert_eq!(player.take_damage(30.0), DamageOutcome::Wounded);
        assert_eq!(player.health(), 70.0);
        assert!(player.is_alive());
    }

    #[test]
    fn second_trigger_is_queued_and_chained() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 2);
        let attack = InputFrame::new().press(Buttons::ATTACK);

        for frame in 0..36 {
            let input = if frame == 0 || frame == 5 {
                attack
            } else {
                InputFrame::default()
            };
            tick(&mut player, &input, &platforms);
            if frame == 5 {
                assert!(player.is_attack_queued());
            }
            if frame == 17 {
                // First swing ended this frame; the follow-up starts at once.
                assert!(player.weapon().is_attacking());
                assert_eq!(player.weapon().progress(), 0.0);
                assert!(!player.is_attack_queued());
            }
            if frame < 35 {
                assert!(player.weapon().is_attacking(), "frame {frame}");
            } else {
                assert!(!player.weapon().is_attacking());
            }
        }
    }

    #[test]
    fn attacking_slows_walking() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 2);
        let input = InputFrame::new()
            .hold(Buttons::RIGHT)
            .press(Buttons::ATTACK);
        tick(&mut player, &input, &platforms);
        assert_eq!(player.authority(), Authority::Attack);
        assert_eq!(player.velocity().x, 100.0);
        assert_eq!(player.pose(), Pose::Attack);
    }

    #[test]
    fn weapon_swap_is_ignored_mid_attack() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 2);
        tick(&mut player, &InputFrame::new().press(Buttons::ATTACK), &platforms);
        tick(
            &mut player,
            &InputFrame::new().select(WeaponKind::Ballistic),
            &platforms,
        );
        assert_eq!(player.weapon().kind(), WeaponKind::Arc);

        idle(&mut player, &platforms, 30);
        tick(
            &mut player,
            &InputFrame::new().select(WeaponKind::Ballistic),
            &platforms,
        );
        assert_eq!(player.weapon().kind(), WeaponKind::Ballistic);
    }

    #[test]
    fn bow_releases_at_window_start() {
        let platforms = floor();
        let mut config = SimConfig::default();
        config.player.starting_weapon = WeaponKind::Ballistic;
        let mut player = player_with(config, Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 2);
        tick(&mut player, &InputFrame::new().press(Buttons::ATTACK), &platforms);
        assert!(player.projectiles().is_empty());
        idle(&mut player, &platforms, 15);
        assert_eq!(player.projectiles().len(), 1);
        assert_eq!(player.take_releases(), 1);
    }

    #[test]
    fn double_tap_dashes() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(100.0, 20.0));
        idle(&mut player, &platforms, 2);
        let tap = InputFrame::new().press(Buttons::RIGHT);
        tick(&mut player, &tap, &platforms);
        idle(&mut player, &platforms, 4);
        tick(&mut player, &tap, &platforms);
        assert_eq!(player.pose(), Pose::Dash);
        assert_eq!(player.velocity().x, 400.0);

        // Cooldown blocks the explicit command.
        idle(&mut player, &platforms, 20);
        assert!(!player.try_dash(Facing::Left));
    }

    #[test]
    fn dash_button_uses_facing() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(300.0, 20.0));
        idle(&mut player, &platforms, 2);
        tick(&mut player, &InputFrame::new().hold(Buttons::LEFT), &platforms);
        tick(&mut player, &InputFrame::new().press(Buttons::DASH), &platforms);
        assert_eq!(player.authority(), Authority::Dash);
        assert_eq!(player.velocity().x, -400.0);
        // Dash lasts 0.15 s.
        idle(&mut player, &platforms, 9);
        assert_ne!(player.authority(), Authority::Dash);
    }

    #[test]
    fn wall_slide_caps_fall_speed() {
        let platforms = walled();
        let mut player = player_at(Vec2::new(467.0, 400.0));
        for _ in 0..20 {
            tick(&mut player, &InputFrame::default(), &platforms);
            assert!(player.velocity().y >= -50.0 - 1e-3);
        }
        assert_eq!(player.pose(), Pose::WallSlide);
    }

    #[test]
    fn wall_jump_pushes_away() {
        let platforms = walled();
        let mut player = player_at(Vec2::new(467.0, 400.0));
        idle(&mut player, &platforms, 5);
        tick(&mut player, &InputFrame::new().press(Buttons::JUMP), &platforms);
        assert_eq!(player.facing(), Facing::Left);
        assert_eq!(player.velocity().x, -500.0);
        assert!(player.velocity().y > 600.0);
        assert_eq!(player.body().jumps_used(), 2);
        assert_eq!(player.authority(), Authority::WallJump);
    }

    #[test]
    fn holding_the_wall_climbs() {
        let platforms = walled();
        let mut player = player_at(Vec2::new(467.0, 400.0));
        let hold = InputFrame::new().hold(Buttons::RIGHT);
        tick(&mut player, &hold, &platforms);
        assert!(player.body().is_climbing());
        let y = player.bounds().y;
        for _ in 0..10 {
            tick(&mut player, &hold, &platforms);
        }
        assert!((player.bounds().y - y).abs() < 1e-3);

        let up = hold.hold(Buttons::UP);
        for _ in 0..30 {
            tick(&mut player, &up, &platforms);
        }
        assert!(player.bounds().y > y + 30.0);

        // Letting go ends the climb.
        tick(&mut player, &InputFrame::default(), &platforms);
        assert!(!player.body().is_climbing());
    }

    fn curb() -> Vec<Aabb> {
        vec![
            Aabb::new(0.0, 0.0, 2000.0, 20.0),
            Aabb::new(300.0, 20.0, 400.0, 10.0),
        ]
    }

    #[test]
    fn jumping_into_a_curb_lands_instead_of_clinging() {
        let platforms = curb();
        let right = InputFrame::new().hold(Buttons::RIGHT);
        let jump = right.press(Buttons::JUMP);
        for i in 0..80u8 {
            let start = 150.0 + f32::from(i) * 1.5;
            let mut player = player_at(Vec2::new(start, 20.0));
            idle(&mut player, &platforms, 2);
            tick(&mut player, &jump, &platforms);
            for _ in 0..90 {
                tick(&mut player, &right, &platforms);
                assert!(!player.body().is_climbing(), "start {start}");
                assert_ne!(player.pose(), Pose::WallSlide, "start {start}");
            }
            assert!(player.body().is_grounded(), "start {start}");
            assert!((player.bounds().y - 30.0).abs() < 1e-3, "start {start}");
        }
    }

    #[test]
    fn attacking_walk_steps_onto_a_curb() {
        let platforms = curb();
        let mut player = player_at(Vec2::new(250.0, 20.0));
        idle(&mut player, &platforms, 2);
        let swing = InputFrame::new()
            .hold(Buttons::RIGHT)
            .press(Buttons::ATTACK);
        for frame in 0..60 {
            tick(&mut player, &swing, &platforms);
            assert!(player.weapon().is_attacking(), "frame {frame}");
        }
        assert!((player.bounds().y - 30.0).abs() < 1e-3);
        assert!(player.bounds().x > 300.0);
    }

    #[test]
    fn level_extent_clamps_position() {
        let platforms = floor();
        let mut player = player_at(Vec2::new(5.0, 20.0));
        player.set_level_extent(Some(Vec2::new(800.0, 600.0)));
        for _ in 0..30 {
            tick(&mut player, &InputFrame::new().hold(Buttons::LEFT), &platforms);
        }
        assert_eq!(player.bounds().x, 0.0);
    }
}
