//! Behavior-driven adversaries.
//!
//! There is one enemy controller; variety comes from [`EnemyProfile`] data.
//! Each frame the controller picks a [`Behavior`] from the squared distance
//! between its centre and the target's:
//!
//! ```text
//!            d <= attack_range        d <= detection_range        otherwise
//!   ──────── Attack ────────────────── Chase ──────────────────── Patrol
//! ```
//!
//! - **Patrol** walks back and forth within `patrol_radius` of the spawn x,
//!   turning at the band edge, at ledges and at walls it cannot step onto.
//! - **Chase** walks towards the target, stepping onto low ledges and jumping
//!   at taller obstacles.
//! - **Attack** stands still, faces the target and re-arms its weapon
//!   whenever the cooldown allows.
//!
//! Dead enemies do nothing; the world removes them the frame they die.

use glam::Vec2;
use tracing::{debug, trace};

use crate::config::{EnemyProfile, WeaponSet};
use crate::entity::{EntityId, Facing};
use crate::error::{check_delta, SimError};
use crate::geometry::Aabb;
use crate::physics::{Axis, Contacts, KinematicBody, Obstacle};
use crate::player::Player;
use crate::weapon::{Armament, DamageOutcome, Hit, Target, Weapon};

/// Enemy behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Wander around the spawn point
    #[default]
    Patrol,
    /// Close in on the target
    Chase,
    /// Swing at the target
    Attack,
}

/// An adversary.
#[derive(Debug, Clone)]
pub struct Enemy {
    id: EntityId,
    profile_name: String,
    profile: EnemyProfile,
    body: KinematicBody,
    weapon: Weapon,
    health: f32,
    alive: bool,
    behavior: Behavior,
    facing: Facing,
    spawn_x: f32,
}

impl Enemy {
    /// Creates an enemy standing at `position` (bottom-left corner).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidBodySize`] if the profile size is not
    /// positive.
    pub fn new(
        id: EntityId,
        profile_name: &str,
        profile: &EnemyProfile,
        weapons: &WeaponSet,
        position: Vec2,
    ) -> Result<Self, SimError> {
        let body = KinematicBody::new(&profile.body, position, profile.size)?;
        Ok(Self {
            id,
            profile_name: profile_name.to_string(),
            profile: *profile,
            body,
            weapon: Weapon::from_kind(profile.weapon, weapons),
            health: profile.max_health,
            alive: true,
            behavior: Behavior::Patrol,
            facing: Facing::Right,
            spawn_x: position.x,
        })
    }

    /// Entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Name of the profile this enemy was built from.
    #[must_use]
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Behavior data.
    #[must_use]
    pub fn profile(&self) -> &EnemyProfile {
        &self.profile
    }

    /// Hitbox.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    /// Centre of the body; also the weapon pivot.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Underlying body.
    #[must_use]
    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    /// Carried weapon.
    #[must_use]
    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Active melee hitbox, if any.
    #[must_use]
    pub fn hitbox(&self) -> Option<Aabb> {
        self.weapon.hitbox()
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// False once health has reached zero.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current behavior.
    #[must_use]
    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Facing direction.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Re-evaluates the behavior state from the target's position.
    ///
    /// A `None` target (nobody to fight) always means patrol.
    pub fn think(&mut self, target: Option<Vec2>) -> Behavior {
        let next = match target {
            None => Behavior::Patrol,
            Some(target) => {
                let d2 = self.center().distance_squared(target);
                let attack = self.profile.attack_range;
                let detect = self.profile.detection_range;
                if d2 <= attack * attack {
                    Behavior::Attack
                } else if d2 <= detect * detect {
                    Behavior::Chase
                } else {
                    Behavior::Patrol
                }
            }
        };
        if next != self.behavior {
            debug!(enemy = %self.id, from = ?self.behavior, to = ?next, "behavior");
            self.behavior = next;
        }
        next
    }

    /// Chooses this frame's motion and attacks.
    pub fn intent(&mut self, platforms: &[Aabb], target: Option<Vec2>) {
        if !self.alive {
            return;
        }
        match (self.think(target), target) {
            (Behavior::Chase, Some(target)) => self.chase(platforms, target),
            (Behavior::Attack, Some(target)) => self.attack(target),
            _ => self.patrol(platforms),
        }
    }

    fn patrol(&mut self, platforms: &[Aabb]) {
        let x = self.body.position().x;
        let radius = self.profile.patrol_radius;
        let past_band = match self.facing {
            Facing::Right => x >= self.spawn_x + radius,
            Facing::Left => x <= self.spawn_x - radius,
        };
        let ledge =
            self.body.is_grounded() && !self.body.has_ground_ahead(platforms, self.facing);
        let ahead = self.body.probe_ahead(platforms, self.facing);

        if past_band || ledge || ahead == Obstacle::Wall {
            self.facing = self.facing.flipped();
        } else if let Obstacle::Step(_) = ahead {
            self.body.try_step_up(platforms, self.facing.is_right());
        }
        self.body
            .set_velocity(Axis::X, self.facing.sign() * self.profile.patrol_speed);
    }

    fn chase(&mut self, platforms: &[Aabb], target: Vec2) {
        let Some(direction) = Facing::towards(self.center().x, target.x) else {
            self.body.set_velocity(Axis::X, 0.0);
            return;
        };
        self.facing = direction;
        match self.body.probe_ahead(platforms, direction) {
            Obstacle::Step(_) => {
                self.body.try_step_up(platforms, direction.is_right());
            }
            Obstacle::Wall if self.body.is_grounded() => {
                trace!(enemy = %self.id, "jumping obstacle");
                self.body.jump(self.profile.jump_speed);
            }
            Obstacle::Wall | Obstacle::None => {}
        }
        self.body
            .set_velocity(Axis::X, direction.sign() * self.profile.chase_speed);
    }

    fn attack(&mut self, target: Vec2) {
        self.body.set_velocity(Axis::X, 0.0);
        if let Some(direction) = Facing::towards(self.center().x, target.x) {
            self.facing = direction;
        }
        if !self.weapon.is_attacking() && self.weapon.cooldown_remaining() <= 0.0 {
            let pivot = self.center();
            if self.weapon.arm(pivot, self.facing) {
                trace!(enemy = %self.id, kind = %self.weapon.kind(), "attack");
            }
        }
    }

    /// Advances the weapon.
    pub fn update_weapon(&mut self, dt: f32) {
        let pivot = self.center();
        self.weapon.update(dt, pivot, self.facing);
    }

    /// Projectiles released since the last call.
    pub fn take_releases(&mut self) -> u32 {
        self.weapon.take_releases()
    }

    /// Integrates and collides the body.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NegativeDelta`] for an invalid `dt`.
    pub fn move_body(&mut self, dt: f32, platforms: &[Aabb]) -> Result<Contacts, SimError> {
        if !self.alive {
            return Ok(Contacts::empty());
        }
        self.body.integrate(dt)?;
        Ok(self.body.resolve_collisions(platforms))
    }

    /// Applies the weapon to one target, gated by the damage window.
    pub fn strike<T: Target>(&mut self, target: &mut T) -> Vec<Hit> {
        if !self.alive {
            return Vec::new();
        }
        self.weapon.strike(std::slice::from_mut(target))
    }

    /// Takes damage; reaching zero health kills the enemy.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health > 0.0 {
            return DamageOutcome::Wounded;
        }
        self.alive = false;
        self.body.set_velocity(Axis::X, 0.0);
        debug!(enemy = %self.id, profile = %self.profile_name, "killed");
        DamageOutcome::Killed
    }

    /// Runs one complete frame against `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NegativeDelta`] for a negative or non-finite `dt`.
    pub fn advance(
        &mut self,
        dt: f32,
        platforms: &[Aabb],
        target: &mut Player,
    ) -> Result<Vec<Hit>, SimError> {
        let dt = check_delta(dt)?;
        if !self.alive {
            return Ok(Vec::new());
        }
        let aim = target.is_alive().then(|| target.pivot());
        self.intent(platforms, aim);
        self.update_weapon(dt);
        self.move_body(dt, platforms)?;
        Ok(self.strike(target))
    }
}

impl Target for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        Enemy::take_damage(self, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Vec<Aabb> {
        vec![Aabb::new(0.0, 0.0, 2000.0, 20.0)]
    }

    fn goblin_at(x: f32, y: f32) -> Enemy {
        Enemy::new(
            EntityId::new(2),
            "goblin",
            &EnemyProfile::goblin(),
            &WeaponSet::default(),
            Vec2::new(x, y),
        )
        .unwrap()
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(EntityId::new(1), &SimConfig::default(), Vec2::new(x, y)).unwrap()
    }

    fn patrol(enemy: &mut Enemy, platforms: &[Aabb], frames: usize) -> (f32, f32) {
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..frames {
            enemy.intent(platforms, None);
            enemy.update_weapon(DT);
            enemy.move_body(DT, platforms).unwrap();
            min_x = min_x.min(enemy.bounds().x);
            max_x = max_x.max(enemy.bounds().x);
        }
        (min_x, max_x)
    }

    #[test]
    fn rejects_degenerate_profile() {
        let profile = EnemyProfile {
            size: Vec2::new(10.0, 0.0),
            ..EnemyProfile::goblin()
        };
        let result = Enemy::new(
            EntityId::new(1),
            "flat",
            &profile,
            &WeaponSet::default(),
            Vec2::ZERO,
        );
        assert!(matches!(result, Err(SimError::InvalidBodySize { .. })));
    }

    #[test]
    fn patrol_stays_inside_band() {
        let platforms = floor();
        let mut goblin = goblin_at(500.0, 20.0);
        let (min_x, max_x) = patrol(&mut goblin, &platforms, 900);
        assert!(max_x >= 619.0 && max_x <= 622.0, "max {max_x}");
        assert!(min_x <= 381.0 && min_x >= 378.0, "min {min_x}");
        assert_eq!(goblin.behavior(), Behavior::Patrol);
    }

    #[test]
    fn patrol_turns_at_ledges() {
        let platforms = vec![Aabb::new(0.0, 0.0, 300.0, 20.0)];
        let mut goblin = goblin_at(200.0, 20.0);
        let (_, max_x) = patrol(&mut goblin, &platforms, 600);
        assert!(max_x + 36.0 <= 302.0, "max right edge {}", max_x + 36.0);
        assert_eq!(goblin.bounds().y, 20.0);
    }

    #[test]
    fn patrol_turns_at_walls() {
        let platforms = vec![
            Aabb::new(0.0, 0.0, 2000.0, 20.0),
            Aabb::new(560.0, 20.0, 20.0, 100.0),
        ];
        let mut goblin = goblin_at(500.0, 20.0);
        let (_, max_x) = patrol(&mut goblin, &platforms, 600);
        assert!(max_x + 36.0 <= 560.0);
    }

    #[test]
    fn behavior_follows_distance() {
        let mut goblin = goblin_at(300.0, 20.0);
        let c = goblin.center();
        assert_eq!(goblin.think(Some(c + Vec2::new(40.0, 0.0))), Behavior::Attack);
        assert_eq!(goblin.think(Some(c + Vec2::new(200.0, 0.0))), Behavior::Chase);
        assert_eq!(goblin.think(Some(c + Vec2::new(0.0, 300.0))), Behavior::Patrol);
        assert_eq!(goblin.think(None), Behavior::Patrol);
    }

    #[test]
    fn chases_towards_target() {
        let platforms = floor();
        let mut goblin = goblin_at(300.0, 20.0);
        let mut player = player_at(150.0, 20.0);
        goblin.advance(DT, &platforms, &mut player).unwrap();
        assert_eq!(goblin.behavior(), Behavior::Chase);
        assert_eq!(goblin.facing(), Facing::Left);
        assert_eq!(goblin.body().velocity().x, -110.0);
    }

    #[test]
    fn attacks_in_range_once_per_swing() {
        let platforms = floor();
        let mut goblin = goblin_at(300.0, 20.0);
        let mut player = player_at(340.0, 20.0);

        goblin.advance(DT, &platforms, &mut player).unwrap();
        assert_eq!(goblin.behavior(), Behavior::Attack);
        assert_eq!(goblin.body().velocity().x, 0.0);
        assert!(goblin.weapon().is_attacking());

        for _ in 1..30 {
            goblin.advance(DT, &platforms, &mut player).unwrap();
        }
        assert_eq!(player.health(), 80.0);

        for _ in 30..60 {
            goblin.advance(DT, &platforms, &mut player).unwrap();
        }
        assert_eq!(player.health(), 60.0);
    }

    #[test]
    fn ignores_dead_player() {
        let platforms = floor();
        let mut goblin = goblin_at(300.0, 20.0);
        let mut player = player_at(340.0, 20.0);
        player.take_damage(1000.0);
        goblin.advance(DT, &platforms, &mut player).unwrap();
        assert_eq!(goblin.behavior(), Behavior::Patrol);
        assert!(!goblin.weapon().is_attacking());
    }

    #[test]
    fn steps_onto_low_ledge_while_chasing() {
        let platforms = vec![
            Aabb::new(0.0, 0.0, 2000.0, 20.0),
            Aabb::new(360.0, 20.0, 400.0, 10.0),
        ];
        let mut goblin = goblin_at(300.0, 20.0);
        let mut player = player_at(480.0, 30.0);
        for _ in 0..120 {
            goblin.advance(DT, &platforms, &mut player).unwrap();
        }
        assert_eq!(goblin.bounds().y, 30.0);
    }

    #[test]
    fn jumps_at_tall_obstacles_while_chasing() {
        let platforms = vec![
            Aabb::new(0.0, 0.0, 2000.0, 20.0),
            Aabb::new(380.0, 20.0, 20.0, 30.0),
        ];
        let mut goblin = goblin_at(300.0, 20.0);
        let mut player = player_at(480.0, 20.0);
        let mut peak = 0.0_f32;
        for _ in 0..120 {
            goblin.advance(DT, &platforms, &mut player).unwrap();
            peak = peak.max(goblin.bounds().y);
        }
        assert!(peak > 50.0, "peak {peak}");
    }

    #[test]
    fn dies_at_zero_health() {
        let platforms = floor();
        let mut goblin = goblin_at(300.0, 20.0);
        assert_eq!(goblin.take_damage(30.0), DamageOutcome::Wounded);
        assert_eq!(goblin.take_damage(100.0), DamageOutcome::Killed);
        assert_eq!(goblin.health(), 0.0);
        assert!(!goblin.is_alive());
        assert_eq!(goblin.take_damage(10.0), DamageOutcome::Ignored);

        let mut player = player_at(340.0, 20.0);
        let before = goblin.bounds();
        assert!(goblin.advance(DT, &platforms, &mut player).unwrap().is_empty());
        assert_eq!(goblin.bounds(), before);
    }
}
