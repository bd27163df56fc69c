//! World orchestrator with the five-phase frame loop.
//!
//! The [`World`] owns the static platforms, the player and the enemy list,
//! and fixes the order in which one frame runs:
//!
//! 1. **INTENT**: player reads input; enemies choose behavior against the
//!    player's pivot (or patrol when the player is not alive)
//! 2. **WEAPONS**: attack clocks tick, hitboxes follow their pivots,
//!    projectiles fly
//! 3. **MOTION**: enemies then player integrate and collide with platforms;
//!    the player is pushed out of living enemies
//! 4. **DAMAGE**: player strike on enemies, enemy strikes on the player,
//!    contact damage
//! 5. **SWEEP**: dead enemies are removed, the fall-death timer runs,
//!    lifecycle changes become events
//!
//! # Determinism
//!
//! Enemies are stored in spawn order and ids are handed out monotonically,
//! so identical configs, layouts and input sequences produce identical
//! frames. [`World::state_hash`] fingerprints the observable state for
//! replay checks.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgefall_core::config::{EnemySpawn, LevelLayout, SimConfig};
//! use ledgefall_core::geometry::Aabb;
//! use ledgefall_core::input::InputFrame;
//! use ledgefall_core::world::World;
//!
//! let layout = LevelLayout {
//!     platforms: vec![Aabb::new(0.0, 0.0, 2000.0, 20.0)],
//!     player_spawn: Some(Vec2::new(100.0, 20.0)),
//!     enemies: vec![EnemySpawn {
//!         profile: "goblin".into(),
//!         position: Vec2::new(900.0, 20.0),
//!     }],
//!     ..LevelLayout::default()
//! };
//! let mut world = World::new(SimConfig::default(), layout).unwrap();
//!
//! for _ in 0..10 {
//!     world.step(1.0 / 60.0, &InputFrame::default()).unwrap();
//! }
//!
//! assert_eq!(world.tick(), 10);
//! assert_eq!(world.enemies().len(), 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::{LevelLayout, SimConfig};
use crate::enemy::Enemy;
use crate::entity::{EntityId, EntityTag};
use crate::error::{check_delta, SimError};
use crate::geometry::Aabb;
use crate::input::InputFrame;
use crate::player::{Lifecycle, Player};
use crate::weapon::{tick_down, DamageOutcome, Hit};

/// Id of the player in every world.
pub const PLAYER_ID: EntityId = EntityId::new(1);

// =============================================================================
// Events
// =============================================================================

/// Where a point of damage came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DamageCause {
    /// A weapon hitbox or projectile
    Weapon {
        /// Entity wielding the weapon
        attacker: EntityId,
    },
    /// Touching a living enemy
    Contact {
        /// Enemy touched
        enemy: EntityId,
    },
    /// Staying below the kill plane
    Fall,
    /// [`World::damage_player`]
    External,
}

/// Something observable that happened during a frame.
///
/// Hosts use these to trigger sounds, particles and UI updates without
/// diffing state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum FrameEvent {
    /// Health was reduced.
    Damaged {
        /// Entity hit
        target: EntityId,
        /// Its controller
        tag: EntityTag,
        /// Damage requested (before clamping to remaining health)
        amount: f32,
        /// Source
        cause: DamageCause,
    },
    /// Health reached zero.
    Killed {
        /// Entity killed
        target: EntityId,
        /// Its controller
        tag: EntityTag,
    },
    /// A dead enemy left the world.
    Removed {
        /// Enemy removed
        target: EntityId,
    },
    /// A ballistic weapon let go of a projectile.
    ProjectileReleased {
        /// Entity that fired
        owner: EntityId,
    },
    /// The player came back at the spawn point.
    Respawned {
        /// Player id
        target: EntityId,
    },
}

fn record_player_damage(
    events: &mut Vec<FrameEvent>,
    target: EntityId,
    amount: f32,
    outcome: DamageOutcome,
    cause: DamageCause,
) {
    if outcome == DamageOutcome::Ignored {
        return;
    }
    events.push(FrameEvent::Damaged {
        target,
        tag: EntityTag::Player,
        amount,
        cause,
    });
    if outcome == DamageOutcome::Killed {
        events.push(FrameEvent::Killed {
            target,
            tag: EntityTag::Player,
        });
    }
}

fn record_hits(events: &mut Vec<FrameEvent>, hits: &[Hit], tag: EntityTag, attacker: EntityId) {
    for hit in hits {
        events.push(FrameEvent::Damaged {
            target: hit.target,
            tag,
            amount: hit.damage,
            cause: DamageCause::Weapon { attacker },
        });
        if hit.killed {
            events.push(FrameEvent::Killed {
                target: hit.target,
                tag,
            });
        }
    }
}

// =============================================================================
// World
// =============================================================================

/// Owns the level geometry and every entity, and runs whole frames.
#[derive(Debug)]
pub struct World {
    /// Tuning the world was built with.
    config: SimConfig,
    /// Static collision rectangles.
    platforms: Vec<Aabb>,
    /// The single player.
    player: Player,
    /// Living enemies in spawn order.
    enemies: Vec<Enemy>,
    /// Next id handed to a spawned enemy.
    next_id: u64,
    /// Frames stepped so far.
    tick: u64,
    /// Events of the last frame.
    events: Vec<FrameEvent>,
    /// Events raised between frames, emitted with the next one.
    pending: Vec<FrameEvent>,
    /// Contract problems reported while building the world.
    diagnostics: Vec<SimError>,
    /// Time until touching an enemy hurts again.
    contact_cooldown: f32,
    /// Time left below the kill plane before the fall is lethal.
    fall_timer: Option<f32>,
}

impl World {
    /// Builds a world from a config and a level layout.
    ///
    /// A layout without a player spawn is accepted: the player starts at the
    /// origin and the problem is listed in [`World::diagnostics`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] or [`SimError::InvalidBodySize`]
    /// for a config that fails validation or a platform with a non-positive
    /// size, and [`SimError::UnknownEnemyProfile`] for an enemy spawn naming
    /// a profile the config lacks.
    pub fn new(config: SimConfig, layout: LevelLayout) -> Result<Self, SimError> {
        config.validate()?;
        for (index, platform) in layout.platforms.iter().enumerate() {
            if !(platform.w > 0.0 && platform.h > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "platform {index} has a non-positive size {}x{}",
                    platform.w, platform.h
                )));
            }
        }

        let mut diagnostics = Vec::new();
        let spawn = layout.player_spawn.unwrap_or_else(|| {
            let problem = SimError::MissingSpawn { x: 0.0, y: 0.0 };
            warn!(%problem, "level layout");
            diagnostics.push(problem);
            Vec2::ZERO
        });

        let mut player = Player::new(PLAYER_ID, &config, spawn)?;
        player.set_level_extent(layout.bounds);

        let mut world = Self {
            config,
            platforms: layout.platforms,
            player,
            enemies: Vec::with_capacity(layout.enemies.len()),
            next_id: PLAYER_ID.as_u64() + 1,
            tick: 0,
            events: Vec::new(),
            pending: Vec::new(),
            diagnostics,
            contact_cooldown: 0.0,
            fall_timer: None,
        };
        for placement in &layout.enemies {
            world.spawn_enemy(&placement.profile, placement.position)?;
        }
        debug!(
            platforms = world.platforms.len(),
            enemies = world.enemies.len(),
            "world built"
        );
        Ok(world)
    }

    /// Adds an enemy using a named profile and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownEnemyProfile`] if the profile is not in
    /// the config.
    pub fn spawn_enemy(&mut self, profile: &str, position: Vec2) -> Result<EntityId, SimError> {
        let data = self.config.enemy_profile(profile)?;
        let id = EntityId::new(self.next_id);
        let enemy = Enemy::new(id, profile, data, &self.config.weapons, position)?;
        self.next_id += 1;
        self.enemies.push(enemy);
        debug!(enemy = %id, profile, x = position.x, y = position.y, "spawned");
        Ok(id)
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Runs one frame and returns what happened during it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NegativeDelta`] for a negative or non-finite `dt`.
    /// The world is left untouched in that case.
    pub fn step(&mut self, dt: f32, input: &InputFrame) -> Result<&[FrameEvent], SimError> {
        let dt = check_delta(dt)?;
        self.events = std::mem::take(&mut self.pending);
        self.tick += 1;

        self.intent_phase(dt, input);
        self.weapon_phase(dt);
        let touching = self.motion_phase(dt)?;
        self.damage_phase(dt, touching);
        self.sweep_phase(dt);

        trace!(tick = self.tick, events = self.events.len(), "frame");
        Ok(&self.events)
    }

    fn intent_phase(&mut self, dt: f32, input: &InputFrame) {
        let before = self.player.lifecycle();
        self.player.intent(dt, input, &self.platforms);
        if before == Lifecycle::RespawnPending && self.player.is_alive() {
            self.events.push(FrameEvent::Respawned {
                target: self.player.id(),
            });
        }

        let aim = self.player.is_alive().then(|| self.player.pivot());
        for enemy in &mut self.enemies {
            enemy.intent(&self.platforms, aim);
        }
    }

    fn weapon_phase(&mut self, dt: f32) {
        self.player.update_weapon(dt);
        for enemy in &mut self.enemies {
            enemy.update_weapon(dt);
        }
    }

    /// Moves everything and returns the first living enemy the player
    /// overlapped before separation.
    fn motion_phase(&mut self, dt: f32) -> Result<Option<EntityId>, SimError> {
        for enemy in &mut self.enemies {
            enemy.move_body(dt, &self.platforms)?;
        }
        self.player.move_body(dt, &self.platforms)?;

        let bounds = self.player.bounds();
        let touching = self
            .enemies
            .iter()
            .find(|e| e.is_alive() && e.bounds().overlaps(&bounds))
            .map(Enemy::id);
        if self.player.is_alive() {
            for enemy in self.enemies.iter().filter(|e| e.is_alive()) {
                self.player.separate_from(&enemy.bounds());
            }
        }
        Ok(touching)
    }

    fn damage_phase(&mut self, dt: f32, touching: Option<EntityId>) {
        let player_id = self.player.id();

        let hits = self.player.strike(&mut self.enemies);
        record_hits(&mut self.events, &hits, EntityTag::Enemy, player_id);
        for _ in 0..self.player.take_releases() {
            self.events
                .push(FrameEvent::ProjectileReleased { owner: player_id });
        }

        for enemy in &mut self.enemies {
            let attacker = enemy.id();
            let hits = enemy.strike(&mut self.player);
            record_hits(&mut self.events, &hits, EntityTag::Player, attacker);
            for _ in 0..enemy.take_releases() {
                self.events
                    .push(FrameEvent::ProjectileReleased { owner: attacker });
            }
        }

        self.contact_cooldown = tick_down(self.contact_cooldown, dt);
        match touching {
            Some(enemy) if self.player.is_alive() => {
                if self.contact_cooldown <= 0.0 {
                    let amount = self.config.world.contact_damage;
                    let outcome = self.player.take_damage(amount);
                    record_player_damage(
                        &mut self.events,
                        player_id,
                        amount,
                        outcome,
                        DamageCause::Contact { enemy },
                    );
                    self.contact_cooldown = self.config.world.contact_cooldown;
                }
            }
            _ => self.contact_cooldown = 0.0,
        }
    }

    fn sweep_phase(&mut self, dt: f32) {
        let events = &mut self.events;
        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                return true;
            }
            debug!(enemy = %enemy.id(), "removed");
            events.push(FrameEvent::Removed { target: enemy.id() });
            false
        });

        let rules = self.config.world;
        if self.player.is_alive() && self.player.bounds().top() < rules.kill_plane_y {
            let remaining = tick_down(self.fall_timer.unwrap_or(rules.fall_death_delay), dt);
            if remaining <= 0.0 {
                let amount = self.player.health();
                let outcome = self.player.take_damage(amount);
                record_player_damage(
                    &mut self.events,
                    self.player.id(),
                    amount,
                    outcome,
                    DamageCause::Fall,
                );
                self.fall_timer = None;
            } else {
                self.fall_timer = Some(remaining);
            }
        } else {
            self.fall_timer = None;
        }
    }

    // =========================================================================
    // External events
    // =========================================================================

    /// Damages the player from outside the simulation (traps, scripts).
    ///
    /// The resulting events are emitted with the next frame.
    pub fn damage_player(&mut self, amount: f32) -> DamageOutcome {
        let outcome = self.player.take_damage(amount);
        record_player_damage(
            &mut self.pending,
            self.player.id(),
            amount,
            outcome,
            DamageCause::External,
        );
        outcome
    }

    /// Respawns the player if a respawn is pending.
    ///
    /// Used with [`crate::config::RespawnPolicy::Manual`]; the event is
    /// emitted with the next frame.
    pub fn respawn_player(&mut self) -> bool {
        let respawned = self.player.respawn();
        if respawned {
            self.fall_timer = None;
            self.contact_cooldown = 0.0;
            self.pending.push(FrameEvent::Respawned {
                target: self.player.id(),
            });
        }
        respawned
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player, for hosts that move the spawn point (checkpoints).
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Living enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Looks up a living enemy.
    #[must_use]
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    /// Controller of a live entity, if it exists.
    #[must_use]
    pub fn tag_of(&self, id: EntityId) -> Option<EntityTag> {
        if id == self.player.id() {
            Some(EntityTag::Player)
        } else {
            self.enemy(id).map(|_| EntityTag::Enemy)
        }
    }

    /// Static collision rectangles.
    #[must_use]
    pub fn platforms(&self) -> &[Aabb] {
        &self.platforms
    }

    /// Frames stepped so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Events of the most recent frame.
    #[must_use]
    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }

    /// Contract problems reported while building the world.
    #[must_use]
    pub fn diagnostics(&self) -> &[SimError] {
        &self.diagnostics
    }

    /// Tuning the world was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Fingerprint of positions, velocities, health and lifecycle.
    ///
    /// Two worlds fed the same inputs hash equal frame by frame.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);

        hash_aabb(&self.player.bounds(), &mut hasher);
        hash_vec(self.player.velocity(), &mut hasher);
        self.player.health().to_bits().hash(&mut hasher);
        self.player.pose().hash(&mut hasher);
        self.player.facing().hash(&mut hasher);

        for enemy in &self.enemies {
            enemy.id().hash(&mut hasher);
            hash_aabb(&enemy.bounds(), &mut hasher);
            hash_vec(enemy.body().velocity(), &mut hasher);
            enemy.health().to_bits().hash(&mut hasher);
            enemy.behavior().hash(&mut hasher);
        }
        hasher.finish()
    }
}

fn hash_aabb(aabb: &Aabb, hasher: &mut DefaultHasher) {
    for v in [aabb.x, aabb.y, aabb.w, aabb.h] {
        v.to_bits().hash(hasher);
    }
}

fn hash_vec(v: Vec2, hasher: &mut DefaultHasher) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}
