//! Weapons: attack timing, hitbox geometry and hit bookkeeping.
//!
//! A [`Weapon`] is a single struct holding the state every kind shares (attack
//! and cooldown timers, damage, damage window, per-swing hit set) plus a
//! tagged profile carrying the kind-specific geometry:
//!
//! | Kind | Geometry | Hits |
//! |------|----------|------|
//! | [`WeaponKind::Arc`] | square riding a circular arc around the pivot | every overlapping target once per swing |
//! | [`WeaponKind::Thrust`] | shaft growing from the pivot towards facing | every overlapping target once per swing |
//! | [`WeaponKind::Ballistic`] | projectiles under gravity | first overlapping target per projectile |
//!
//! The [`Armament`] trait is the capability controllers program against;
//! [`Target`] is what a weapon can damage.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledgefall_core::config::WeaponSet;
//! use ledgefall_core::entity::Facing;
//! use ledgefall_core::weapon::{Armament, Weapon, WeaponKind};
//!
//! let mut sword = Weapon::from_kind(WeaponKind::Arc, &WeaponSet::default());
//! assert!(sword.start_attack(Vec2::new(100.0, 50.0), Facing::Right));
//! assert!(sword.hitbox().is_some());
//!
//! // Still cooling down: a second start is a no-op.
//! sword.update(0.1, Vec2::new(100.0, 50.0), Facing::Right);
//! assert!(!sword.start_attack(Vec2::new(100.0, 50.0), Facing::Right));
//! ```

mod arc;
mod ballistic;
mod thrust;
mod window;

use std::collections::BTreeSet;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{AttackTiming, WeaponSet};
use crate::entity::{EntityId, Facing};
use crate::geometry::Aabb;

pub use arc::ArcSweep;
pub use ballistic::{Launcher, Projectile};
pub use thrust::ThrustReach;
pub use window::DamageWindow;

/// Timers at or below this value count as expired.
const TIMER_EPSILON: f32 = 1e-5;

// =============================================================================
// Kinds and targets
// =============================================================================

/// Weapon variant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Sword-like sweep
    #[default]
    Arc,
    /// Spear-like thrust
    Thrust,
    /// Bow-like projectile launcher
    Ballistic,
}

impl WeaponKind {
    /// True for the kinds that hit with a hitbox attached to the wielder.
    #[must_use]
    pub const fn is_melee(self) -> bool {
        !matches!(self, WeaponKind::Ballistic)
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeaponKind::Arc => write!(f, "arc"),
            WeaponKind::Thrust => write!(f, "thrust"),
            WeaponKind::Ballistic => write!(f, "ballistic"),
        }
    }
}

/// What a damage application did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was not in a state that accepts damage.
    Ignored,
    /// Target took damage and is still standing.
    Wounded,
    /// This hit brought the target's health to zero.
    Killed,
}

/// Anything a weapon can hurt.
pub trait Target {
    /// Stable identity used for per-swing hit bookkeeping.
    fn id(&self) -> EntityId;

    /// Current hurtbox.
    fn bounds(&self) -> Aabb;

    /// Dead targets are skipped by every weapon.
    fn is_alive(&self) -> bool;

    /// Applies damage, clamping health at zero.
    fn take_damage(&mut self, amount: f32) -> DamageOutcome;
}

/// One landed hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Who was hit
    pub target: EntityId,
    /// Damage dealt
    pub damage: f32,
    /// Whether the hit was lethal
    pub killed: bool,
}

/// Capability shared by every weapon kind.
pub trait Armament {
    /// Variant tag.
    fn kind(&self) -> WeaponKind;

    /// Starts an attack; returns `false` while the cooldown is running.
    fn start_attack(&mut self, pivot: Vec2, facing: Facing) -> bool;

    /// Advances timers, hitbox geometry and projectiles by `dt` seconds.
    fn update(&mut self, dt: f32, pivot: Vec2, facing: Facing);

    /// Melee hitbox while an attack is in progress.
    fn hitbox(&self) -> Option<Aabb>;

    /// Applies damage to overlapping targets, ignoring the damage window.
    fn apply_damage<T: Target>(&mut self, targets: &mut [T]) -> Vec<Hit>;

    /// Seconds until the next attack may start.
    fn cooldown_remaining(&self) -> f32;
}

// =============================================================================
// Attack clock
// =============================================================================

/// Counts a timer down, snapping values within the epsilon to zero.
pub(crate) fn tick_down(value: f32, dt: f32) -> f32 {
    let next = (value - dt).max(0.0);
    if next <= TIMER_EPSILON {
        0.0
    } else {
        next
    }
}

/// Attack and cooldown timers shared by every weapon kind.
///
/// Both timers start together on arming; the cooldown covers the attack, so
/// the next arming is possible `cooldown` seconds after the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackClock {
    duration: f32,
    cooldown: f32,
    timer: f32,
    cooldown_timer: f32,
    just_finished: bool,
}

impl AttackClock {
    /// Idle clock for the given timing.
    #[must_use]
    pub fn new(timing: &AttackTiming) -> Self {
        Self {
            duration: timing.duration,
            cooldown: timing.cooldown,
            timer: 0.0,
            cooldown_timer: 0.0,
            just_finished: false,
        }
    }

    /// Starts both timers.
    pub fn arm(&mut self) {
        self.timer = self.duration;
        self.cooldown_timer = self.cooldown;
        self.just_finished = false;
    }

    /// Counts both timers down.
    pub fn tick(&mut self, dt: f32) {
        let was_attacking = self.is_attacking();
        self.timer = tick_down(self.timer, dt);
        self.cooldown_timer = tick_down(self.cooldown_timer, dt);
        self.just_finished = was_attacking && !self.is_attacking();
    }

    /// Stops everything.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.cooldown_timer = 0.0;
        self.just_finished = false;
    }

    /// True while the attack timer runs.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.timer > 0.0
    }

    /// True on the tick the attack timer reached zero.
    #[must_use]
    pub fn just_finished(&self) -> bool {
        self.just_finished
    }

    /// Normalized progress in `[0, 1)`; `0` when idle.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.is_attacking() {
            (1.0 - self.timer / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Attack time left.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.timer
    }

    /// Cooldown time left.
    #[must_use]
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_timer
    }
}

// =============================================================================
// Weapon
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum WeaponProfile {
    Arc(ArcSweep),
    Thrust(ThrustReach),
    Ballistic(Launcher),
}

/// A wielded weapon of any kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    kind: WeaponKind,
    profile: WeaponProfile,
    clock: AttackClock,
    damage: f32,
    window: DamageWindow,
    pivot: Vec2,
    facing: Facing,
    hitbox: Option<Aabb>,
    damaged: BTreeSet<EntityId>,
    projectiles: Vec<Projectile>,
    pending_release: bool,
    releases: u32,
}

impl Weapon {
    fn with_profile(
        kind: WeaponKind,
        profile: WeaponProfile,
        timing: &AttackTiming,
        window: DamageWindow,
    ) -> Self {
        Self {
            kind,
            profile,
            clock: AttackClock::new(timing),
            damage: timing.damage,
            window,
            pivot: Vec2::ZERO,
            facing: Facing::Right,
            hitbox: None,
            damaged: BTreeSet::new(),
            projectiles: Vec::new(),
            pending_release: false,
            releases: 0,
        }
    }

    /// Fresh weapon of `kind` built from the configured parameters.
    #[must_use]
    pub fn from_kind(kind: WeaponKind, set: &WeaponSet) -> Self {
        match kind {
            WeaponKind::Arc => Self::with_profile(
                kind,
                WeaponProfile::Arc(ArcSweep::new(&set.sword)),
                &set.sword.timing,
                set.sword.window,
            ),
            WeaponKind::Thrust => Self::with_profile(
                kind,
                WeaponProfile::Thrust(ThrustReach::new(&set.spear)),
                &set.spear.timing,
                set.spear.window,
            ),
            WeaponKind::Ballistic => Self::with_profile(
                kind,
                WeaponProfile::Ballistic(Launcher::new(&set.bow)),
                &set.bow.timing,
                set.bow.window,
            ),
        }
    }

    /// Default sword.
    #[must_use]
    pub fn sword() -> Self {
        Self::from_kind(WeaponKind::Arc, &WeaponSet::default())
    }

    /// Default spear.
    #[must_use]
    pub fn spear() -> Self {
        Self::from_kind(WeaponKind::Thrust, &WeaponSet::default())
    }

    /// Default bow.
    #[must_use]
    pub fn bow() -> Self {
        Self::from_kind(WeaponKind::Ballistic, &WeaponSet::default())
    }

    /// Arms the attack without releasing a projectile.
    ///
    /// Returns `false` (and changes nothing) while the cooldown runs.
    pub fn arm(&mut self, pivot: Vec2, facing: Facing) -> bool {
        if self.clock.cooldown_remaining() > 0.0 {
            return false;
        }
        self.rearm(pivot, facing);
        true
    }

    /// Re-arms a queued follow-up attack.
    ///
    /// Succeeds when the cooldown is over or on the tick the previous attack
    /// timer reached zero; that instant is when a queued attack starts.
    pub fn chain_attack(&mut self, pivot: Vec2, facing: Facing) -> bool {
        if self.clock.cooldown_remaining() > 0.0 && !self.clock.just_finished() {
            return false;
        }
        trace!(kind = %self.kind, "chained attack");
        self.rearm(pivot, facing);
        true
    }

    fn rearm(&mut self, pivot: Vec2, facing: Facing) {
        if self.pending_release {
            self.release();
        }
        self.clock.arm();
        self.pivot = pivot;
        self.facing = facing;
        self.damaged.clear();
        self.pending_release = self.kind == WeaponKind::Ballistic;
        self.refresh_hitbox();
    }

    /// Fires the pending projectile, if any. Returns whether one left.
    pub fn release(&mut self) -> bool {
        if !self.pending_release {
            return false;
        }
        self.pending_release = false;
        if let WeaponProfile::Ballistic(launcher) = &self.profile {
            self.projectiles.push(launcher.launch(self.pivot, self.facing));
            self.releases += 1;
            return true;
        }
        false
    }

    /// Damage-window gated hit application.
    ///
    /// Melee kinds only deal damage while progress lies inside the window.
    /// Ballistic kinds release the pending projectile once progress reaches
    /// the window start, then resolve projectile hits.
    pub fn strike<T: Target>(&mut self, targets: &mut [T]) -> Vec<Hit> {
        if self.kind.is_melee() {
            if !self.in_damage_window() {
                return Vec::new();
            }
        } else if self.pending_release && self.window.reached(self.progress()) {
            self.release();
        }
        self.apply_damage(targets)
    }

    /// True while a melee attack is inside its damage window.
    #[must_use]
    pub fn in_damage_window(&self) -> bool {
        self.clock.is_attacking() && self.window.contains(self.clock.progress())
    }

    /// Normalized attack progress; `0` when idle.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    /// True while the attack timer runs.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.clock.is_attacking()
    }

    /// True on the tick the attack timer reached zero.
    #[must_use]
    pub fn just_finished(&self) -> bool {
        self.clock.just_finished()
    }

    /// Attack and cooldown timers.
    #[must_use]
    pub fn clock(&self) -> &AttackClock {
        &self.clock
    }

    /// Damage per hit.
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    /// Configured damage window.
    #[must_use]
    pub fn window(&self) -> DamageWindow {
        self.window
    }

    /// In-flight projectiles.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// True while a drawn projectile waits for its release point.
    #[must_use]
    pub fn has_pending_release(&self) -> bool {
        self.pending_release
    }

    /// Number of projectiles released since the last call.
    pub fn take_releases(&mut self) -> u32 {
        std::mem::take(&mut self.releases)
    }

    /// Drops every timer, hit record and projectile.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.hitbox = None;
        self.damaged.clear();
        self.projectiles.clear();
        self.pending_release = false;
        self.releases = 0;
    }

    fn refresh_hitbox(&mut self) {
        if !self.clock.is_attacking() {
            self.hitbox = None;
            return;
        }
        let p = self.clock.progress();
        self.hitbox = match &self.profile {
            WeaponProfile::Arc(sweep) => Some(sweep.hitbox_at(p, self.pivot, self.facing)),
            WeaponProfile::Thrust(reach) => Some(reach.hitbox_at(p, self.pivot, self.facing)),
            WeaponProfile::Ballistic(_) => None,
        };
    }
}

impl Armament for Weapon {
    fn kind(&self) -> WeaponKind {
        self.kind
    }

    fn start_attack(&mut self, pivot: Vec2, facing: Facing) -> bool {
        if !self.arm(pivot, facing) {
            return false;
        }
        self.release();
        true
    }

    fn update(&mut self, dt: f32, pivot: Vec2, facing: Facing) {
        self.clock.tick(dt);
        self.pivot = pivot;
        self.facing = facing;
        if self.clock.just_finished() && self.pending_release {
            // A large delta can jump past the release point entirely.
            self.release();
        }
        self.refresh_hitbox();

        if let WeaponProfile::Ballistic(launcher) = &self.profile {
            let before = self.projectiles.len();
            self.projectiles.retain_mut(|p| launcher.advance(p, dt));
            let expired = before - self.projectiles.len();
            if expired > 0 {
                trace!(expired, "projectiles expired");
            }
        }
    }

    fn hitbox(&self) -> Option<Aabb> {
        self.hitbox
    }

    fn apply_damage<T: Target>(&mut self, targets: &mut [T]) -> Vec<Hit> {
        let damage = self.damage;
        let mut hits = Vec::new();

        if self.kind.is_melee() {
            let Some(hitbox) = self.hitbox else {
                return hits;
            };
            for target in targets.iter_mut() {
                let id = target.id();
                if !target.is_alive() || self.damaged.contains(&id) {
                    continue;
                }
                if !hitbox.overlaps(&target.bounds()) {
                    continue;
                }
                self.damaged.insert(id);
                let outcome = target.take_damage(damage);
                if outcome != DamageOutcome::Ignored {
                    hits.push(Hit {
                        target: id,
                        damage,
                        killed: outcome == DamageOutcome::Killed,
                    });
                }
            }
            return hits;
        }

        self.projectiles.retain(|projectile| {
            let struck = targets
                .iter_mut()
                .find(|t| t.is_alive() && projectile.bounds().overlaps(&t.bounds()));
            let Some(target) = struck else {
                return true;
            };
            let outcome = target.take_damage(damage);
            if outcome != DamageOutcome::Ignored {
                hits.push(Hit {
                    target: target.id(),
                    damage,
                    killed: outcome == DamageOutcome::Killed,
                });
            }
            false
        });
        hits
    }

    fn cooldown_remaining(&self) -> f32 {
        self.clock.cooldown_remaining()
    }
}
