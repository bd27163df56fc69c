//! Tuning values and level data.
//!
//! Everything here is plain serde data. [`SimConfig::default`] reproduces the
//! shipped game's constants; hosts may override any subset from JSON because
//! every struct is `#[serde(default)]`. Level geometry and spawn points arrive
//! as a [`LevelLayout`] built by an external map loader.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::geometry::Aabb;
use crate::weapon::{DamageWindow, WeaponKind};

// =============================================================================
// Bodies
// =============================================================================

/// Physical constants for a kinematic body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Vertical acceleration in px/s² (negative pulls down)
    pub gravity: f32,
    /// Terminal downward speed in px/s
    pub max_fall_speed: f32,
    /// Fraction of vx kept per 1/60 s when nothing drives it
    pub drag: f32,
    /// Tallest ledge the body glides onto without jumping
    pub max_step_height: f32,
    /// Upward speed applied on a step-up frame
    pub step_climb_speed: f32,
    /// Width of the probe strip ahead of the leading edge
    pub probe_width: f32,
    /// How far below the feet the ground-ahead probe reaches
    pub ground_probe_depth: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            gravity: -3000.0,
            max_fall_speed: 900.0,
            drag: 0.9,
            max_step_height: 12.0,
            step_climb_speed: 240.0,
            probe_width: 4.0,
            ground_probe_depth: 4.0,
        }
    }
}

impl BodyConfig {
    fn validate(&self, name: &str) -> Result<(), SimError> {
        if !(self.max_fall_speed > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "{name}.max_fall_speed must be positive"
            )));
        }
        if !(self.drag > 0.0 && self.drag <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "{name}.drag must be in (0, 1]"
            )));
        }
        if self.max_step_height < 0.0 || self.probe_width <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "{name} probe dimensions must be positive"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Player
// =============================================================================

/// What happens after the death delay runs out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespawnPolicy {
    /// Reset at the spawn point on the next frame.
    #[default]
    Automatic,
    /// Stay pending until the host calls `respawn()`.
    Manual,
}

/// Movement, combat and lifecycle tuning for the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Hitbox size
    pub size: Vec2,
    /// Health on spawn and after respawn
    pub max_health: f32,
    /// Walk speed in px/s
    pub move_speed: f32,
    /// Jump launch speed
    pub jump_speed: f32,
    /// Ground jump plus air jumps before landing
    pub max_jumps: u32,
    /// Side-probe distance for wall contact
    pub wall_threshold: f32,
    /// Horizontal push of a wall-jump
    pub wall_jump_push: f32,
    /// Extra vertical speed of a wall-jump
    pub wall_jump_bonus: f32,
    /// How long a wall-jump keeps horizontal authority
    pub wall_jump_lock: f32,
    /// Fall-speed cap while sliding down a wall
    pub wall_slide_speed: f32,
    /// Climb speed magnitude while holding a wall
    pub climb_speed: f32,
    /// Dash speed in px/s
    pub dash_speed: f32,
    /// Dash length in seconds
    pub dash_duration: f32,
    /// Time between dashes
    pub dash_cooldown: f32,
    /// Max gap between two same-direction taps that triggers a dash
    pub double_tap_window: f32,
    /// Fraction of walk speed available while attacking
    pub attack_move_factor: f32,
    /// Length of the dying pose before respawn becomes possible
    pub death_delay: f32,
    /// Respawn behavior after the death delay
    pub respawn: RespawnPolicy,
    /// Weapon equipped on spawn
    pub starting_weapon: WeaponKind,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(33.0, 52.0),
            max_health: 100.0,
            move_speed: 200.0,
            jump_speed: 600.0,
            max_jumps: 2,
            wall_threshold: 5.0,
            wall_jump_push: 500.0,
            wall_jump_bonus: 200.0,
            wall_jump_lock: 0.15,
            wall_slide_speed: 50.0,
            climb_speed: 80.0,
            dash_speed: 400.0,
            dash_duration: 0.15,
            dash_cooldown: 1.0,
            double_tap_window: 0.25,
            attack_move_factor: 0.5,
            death_delay: 1.0,
            respawn: RespawnPolicy::Automatic,
            starting_weapon: WeaponKind::Arc,
        }
    }
}

// =============================================================================
// Weapons
// =============================================================================

/// Timing and damage shared by all weapon kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackTiming {
    /// Active attack length in seconds
    pub duration: f32,
    /// Time from one arming to the next
    pub cooldown: f32,
    /// Damage per hit
    pub damage: f32,
}

impl AttackTiming {
    fn validate(&self, name: &str) -> Result<(), SimError> {
        if !(self.duration > 0.0) || self.cooldown < 0.0 || self.damage < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "{name}: duration must be positive, cooldown and damage non-negative"
            )));
        }
        Ok(())
    }
}

/// Sword-like sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcParams {
    /// Timing and damage
    pub timing: AttackTiming,
    /// Angle at progress 0, degrees (facing right)
    pub start_angle_deg: f32,
    /// Signed sweep over the full attack, degrees
    pub sweep_deg: f32,
    /// Distance from pivot to hitbox centre
    pub radius: f32,
    /// Side of the square hitbox
    pub size: f32,
    /// Progress interval in which hits count
    pub window: DamageWindow,
}

impl Default for ArcParams {
    fn default() -> Self {
        Self {
            timing: AttackTiming {
                duration: 0.3,
                cooldown: 0.6,
                damage: 20.0,
            },
            start_angle_deg: 90.0,
            sweep_deg: -135.0,
            radius: 40.0,
            size: 20.0,
            window: DamageWindow::for_kind(WeaponKind::Arc),
        }
    }
}

/// Spear-like thrust.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustParams {
    /// Timing and damage
    pub timing: AttackTiming,
    /// Length at full extension
    pub max_reach: f32,
    /// Thickness of the shaft hitbox
    pub width: f32,
    /// Progress interval in which hits count
    pub window: DamageWindow,
}

impl Default for ThrustParams {
    fn default() -> Self {
        Self {
            timing: AttackTiming {
                duration: 0.3,
                cooldown: 1.0,
                damage: 30.0,
            },
            max_reach: 100.0,
            width: 8.0,
            window: DamageWindow::for_kind(WeaponKind::Thrust),
        }
    }
}

/// Bow-like launcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallisticParams {
    /// Timing (duration is the draw) and damage per projectile
    pub timing: AttackTiming,
    /// Launch speed in px/s
    pub launch_speed: f32,
    /// Launch elevation in degrees above horizontal
    pub launch_angle_deg: f32,
    /// Downward acceleration on projectiles, px/s²
    pub gravity: f32,
    /// Projectile hitbox size
    pub projectile_size: Vec2,
    /// Path length after which a projectile expires
    pub max_range: f32,
    /// Projectiles whose top falls below this height expire
    pub floor_y: f32,
    /// Progress at which the projectile is released
    pub window: DamageWindow,
}

impl Default for BallisticParams {
    fn default() -> Self {
        Self {
            timing: AttackTiming {
                duration: 0.4,
                cooldown: 0.8,
                damage: 25.0,
            },
            launch_speed: 500.0,
            launch_angle_deg: 40.0,
            gravity: 800.0,
            projectile_size: Vec2::new(20.0, 6.0),
            max_range: 800.0,
            floor_y: 0.0,
            window: DamageWindow::for_kind(WeaponKind::Ballistic),
        }
    }
}

/// Parameters for every weapon kind, used when a weapon is (re)built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSet {
    /// Arc weapon
    pub sword: ArcParams,
    /// Thrust weapon
    pub spear: ThrustParams,
    /// Ballistic weapon
    pub bow: BallisticParams,
}

impl WeaponSet {
    fn validate(&self) -> Result<(), SimError> {
        self.sword.timing.validate("weapons.sword")?;
        self.spear.timing.validate("weapons.spear")?;
        self.bow.timing.validate("weapons.bow")?;
        if self.sword.size <= 0.0 || self.spear.width <= 0.0 {
            return Err(SimError::InvalidConfig(
                "melee hitbox dimensions must be positive".into(),
            ));
        }
        if self.bow.projectile_size.x <= 0.0 || self.bow.projectile_size.y <= 0.0 {
            return Err(SimError::InvalidConfig(
                "weapons.bow.projectile_size must be positive".into(),
            ));
        }
        for (name, window) in [
            ("sword", self.sword.window),
            ("spear", self.spear.window),
            ("bow", self.bow.window),
        ] {
            if !window.is_valid() {
                return Err(SimError::InvalidConfig(format!(
                    "weapons.{name}.window must satisfy 0 <= start <= end <= 1"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Enemies
// =============================================================================

/// Behavior data for one kind of enemy.
///
/// Enemy variety is entirely expressed through these values; there is a
/// single enemy controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    /// Hitbox size
    pub size: Vec2,
    /// Starting health
    pub max_health: f32,
    /// Speed while patrolling
    pub patrol_speed: f32,
    /// Speed while chasing
    pub chase_speed: f32,
    /// Distance at which patrol turns into chase
    pub detection_range: f32,
    /// Distance at which chase turns into attack
    pub attack_range: f32,
    /// Half-width of the patrol band around the spawn x
    pub patrol_radius: f32,
    /// Jump speed used to clear un-steppable obstacles while chasing
    pub jump_speed: f32,
    /// Weapon carried
    pub weapon: WeaponKind,
    /// Physical constants
    pub body: BodyConfig,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self::goblin()
    }
}

impl EnemyProfile {
    /// Sturdy melee walker.
    #[must_use]
    pub fn goblin() -> Self {
        Self {
            size: Vec2::new(36.0, 42.0),
            max_health: 80.0,
            patrol_speed: 60.0,
            chase_speed: 110.0,
            detection_range: 250.0,
            attack_range: 48.0,
            patrol_radius: 120.0,
            jump_speed: 520.0,
            weapon: WeaponKind::Arc,
            body: BodyConfig::default(),
        }
    }

    /// Fast, fragile lunger.
    #[must_use]
    pub fn spider() -> Self {
        Self {
            size: Vec2::new(32.0, 20.0),
            max_health: 50.0,
            patrol_speed: 80.0,
            chase_speed: 140.0,
            detection_range: 200.0,
            attack_range: 60.0,
            patrol_radius: 80.0,
            jump_speed: 450.0,
            weapon: WeaponKind::Thrust,
            body: BodyConfig::default(),
        }
    }

    fn validate(&self, name: &str) -> Result<(), SimError> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || self.max_health <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "enemy_profiles.{name}: size and max_health must be positive"
            )));
        }
        if self.attack_range > self.detection_range {
            return Err(SimError::InvalidConfig(format!(
                "enemy_profiles.{name}: attack_range exceeds detection_range"
            )));
        }
        self.body.validate(&format!("enemy_profiles.{name}.body"))
    }
}

// =============================================================================
// World rules
// =============================================================================

/// Rules the world applies on top of the individual controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldRules {
    /// Damage dealt to the player by touching a living enemy
    pub contact_damage: f32,
    /// Minimum time between two contact hits
    pub contact_cooldown: f32,
    /// Height below which the player counts as fallen out of the level
    pub kill_plane_y: f32,
    /// How long the player may stay below the kill plane before dying
    pub fall_death_delay: f32,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            contact_damage: 10.0,
            contact_cooldown: 1.0,
            kill_plane_y: 0.0,
            fall_death_delay: 0.5,
        }
    }
}

// =============================================================================
// SimConfig
// =============================================================================

/// Complete tuning for one simulation.
///
/// # Example
///
/// ```
/// use ledgefall_core::config::SimConfig;
///
/// let config = SimConfig::from_json(r#"{ "player": { "max_jumps": 3 } }"#).unwrap();
/// assert_eq!(config.player.max_jumps, 3);
/// assert_eq!(config.player.move_speed, 200.0);
/// assert!(config.enemy_profiles.contains_key("goblin"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Player body constants
    pub player_body: BodyConfig,
    /// Player controller tuning
    pub player: PlayerConfig,
    /// Weapon parameters
    pub weapons: WeaponSet,
    /// Named enemy profiles referenced by level spawns
    pub enemy_profiles: BTreeMap<String, EnemyProfile>,
    /// World-level rules
    pub world: WorldRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        let mut enemy_profiles = BTreeMap::new();
        enemy_profiles.insert("goblin".to_string(), EnemyProfile::goblin());
        enemy_profiles.insert("spider".to_string(), EnemyProfile::spider());
        Self {
            player_body: BodyConfig::default(),
            player: PlayerConfig::default(),
            weapons: WeaponSet::default(),
            enemy_profiles,
            world: WorldRules::default(),
        }
    }
}

impl SimConfig {
    /// Parses a config from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] on malformed input and
    /// [`SimError::InvalidConfig`] if a value fails [`SimConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges the controllers rely on.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        self.player_body.validate("player_body")?;
        let p = &self.player;
        if p.size.x <= 0.0 || p.size.y <= 0.0 {
            return Err(SimError::InvalidBodySize {
                width: p.size.x,
                height: p.size.y,
            });
        }
        if !(p.max_health > 0.0) {
            return Err(SimError::InvalidConfig(
                "player.max_health must be positive".into(),
            ));
        }
        if p.dash_duration < 0.0 || p.death_delay < 0.0 || p.double_tap_window < 0.0 {
            return Err(SimError::InvalidConfig(
                "player timers must be non-negative".into(),
            ));
        }
        self.weapons.validate()?;
        for (name, profile) in &self.enemy_profiles {
            profile.validate(name)?;
        }
        Ok(())
    }

    /// Looks up an enemy profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownEnemyProfile`] if no profile has that name.
    pub fn enemy_profile(&self, name: &str) -> Result<&EnemyProfile, SimError> {
        self.enemy_profiles
            .get(name)
            .ok_or_else(|| SimError::UnknownEnemyProfile(name.to_string()))
    }
}

// =============================================================================
// Level data
// =============================================================================

/// An enemy placement in a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Name of the profile in [`SimConfig::enemy_profiles`]
    pub profile: String,
    /// Bottom-left corner at spawn
    pub position: Vec2,
}

/// Static geometry and spawn points handed over by the level loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// Static collision rectangles
    pub platforms: Vec<Aabb>,
    /// Player spawn (bottom-left corner); absent in malformed maps
    pub player_spawn: Option<Vec2>,
    /// Enemy placements
    pub enemies: Vec<EnemySpawn>,
    /// Level extent (width, height) used to clamp the player
    pub bounds: Option<Vec2>,
}

impl LevelLayout {
    /// Parses a layout from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}
