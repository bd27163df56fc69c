//! Entity identity and orientation shared by all controllers.
//!
//! - [`EntityId`]: Unique identifier for entities
//! - [`EntityTag`]: Which controller owns an entity
//! - [`Facing`]: Horizontal orientation used by movement and weapon geometry
//!
//! # Example
//!
//! ```
//! use ledgefall_core::entity::{EntityId, Facing};
//!
//! let id = EntityId::new(42);
//! assert_eq!(id.as_u64(), 42);
//! assert_eq!(Facing::Left.sign(), -1.0);
//! assert_eq!(Facing::Left.flipped(), Facing::Right);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. IDs are handed out
/// monotonically by the world, so ordering by ID is ordering by spawn time.
/// Weapons key their per-swing hit sets on it.
///
/// # Example
///
/// ```
/// use ledgefall_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Which controller drives an entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The input-driven player character
    Player,
    /// A behavior-driven adversary
    Enemy,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Horizontal orientation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Towards negative x
    Left,
    /// Towards positive x
    #[default]
    Right,
}

impl Facing {
    /// `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite orientation.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// True when facing towards positive x.
    #[must_use]
    pub const fn is_right(self) -> bool {
        matches!(self, Self::Right)
    }

    /// Facing that points from `from` towards `to` along x.
    ///
    /// Returns `None` when both are level, so callers can keep their
    /// current orientation.
    #[must_use]
    pub fn towards(from: f32, to: f32) -> Option<Self> {
        if to > from {
            Some(Self::Right)
        } else if to < from {
            Some(Self::Left)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_roundtrip_and_display() {
        let id = EntityId::from(7);
        assert_eq!(id.as_u64(), 7);
        assert_eq!(format!("{id}"), "7");
        assert_eq!(format!("{id:?}"), "EntityId(7)");
    }

    #[test]
    fn entity_tag_display() {
        assert_eq!(EntityTag::Player.to_string(), "Player");
        assert_eq!(EntityTag::Enemy.to_string(), "Enemy");
    }

    #[test]
    fn facing_helpers() {
        assert_eq!(Facing::default(), Facing::Right);
        assert_eq!(Facing::Right.sign(), 1.0);
        assert!(Facing::Right.is_right());
        assert!(!Facing::Left.is_right());
        assert_eq!(Facing::Right.flipped().flipped(), Facing::Right);
    }

    #[test]
    fn facing_towards() {
        assert_eq!(Facing::towards(0.0, 10.0), Some(Facing::Right));
        assert_eq!(Facing::towards(10.0, 0.0), Some(Facing::Left));
        assert_eq!(Facing::towards(5.0, 5.0), None);
    }
}
