//! Error types for caller-contract violations.
//!
//! Only contract violations and missing external inputs are errors. Gameplay
//! no-ops (attacking on cooldown, jumping with no jumps left, hitting a
//! corpse) are reported through `bool`/empty returns instead.

use thiserror::Error;

/// Errors reported by the simulation core.
#[derive(Debug, Error)]
pub enum SimError {
    /// A body or hitbox was constructed with a non-positive dimension.
    #[error("body size must be positive on both axes, got {width}x{height}")]
    InvalidBodySize {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// A frame was advanced with a negative (or non-finite) delta.
    #[error("frame delta must be a non-negative finite number of seconds, got {0}")]
    NegativeDelta(f32),

    /// The level did not provide a player spawn point.
    #[error("level has no player spawn; using ({x}, {y})")]
    MissingSpawn {
        /// Fallback x used instead
        x: f32,
        /// Fallback y used instead
        y: f32,
    },

    /// An enemy spawn referenced a profile the config does not define.
    #[error("unknown enemy profile '{0}'")]
    UnknownEnemyProfile(String),

    /// A tuning value failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Config or level JSON could not be parsed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validates a frame delta, returning it unchanged when usable.
///
/// # Errors
///
/// Returns [`SimError::NegativeDelta`] when `dt` is negative, NaN or infinite.
pub fn check_delta(dt: f32) -> Result<f32, SimError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(dt)
    } else {
        Err(SimError::NegativeDelta(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_positive_deltas_pass() {
        assert_eq!(check_delta(0.0).unwrap(), 0.0);
        assert!((check_delta(1.0 / 60.0).unwrap() - 1.0 / 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn negative_and_nan_deltas_fail() {
        assert!(matches!(check_delta(-0.01), Err(SimError::NegativeDelta(_))));
        assert!(check_delta(f32::NAN).is_err());
        assert!(check_delta(f32::INFINITY).is_err());
    }

    #[test]
    fn messages_are_readable() {
        let err = SimError::InvalidBodySize {
            width: 0.0,
            height: 10.0,
        };
        assert_eq!(
            err.to_string(),
            "body size must be positive on both axes, got 0x10"
        );
        assert_eq!(
            SimError::UnknownEnemyProfile("bat".into()).to_string(),
            "unknown enemy profile 'bat'"
        );
    }
}
