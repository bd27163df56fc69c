//! Damage windows: the slice of attack progress in which a strike counts.
//!
//! Presentation can play any animation it likes; the simulation only asks
//! whether normalized progress is inside the window for the weapon's kind.

use serde::{Deserialize, Serialize};

use super::WeaponKind;

/// Half-open interval `[start, end)` of normalized attack progress.
///
/// For ballistic weapons only `start` matters: it is the release point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageWindow {
    /// First progress value at which damage is enabled
    pub start: f32,
    /// Progress value at which damage is disabled again
    pub end: f32,
}

/// Built-in windows, one row per weapon kind.
const DAMAGE_WINDOWS: [(WeaponKind, DamageWindow); 3] = [
    (WeaponKind::Arc, DamageWindow::new(0.15, 0.85)),
    (WeaponKind::Thrust, DamageWindow::new(0.3, 1.0)),
    (WeaponKind::Ballistic, DamageWindow::new(0.5, 1.0)),
];

impl DamageWindow {
    /// Creates a window.
    #[must_use]
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// The whole attack.
    #[must_use]
    pub const fn always() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Built-in window for a weapon kind.
    ///
    /// # Example
    ///
    /// ```
    /// use ledgefall_core::weapon::{DamageWindow, WeaponKind};
    ///
    /// let spear = DamageWindow::for_kind(WeaponKind::Thrust);
    /// assert!(!spear.contains(0.1));
    /// assert!(spear.contains(0.5));
    /// ```
    #[must_use]
    pub fn for_kind(kind: WeaponKind) -> Self {
        DAMAGE_WINDOWS
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or_else(Self::always, |(_, window)| *window)
    }

    /// True when `progress` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, progress: f32) -> bool {
        progress >= self.start && progress < self.end
    }

    /// True once `progress` has reached the window's start.
    #[must_use]
    pub fn reached(&self, progress: f32) -> bool {
        progress >= self.start
    }

    /// Bounds are ordered and inside `[0, 1]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.start)
            && (0.0..=1.0).contains(&self.end)
            && self.start <= self.end
    }
}

impl Default for DamageWindow {
    fn default() -> Self {
        Self::always()
    }
}
