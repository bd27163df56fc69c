//! Per-frame input commands issued by the host's input layer.
//!
//! Movement is level-triggered (`held`), everything else edge-triggered
//! (`pressed`). Left/right presses appear in both sets on the frame they go
//! down, which is what the double-tap dash detector listens to.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::entity::Facing;
use crate::weapon::WeaponKind;

bitflags! {
    /// Button set for one frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buttons: u8 {
        /// Move left
        const LEFT = 1 << 0;
        /// Move right
        const RIGHT = 1 << 1;
        /// Climb up while on a wall
        const UP = 1 << 2;
        /// Climb down while on a wall
        const DOWN = 1 << 3;
        /// Jump / wall-jump
        const JUMP = 1 << 4;
        /// Attack with the equipped weapon
        const ATTACK = 1 << 5;
        /// Dash in the held (or facing) direction
        const DASH = 1 << 6;
    }
}

/// Input for a single frame.
///
/// # Example
///
/// ```
/// use ledgefall_core::input::{Buttons, InputFrame};
///
/// let frame = InputFrame::new().hold(Buttons::RIGHT).press(Buttons::JUMP);
/// assert!(frame.held.contains(Buttons::RIGHT));
/// assert!(frame.pressed.contains(Buttons::JUMP));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputFrame {
    /// Buttons currently held down
    pub held: Buttons,
    /// Buttons that went down this frame
    pub pressed: Buttons,
    /// Weapon the player asked to equip this frame
    pub weapon_select: Option<WeaponKind>,
}

impl InputFrame {
    /// An empty frame.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: Buttons::empty(),
            pressed: Buttons::empty(),
            weapon_select: None,
        }
    }

    /// Adds held buttons.
    #[must_use]
    pub fn hold(mut self, buttons: Buttons) -> Self {
        self.held |= buttons;
        self
    }

    /// Adds edge presses. Direction presses are also marked held.
    #[must_use]
    pub fn press(mut self, buttons: Buttons) -> Self {
        self.pressed |= buttons;
        self.held |= buttons & (Buttons::LEFT | Buttons::RIGHT | Buttons::UP | Buttons::DOWN);
        self
    }

    /// Requests a weapon swap.
    #[must_use]
    pub fn select(mut self, kind: WeaponKind) -> Self {
        self.weapon_select = Some(kind);
        self
    }

    /// Horizontal direction from held buttons; opposing buttons cancel.
    #[must_use]
    pub fn move_direction(&self) -> Option<Facing> {
        match (
            self.held.contains(Buttons::LEFT),
            self.held.contains(Buttons::RIGHT),
        ) {
            (true, false) => Some(Facing::Left),
            (false, true) => Some(Facing::Right),
            _ => None,
        }
    }

    /// Vertical climb intent: `1.0` up, `-1.0` down, `0.0` hold.
    #[must_use]
    pub fn climb_axis(&self) -> f32 {
        match (
            self.held.contains(Buttons::UP),
            self.held.contains(Buttons::DOWN),
        ) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_frame_is_idle() {
        let frame = InputFrame::default();
        assert!(frame.held.is_empty());
        assert!(frame.pressed.is_empty());
        assert_eq!(frame.move_direction(), None);
        assert_eq!(frame.climb_axis(), 0.0);
    }

    #[test]
    fn opposing_directions_cancel() {
        let frame = InputFrame::new().hold(Buttons::LEFT | Buttons::RIGHT);
        assert_eq!(frame.move_direction(), None);
    }

    #[test]
    fn press_marks_direction_held() {
        let frame = InputFrame::new().press(Buttons::LEFT | Buttons::ATTACK);
        assert_eq!(frame.move_direction(), Some(Facing::Left));
        assert!(!frame.held.contains(Buttons::ATTACK));
    }

    #[test]
    fn climb_axis_reads_up_down() {
        assert_eq!(InputFrame::new().hold(Buttons::UP).climb_axis(), 1.0);
        assert_eq!(InputFrame::new().hold(Buttons::DOWN).climb_axis(), -1.0);
    }

    #[test]
    fn select_sets_weapon() {
        let frame = InputFrame::new().select(WeaponKind::Thrust);
        assert_eq!(frame.weapon_select, Some(WeaponKind::Thrust));
    }
}
