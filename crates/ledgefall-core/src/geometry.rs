//! Axis-aligned rectangles and penetration queries.
//!
//! World space is y-up: `y` is the bottom edge of a rectangle and `y + h` its
//! top. All collision, probe and hitbox tests in the crate go through [`Aabb`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box stored as bottom-left corner plus extent.
///
/// # Example
///
/// ```
/// use ledgefall_core::geometry::Aabb;
///
/// let floor = Aabb::new(0.0, 0.0, 100.0, 20.0);
/// let crate_box = Aabb::new(10.0, 15.0, 10.0, 10.0);
///
/// assert!(floor.overlaps(&crate_box));
/// assert_eq!(floor.top(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

/// Side of an obstacle through which an overlapping box is pushed out.
///
/// Declaration order is the tie-break order used by [`Aabb::push_out`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Mover is lifted onto the obstacle's top surface.
    Top,
    /// Mover is pushed below the obstacle's bottom surface.
    Bottom,
    /// Mover is pushed out past the obstacle's left edge.
    Left,
    /// Mover is pushed out past the obstacle's right edge.
    Right,
}

impl Aabb {
    /// Creates a box from its bottom-left corner and extent.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a box from a bottom-left corner and a size vector.
    #[must_use]
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Creates a box of `size` centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::from_min_size(center - size * 0.5, size)
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// Bottom-left corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Extent as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap test: boxes that only share an edge do not overlap.
    ///
    /// A zero-area box never overlaps anything.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// True when the vertical extents of the two boxes overlap strictly.
    #[must_use]
    pub fn overlaps_vertically(&self, other: &Aabb) -> bool {
        self.bottom() < other.top() && self.top() > other.bottom()
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Penetration depth of `self` into `obstacle` through the given side.
    #[must_use]
    pub fn penetration(&self, obstacle: &Aabb, side: Side) -> f32 {
        match side {
            Side::Top => obstacle.top() - self.bottom(),
            Side::Bottom => self.top() - obstacle.bottom(),
            Side::Left => self.right() - obstacle.left(),
            Side::Right => obstacle.right() - self.left(),
        }
    }

    /// Picks the side of minimal positive penetration for an overlapping pair.
    ///
    /// Returns `None` when the boxes do not overlap. Ties resolve in the fixed
    /// order top, bottom, left, right.
    #[must_use]
    pub fn push_out(&self, obstacle: &Aabb) -> Option<(Side, f32)> {
        if !self.overlaps(obstacle) {
            return None;
        }
        let mut best: Option<(Side, f32)> = None;
        for side in [Side::Top, Side::Bottom, Side::Left, Side::Right] {
            let depth = self.penetration(obstacle, side);
            if depth <= 0.0 {
                continue;
            }
            match best {
                Some((_, current)) if depth >= current => {}
                _ => best = Some((side, depth)),
            }
        }
        best
    }
}
