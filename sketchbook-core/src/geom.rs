//! Geometry primitives in integer viewport coordinates.

use crate::color::Color;

/// A position in viewport pixels. Origin is the top-left, y grows downward.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}
impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
    /// Squared euclidean distance, saturating at `u64::MAX` for points at opposite corners of the
    /// coordinate space.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx.unsigned_abs()
            .pow(2)
            .saturating_add(dy.unsigned_abs().pow(2))
    }
    /// Is `other` within `radius` of this point (inclusive)?
    #[must_use]
    pub fn within(self, other: Self, radius: u32) -> bool {
        self.distance_squared(other) <= u64::from(radius).pow(2)
    }
}
impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// One straight rendered line of a stroke. Color and thickness are fixed at creation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub color: Color,
    /// Line width in viewport pixels.
    pub thickness: u32,
}
impl Segment {
    /// Proximity test used by the eraser.
    ///
    /// Only the endpoints are considered, *not* the distance to the line between them - a long
    /// segment is missed when the point is near its middle.
    #[must_use]
    pub fn is_near(&self, point: Point, radius: u32) -> bool {
        point.within(self.start, radius) || point.within(self.end, radius)
    }
    /// A segment that starts and ends at the same point.
    #[must_use]
    pub fn is_dot(&self) -> bool {
        self.start == self.end
    }
}

/// Axis-aligned rectangle in viewport pixels.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}
impl Rect {
    /// A `size`-by-`size` square centered (rounding toward the top-left) on `center`.
    #[must_use]
    pub fn centered_square(center: Point, size: u32) -> Self {
        let half = i32::try_from(size / 2).unwrap_or(i32::MAX);
        Self {
            x: center.x.saturating_sub(half),
            y: center.y.saturating_sub(half),
            width: size,
            height: size,
        }
    }
}
