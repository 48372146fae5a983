//! 2-D coordinate type for the simulated plane and road graphs.
//!
//! `Point` doubles as a *node key*: road graphs map points to their outgoing
//! connections, so `Point` implements `Eq` and `Hash` bitwise.  Two points are
//! the same node iff their coordinates are bit-identical — positions produced
//! by arithmetic must not be used as node keys unless they were copied from an
//! existing node.  Non-finite coordinates are rejected at construction, which
//! keeps the bitwise equality total in practice.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A position on the 2-D Euclidean plane.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Construct a point.
    ///
    /// # Panics
    /// Panics if either coordinate is NaN or infinite.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        assert!(
            x.is_finite() && y.is_finite(),
            "point coordinates must be finite, got ({x}, {y})"
        );
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The point a fraction `t` (in `[0, 1]`) of the way from `self` to `other`.
    ///
    /// Used to compute intermediate positions of objects part-way along a
    /// connection.  The result is a *position*, not a node key.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

// Bitwise equality: coordinates are finite by construction, so this is an
// equivalence relation (no NaN) and consistent with the `Hash` impl below.
impl PartialEq for Point {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
