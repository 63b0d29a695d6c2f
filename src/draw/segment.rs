//! Line segment definition for slot annotations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A straight line between two captured points, in surface pixel space.
///
/// Origin is the top-left corner of the drawing surface, x grows right and
/// y grows down. Segments have no identity beyond their coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Starting X coordinate
    pub x1: f64,
    /// Starting Y coordinate
    pub y1: f64,
    /// Ending X coordinate
    pub x2: f64,
    /// Ending Y coordinate
    pub y2: f64,
}

impl LineSegment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns `true` when every coordinate is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| is_valid_coordinate(*v))
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

pub(crate) fn is_valid_coordinate(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
