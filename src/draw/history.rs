//! Ordered segment history for a single slot.

use super::segment::LineSegment;
use serde::{Deserialize, Serialize};

/// All segments drawn on one slot, in drawing order.
///
/// Serializes transparently as a JSON array of segments, which is exactly the
/// value stored under the slot's key. Appends only happen through the slot's
/// state machine; the whole history is replaced on clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingHistory {
    /// Segments in draw order (first = oldest)
    segments: Vec<LineSegment>,
}

impl DrawingHistory {
    /// Creates an empty history.
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Removes every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Appends a segment without any limit check.
    pub fn push(&mut self, segment: LineSegment) {
        self.segments.push(segment);
    }

    /// Attempts to append a segment, enforcing a maximum count when `max` > 0.
    ///
    /// Returns `true` if the segment was added, `false` if the limit would be exceeded.
    pub fn try_push(&mut self, segment: LineSegment, max: usize) -> bool {
        if max == 0 || self.segments.len() < max {
            self.segments.push(segment);
            true
        } else {
            false
        }
    }

    /// Position of the first segment with invalid coordinates, if any.
    pub fn first_invalid(&self) -> Option<usize> {
        self.segments.iter().position(|s| !s.is_valid())
    }
}

impl From<Vec<LineSegment>> for DrawingHistory {
    fn from(segments: Vec<LineSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<LineSegment> for DrawingHistory {
    fn from_iter<I: IntoIterator<Item = LineSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}
