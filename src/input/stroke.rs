//! Two-click capture state machine.

use crate::draw::LineSegment;

/// Position in the two-click capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No point captured yet
    Empty,
    /// First point captured, waiting for the second click
    AwaitingSecondPoint,
    /// Both points captured; consumed immediately by the owning slot
    Ready,
}

/// In-progress capture for one slot. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PendingStroke {
    #[default]
    Empty,
    AwaitingSecondPoint { x1: f64, y1: f64 },
    Ready(LineSegment),
}

impl PendingStroke {
    pub fn phase(&self) -> Phase {
        match self {
            PendingStroke::Empty => Phase::Empty,
            PendingStroke::AwaitingSecondPoint { .. } => Phase::AwaitingSecondPoint,
            PendingStroke::Ready(_) => Phase::Ready,
        }
    }

    /// Captured first point, if any.
    pub fn first_point(&self) -> Option<(f64, f64)> {
        match self {
            PendingStroke::Empty => None,
            PendingStroke::AwaitingSecondPoint { x1, y1 } => Some((*x1, *y1)),
            PendingStroke::Ready(segment) => Some((segment.x1, segment.y1)),
        }
    }

    /// Applies one point-captured event.
    ///
    /// - `Empty` stores the point as the first endpoint.
    /// - `AwaitingSecondPoint` completes the segment and moves to `Ready`.
    /// - `Ready` is never observed by callers that consume with [`take_ready`],
    ///   so a point arriving there starts a fresh capture.
    ///
    /// [`take_ready`]: PendingStroke::take_ready
    pub fn capture(&mut self, x: f64, y: f64) {
        *self = match *self {
            PendingStroke::Empty | PendingStroke::Ready(_) => {
                PendingStroke::AwaitingSecondPoint { x1: x, y1: y }
            }
            PendingStroke::AwaitingSecondPoint { x1, y1 } => {
                PendingStroke::Ready(LineSegment::new(x1, y1, x, y))
            }
        };
    }

    /// Consumes a completed segment, resetting to `Empty`.
    pub fn take_ready(&mut self) -> Option<LineSegment> {
        match *self {
            PendingStroke::Ready(segment) => {
                *self = PendingStroke::Empty;
                Some(segment)
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = PendingStroke::Empty;
    }
}
