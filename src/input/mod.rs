//! Input handling and the two-click capture state machine.
//!
//! This module turns raw pointer positions into surface-local coordinates and
//! tracks the in-progress capture of a slot (empty, awaiting the second point,
//! ready to become a segment).

pub mod events;
pub mod stroke;

// Re-export commonly used types at module level
pub use events::{BoardEvent, PointerPosition, SurfaceOffset};
pub use stroke::{PendingStroke, Phase};
