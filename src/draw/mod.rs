//! Rendering primitives and segment definitions (Cairo-based).
//!
//! This module defines the core drawing types used for slot annotation:
//! - [`LineSegment`]: one straight line between two captured points
//! - [`DrawingHistory`]: the ordered segments drawn on one slot
//! - [`Surface`]: fixed-size raster surface a slot paints onto
//! - Rendering functions for Cairo-based output

pub mod color;
pub mod history;
pub mod render;
pub mod segment;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use history::DrawingHistory;
pub use render::{DEFAULT_STROKE, StrokeStyle, render_background, render_segment, render_segments};
pub use segment::LineSegment;
pub use surface::{SURFACE_HEIGHT, SURFACE_WIDTH, Surface, SurfaceError, decode_png};
