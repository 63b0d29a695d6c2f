//! Drawing slots and their composition into a board.
//!
//! A [`DrawingBoard`] is the per-slot controller: it turns pairs of captured
//! points into segments, paints them, and keeps the persisted history in
//! sync. A [`Board`] creates one slot per configured background image and
//! routes events and finished background loads to them.

mod grid;
mod slot;

pub use grid::Board;
pub use slot::DrawingBoard;
