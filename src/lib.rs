//! Library exports for slotscriber.
//!
//! A board is a row of fixed-size drawing slots, each showing one background
//! image. Two clicks on a slot draw a straight line; every slot's lines are
//! persisted as a JSON array under the slot's index so they reappear when the
//! slot is opened again.

pub mod background;
pub mod board;
pub mod config;
pub mod draw;
pub mod input;
pub mod session;
pub mod util;

pub use board::{Board, DrawingBoard};
pub use config::Config;
