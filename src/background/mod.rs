//! Asynchronous background image loading.
//!
//! Slots queue loads through a [`BackgroundRequester`]; a task on a tokio
//! runtime fetches the bytes and hands them back through the
//! [`BackgroundLoader`], which the board drains on its own thread. Decoding
//! and painting stay on that thread because Cairo surfaces are not `Send`.

mod loader;
mod source;
mod types;

pub use loader::{BackgroundLoader, BackgroundRequester};
pub use source::{FileImageSource, ImageSource};
pub use types::{BackgroundError, BackgroundStatus, LoadedBackground};
