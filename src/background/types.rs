//! Data types for background image loading.

use crate::session::SlotKey;
use std::path::PathBuf;
use thiserror::Error;

/// A load request queued by a slot.
#[derive(Debug, Clone)]
pub(crate) struct BackgroundRequest {
    pub(crate) slot: SlotKey,
    pub(crate) url: String,
}

/// Outcome of one load, delivered back to the slot that asked for it.
#[derive(Debug)]
pub struct LoadedBackground {
    pub slot: SlotKey,
    pub url: String,
    /// Raw PNG bytes; decoding happens on the thread that owns the surface.
    pub result: Result<Vec<u8>, BackgroundError>,
}

/// Errors that can occur while loading a background image.
#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("image URL is empty")]
    EmptyUrl,

    #[error("unsupported URL scheme '{0}' (only file paths and file:// URLs are supported)")]
    UnsupportedScheme(String),

    #[error("invalid image URL '{0}'")]
    InvalidUrl(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("background loader is not running")]
    LoaderStopped,
}

/// Where a slot stands with respect to its background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundStatus {
    /// No load requested yet
    Idle,
    /// Load requested, bytes not delivered yet
    Pending,
    /// Image decoded and cached for repaints
    Loaded,
    /// Load or decode failed; the surface has no background
    Failed,
}
