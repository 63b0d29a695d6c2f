use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::background::{
    source::{FileImageSource, ImageSource},
    types::{BackgroundError, BackgroundRequest, LoadedBackground},
};
use crate::session::SlotKey;

/// Cheap handle slots use to queue background loads.
#[derive(Clone)]
pub struct BackgroundRequester {
    request_tx: mpsc::UnboundedSender<BackgroundRequest>,
}

impl BackgroundRequester {
    /// Queues a load for `slot`. Non-blocking; the bytes arrive later through
    /// [`BackgroundLoader::try_next`] or [`BackgroundLoader::next_within`].
    pub fn request(&self, slot: SlotKey, url: &str) -> Result<(), BackgroundError> {
        self.request_tx
            .send(BackgroundRequest {
                slot,
                url: url.to_string(),
            })
            .map_err(|_| BackgroundError::LoaderStopped)
    }
}

/// Bridges asynchronous image loading with the synchronous slot event loop.
///
/// Requests are processed by a task on the given tokio runtime; every request
/// is fetched concurrently and its outcome queued for the owner to collect.
pub struct BackgroundLoader {
    requester: BackgroundRequester,
    results_rx: mpsc::UnboundedReceiver<LoadedBackground>,
    runtime: tokio::runtime::Handle,
}

impl BackgroundLoader {
    /// Creates a loader reading images from disk.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    /// * `asset_dir` - Directory relative image paths resolve against
    pub fn new(runtime_handle: &tokio::runtime::Handle, asset_dir: Option<PathBuf>) -> Self {
        Self::with_source(runtime_handle, Arc::new(FileImageSource::new(asset_dir)))
    }

    /// Creates a loader with a custom image source (useful for testing).
    pub fn with_source(
        runtime_handle: &tokio::runtime::Handle,
        source: Arc<dyn ImageSource>,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<BackgroundRequest>();
        let (results_tx, results_rx) = mpsc::unbounded_channel::<LoadedBackground>();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Loading background for slot {}: {}", request.slot, request.url);

                let source = source.clone();
                let results_tx = results_tx.clone();
                tokio::spawn(async move {
                    let result = source.fetch(&request.url).await;
                    if let Err(err) = &result {
                        log::debug!("Background load for slot {} failed: {}", request.slot, err);
                    }
                    // Receiver gone means the board was dropped; nothing to deliver to
                    let _ = results_tx.send(LoadedBackground {
                        slot: request.slot,
                        url: request.url,
                        result,
                    });
                });
            }
        });

        Self {
            requester: BackgroundRequester { request_tx },
            results_rx,
            runtime: runtime_handle.clone(),
        }
    }

    pub fn requester(&self) -> BackgroundRequester {
        self.requester.clone()
    }

    /// Returns a finished load without waiting, if one is available.
    pub fn try_next(&mut self) -> Option<LoadedBackground> {
        self.results_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next finished load.
    ///
    /// Must not be called from inside an async context.
    pub fn next_within(&mut self, timeout: Duration) -> Option<LoadedBackground> {
        let rx = &mut self.results_rx;
        self.runtime
            .block_on(async { tokio::time::timeout(timeout, rx.recv()).await })
            .ok()
            .flatten()
    }
}

#[cfg(test)]
impl BackgroundRequester {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<BackgroundRequest>();
        drop(rx);
        Self { request_tx: tx }
    }
}
