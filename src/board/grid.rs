//! Board composition: one drawing slot per configured background image.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};

use super::slot::DrawingBoard;
use crate::background::{BackgroundLoader, BackgroundStatus, LoadedBackground};
use crate::config::{Config, ImageEntry};
use crate::input::BoardEvent;
use crate::session::{FileSlotStore, SlotKey, SlotStore, options_from_config};
use crate::util::expand_tilde;

/// All slots of a board plus the loader feeding their backgrounds.
///
/// Slot `i` shows `images[i]` and persists under key `i`.
pub struct Board {
    slots: Vec<DrawingBoard>,
    loader: Option<BackgroundLoader>,
}

impl Board {
    /// Creates unmounted slots for `images`, all sharing `store`.
    pub fn new(
        images: &[ImageEntry],
        store: Arc<dyn SlotStore>,
        loader: Option<BackgroundLoader>,
        max_segments_per_slot: usize,
    ) -> Self {
        let slots = images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                DrawingBoard::new(
                    SlotKey::new(index),
                    image.image_url.clone(),
                    store.clone(),
                    loader.as_ref().map(BackgroundLoader::requester),
                )
                .with_segment_limit(max_segments_per_slot)
            })
            .collect();

        Self { slots, loader }
    }

    /// Builds a board backed by the on-disk store and file image loader described by `config`.
    ///
    /// # Arguments
    /// * `config` - Loaded configuration
    /// * `config_dir` - Directory holding the config file (used by `storage = "config"`)
    /// * `runtime_handle` - Tokio runtime the background loader runs on
    pub fn from_config(
        config: &Config,
        config_dir: &Path,
        runtime_handle: &tokio::runtime::Handle,
    ) -> Result<Self> {
        let options = options_from_config(&config.storage, config_dir)
            .context("Failed to resolve storage options")?;
        debug!("Slot histories stored in {}", options.base_dir.display());

        let max_segments = options.max_segments_per_slot;
        let store: Arc<dyn SlotStore> = Arc::new(FileSlotStore::new(options));
        let asset_dir = config.background.asset_dir.as_deref().map(expand_tilde);
        let loader = BackgroundLoader::new(runtime_handle, asset_dir);

        Ok(Self::new(&config.images, store, Some(loader), max_segments))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[DrawingBoard] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&DrawingBoard> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut DrawingBoard> {
        self.slots.get_mut(index)
    }

    fn require_slot(&mut self, index: usize) -> Result<&mut DrawingBoard> {
        let count = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or_else(|| anyhow!("slot {index} is not configured ({count} images)"))
    }

    /// Mounts and activates one slot.
    pub fn open_slot(&mut self, index: usize) -> Result<()> {
        let slot = self.require_slot(index)?;
        slot.mount()
            .with_context(|| format!("Failed to allocate surface for slot {index}"))?;
        slot.activate();
        Ok(())
    }

    /// Mounts and activates every slot.
    pub fn open_all(&mut self) -> Result<()> {
        for index in 0..self.slots.len() {
            self.open_slot(index)?;
        }
        Ok(())
    }

    /// Sends one event to the slot at `index`.
    pub fn dispatch(&mut self, index: usize, event: BoardEvent) -> Result<()> {
        self.require_slot(index)?.handle(event);
        Ok(())
    }

    /// Applies every background load that already finished. Returns how many were applied.
    pub fn pump_backgrounds(&mut self) -> usize {
        let mut applied = 0;
        while let Some(loaded) = self.loader.as_mut().and_then(BackgroundLoader::try_next) {
            self.deliver(loaded);
            applied += 1;
        }
        applied
    }

    /// Blocks until no slot is waiting for its background or `timeout` elapses.
    ///
    /// Returns how many loads were applied. Must not be called from inside an
    /// async context.
    pub fn wait_for_backgrounds(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = self.pump_backgrounds();

        while self.pending_backgrounds() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let next = match self.loader.as_mut() {
                Some(loader) if !remaining.is_zero() => loader.next_within(remaining),
                _ => None,
            };
            match next {
                Some(loaded) => {
                    self.deliver(loaded);
                    applied += 1;
                }
                None => {
                    warn!(
                        "Gave up waiting for {} background image(s) after {:?}",
                        self.pending_backgrounds(),
                        timeout
                    );
                    break;
                }
            }
        }

        applied
    }

    fn pending_backgrounds(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.background_status() == BackgroundStatus::Pending)
            .count()
    }

    fn deliver(&mut self, loaded: LoadedBackground) {
        match self.slots.get_mut(loaded.slot.index()) {
            Some(slot) => slot.apply_background(loaded),
            None => debug!("Dropping background for unknown slot {}", loaded.slot),
        }
    }

    /// Writes the slot's current surface to a PNG file.
    pub fn render_slot(&self, index: usize, path: &Path) -> Result<()> {
        let slot = self
            .slots
            .get(index)
            .ok_or_else(|| anyhow!("slot {index} is not configured"))?;
        let surface = slot
            .surface()
            .ok_or_else(|| anyhow!("slot {index} is not mounted"))?;
        surface
            .write_png(path)
            .with_context(|| format!("Failed to render slot {index} to {}", path.display()))
    }
}
