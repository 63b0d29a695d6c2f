//! Per-slot drawing controller.

use std::sync::Arc;

use log::{debug, warn};

use crate::background::{BackgroundError, BackgroundRequester, BackgroundStatus, LoadedBackground};
use crate::draw::{DrawingHistory, LineSegment, Surface, SurfaceError, decode_png, segment};
use crate::input::{BoardEvent, PendingStroke, Phase, PointerPosition, SurfaceOffset};
use crate::session::{LoadOutcome, SlotKey, SlotStore};

enum Background {
    Idle,
    Pending,
    Loaded(cairo::ImageSurface),
    Failed,
}

/// One drawable slot: a surface, its background image and its history.
///
/// All mutation goes through the slot's own event handlers. Every two
/// captured points become one [`LineSegment`] that is painted, appended to
/// the history and persisted under the slot's key. Store and render failures
/// are logged and never abort the slot.
pub struct DrawingBoard {
    key: SlotKey,
    image_url: String,
    surface: Option<Surface>,
    pending: PendingStroke,
    history: DrawingHistory,
    background: Background,
    store: Arc<dyn SlotStore>,
    loader: Option<BackgroundRequester>,
    max_segments: usize,
}

impl DrawingBoard {
    /// Creates an unmounted slot.
    ///
    /// Without a `loader` the slot never requests its background image.
    pub fn new(
        key: SlotKey,
        image_url: impl Into<String>,
        store: Arc<dyn SlotStore>,
        loader: Option<BackgroundRequester>,
    ) -> Self {
        Self {
            key,
            image_url: image_url.into(),
            surface: None,
            pending: PendingStroke::default(),
            history: DrawingHistory::new(),
            background: Background::Idle,
            store,
            loader,
            max_segments: 0,
        }
    }

    /// Caps the number of segments kept in this slot (0 = unlimited).
    pub fn with_segment_limit(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments;
        self
    }

    pub fn key(&self) -> SlotKey {
        self.key
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn phase(&self) -> Phase {
        self.pending.phase()
    }

    pub fn pending(&self) -> &PendingStroke {
        &self.pending
    }

    pub fn history(&self) -> &DrawingHistory {
        &self.history
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn background_status(&self) -> BackgroundStatus {
        match self.background {
            Background::Idle => BackgroundStatus::Idle,
            Background::Pending => BackgroundStatus::Pending,
            Background::Loaded(_) => BackgroundStatus::Loaded,
            Background::Failed => BackgroundStatus::Failed,
        }
    }

    /// Allocates the drawing surface. Mounting twice keeps the existing surface.
    pub fn mount(&mut self) -> Result<(), SurfaceError> {
        if self.surface.is_none() {
            self.surface = Some(Surface::standard()?);
            debug!("Slot {} mounted", self.key);
        }
        Ok(())
    }

    /// Drops the surface and all in-memory state. Persisted data is kept.
    pub fn unmount(&mut self) {
        self.surface = None;
        self.pending.reset();
        self.history.clear();
        self.background = Background::Idle;
        debug!("Slot {} unmounted", self.key);
    }

    /// Routes one event to its handler.
    pub fn handle(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::PointCaptured(point) => self.capture_point(point),
            BoardEvent::Clear => self.clear(),
            BoardEvent::Activate => self.activate(),
        }
    }

    /// (Re)initializes the slot from persisted state.
    ///
    /// Resets any in-progress capture, reloads the history from the store,
    /// requests the background if it is not loaded or loading, and repaints
    /// background plus history. Calling it repeatedly yields the same output.
    pub fn activate(&mut self) {
        if self.surface.is_none() {
            debug!("Slot {} activated before mount; ignoring", self.key);
            return;
        }

        self.pending.reset();
        self.history = self.load_history();
        self.request_background();
        self.repaint();
    }

    /// Handles a click given in raw device coordinates.
    pub fn click(&mut self, raw: PointerPosition, offset: SurfaceOffset) {
        self.capture_point(offset.translate(raw));
    }

    /// Handles a point already translated into surface-local coordinates.
    pub fn capture_point(&mut self, point: PointerPosition) {
        if self.surface.is_none() {
            debug!(
                "Slot {} is not mounted; dropping click at ({}, {})",
                self.key, point.x, point.y
            );
            return;
        }

        if !segment::is_valid_coordinate(point.x) || !segment::is_valid_coordinate(point.y) {
            warn!(
                "Slot {} ignoring click outside the surface at ({}, {})",
                self.key, point.x, point.y
            );
            return;
        }

        self.pending.capture(point.x, point.y);
        if let Some(segment) = self.pending.take_ready() {
            self.commit(segment);
        }
    }

    /// Erases every segment, persists the empty history and repaints the background.
    pub fn clear(&mut self) {
        if self.surface.is_none() {
            debug!("Slot {} is not mounted; dropping clear", self.key);
            return;
        }

        debug!("Slot {} cleared", self.key);
        self.pending.reset();
        self.history.clear();
        self.persist();
        self.repaint();
    }

    /// Applies a finished background load addressed to this slot.
    pub fn apply_background(&mut self, loaded: LoadedBackground) {
        if !matches!(self.background, Background::Pending) {
            debug!(
                "Slot {} ignoring background it is no longer waiting for ({})",
                self.key, loaded.url
            );
            return;
        }

        let decoded = loaded.result.and_then(|bytes| {
            decode_png(&bytes).map_err(|err| BackgroundError::Decode(err.to_string()))
        });

        match decoded {
            Ok(image) => {
                debug!(
                    "Slot {} background loaded ({}x{})",
                    self.key,
                    image.width(),
                    image.height()
                );
                self.background = Background::Loaded(image);
                // History painted before the image arrived would be hidden under it
                self.repaint();
            }
            Err(err) => {
                warn!(
                    "Slot {} failed to load background '{}': {}",
                    self.key, loaded.url, err
                );
                self.background = Background::Failed;
            }
        }
    }

    fn commit(&mut self, segment: LineSegment) {
        if !self.history.try_push(segment, self.max_segments) {
            warn!(
                "Slot {} segment limit ({}) reached; discarding {}",
                self.key, self.max_segments, segment
            );
            return;
        }

        if let Some(surface) = &self.surface {
            if let Err(err) = surface.paint_segment(&segment) {
                warn!("Slot {} failed to paint {}: {}", self.key, segment, err);
            }
        }

        debug!("Slot {} drew {}", self.key, segment);
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(self.key, &self.history) {
            warn!("Slot {} failed to persist history: {}", self.key, err);
        }
    }

    fn load_history(&self) -> DrawingHistory {
        match self.store.load(self.key) {
            Ok(LoadOutcome::Found(history)) => {
                debug!("Slot {} restored {} segments", self.key, history.len());
                history
            }
            Ok(LoadOutcome::NotFound) => {
                debug!("No drawing history stored for slot {}", self.key);
                DrawingHistory::new()
            }
            Ok(LoadOutcome::Malformed(reason)) => {
                warn!(
                    "Stored history for slot {} is unusable, starting empty: {}",
                    self.key, reason
                );
                DrawingHistory::new()
            }
            Err(err) => {
                warn!(
                    "Failed to load history for slot {}, starting empty: {}",
                    self.key, err
                );
                DrawingHistory::new()
            }
        }
    }

    fn request_background(&mut self) {
        if matches!(self.background, Background::Pending | Background::Loaded(_)) {
            return;
        }
        let Some(loader) = &self.loader else {
            return;
        };

        match loader.request(self.key, &self.image_url) {
            Ok(()) => self.background = Background::Pending,
            Err(err) => {
                warn!("Slot {} could not request background: {}", self.key, err);
                self.background = Background::Failed;
            }
        }
    }

    fn repaint(&self) {
        let Some(surface) = &self.surface else {
            return;
        };

        let result = surface.clear().and_then(|_| {
            if let Background::Loaded(image) = &self.background {
                surface.paint_background(image)?;
            }
            surface.paint_segments(self.history.segments())
        });

        if let Err(err) = result {
            warn!("Slot {} failed to repaint: {}", self.key, err);
        }
    }
}
