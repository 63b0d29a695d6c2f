//! Fixed-size raster surface owned by one slot.

use super::render::{self, DEFAULT_STROKE, StrokeStyle};
use super::segment::LineSegment;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use thiserror::Error;

/// Width of every slot surface in pixels.
pub const SURFACE_WIDTH: i32 = 250;
/// Height of every slot surface in pixels.
pub const SURFACE_HEIGHT: i32 = 300;

/// Errors raised while allocating, painting or exporting a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("PNG encode/decode failed: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Failed to create {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A 2D drawing surface of fixed size backed by a Cairo ARGB32 image.
///
/// The surface only paints what it is told; it keeps no record of the
/// segments or background drawn onto it.
pub struct Surface {
    image: cairo::ImageSurface,
    stroke: StrokeStyle,
}

impl Surface {
    /// Allocates a transparent surface of the given size.
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        let image = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
        Ok(Self {
            image,
            stroke: DEFAULT_STROKE,
        })
    }

    /// Allocates a surface with the standard slot dimensions.
    pub fn standard() -> Result<Self, SurfaceError> {
        Self::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }

    pub fn width(&self) -> i32 {
        self.image.width()
    }

    pub fn height(&self) -> i32 {
        self.image.height()
    }

    fn context(&self) -> Result<cairo::Context, SurfaceError> {
        let ctx = cairo::Context::new(&self.image)?;
        ctx.set_antialias(cairo::Antialias::Default);
        Ok(ctx)
    }

    /// Draws `image` stretched over the whole surface.
    pub fn paint_background(&self, image: &cairo::ImageSurface) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        render::render_background(&ctx, image, self.width(), self.height())?;
        Ok(())
    }

    /// Strokes one segment with the surface's default stroke style.
    pub fn paint_segment(&self, segment: &LineSegment) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        render::render_segment(&ctx, segment, &self.stroke)?;
        Ok(())
    }

    /// Strokes segments in order.
    pub fn paint_segments(&self, segments: &[LineSegment]) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        render::render_segments(&ctx, segments, &self.stroke)?;
        Ok(())
    }

    /// Erases all pixel content.
    pub fn clear(&self) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        render::clear_all(&ctx)?;
        Ok(())
    }

    /// Exports the current pixels as a PNG file.
    pub fn write_png(&self, path: &Path) -> Result<(), SurfaceError> {
        let file = File::create(path).map_err(|source| SurfaceError::Create {
            path: path.display().to_string(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.image.write_to_png(&mut writer)?;
        Ok(())
    }

    /// Copy of the raw ARGB32 pixel buffer (row stride included).
    pub fn pixels(&self) -> Vec<u8> {
        self.image.flush();
        let mut out = Vec::new();
        let _ = self.image.with_data(|data| out.extend_from_slice(data));
        out
    }

    /// Reads one pixel as premultiplied `[a, r, g, b]`.
    pub fn argb_at(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        self.image.flush();
        let stride = self.image.stride() as usize;
        let offset = y as usize * stride + x as usize * 4;
        let mut pixel = None;
        let _ = self.image.with_data(|data| {
            if let Some(bytes) = data.get(offset..offset + 4) {
                let value = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                pixel = Some([
                    (value >> 24) as u8,
                    (value >> 16) as u8,
                    (value >> 8) as u8,
                    value as u8,
                ]);
            }
        });
        pixel
    }

    /// Alpha channel of one pixel.
    pub fn alpha_at(&self, x: i32, y: i32) -> Option<u8> {
        self.argb_at(x, y).map(|[a, ..]| a)
    }
}

/// Decodes PNG bytes into an image that can be painted as a background.
pub fn decode_png(bytes: &[u8]) -> Result<cairo::ImageSurface, SurfaceError> {
    let mut cursor = Cursor::new(bytes);
    Ok(cairo::ImageSurface::create_from_png(&mut cursor)?)
}
