//! Cairo-based rendering functions for backgrounds and segments.

use super::color::{BLACK, Color, TRANSPARENT};
use super::segment::LineSegment;

/// Stroke parameters applied to every segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

/// Matches the initial state of a fresh 2D context: 1px opaque black, butt caps.
pub const DEFAULT_STROKE: StrokeStyle = StrokeStyle {
    color: BLACK,
    width: 1.0,
};

/// Paints `image` scaled to exactly fill a `width` x `height` area.
///
/// The x and y scale factors are computed independently, so the aspect ratio
/// of the source is not preserved. Images with no pixels are ignored.
pub fn render_background(
    ctx: &cairo::Context,
    image: &cairo::ImageSurface,
    width: i32,
    height: i32,
) -> Result<(), cairo::Error> {
    let (img_w, img_h) = (image.width(), image.height());
    if img_w <= 0 || img_h <= 0 {
        return Ok(());
    }

    ctx.save()?;
    ctx.scale(
        width as f64 / img_w as f64,
        height as f64 / img_h as f64,
    );
    let result = ctx.set_source_surface(image, 0.0, 0.0).and_then(|_| {
        // Pad so the filtered edges stay opaque instead of fading to transparent
        ctx.source().set_extend(cairo::Extend::Pad);
        ctx.paint()
    });
    ctx.restore()?;
    result
}

/// Strokes a single straight line. Prior content is left untouched.
pub fn render_segment(
    ctx: &cairo::Context,
    segment: &LineSegment,
    style: &StrokeStyle,
) -> Result<(), cairo::Error> {
    style.color.apply(ctx);
    ctx.set_line_width(style.width);
    ctx.set_line_cap(cairo::LineCap::Butt);

    // Reset the current path so earlier segments are not stroked twice
    ctx.new_path();
    ctx.move_to(segment.x1, segment.y1);
    ctx.line_to(segment.x2, segment.y2);
    ctx.stroke()
}

/// Renders segments in order (first segment = bottom layer).
pub fn render_segments(
    ctx: &cairo::Context,
    segments: &[LineSegment],
    style: &StrokeStyle,
) -> Result<(), cairo::Error> {
    for segment in segments {
        render_segment(ctx, segment, style)?;
    }
    Ok(())
}

/// Erases all pixel content to fully transparent.
pub fn clear_all(ctx: &cairo::Context) -> Result<(), cairo::Error> {
    ctx.save()?;
    TRANSPARENT.apply(ctx);
    ctx.set_operator(cairo::Operator::Source);
    let result = ctx.paint();
    ctx.restore()?;
    result
}
