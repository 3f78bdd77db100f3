//! # Flattening
//!
//! Rasterize a [`Frame`] onto an opaque white background, for saving. The cursor is left out.

use image::{imageops, Rgb, RgbImage, RgbaImage};
use sketchbook_core::{color::Color, geom::Segment, render::Frame};

#[must_use]
pub fn flatten(frame: &Frame<'_>) -> RgbImage {
    let (width, height) = frame.viewport;
    let mut out = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    if let Some(image) = frame.image {
        let (w, h) = image.placement.size;
        if w != 0 && h != 0 {
            let scaled = imageops::resize(
                image.bitmap.as_image(),
                w,
                h,
                imageops::FilterType::Triangle,
            );
            let (x, y) = image.placement.offset;
            blend_image(&mut out, &scaled, i64::from(x), i64::from(y));
        }
    }
    for segment in &frame.segments {
        draw_segment(&mut out, segment);
    }
    out
}

/// Flatten and write to `path`. If `path` has no extension, `default_extension` is appended.
/// Returns the path actually written.
pub fn save(
    frame: &Frame<'_>,
    path: &std::path::Path,
    default_extension: &str,
) -> anyhow::Result<std::path::PathBuf> {
    use anyhow::Context;
    let path = with_default_extension(path, default_extension);
    flatten(frame)
        .save(&path)
        .with_context(|| format!("writing snapshot to {path:?}"))?;
    log::debug!("Saved snapshot to {path:?}");
    Ok(path)
}

#[must_use]
pub fn with_default_extension(
    path: &std::path::Path,
    default_extension: &str,
) -> std::path::PathBuf {
    if path.extension().is_some() {
        path.to_owned()
    } else {
        path.with_extension(default_extension)
    }
}

/// Source-over onto an opaque background.
fn blend(under: Rgb<u8>, over: Color) -> Rgb<u8> {
    let alpha = u32::from(over.a);
    let mix = |under: u8, over: u8| {
        let mixed = (u32::from(over) * alpha + u32::from(under) * (255 - alpha) + 127) / 255;
        u8::try_from(mixed).unwrap_or(u8::MAX)
    };
    Rgb([
        mix(under.0[0], over.r),
        mix(under.0[1], over.g),
        mix(under.0[2], over.b),
    ])
}

fn put(out: &mut RgbImage, x: i64, y: i64, color: Color) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if let Some(pixel) = out.get_pixel_mut_checked(x, y) {
        *pixel = blend(*pixel, color);
    }
}

fn blend_image(out: &mut RgbImage, image: &RgbaImage, x: i64, y: i64) {
    for (dx, dy, pixel) in image.enumerate_pixels() {
        put(out, x + i64::from(dx), y + i64::from(dy), (*pixel).into());
    }
}

/// Filled discs of diameter `thickness` along a Bresenham walk.
fn draw_segment(out: &mut RgbImage, segment: &Segment) {
    let radius = i64::from(segment.thickness / 2);
    let (width, height) = out.dimensions();
    // Any disc centered outside this box misses the image entirely.
    let min = (-radius, -radius);
    let max = (
        i64::from(width) - 1 + radius,
        i64::from(height) - 1 + radius,
    );
    let start = (i64::from(segment.start.x), i64::from(segment.start.y));
    let end = (i64::from(segment.end.x), i64::from(segment.end.y));
    let Some(((x1, y1), (x2, y2))) = clip(start, end, min, max) else {
        return;
    };

    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x1, y1);
    loop {
        draw_disc(out, x, y, radius, segment.color);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Liang-Barsky clip of the line `start..=end` to the inclusive box `min..=max`.
/// `None` if no part of the line is inside. Endpoints already inside are returned exactly.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn clip(
    start: (i64, i64),
    end: (i64, i64),
    min: (i64, i64),
    max: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let (x1, y1) = (start.0 as f64, start.1 as f64);
    let dx = end.0 as f64 - x1;
    let dy = end.1 as f64 - y1;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-dx, x1 - min.0 as f64),
        (dx, max.0 as f64 - x1),
        (-dy, y1 - min.1 as f64),
        (dy, max.1 as f64 - y1),
    ] {
        if p == 0.0 {
            // Parallel to this edge, and outside of it.
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    // Rounding may land a point one pixel outside the box, which `put` ignores.
    let at = |t: f64| ((x1 + t * dx).round() as i64, (y1 + t * dy).round() as i64);
    let clipped_start = if t0 > 0.0 { at(t0) } else { start };
    let clipped_end = if t1 < 1.0 { at(t1) } else { end };
    Some((clipped_start, clipped_end))
}

fn draw_disc(out: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Color) {
    let r_sq = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r_sq {
                put(out, cx + dx, cy + dy, color);
            }
        }
    }
}
