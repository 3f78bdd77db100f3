//! # Filters
//!
//! Pure per-pixel functions from one bitmap to a brand new one. The canvas always feeds them the
//! *original* bitmap, so applying a filter twice with different parameters never compounds.
//!
//! Parameters are presentation values coming straight from sliders - out of range values are
//! saturated into range rather than rejected.

use crate::{bitmap::Bitmap, color::Color};

/// Inclusive range of the threshold parameter.
pub const THRESHOLD_RANGE: std::ops::RangeInclusive<i32> = 0..=255;
/// Inclusive range of each RGB offset.
pub const OFFSET_RANGE: std::ops::RangeInclusive<i32> = -255..=255;

#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Filter {
    /// Invert R, G and B. Alpha is kept.
    Negative,
    /// Opaque black below the luminance threshold, opaque white at or above it.
    Threshold(u8),
    /// Add a signed offset to each channel, clamping into `0..=255`. Alpha is kept.
    RgbOffset { red: i16, green: i16, blue: i16 },
}
impl Filter {
    /// Threshold filter, saturating `threshold` into `0..=255`.
    #[must_use]
    pub fn threshold(threshold: i32) -> Self {
        let clamped = threshold.clamp(*THRESHOLD_RANGE.start(), *THRESHOLD_RANGE.end());
        // In range by the clamp above.
        Self::Threshold(u8::try_from(clamped).unwrap_or(u8::MAX))
    }
    /// Channel offset filter, saturating each offset into `-255..=255`.
    #[must_use]
    pub fn rgb_offset(red: i32, green: i32, blue: i32) -> Self {
        let clamp = |offset: i32| {
            let clamped = offset.clamp(*OFFSET_RANGE.start(), *OFFSET_RANGE.end());
            i16::try_from(clamped).unwrap_or_default()
        };
        Self::RgbOffset {
            red: clamp(red),
            green: clamp(green),
            blue: clamp(blue),
        }
    }
    /// Run the filter over `source`, producing a new bitmap of the same size.
    #[must_use]
    pub fn apply(&self, source: &Bitmap) -> Bitmap {
        match *self {
            Self::Negative => negative(source),
            Self::Threshold(t) => threshold(source, t),
            Self::RgbOffset { red, green, blue } => rgb_offset(source, red, green, blue),
        }
    }
}

#[must_use]
pub fn negative(source: &Bitmap) -> Bitmap {
    source.map_pixels(|Color { r, g, b, a }| Color {
        r: 255 - r,
        g: 255 - g,
        b: 255 - b,
        a,
    })
}

/// Perceptual brightness, `0.299 R + 0.587 G + 0.114 B`, truncated.
#[must_use]
pub fn luminance(color: Color) -> u8 {
    let lum = f64::from(color.r) * 0.299 + f64::from(color.g) * 0.587 + f64::from(color.b) * 0.114;
    // Weights sum to 1, so this never exceeds 255.0. `as` truncates toward zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lum = lum as u8;
    lum
}

#[must_use]
pub fn threshold(source: &Bitmap, threshold: u8) -> Bitmap {
    source.map_pixels(|color| {
        if luminance(color) < threshold {
            Color::BLACK
        } else {
            Color::WHITE
        }
    })
}

#[must_use]
pub fn rgb_offset(source: &Bitmap, red: i16, green: i16, blue: i16) -> Bitmap {
    let shift = |channel: u8, offset: i16| -> u8 {
        let shifted = (i16::from(channel) + offset).clamp(0, 255);
        u8::try_from(shifted).unwrap_or_default()
    };
    source.map_pixels(|Color { r, g, b, a }| Color {
        r: shift(r, red),
        g: shift(g, green),
        b: shift(b, blue),
        a,
    })
}

#[cfg(test)]
mod test {
    use super::{luminance, Filter};
    use crate::{bitmap::Bitmap, color::Color};

    /// A small bitmap with a spread of colors and alphas.
    fn gradient() -> Bitmap {
        let image = image::RgbaImage::from_fn(16, 16, |x, y| {
            let x = u8::try_from(x * 16).unwrap();
            let y = u8::try_from(y * 16).unwrap();
            image::Rgba([x, y, x ^ y, 255 - y])
        });
        Bitmap::new(image).unwrap()
    }

    #[test]
    fn negative_is_involution() {
        let original = gradient();
        let twice = Filter::Negative.apply(&Filter::Negative.apply(&original));
        assert_eq!(twice, original);
    }
    #[test]
    fn negative_keeps_alpha() {
        let source = Bitmap::from_pixel(
            1,
            1,
            Color {
                r: 10,
                g: 20,
                b: 30,
                a: 40,
            },
        )
        .unwrap();
        let out = Filter::Negative.apply(&source);
        assert_eq!(
            out.pixel(0, 0),
            Some(Color {
                r: 245,
                g: 235,
                b: 225,
                a: 40
            })
        );
    }
    #[test]
    fn threshold_is_binary() {
        let source = gradient();
        for t in [0, 1, 76, 77, 128, 254, 255] {
            let out = Filter::threshold(t).apply(&source);
            assert!(
                out.pixels()
                    .iter()
                    .all(|&p| p == Color::BLACK || p == Color::WHITE),
                "threshold {t} produced a non-binary pixel"
            );
        }
    }
    #[test]
    fn threshold_red() {
        // 255 * 0.299 = 76.245
        assert_eq!(luminance(Color::RED), 76);
        let red = Bitmap::from_pixel(2, 2, Color::RED).unwrap();
        let out = Filter::threshold(100).apply(&red);
        assert_eq!(out.pixels(), &[Color::BLACK; 4]);
        // At the boundary, luminance == threshold is white.
        let out = Filter::threshold(76).apply(&red);
        assert_eq!(out.pixels(), &[Color::WHITE; 4]);
    }
    #[test]
    fn threshold_extremes() {
        let source = gradient();
        // Nothing is darker than zero.
        let out = Filter::threshold(0).apply(&source);
        assert!(out.pixels().iter().all(|&p| p == Color::WHITE));
        let white = Bitmap::from_pixel(1, 1, Color::WHITE).unwrap();
        assert_eq!(luminance(Color::WHITE), 255);
        assert_eq!(
            Filter::threshold(255).apply(&white).pixel(0, 0),
            Some(Color::WHITE)
        );
    }
    #[test]
    fn zero_offset_is_identity() {
        let source = gradient();
        assert_eq!(Filter::rgb_offset(0, 0, 0).apply(&source), source);
    }
    #[test]
    fn offset_clamps_per_channel() {
        let source = Bitmap::from_pixel(
            1,
            1,
            Color {
                r: 250,
                g: 5,
                b: 100,
                a: 7,
            },
        )
        .unwrap();
        let out = Filter::rgb_offset(10, -10, 55).apply(&source);
        assert_eq!(
            out.pixel(0, 0),
            Some(Color {
                r: 255,
                g: 0,
                b: 155,
                a: 7
            })
        );
    }
    #[test]
    fn parameters_saturate() {
        assert_eq!(Filter::threshold(-5), Filter::Threshold(0));
        assert_eq!(Filter::threshold(1000), Filter::Threshold(255));
        assert_eq!(
            Filter::rgb_offset(-300, 300, 12),
            Filter::RgbOffset {
                red: -255,
                green: 255,
                blue: 12
            }
        );
    }
    #[test]
    fn names() {
        assert_eq!(Filter::Negative.to_string(), "negative");
        assert_eq!(Filter::threshold(3).to_string(), "threshold");
    }
}
