//! # Bitmaps
//!
//! An RGBA8 pixel grid that is guaranteed to have a non-zero width and height. Everything
//! downstream - the filters and the display fit - relies on that, so the check happens once here
//! at load time.

use image::RgbaImage;

#[derive(thiserror::Error, Debug)]
pub enum ImageLoadError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has zero width or height")]
    ZeroDimension,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap(RgbaImage);
impl Bitmap {
    /// Wrap an already decoded image, rejecting empty ones.
    pub fn new(image: RgbaImage) -> Result<Self, ImageLoadError> {
        if image.width() == 0 || image.height() == 0 {
            Err(ImageLoadError::ZeroDimension)
        } else {
            Ok(Self(image))
        }
    }
    /// Fill a new bitmap with one color.
    pub fn from_pixel(
        width: u32,
        height: u32,
        color: crate::color::Color,
    ) -> Result<Self, ImageLoadError> {
        Self::new(RgbaImage::from_pixel(width, height, color.into()))
    }
    /// Decode from an in-memory encoded file, guessing the format from its contents.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        let image = image::load_from_memory(bytes)?;
        Self::new(image.into_rgba8())
    }
    /// Read and decode a file, guessing the format from its contents.
    pub fn open(path: &std::path::Path) -> Result<Self, ImageLoadError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<crate::color::Color> {
        self.0.get_pixel_checked(x, y).map(|&p| p.into())
    }
    #[must_use]
    pub fn pixels(&self) -> &[crate::color::Color] {
        bytemuck::cast_slice(self.0.as_raw().as_slice())
    }
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }
    /// Build a same-sized bitmap by mapping every pixel.
    #[must_use = "returns a new bitmap without modifying `self`"]
    pub fn map_pixels<F>(&self, mut f: F) -> Self
    where
        F: FnMut(crate::color::Color) -> crate::color::Color,
    {
        let mut out = self.0.clone();
        let pixels = bytemuck::cast_slice_mut::<u8, crate::color::Color>(&mut out);
        for pixel in pixels {
            *pixel = f(*pixel);
        }
        // Same dimensions as `self`, which were already checked.
        Self(out)
    }
}
impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}
