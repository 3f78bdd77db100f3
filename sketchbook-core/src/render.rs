//! # Render
//!
//! A [`Frame`] is the complete, ordered list of what to draw for one viewport size. Painting it
//! back to front in field order gives the canvas: the placed bitmap, then every segment (committed
//! strokes first, then the stroke in progress), then the cursor.

use crate::{
    bitmap::Bitmap,
    color::Color,
    fit::Placement,
    geom::{Rect, Segment},
};

/// The working bitmap and where it lands in the viewport.
#[derive(Copy, Clone, Debug)]
pub struct PlacedBitmap<'a> {
    pub bitmap: &'a Bitmap,
    pub placement: Placement,
}

/// The tool outline drawn under the pointer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Cursor {
    pub rect: Rect,
    pub fill: Color,
    pub outline: Color,
}

#[derive(Clone, Debug)]
pub struct Frame<'a> {
    pub viewport: (u32, u32),
    pub image: Option<PlacedBitmap<'a>>,
    pub segments: Vec<Segment>,
    /// `None` until the pointer has been seen.
    pub cursor: Option<Cursor>,
}
impl Frame<'_> {
    /// Is there nothing at all to draw?
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.image.is_none() && self.segments.is_empty() && self.cursor.is_none()
    }
}
