//! # Strokes
//!
//! A stroke is everything drawn between one pointer press and its release, kept as the ordered list
//! of straight [`Segment`]s that make it up. While the pointer is held the stroke is an
//! [`InProgressStroke`]; on release it is frozen into an immutable, shared [`Stroke`].

use crate::{
    color::Color,
    geom::{Point, Segment},
};

pub type StrokeID = crate::SketchID<Stroke>;

/// Settings applied to every segment created while they are active.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Brush {
    pub color: Color,
    /// Segment thickness in pixels. Also the eraser radius and cursor size.
    pub size: u32,
}
impl Brush {
    pub const MIN_SIZE: u32 = 1;
    pub const MAX_SIZE: u32 = 50;
    pub const DEFAULT_SIZE: u32 = 10;
    /// Clamp the size into the accepted range.
    #[must_use = "returns a new brush without modifying `self`"]
    pub fn with_size(self, size: u32) -> Self {
        Self {
            size: size.clamp(Self::MIN_SIZE, Self::MAX_SIZE),
            ..self
        }
    }
}
impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// A committed stroke. Never empty, never modified after commit.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Stroke {
    id: StrokeID,
    segments: Box<[Segment]>,
}
impl Stroke {
    #[must_use]
    pub fn id(&self) -> StrokeID {
        self.id
    }
    /// Segments in drawing order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    /// Does any segment of this stroke pass the eraser's proximity test?
    #[must_use]
    pub fn is_near(&self, point: Point, radius: u32) -> bool {
        self.segments
            .iter()
            .any(|segment| segment.is_near(point, radius))
    }
}
impl AsRef<Stroke> for Stroke {
    fn as_ref(&self) -> &Stroke {
        self
    }
}

/// A stroke still being drawn.
#[derive(Clone, Default, Debug)]
pub struct InProgressStroke {
    // Most strokes are dragged for a while, but short taps are common too.
    segments: smallvec::SmallVec<[Segment; 8]>,
}
impl InProgressStroke {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a segment from the end of the last one to `point`.
    ///
    /// The first point of a stroke becomes a zero-length segment from `point` to itself.
    pub fn extend(&mut self, point: Point, brush: Brush) {
        let start = self.segments.last().map_or(point, |last| last.end);
        self.segments.push(Segment {
            start,
            end: point,
            color: brush.color,
            thickness: brush.size,
        });
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    /// Freeze into a committed stroke with a fresh ID, or `None` if nothing was drawn.
    #[must_use]
    pub fn finish(self) -> Option<Stroke> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Stroke {
            id: StrokeID::default(),
            segments: self.segments.into_vec().into_boxed_slice(),
        })
    }
}
