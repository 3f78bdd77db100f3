//! # Canvas
//!
//! The whole drawing surface as one owned value: committed strokes, the stroke being drawn, the
//! undo history, the original and working bitmaps and the current tool. Input comes in as method
//! calls or [`PointerEvent`]s, and [`Canvas::render_frame`] produces what to draw.

use std::sync::Arc;

use crate::{
    bitmap::{Bitmap, ImageLoadError},
    color::Color,
    commands::{CommandConsumer, CommandError, DoUndo, Operation},
    filter::Filter,
    fit::{self, GeometryError},
    geom::{Point, Rect},
    history::History,
    input::{PointerEvent, Tool},
    render::{Cursor, Frame, PlacedBitmap},
    state::stroke_collection::{writer::StrokeCollectionWriter, StrokeCollection},
    stroke::{Brush, InProgressStroke, Stroke},
};

#[derive(Clone, Debug, Default)]
pub struct Canvas {
    strokes: StrokeCollection,
    history: History,
    in_progress: Option<InProgressStroke>,
    /// As loaded. Never modified, only replaced or dropped.
    original: Option<Bitmap>,
    /// What is displayed. Always derived from `original`.
    working: Option<Bitmap>,
    brush: Brush,
    tool: Tool,
    pressed: bool,
    cursor: Option<Point>,
}
// Accessors
impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// A blank canvas with the given brush.
    #[must_use]
    pub fn with_brush(brush: Brush) -> Self {
        Self {
            brush: brush.with_size(brush.size),
            ..Self::default()
        }
    }
    /// Committed strokes, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &[Arc<Stroke>] {
        self.strokes.strokes()
    }
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
    #[must_use]
    pub fn in_progress(&self) -> Option<&InProgressStroke> {
        self.in_progress.as_ref()
    }
    #[must_use]
    pub fn original(&self) -> Option<&Bitmap> {
        self.original.as_ref()
    }
    #[must_use]
    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }
    #[must_use]
    pub fn working(&self) -> Option<&Bitmap> {
        self.working.as_ref()
    }
    #[must_use]
    pub fn brush(&self) -> Brush {
        self.brush
    }
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }
    #[must_use]
    pub fn tool_size(&self) -> u32 {
        self.brush.size
    }
    #[must_use]
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }
}
// Strokes and erasing
impl Canvas {
    /// Start a new, empty stroke, discarding any uncommitted one.
    pub fn begin_stroke(&mut self) {
        self.in_progress = Some(InProgressStroke::new());
    }
    /// Continue the open stroke to `point` with the current brush. No-op if no stroke is open.
    pub fn extend_stroke(&mut self, point: Point) {
        if let Some(stroke) = self.in_progress.as_mut() {
            stroke.extend(point, self.brush);
        }
    }
    /// Move the open stroke into the collection and record it. Empty strokes are dropped silently.
    pub fn commit_stroke(&mut self) {
        let Some(stroke) = self.in_progress.take().and_then(InProgressStroke::finish) else {
            return;
        };
        StrokeCollectionWriter::new(&mut self.history, &mut self.strokes).push_back(stroke);
    }
    /// Remove the newest stroke with an endpoint within `radius` of `point`.
    /// Returns the removed stroke, or `None` if nothing was hit.
    pub fn erase_at(&mut self, point: Point, radius: u32) -> Option<Arc<Stroke>> {
        StrokeCollectionWriter::new(&mut self.history, &mut self.strokes).erase_at(point, radius)
    }
    pub fn set_eraser_mode(&mut self, eraser: bool) {
        self.set_tool(if eraser { Tool::Eraser } else { Tool::Pen });
    }
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            log::debug!("Switched to {tool}");
        }
        self.tool = tool;
    }
    pub fn set_color(&mut self, color: Color) {
        self.brush.color = color;
    }
    /// Set the brush thickness, eraser radius and cursor size at once. Clamped into
    /// [`Brush::MIN_SIZE`]`..=`[`Brush::MAX_SIZE`].
    pub fn set_tool_size(&mut self, size: u32) {
        self.brush = self.brush.with_size(size);
    }
    /// Feed one pointer event through the pen/eraser state machine.
    pub fn handle(&mut self, event: PointerEvent) {
        self.cursor = Some(event.position());
        match (event, self.tool) {
            (PointerEvent::Down(_), Tool::Pen) => {
                self.pressed = true;
                self.begin_stroke();
            }
            (PointerEvent::Down(p), Tool::Eraser) => {
                self.pressed = true;
                self.in_progress = None;
                self.erase_at(p, self.brush.size);
            }
            (PointerEvent::Move(p), Tool::Pen) if self.pressed => self.extend_stroke(p),
            (PointerEvent::Move(p), Tool::Eraser) if self.pressed => {
                self.erase_at(p, self.brush.size);
            }
            (PointerEvent::Up(_), Tool::Pen) => {
                self.pressed = false;
                self.commit_stroke();
            }
            (PointerEvent::Up(_), Tool::Eraser) => {
                self.pressed = false;
                self.in_progress = None;
            }
            // Only moves the cursor.
            (PointerEvent::Move(_) | PointerEvent::Hover(_), _) => (),
        }
    }
}
// History
impl Canvas {
    /// Reverse the most recent operation. No-op with an empty history.
    pub fn undo(&mut self) {
        let Some(operation) = self.history.pop() else {
            log::trace!("Nothing to undo");
            return;
        };
        match self.apply(DoUndo::Undo(&operation)) {
            Ok(()) => log::debug!("Undid {operation:?}"),
            Err(e) => log::warn!("Failed to undo {operation:?}: {e}"),
        }
    }
    /// Drop every stroke, the history and both bitmaps.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.history.clear();
        self.in_progress = None;
        self.original = None;
        self.working = None;
        log::debug!("Cleared canvas");
    }
}
// Bitmaps and filters
impl Canvas {
    /// Replace both bitmaps with `bitmap`. Strokes are kept and drawn over it.
    pub fn load_image(&mut self, bitmap: Bitmap) {
        log::debug!("Loaded {bitmap:?}");
        self.working = Some(bitmap.clone());
        self.original = Some(bitmap);
        self.history.push(Operation::LoadImage);
    }
    /// Decode and load an encoded image. On error the canvas is unchanged.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), ImageLoadError> {
        let bitmap = Bitmap::decode(bytes)?;
        self.load_image(bitmap);
        Ok(())
    }
    /// Read, decode and load an image file. On error the canvas is unchanged.
    pub fn load_image_path(&mut self, path: &std::path::Path) -> Result<(), ImageLoadError> {
        let bitmap = Bitmap::open(path)?;
        self.load_image(bitmap);
        Ok(())
    }
    #[must_use]
    pub fn working_bitmap_copy(&self) -> Option<Bitmap> {
        self.working.clone()
    }
    /// Put back a working bitmap taken with [`Self::working_bitmap_copy`]. Not recorded.
    pub fn set_working_bitmap(&mut self, bitmap: Option<Bitmap>) {
        self.working = bitmap;
    }
    /// Recompute the working bitmap from the original. No-op without an original.
    pub fn apply_filter(&mut self, filter: Filter) {
        let Some(original) = self.original.as_ref() else {
            log::debug!("Skipping {filter}, no image loaded");
            return;
        };
        log::debug!("Applying {filter:?}");
        self.working = Some(filter.apply(original));
    }
    pub fn apply_negative(&mut self) {
        self.apply_filter(Filter::Negative);
    }
    /// See [`Filter::threshold`].
    pub fn apply_threshold(&mut self, threshold: i32) {
        self.apply_filter(Filter::threshold(threshold));
    }
    /// See [`Filter::rgb_offset`].
    pub fn apply_rgb_offset(&mut self, red: i32, green: i32, blue: i32) {
        self.apply_filter(Filter::rgb_offset(red, green, blue));
    }
    /// Throw away any filtering. No-op without an original.
    pub fn restore_original(&mut self) {
        if let Some(original) = self.original.as_ref() {
            log::debug!("Restoring original image");
            self.working = Some(original.clone());
        } else {
            log::debug!("Nothing to restore, no image loaded");
        }
    }
}
// Output
impl Canvas {
    /// Everything to draw for a `width` by `height` viewport.
    ///
    /// # Errors
    /// [`GeometryError::ZeroArea`] if there is a bitmap to place and the viewport is empty.
    pub fn render_frame(&self, width: u32, height: u32) -> Result<Frame<'_>, GeometryError> {
        let viewport = (width, height);
        let image = self
            .working
            .as_ref()
            .map(|bitmap| {
                fit::fit(viewport, bitmap.dimensions())
                    .map(|placement| PlacedBitmap { bitmap, placement })
            })
            .transpose()?;
        let segments = self
            .strokes
            .iter()
            .flat_map(|stroke| stroke.segments())
            .chain(self.in_progress.iter().flat_map(InProgressStroke::segments))
            .copied()
            .collect();
        let cursor = self.cursor.map(|point| {
            let rect = Rect::centered_square(point, self.brush.size);
            match self.tool {
                Tool::Pen => Cursor {
                    rect,
                    fill: self.brush.color,
                    outline: self.brush.color,
                },
                Tool::Eraser => Cursor {
                    rect,
                    fill: Color::WHITE,
                    outline: Color::BLACK,
                },
            }
        });
        Ok(Frame {
            viewport,
            image,
            segments,
            cursor,
        })
    }
}

impl CommandConsumer<Operation> for Canvas {
    fn apply(&mut self, command: DoUndo<'_, Operation>) -> Result<(), CommandError> {
        match command {
            // Carries no pixels, so there is nothing to load again.
            DoUndo::Do(Operation::LoadImage) => Err(CommandError::NoOp),
            DoUndo::Undo(Operation::LoadImage) => {
                // The original stays, so a later restore brings the image back.
                self.working = None;
                Ok(())
            }
            DoUndo::Do(Operation::Draw(_) | Operation::Erase(_))
            | DoUndo::Undo(Operation::Draw(_) | Operation::Erase(_)) => self.strokes.apply(command),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Canvas;
    use crate::{
        bitmap::{Bitmap, ImageLoadError},
        color::Color,
        commands::Operation,
        fit::{GeometryError, Placement},
        geom::{Point, Rect},
        input::{PointerEvent, Tool},
        stroke::StrokeID,
    };

    fn red_2x2() -> Bitmap {
        Bitmap::from_pixel(2, 2, Color::RED).unwrap()
    }
    fn draw(canvas: &mut Canvas, points: &[(i32, i32)]) {
        canvas.begin_stroke();
        for &p in points {
            canvas.extend_stroke(p.into());
        }
        canvas.commit_stroke();
    }
    fn ids(canvas: &Canvas) -> Vec<StrokeID> {
        canvas.strokes().iter().map(|s| s.id()).collect()
    }

    #[test]
    fn commit_then_undo_restores() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0, 0), (10, 10)]);
        draw(&mut canvas, &[(20, 20)]);
        let before = ids(&canvas);
        draw(&mut canvas, &[(5, 5), (6, 6), (7, 7)]);
        assert_eq!(canvas.strokes().len(), 3);
        canvas.undo();
        assert_eq!(ids(&canvas), before);
    }
    #[test]
    fn empty_commit_is_noop() {
        let mut canvas = Canvas::new();
        canvas.commit_stroke();
        canvas.begin_stroke();
        canvas.commit_stroke();
        assert!(canvas.strokes().is_empty());
        assert!(canvas.history().is_empty());
        // Extending without an open stroke does nothing.
        canvas.extend_stroke(Point::new(1, 1));
        canvas.commit_stroke();
        assert!(canvas.strokes().is_empty());
    }
    #[test]
    fn erase_undo_reappends() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0, 0)]);
        draw(&mut canvas, &[(100, 100)]);
        draw(&mut canvas, &[(200, 200)]);
        let [a, b, c] = ids(&canvas)[..] else {
            panic!("expected three strokes")
        };
        assert_eq!(
            canvas.erase_at(Point::new(101, 101), 2).map(|s| s.id()),
            Some(b)
        );
        assert!(matches!(canvas.history().last(), Some(Operation::Erase(_))));
        canvas.undo();
        assert_eq!(ids(&canvas), [a, c, b]);
    }
    #[test]
    fn erase_miss_is_silent() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0, 0), (100, 0)]);
        assert!(canvas.erase_at(Point::new(50, 0), 10).is_none());
        assert_eq!(canvas.strokes().len(), 1);
        assert_eq!(canvas.history().len(), 1);
    }
    #[test]
    fn undo_empty_is_noop() {
        let mut canvas = Canvas::new();
        canvas.undo();
        assert!(canvas.strokes().is_empty());
    }
    #[test]
    fn load_undo_keeps_original() {
        let mut canvas = Canvas::new();
        canvas.load_image(red_2x2());
        assert_eq!(canvas.working(), Some(&red_2x2()));
        canvas.undo();
        assert!(canvas.working().is_none());
        assert!(canvas.has_original());
        canvas.restore_original();
        assert_eq!(canvas.working(), Some(&red_2x2()));
    }
    #[test]
    fn replay_rebuilds_strokes() {
        use crate::commands::{CommandConsumer, CommandError, DoUndo};
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0, 0)]);
        canvas.load_image(red_2x2());
        draw(&mut canvas, &[(100, 100)]);
        draw(&mut canvas, &[(200, 200)]);
        canvas.erase_at(Point::new(100, 100), 2);

        let mut replayed = Canvas::new();
        for op in canvas.history().iter() {
            let result = replayed.apply(DoUndo::Do(op));
            if matches!(op, Operation::LoadImage) {
                assert_eq!(result, Err(CommandError::NoOp));
            } else {
                assert_eq!(result, Ok(()));
            }
        }
        assert_eq!(ids(&replayed), ids(&canvas));
        assert!(replayed.working().is_none());
        assert!(!replayed.has_original());
    }
    #[test]
    fn load_error_leaves_state() {
        let mut canvas = Canvas::new();
        canvas.load_image(red_2x2());
        draw(&mut canvas, &[(1, 1)]);
        let history = canvas.history().len();
        assert!(matches!(
            canvas.load_image_bytes(b"nope"),
            Err(ImageLoadError::Decode(_))
        ));
        assert!(matches!(
            canvas.load_image_path(std::path::Path::new("/this/path/does/not/exist.png")),
            Err(ImageLoadError::Io(_))
        ));
        assert_eq!(canvas.history().len(), history);
        assert_eq!(canvas.working(), Some(&red_2x2()));
        assert_eq!(canvas.original(), Some(&red_2x2()));
    }
    #[test]
    fn threshold_red_is_black() {
        let mut canvas = Canvas::new();
        canvas.load_image(red_2x2());
        canvas.apply_threshold(100);
        assert_eq!(
            canvas.working().unwrap().pixels(),
            &[Color::BLACK; 4]
        );
        // Filters don't touch the history.
        assert_eq!(canvas.history().len(), 1);
    }
    #[test]
    fn filters_never_compound() {
        let mut canvas = Canvas::new();
        canvas.load_image(red_2x2());
        canvas.apply_negative();
        canvas.apply_negative();
        assert_eq!(
            canvas.working().unwrap().pixel(0, 0),
            Some(Color::rgb(0, 255, 255))
        );
        canvas.apply_rgb_offset(0, 100, 0);
        canvas.apply_rgb_offset(0, 100, 0);
        assert_eq!(
            canvas.working().unwrap().pixel(1, 1),
            Some(Color::rgb(255, 100, 0))
        );
        canvas.apply_rgb_offset(0, 0, 0);
        assert_eq!(canvas.working(), canvas.original());
        assert_eq!(canvas.original(), Some(&red_2x2()));
    }
    #[test]
    fn filters_without_image() {
        let mut canvas = Canvas::new();
        canvas.apply_negative();
        canvas.apply_threshold(3);
        canvas.restore_original();
        assert!(canvas.working().is_none());
    }
    #[test]
    fn preview_snapshot_roundtrip() {
        let mut canvas = Canvas::new();
        canvas.load_image(red_2x2());
        let snapshot = canvas.working_bitmap_copy();
        canvas.apply_negative();
        assert_ne!(canvas.working_bitmap_copy(), snapshot);
        canvas.set_working_bitmap(snapshot);
        assert_eq!(canvas.working(), Some(&red_2x2()));
    }
    #[test]
    fn clear_empties_everything() {
        let mut canvas = Canvas::new();
        canvas.load_image(red_2x2());
        draw(&mut canvas, &[(1, 1), (2, 2)]);
        canvas.begin_stroke();
        canvas.extend_stroke(Point::new(9, 9));
        canvas.clear();
        assert!(canvas.strokes().is_empty());
        assert!(canvas.in_progress().is_none());
        assert!(canvas.history().is_empty());
        assert!(canvas.original().is_none());
        assert!(canvas.working().is_none());
        // Nothing left to undo either.
        canvas.undo();
        assert!(canvas.working().is_none());
    }
    #[test]
    fn pen_events() {
        let mut canvas = Canvas::new();
        canvas.set_color(Color::RED);
        canvas.set_tool_size(3);
        // Moves without a press only move the cursor.
        canvas.handle(PointerEvent::Move(Point::new(1, 1)));
        assert!(canvas.in_progress().is_none());
        canvas.handle(PointerEvent::Down(Point::new(0, 0)));
        canvas.handle(PointerEvent::Move(Point::new(0, 0)));
        canvas.handle(PointerEvent::Move(Point::new(4, 0)));
        assert_eq!(canvas.in_progress().map(|s| s.len()), Some(2));
        canvas.handle(PointerEvent::Up(Point::new(4, 0)));
        assert!(canvas.in_progress().is_none());
        assert_eq!(canvas.strokes().len(), 1);
        let segments = canvas.strokes()[0].segments();
        assert!(segments[0].is_dot());
        assert!(segments
            .iter()
            .all(|s| s.color == Color::RED && s.thickness == 3));
        // Press and release without motion leaves nothing.
        canvas.handle(PointerEvent::Down(Point::new(9, 9)));
        canvas.handle(PointerEvent::Up(Point::new(9, 9)));
        assert_eq!(canvas.strokes().len(), 1);
        // Hover after release doesn't extend.
        canvas.handle(PointerEvent::Hover(Point::new(20, 20)));
        assert!(canvas.in_progress().is_none());
        assert_eq!(canvas.cursor(), Some(Point::new(20, 20)));
    }
    #[test]
    fn eraser_events() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, &[(0, 0)]);
        draw(&mut canvas, &[(50, 0)]);
        draw(&mut canvas, &[(100, 0)]);
        canvas.set_eraser_mode(true);
        canvas.set_tool_size(5);
        assert_eq!(canvas.tool(), Tool::Eraser);
        canvas.handle(PointerEvent::Down(Point::new(3, 4)));
        assert_eq!(canvas.strokes().len(), 2);
        // Dragging erases along the way.
        canvas.handle(PointerEvent::Move(Point::new(50, 5)));
        canvas.handle(PointerEvent::Up(Point::new(60, 0)));
        assert_eq!(canvas.strokes().len(), 1);
        // Not pressed any more.
        canvas.handle(PointerEvent::Move(Point::new(100, 0)));
        assert_eq!(canvas.strokes().len(), 1);
        assert!(canvas.in_progress().is_none());
    }
    #[test]
    fn tool_size_clamped() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.tool_size(), 10);
        canvas.set_tool_size(0);
        assert_eq!(canvas.tool_size(), 1);
        canvas.set_tool_size(51);
        assert_eq!(canvas.tool_size(), 50);
    }
    #[test]
    fn frame_contents() {
        let mut canvas = Canvas::new();
        assert!(canvas.render_frame(10, 10).unwrap().is_blank());
        canvas.load_image(Bitmap::from_pixel(800, 400, Color::WHITE).unwrap());
        draw(&mut canvas, &[(0, 0), (1, 1)]);
        canvas.set_tool_size(4);
        canvas.handle(PointerEvent::Down(Point::new(5, 5)));
        canvas.handle(PointerEvent::Move(Point::new(6, 6)));

        let frame = canvas.render_frame(400, 100).unwrap();
        assert_eq!(frame.viewport, (400, 100));
        assert_eq!(
            frame.image.map(|i| i.placement),
            Some(Placement {
                offset: (100, 0),
                size: (200, 100)
            })
        );
        // Committed first, then the stroke in progress.
        assert_eq!(frame.segments.len(), 3);
        assert_eq!(frame.segments[2].end, Point::new(6, 6));
        assert_eq!(frame.segments[2].thickness, 4);
        let cursor = frame.cursor.unwrap();
        assert_eq!(
            cursor.rect,
            Rect {
                x: 4,
                y: 4,
                width: 4,
                height: 4
            }
        );
        assert_eq!(cursor.fill, Color::BLACK);

        canvas.set_eraser_mode(true);
        let cursor = canvas.render_frame(400, 100).unwrap().cursor.unwrap();
        assert_eq!((cursor.fill, cursor.outline), (Color::WHITE, Color::BLACK));
    }
    #[test]
    fn zero_viewport_with_image() {
        let mut canvas = Canvas::new();
        canvas.load_image(red_2x2());
        assert!(matches!(
            canvas.render_frame(0, 10),
            Err(GeometryError::ZeroArea { .. })
        ));
    }
}
