//! # Strokes
//!
//! The ordered set of live, committed strokes. Order is drawing order, which is also render order
//! and the order the eraser searches (newest first).

use std::sync::Arc;

use crate::{
    commands::{CommandConsumer, CommandError, DoUndo, Operation},
    geom::Point,
    stroke::{Stroke, StrokeID},
};

pub mod writer {
    use super::{Arc, Point, Stroke};
    use crate::commands::{CommandWrite, Operation};

    /// Mutates a collection while recording each change as an [`Operation`].
    pub struct StrokeCollectionWriter<'a, Write> {
        writer: Write,
        state: &'a mut super::StrokeCollection,
    }
    impl<Write> std::ops::Deref for StrokeCollectionWriter<'_, Write> {
        type Target = super::StrokeCollection;
        fn deref(&self) -> &Self::Target {
            self.state
        }
    }
    impl<'a, Write: CommandWrite<Operation>> StrokeCollectionWriter<'a, Write> {
        pub fn new(writer: Write, state: &'a mut super::StrokeCollection) -> Self {
            Self { writer, state }
        }
        /// Append a newly committed stroke.
        pub fn push_back(&mut self, stroke: Stroke) -> Arc<Stroke> {
            let stroke = Arc::new(stroke);
            self.state.push_back(stroke.clone());
            log::debug!(
                "Committed {} with {} segments",
                stroke.id(),
                stroke.segments().len()
            );
            self.writer.write(Operation::Draw(stroke.clone()));
            stroke
        }
        /// Remove the newest stroke near `point`, if any. At most one stroke is removed.
        pub fn erase_at(&mut self, point: Point, radius: u32) -> Option<Arc<Stroke>> {
            let idx = crate::hit_test::newest_near(self.state.strokes(), point, radius)?;
            let stroke = self.state.strokes.remove(idx);
            log::debug!("Erased {} at {point:?}", stroke.id());
            self.writer.write(Operation::Erase(stroke.clone()));
            Some(stroke)
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct StrokeCollection {
    strokes: Vec<Arc<Stroke>>,
}
// Public methods for client
impl StrokeCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// All live strokes, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &[Arc<Stroke>] {
        &self.strokes
    }
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<Stroke>> + '_ {
        self.strokes.iter()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    // O(n), but erasing and undo are rare next to drawing.
    #[must_use]
    pub fn position(&self, id: StrokeID) -> Option<usize> {
        self.strokes.iter().position(|stroke| stroke.id() == id)
    }
    /// Drop every stroke. Not recorded - clearing also wipes the history.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}
// Private methods for writer/applier
impl StrokeCollection {
    fn push_back(&mut self, stroke: Arc<Stroke>) {
        self.strokes.push(stroke);
    }
    /// Insert at the end, failing if that exact stroke is already present.
    fn insert_new(&mut self, stroke: &Arc<Stroke>) -> Result<(), CommandError> {
        if self.position(stroke.id()).is_some() {
            Err(CommandError::MismatchedState)
        } else {
            self.push_back(stroke.clone());
            Ok(())
        }
    }
    fn remove(&mut self, id: StrokeID) -> Result<Arc<Stroke>, CommandError> {
        let idx = self.position(id).ok_or(CommandError::UnknownResource)?;
        Ok(self.strokes.remove(idx))
    }
}

impl CommandConsumer<Operation> for StrokeCollection {
    fn apply(&mut self, command: DoUndo<'_, Operation>) -> Result<(), CommandError> {
        match command {
            DoUndo::Do(Operation::Draw(stroke)) | DoUndo::Undo(Operation::Erase(stroke)) => {
                // Erased strokes come back at the end, not where they were.
                self.insert_new(stroke)
            }
            DoUndo::Undo(Operation::Draw(stroke)) | DoUndo::Do(Operation::Erase(stroke)) => {
                self.remove(stroke.id()).map(|_| ())
            }
            // Bitmaps aren't ours.
            DoUndo::Do(Operation::LoadImage) | DoUndo::Undo(Operation::LoadImage) => {
                Err(CommandError::NoOp)
            }
        }
    }
}
