//! # Commands
//!
//! Every undoable change to a canvas is recorded as an [`Operation`] by a writer at the moment it
//! is made. Undoing feeds the latest one back through a [`CommandConsumer`] in the
//! [`DoUndo::Undo`] direction.

use std::sync::Arc;

use crate::stroke::Stroke;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("command constructed for a state that does not match the current state")]
    MismatchedState,
    #[error("resource referenced by the command is not found")]
    UnknownResource,
    #[error("command makes no changes")]
    NoOp,
}
pub trait CommandConsumer<C> {
    /// Apply a single command. If this generates an error,
    /// the state of `self` should *not* be observably changed.
    fn apply(&mut self, command: DoUndo<'_, C>) -> Result<(), CommandError>;
}

/// Any type which can sink commands.
pub trait CommandWrite<Command> {
    /// Inserts a command.
    fn write(&mut self, command: Command);
}
impl<Write, Command> CommandWrite<Command> for &mut Write
where
    Write: CommandWrite<Command>,
{
    fn write(&mut self, command: Command) {
        (**self).write(command);
    }
}

/// One undoable user action.
#[derive(Clone, Debug)]
pub enum Operation {
    /// A stroke was committed to the end of the collection.
    Draw(Arc<Stroke>),
    /// A stroke was removed by the eraser.
    Erase(Arc<Stroke>),
    /// An image was loaded as the new original and working bitmap.
    LoadImage,
}
impl Operation {
    /// The stroke this operation refers to, if any.
    #[must_use]
    pub fn stroke(&self) -> Option<&Arc<Stroke>> {
        match self {
            Self::Draw(stroke) | Self::Erase(stroke) => Some(stroke),
            Self::LoadImage => None,
        }
    }
}
// Strokes compare by identity, not by contents.
impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Draw(a), Self::Draw(b)) | (Self::Erase(a), Self::Erase(b)) => a.id() == b.id(),
            (Self::LoadImage, Self::LoadImage) => true,
            _ => false,
        }
    }
}
impl Eq for Operation {}

#[derive(PartialEq, Eq, Debug)]
pub enum DoUndo<'c, T> {
    Do(&'c T),
    Undo(&'c T),
}
// Derive would require `T: Clone`.
impl<T> Clone for DoUndo<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for DoUndo<'_, T> {}
