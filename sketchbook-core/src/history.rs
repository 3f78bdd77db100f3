//! # History
//!
//! A linear, unbounded undo stack. There is no redo, so undoing simply discards the popped
//! operation once it has been reversed.

use crate::commands::{CommandWrite, Operation};

#[derive(Clone, Debug, Default)]
pub struct History {
    operations: Vec<Operation>,
}
impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, operation: Operation) {
        log::trace!("Recording {operation:?}");
        self.operations.push(operation);
    }
    /// Take the most recent operation, if any.
    pub fn pop(&mut self) -> Option<Operation> {
        self.operations.pop()
    }
    #[must_use]
    pub fn last(&self) -> Option<&Operation> {
        self.operations.last()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
    pub fn clear(&mut self) {
        self.operations.clear();
    }
    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Operation> + ExactSizeIterator + '_ {
        self.operations.iter()
    }
}
impl CommandWrite<Operation> for History {
    fn write(&mut self, command: Operation) {
        self.push(command);
    }
}
