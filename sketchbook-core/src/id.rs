//! # IDs
//! Committed strokes are shared between the stroke collection and the undo history, and both sides
//! need to agree on *which* stroke an operation refers to. This is done with `SketchID<T>`, an ID
//! which is unique within this process and namespaced by the type T.
//!
//! Get a fresh one with `SketchID::default()`. Order of IDs is not guaranteed to mean anything.

use std::any::TypeId;

// Next free ID per namespace. Zero is never handed out.
static NEXT_IDS: parking_lot::Mutex<Option<hashbrown::HashMap<TypeId, u64>>> =
    parking_lot::const_mutex(None);

/// ID that is unique within this execution of the program.
/// IDs with different namespaces may share a value but are different types.
pub struct SketchID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _phantom: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> SketchID<T> {
    /// Raw numeric value. Only meaningful for display and logging.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.id.get()
    }
    fn allocate() -> Self {
        let mut lock = NEXT_IDS.lock();
        let next = lock
            .get_or_insert_with(hashbrown::HashMap::new)
            .entry(TypeId::of::<T>())
            .or_insert(1);
        let id = *next;
        // u64 won't run out during a drawing session, but don't wrap into zero either.
        *next = next.saturating_add(1);
        Self {
            id: std::num::NonZeroU64::new(id).unwrap_or(std::num::NonZeroU64::MAX),
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> Default for SketchID<T> {
    fn default() -> Self {
        Self::allocate()
    }
}
impl<T: std::any::Any> Clone for SketchID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for SketchID<T> {}
impl<T: std::any::Any> PartialEq for SketchID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for SketchID<T> {}
impl<T: std::any::Any> std::hash::Hash for SketchID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<T: std::any::Any> std::fmt::Display for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = std::any::type_name::<T>();
        write!(f, "{}#{}", name.rsplit("::").next().unwrap_or(name), self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for SketchID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
