//! Entity handles with generational indices.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Handle to an entity of type `T` with a generational index for stale
/// reference detection.
///
/// The generation counter increments when a slot is reused after removal,
/// so a handle held across a removal can be detected instead of silently
/// resolving to an unrelated entity.
///
/// The type parameter is a compile-time tag only; an order handle cannot be
/// passed where a customer handle is expected. Handles are `Copy` and cheap
/// to store in index maps.
pub struct Id<T> {
    index: u64,
    generation: u32,
    _tag: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Creates a handle with the given slot index and generation.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self {
            index,
            generation,
            _tag: PhantomData,
        }
    }

    /// Returns the slot index into the owning registry.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.index
    }

    /// Returns the generation the slot had when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would bound `T`, and handles must stay `Copy`
// regardless of what they point at.

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({}v{})", self.index, self.generation)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
