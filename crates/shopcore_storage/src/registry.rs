//! Extent registries with generational slot indices.
//!
//! A `Registry<T>` owns every live instance of one entity type and tracks
//! slot generations to detect stale handles to removed entities. The extent
//! keeps insertion order and hands out persistent snapshots, so callers can
//! never mutate the registry through an enumeration.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use im::Vector;
use shopcore_foundation::{Error, Id, Result};

/// Naming contract for types stored in a [`Registry`].
///
/// `KIND` is the singular name used in error messages; `EXTENT` is the
/// plural file stem used by the persistence adapter.
pub trait Entity {
    /// Singular name of the entity type, e.g. `"product"`.
    const KIND: &'static str;
    /// Plural extent name, e.g. `"products"`.
    const EXTENT: &'static str;
}

#[derive(Debug, Clone)]
struct Slot<T> {
    /// Even generations are free, odd generations are occupied.
    generation: u32,
    value: Option<T>,
}

/// The extent of one entity type: a generational arena plus the ordered
/// list of live handles.
///
/// Slots are reallocated from a free list; each reuse bumps the slot
/// generation, so handles issued before a removal no longer resolve.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u64>,
    order: Vector<Id<T>>,
}

impl<T: Entity> Registry<T> {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            order: Vector::new(),
        }
    }

    /// Registers a value, appending it to the extent.
    ///
    /// Reuses slots from the free list when available.
    pub fn insert(&mut self, value: T) -> Id<T> {
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            // Was even/free, now odd/occupied
            slot.generation += 1;
            slot.value = Some(value);
            Id::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u64;
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            Id::new(index, 1)
        };
        self.order.push_back(id);
        id
    }

    /// Unregisters an entity and returns its record.
    ///
    /// Removing an absent or stale handle is a no-op returning `None`.
    pub fn remove(&mut self, id: Id<T>) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        let slot = &mut self.slots[id.index() as usize];
        // Was odd/occupied, now even/free
        slot.generation += 1;
        let value = slot.value.take();
        self.free_list.push(id.index());
        if let Some(pos) = self.order.index_of(&id) {
            self.order.remove(pos);
        }
        value
    }

    /// Checks whether a handle refers to a live entity.
    #[must_use]
    pub fn contains(&self, id: Id<T>) -> bool {
        let idx = id.index() as usize;
        if idx >= self.slots.len() {
            return false;
        }
        let slot = &self.slots[idx];
        slot.generation == id.generation() && id.generation() % 2 == 1
    }

    /// Validates that a handle refers to a live entity.
    ///
    /// # Errors
    /// Returns `EntityNotFound` for unallocated or freed slots and
    /// `StaleHandle` when the slot has been reused since the handle was
    /// issued.
    pub fn validate(&self, id: Id<T>) -> Result<()> {
        let idx = id.index() as usize;

        if idx >= self.slots.len() {
            return Err(Error::entity_not_found(T::KIND, id.index()));
        }

        let current = self.slots[idx].generation;

        if current != id.generation() {
            return Err(Error::stale_handle(T::KIND, id.index(), id.generation()));
        }

        if current % 2 == 0 {
            return Err(Error::entity_not_found(T::KIND, id.index()));
        }

        Ok(())
    }

    /// Returns a shared reference to the record behind a handle.
    ///
    /// # Errors
    /// Same as [`Registry::validate`].
    pub fn get(&self, id: Id<T>) -> Result<&T> {
        self.validate(id)?;
        self.slots[id.index() as usize]
            .value
            .as_ref()
            .ok_or_else(|| Error::entity_not_found(T::KIND, id.index()))
    }

    /// Returns an exclusive reference to the record behind a handle.
    ///
    /// # Errors
    /// Same as [`Registry::validate`].
    pub fn get_mut(&mut self, id: Id<T>) -> Result<&mut T> {
        self.validate(id)?;
        self.slots[id.index() as usize]
            .value
            .as_mut()
            .ok_or_else(|| Error::entity_not_found(T::KIND, id.index()))
    }

    /// Returns an ordered snapshot of every live handle.
    ///
    /// The snapshot is a persistent vector sharing structure with the
    /// extent; cloning is O(1) and later registry mutations never show
    /// through it.
    #[must_use]
    pub fn ids(&self) -> Vector<Id<T>> {
        self.order.clone()
    }

    /// Iterates over live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.slots[id.index() as usize].value.as_ref().map(|v| (*id, v)))
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when the extent is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Empties the extent, freeing every slot.
    ///
    /// Handles issued before the clear become stale, never dangling.
    pub fn clear(&mut self) {
        for id in self.order.clone() {
            let slot = &mut self.slots[id.index() as usize];
            slot.generation += 1;
            slot.value = None;
            self.free_list.push(id.index());
        }
        self.order = Vector::new();
    }

    /// Returns the current generation for a slot index, if allocated.
    #[must_use]
    pub fn generation(&self, index: u64) -> Option<u32> {
        self.slots.get(index as usize).map(|s| s.generation)
    }
}

impl<T: Entity> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
