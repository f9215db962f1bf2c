//! Bidirectional link indices.
//!
//! Every association is stored outside the entity records, as forward and
//! reverse maps updated in the same mutation. Both sides therefore agree by
//! construction and link/unlink never recurse through the entities.
//!
//! Three shapes cover the domain:
//! - [`ToOne`] - a mandatory or exclusive to-one side with an ordered
//!   reverse collection (order→customer, product→seller, line→endpoints)
//! - [`ManyToMany`] - ordered sets on both sides (discount↔product)
//! - [`Symmetric`] - a reflexive, self-link-free edge set (clothing↔clothing)

use std::collections::HashMap;
use std::fmt;

use im::Vector;
use shopcore_foundation::{Error, Id, Result};

fn remove_entry<K: std::hash::Hash + Eq + Copy, V: PartialEq + Clone>(
    map: &mut HashMap<K, Vector<V>>,
    key: K,
    value: &V,
) -> bool {
    let mut removed = false;
    let emptied = if let Some(items) = map.get_mut(&key) {
        if let Some(pos) = items.index_of(value) {
            items.remove(pos);
            removed = true;
        }
        items.is_empty()
    } else {
        false
    };
    if emptied {
        map.remove(&key);
    }
    removed
}

// =============================================================================
// ToOne
// =============================================================================

/// A to-one association from `S` to `T` with an ordered reverse index.
///
/// Each source holds at most one target; linking a source that already has
/// a different target detaches the old one first (exclusive move) and
/// reports it. Linking the current target is a no-op.
pub struct ToOne<S, T> {
    forward: HashMap<Id<S>, Id<T>>,
    reverse: HashMap<Id<T>, Vector<Id<S>>>,
}

impl<S, T> ToOne<S, T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Links `source` to `target`, returning the displaced previous target.
    ///
    /// Linking the current target is a no-op. The reverse side keeps
    /// attachment order.
    pub fn link(&mut self, source: Id<S>, target: Id<T>) -> Option<Id<T>> {
        let previous = match self.forward.get(&source).copied() {
            Some(current) if current == target => return None, // already in the desired state
            Some(current) => {
                remove_entry(&mut self.reverse, current, &source);
                Some(current)
            }
            None => None,
        };
        self.forward.insert(source, target);
        self.reverse.entry(target).or_default().push_back(source);
        previous
    }

    /// Unlinks a source, returning the target it pointed at.
    ///
    /// Unlinking an absent source is a no-op returning `None`.
    pub fn unlink(&mut self, source: Id<S>) -> Option<Id<T>> {
        let target = self.forward.remove(&source)?;
        remove_entry(&mut self.reverse, target, &source);
        Some(target)
    }

    /// Returns the target of a source, if linked.
    #[must_use]
    pub fn target(&self, source: Id<S>) -> Option<Id<T>> {
        self.forward.get(&source).copied()
    }

    /// Returns an ordered snapshot of every source linked to `target`.
    #[must_use]
    pub fn sources(&self, target: Id<T>) -> Vector<Id<S>> {
        self.reverse.get(&target).cloned().unwrap_or_default()
    }

    /// Returns how many sources are linked to `target`.
    #[must_use]
    pub fn source_count(&self, target: Id<T>) -> usize {
        self.reverse.get(&target).map_or(0, Vector::len)
    }

    /// Checks whether the exact edge exists.
    #[must_use]
    pub fn is_linked(&self, source: Id<S>, target: Id<T>) -> bool {
        self.forward.get(&source) == Some(&target)
    }

    /// Removes every edge pointing at `target` and returns the orphaned
    /// sources in attachment order.
    pub fn drop_target(&mut self, target: Id<T>) -> Vector<Id<S>> {
        let orphans = self.reverse.remove(&target).unwrap_or_default();
        for source in &orphans {
            self.forward.remove(source);
        }
        orphans
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns true when no edges exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Removes every edge.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}

impl<S, T> Default for ToOne<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> Clone for ToOne<S, T> {
    fn clone(&self) -> Self {
        Self {
            forward: self.forward.clone(),
            reverse: self.reverse.clone(),
        }
    }
}

impl<S, T> fmt::Debug for ToOne<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToOne")
            .field("forward", &self.forward)
            .field("reverse", &self.reverse)
            .finish()
    }
}

// =============================================================================
// ManyToMany
// =============================================================================

/// A many-to-many association with ordered collections on both sides.
pub struct ManyToMany<A, B> {
    forward: HashMap<Id<A>, Vector<Id<B>>>,
    reverse: HashMap<Id<B>, Vector<Id<A>>>,
}

impl<A, B> ManyToMany<A, B> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Links `a` and `b`; returns false when the edge already existed.
    pub fn link(&mut self, a: Id<A>, b: Id<B>) -> bool {
        if self.contains(a, b) {
            return false;
        }
        self.forward.entry(a).or_default().push_back(b);
        self.reverse.entry(b).or_default().push_back(a);
        true
    }

    /// Unlinks `a` and `b`; returns false when no such edge existed.
    pub fn unlink(&mut self, a: Id<A>, b: Id<B>) -> bool {
        let removed = remove_entry(&mut self.forward, a, &b);
        if removed {
            remove_entry(&mut self.reverse, b, &a);
        }
        removed
    }

    /// Checks whether the edge exists.
    #[must_use]
    pub fn contains(&self, a: Id<A>, b: Id<B>) -> bool {
        self.forward.get(&a).is_some_and(|items| items.contains(&b))
    }

    /// Returns an ordered snapshot of the targets linked from `a`.
    #[must_use]
    pub fn targets(&self, a: Id<A>) -> Vector<Id<B>> {
        self.forward.get(&a).cloned().unwrap_or_default()
    }

    /// Returns an ordered snapshot of the sources linked to `b`.
    #[must_use]
    pub fn sources(&self, b: Id<B>) -> Vector<Id<A>> {
        self.reverse.get(&b).cloned().unwrap_or_default()
    }

    /// Returns how many targets `a` is linked to.
    #[must_use]
    pub fn target_count(&self, a: Id<A>) -> usize {
        self.forward.get(&a).map_or(0, Vector::len)
    }

    /// Returns how many sources `b` is linked from.
    #[must_use]
    pub fn source_count(&self, b: Id<B>) -> usize {
        self.reverse.get(&b).map_or(0, Vector::len)
    }

    /// Removes every edge from `a` and returns its former targets.
    pub fn drop_source(&mut self, a: Id<A>) -> Vector<Id<B>> {
        let targets = self.forward.remove(&a).unwrap_or_default();
        for b in &targets {
            remove_entry(&mut self.reverse, *b, &a);
        }
        targets
    }

    /// Removes every edge to `b` and returns its former sources.
    pub fn drop_target(&mut self, b: Id<B>) -> Vector<Id<A>> {
        let sources = self.reverse.remove(&b).unwrap_or_default();
        for a in &sources {
            remove_entry(&mut self.forward, *a, &b);
        }
        sources
    }

    /// Removes every edge.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}

impl<A, B> Default for ManyToMany<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> Clone for ManyToMany<A, B> {
    fn clone(&self) -> Self {
        Self {
            forward: self.forward.clone(),
            reverse: self.reverse.clone(),
        }
    }
}

impl<A, B> fmt::Debug for ManyToMany<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManyToMany")
            .field("forward", &self.forward)
            .field("reverse", &self.reverse)
            .finish()
    }
}

// =============================================================================
// Symmetric
// =============================================================================

/// A reflexive association on one entity type.
///
/// Every edge appears in both endpoints' neighbor lists; self-links are
/// rejected at this level because a symmetric relation on one entity is
/// meaningless.
pub struct Symmetric<T> {
    edges: HashMap<Id<T>, Vector<Id<T>>>,
}

impl<T> Symmetric<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// Links `a` and `b` in both directions.
    ///
    /// Returns `Ok(false)` when the edge already existed.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when `a == b`.
    pub fn link(&mut self, a: Id<T>, b: Id<T>) -> Result<bool> {
        if a == b {
            return Err(Error::invalid_argument(
                "an entity cannot be related to itself",
            ));
        }
        if self.contains(a, b) {
            return Ok(false);
        }
        self.edges.entry(a).or_default().push_back(b);
        self.edges.entry(b).or_default().push_back(a);
        Ok(true)
    }

    /// Unlinks `a` and `b` on both sides; returns false when no edge existed.
    pub fn unlink(&mut self, a: Id<T>, b: Id<T>) -> bool {
        let removed = remove_entry(&mut self.edges, a, &b);
        if removed {
            remove_entry(&mut self.edges, b, &a);
        }
        removed
    }

    /// Checks whether `a` and `b` are related.
    #[must_use]
    pub fn contains(&self, a: Id<T>, b: Id<T>) -> bool {
        self.edges.get(&a).is_some_and(|items| items.contains(&b))
    }

    /// Returns an ordered snapshot of the neighbors of `a`.
    #[must_use]
    pub fn neighbors(&self, a: Id<T>) -> Vector<Id<T>> {
        self.edges.get(&a).cloned().unwrap_or_default()
    }

    /// Returns how many neighbors `a` has.
    #[must_use]
    pub fn neighbor_count(&self, a: Id<T>) -> usize {
        self.edges.get(&a).map_or(0, Vector::len)
    }

    /// Detaches `a` from every neighbor and returns them.
    pub fn drop_node(&mut self, a: Id<T>) -> Vector<Id<T>> {
        let neighbors = self.edges.remove(&a).unwrap_or_default();
        for n in &neighbors {
            remove_entry(&mut self.edges, *n, &a);
        }
        neighbors
    }

    /// Removes every edge.
    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

impl<T> Default for Symmetric<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Symmetric<T> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
        }
    }
}

impl<T> fmt::Debug for Symmetric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symmetric")
            .field("edges", &self.edges)
            .finish()
    }
}
