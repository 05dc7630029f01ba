//! # Packed Store
//!
//! Dense object storage addressed through stable handles.
//!
//! ```text
//!            0   1   2   3   4      (handles, via HandleIndex)
//! Index   : [ ] [2] [ ] [0] [1]
//! Reverse : [3] [4] [1]              (slot -> owning handle)
//! Elements: [x] [y] [z]              (no holes, iterate this)
//!
//! after erase(3):
//! Index   : [ ] [0] [ ] [ ] [1]
//! Reverse : [1] [4]
//! Elements: [z] [y]
//! ```

use std::ops::{Index, IndexMut};

use super::handle::Handle;
use super::index::HandleIndex;

/// Densely packed, reorderable storage with stable handles.
///
/// - `allocate`, `erase` and handle lookup are O(1)
/// - Elements are contiguous, iteration never skips holes
/// - Erasing moves the last element into the vacated slot, so iteration
///   order is not stable across erases
///
/// Erasing while iterating is impossible through the borrow checker; do not
/// try to work around it with indices collected mid-iteration.
///
/// # Example
///
/// ```rust
/// use revenant_core::PackedStore;
///
/// let mut store = PackedStore::new();
/// let a = store.allocate(5);
/// let b = store.allocate(20);
/// store.erase(a);
/// assert_eq!(store[b], 20); // still 20, even though it moved
/// ```
#[derive(Clone, Debug)]
pub struct PackedStore<T> {
    /// Inner array.
    elements: Vec<T>,
    /// Owning handle of each slot, parallel to `elements`.
    reverse: Vec<Handle>,
    /// Handle -> slot.
    index: HandleIndex,
}

impl<T> PackedStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            reverse: Vec::new(),
            index: HandleIndex::new(),
        }
    }

    /// Creates an empty store with room for `capacity` objects.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            reverse: Vec::with_capacity(capacity),
            index: HandleIndex::with_capacity(capacity),
        }
    }

    /// Stores `value` at the end of the dense array and returns its handle.
    ///
    /// O(1) amortized.
    pub fn allocate(&mut self, value: T) -> Handle {
        let slot = self.elements.len() as u32;
        self.elements.push(value);
        let handle = self.index.insert(slot);
        self.reverse.push(handle);
        handle
    }

    /// Same as [`allocate`](Self::allocate) with `T::default()`.
    pub fn allocate_default(&mut self) -> Handle
    where
        T: Default,
    {
        self.allocate(T::default())
    }

    /// True iff `handle` currently designates an object in this store.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.index.is_valid(handle)
    }

    /// Gets the object behind a handle.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.index.slot(handle)?;
        self.elements.get(slot as usize)
    }

    /// Gets the object behind a handle mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.index.slot(handle)?;
        self.elements.get_mut(slot as usize)
    }

    /// Removes the object behind `handle` and returns it.
    ///
    /// The last element is moved into the vacated slot and its handle is
    /// rebound, so every other handle keeps resolving to its own object.
    /// Returns `None` and does nothing if the handle is not valid.
    pub fn erase(&mut self, handle: Handle) -> Option<T> {
        let slot = self.index.erase(handle)? as usize;

        let removed = self.elements.swap_remove(slot);
        self.reverse.swap_remove(slot);

        // Something was moved into `slot` unless it was the last one.
        if let Some(&moved) = self.reverse.get(slot) {
            self.index.update(moved, slot as u32);
        }

        debug_assert_eq!(self.elements.len(), self.reverse.len());
        Some(removed)
    }

    /// Drops every object and invalidates every handle.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.reverse.clear();
        self.index.clear();
    }

    /// Number of stored objects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the store holds no objects.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of handle indices ever issued.
    ///
    /// Always at least [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn index_len(&self) -> usize {
        self.index.issued()
    }

    /// Handle owning the object at a dense slot.
    #[inline]
    #[must_use]
    pub fn handle_at(&self, slot: usize) -> Option<Handle> {
        self.reverse.get(slot).copied()
    }

    /// The dense array, in storage order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Iterates objects in storage order (not handle order).
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Iterates objects mutably in storage order.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    /// Iterates `(handle, object)` pairs in storage order.
    pub fn iter_handles(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.reverse.iter().copied().zip(self.elements.iter())
    }
}

impl<T> Default for PackedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for PackedStore<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the handle is not valid. Check with
    /// [`PackedStore::is_valid`] when the handle came from untrusted input.
    fn index(&self, handle: Handle) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("invalid handle {handle}"),
        }
    }
}

impl<T> IndexMut<Handle> for PackedStore<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut T {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("invalid handle {handle}"),
        }
    }
}

impl<'a, T> IntoIterator for &'a PackedStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut PackedStore<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
