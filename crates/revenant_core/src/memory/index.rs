//! # Handle Index
//!
//! Maps stable handles to the slot their object currently occupies.
//!
//! ```text
//!            0     1     2     3     4      (handle index)
//! Entries : [ - ] [ 2 ] [ - ] [ 0 ] [ 1 ]   (slot, or free)
//! Free    : {0, 2}
//! ```

use super::handle::Handle;

/// Slot value of an entry that is not bound to any object.
const SLOT_FREE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct Entry {
    slot: u32,
    generation: u32,
}

impl Entry {
    #[inline]
    const fn is_live(self) -> bool {
        self.slot != SLOT_FREE
    }
}

/// Handle table with a free list of reusable indices.
///
/// Every operation is O(1). The index itself never moves objects; it only
/// records where the owner put them.
///
/// # Thread Safety
///
/// Not thread-safe. One index per owning thread.
#[derive(Clone, Debug, Default)]
pub struct HandleIndex {
    /// One entry per index ever issued.
    entries: Vec<Entry>,
    /// Indices available for reuse.
    free_list: Vec<u32>,
    /// Number of live handles.
    live: usize,
}

impl HandleIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Creates an empty index with room for `capacity` handles.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Issues a handle bound to `slot`.
    ///
    /// Freed indices are reused before a new one is minted.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is `u32::MAX` or more than `u32::MAX - 1` indices are issued.
    pub fn insert(&mut self, slot: u32) -> Handle {
        assert!(slot != SLOT_FREE, "slot {slot} is reserved");

        let index = if let Some(index) = self.free_list.pop() {
            index
        } else {
            assert!(
                self.entries.len() < u32::MAX as usize,
                "handle index exhausted"
            );
            let index = self.entries.len() as u32;
            self.entries.push(Entry {
                slot: SLOT_FREE,
                generation: 0,
            });
            index
        };

        let entry = &mut self.entries[index as usize];
        entry.slot = slot;
        self.live += 1;
        Handle::new(index, entry.generation)
    }

    /// Frees a handle.
    ///
    /// Returns the slot it was bound to, or `None` if the handle was not
    /// live (redundant erases are tolerated).
    pub fn erase(&mut self, handle: Handle) -> Option<u32> {
        let index = handle.index();
        let entry = self.live_entry_mut(handle)?;
        let slot = entry.slot;
        entry.slot = SLOT_FREE;
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(index);
        self.live -= 1;
        Some(slot)
    }

    /// Rebinds a live handle to `new_slot`.
    ///
    /// Returns `false` if the handle is not live.
    pub fn update(&mut self, handle: Handle, new_slot: u32) -> bool {
        debug_assert!(new_slot != SLOT_FREE);
        match self.live_entry_mut(handle) {
            Some(entry) => {
                entry.slot = new_slot;
                true
            }
            None => false,
        }
    }

    /// Returns the slot a live handle is bound to.
    #[inline]
    #[must_use]
    pub fn slot(&self, handle: Handle) -> Option<u32> {
        self.entries
            .get(handle.index() as usize)
            .filter(|e| e.is_live() && e.generation == handle.generation())
            .map(|e| e.slot)
    }

    /// True iff the handle is in range and currently live.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.slot(handle).is_some()
    }

    /// Number of live handles.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// True if no handle is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of indices ever issued (live or free).
    #[inline]
    #[must_use]
    pub fn issued(&self) -> usize {
        self.entries.len()
    }

    /// Frees every handle.
    ///
    /// Generations of live entries are bumped, so nothing issued before the
    /// clear validates afterwards. Index numbering restarts from zero.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            if entry.is_live() {
                entry.slot = SLOT_FREE;
                entry.generation = entry.generation.wrapping_add(1);
            }
        }
        self.free_list.clear();
        // Reversed so that index 0 is handed out first.
        self.free_list.extend((0..self.entries.len() as u32).rev());
        self.live = 0;
    }

    fn live_entry_mut(&mut self, handle: Handle) -> Option<&mut Entry> {
        self.entries
            .get_mut(handle.index() as usize)
            .filter(|e| e.is_live() && e.generation == handle.generation())
    }
}
