//! Handles and the per-heap handle arena
//!
//! A handle is a weak back-reference from the caller into the heap. Rather
//! than pointing at a node, it is a generational key into an arena owned by
//! the heap; the arena entry records which slot currently holds the handle's
//! element. The heap is the only writer of those entries.
//!
//! ```text
//!   caller            heap
//!   ------            ----------------------------------------------
//!   IntervalHandle -> HandleArena[key] = 5 -> slots[5].handle == key
//! ```
//!
//! The arena only holds entries for live elements. Removing an element
//! removes its entry, which invalidates every copy of the handle at once:
//! the slotmap generation guarantees the stale key never resolves again.
//! A handle that never named an element carries the null key.

use crate::traits::{Handle, HandleFault};
use slotmap::{new_key_type, Key, SlotMap};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Arena key behind an [`IntervalHandle`]
    pub(crate) struct HandleKey;
}

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to an element in an [`IntervalHeap`](crate::IntervalHeap)
///
/// Handles are cheap to copy and compare. They are tied to the heap that
/// issued them; presenting one to a different heap fails with
/// [`HandleFault::Foreign`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntervalHandle {
    heap_id: u64,
    key: HandleKey,
}

impl Handle for IntervalHandle {}

impl IntervalHandle {
    #[inline]
    pub(crate) fn key(&self) -> HandleKey {
        self.key
    }
}

/// Observable lifecycle state of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Allocated but never bound
    Unbound,
    /// Bound to a live element
    Bound,
    /// Its element was removed; the handle may be bound again
    Invalidated,
}

#[derive(Debug)]
pub(crate) struct HandleArena {
    heap_id: u64,
    entries: SlotMap<HandleKey, usize>,
}

impl HandleArena {
    pub(crate) fn new() -> Self {
        Self {
            heap_id: NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed),
            entries: SlotMap::with_key(),
        }
    }

    #[inline]
    pub(crate) fn heap_id(&self) -> u64 {
        self.heap_id
    }

    /// A handle owned by this heap that names nothing yet. Takes no arena space.
    pub(crate) fn unbound(&self) -> IntervalHandle {
        IntervalHandle {
            heap_id: self.heap_id,
            key: HandleKey::null(),
        }
    }

    /// Issues a key bound to `slot`.
    pub(crate) fn issue(&mut self, slot: usize) -> HandleKey {
        self.entries.insert(slot)
    }

    /// Maps a caller handle to its live arena key.
    pub(crate) fn resolve(&self, handle: &IntervalHandle) -> Result<HandleKey, HandleFault> {
        if handle.heap_id != self.heap_id {
            return Err(HandleFault::Foreign);
        }
        if !self.entries.contains_key(handle.key) {
            return Err(HandleFault::Stale);
        }
        Ok(handle.key)
    }

    /// Accepts only handles of this heap that currently name nothing.
    pub(crate) fn check_unbound(&self, handle: &IntervalHandle) -> Result<(), HandleFault> {
        match self.resolve(handle) {
            Ok(_) => Err(HandleFault::AlreadyBound),
            Err(HandleFault::Stale) => Ok(()),
            Err(fault) => Err(fault),
        }
    }

    #[inline]
    pub(crate) fn slot_of(&self, key: HandleKey) -> Option<usize> {
        self.entries.get(key).copied()
    }

    pub(crate) fn state(&self, handle: &IntervalHandle) -> Option<HandleState> {
        if handle.heap_id != self.heap_id {
            return None;
        }
        Some(if handle.key.is_null() {
            HandleState::Unbound
        } else if self.entries.contains_key(handle.key) {
            HandleState::Bound
        } else {
            HandleState::Invalidated
        })
    }

    #[inline]
    pub(crate) fn bind(&mut self, key: HandleKey, slot: usize) {
        if let Some(entry) = self.entries.get_mut(key) {
            *entry = slot;
        }
    }

    /// Drops the entry behind `key`; every copy of its handle goes stale.
    #[inline]
    pub(crate) fn invalidate(&mut self, key: HandleKey) {
        self.entries.remove(key);
    }

    pub(crate) fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    /// Rebuilds the caller-facing handle for a key this arena issued.
    #[inline]
    pub(crate) fn handle_for(&self, key: HandleKey) -> IntervalHandle {
        IntervalHandle {
            heap_id: self.heap_id,
            key,
        }
    }

    /// Every live key with the slot it claims.
    pub(crate) fn bound(&self) -> impl Iterator<Item = (HandleKey, usize)> + '_ {
        self.entries.iter().map(|(key, &slot)| (key, slot))
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
