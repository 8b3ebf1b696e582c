//! Interval Heap implementation
//!
//! An interval heap is a double-ended priority queue: a complete binary tree
//! of cells where each cell holds a closed interval `[lo, hi]` that contains
//! the intervals of both its children. The global minimum and maximum are
//! therefore the two ends of the root cell.
//!
//! On top of the classic structure this heap issues stable handles: a handle
//! obtained at insertion keeps naming the same element however often the
//! element is moved, so it can later be read, deleted or replaced in
//! O(log n).
//!
//! # Time Complexity
//!
//! | Operation                 | Complexity |
//! |---------------------------|------------|
//! | `add`                     | O(log n)   |
//! | `find_min` / `find_max`   | O(1)       |
//! | `delete_min` / `delete_max` | O(log n) |
//! | `delete(handle)`          | O(log n)   |
//! | `replace(handle, item)`   | O(log n)   |
//! | `find(handle)`            | O(1)       |
//!
//! # Example
//!
//! ```rust
//! use rust_interval_heap::{DoubleEndedHeap, HandleHeap, IntervalHeap};
//!
//! let mut heap = IntervalHeap::new();
//! heap.add_all([6, 10]);
//! let handle = heap.add_with_handle(7);
//! heap.add(21);
//!
//! assert_eq!(heap.replace(&handle, 12), Ok(7));
//! assert_eq!(heap.find_max(), Ok(&21));
//! assert_eq!(heap.replace(&handle, 34), Ok(12));
//! assert_eq!(heap.find_max(), Ok(&34));
//! assert!(heap.check());
//! ```

use crate::cell::{cell_of, CellStore, Side};
use crate::config::DEFAULT_CAPACITY;
use crate::equality::{EqualityComparer, NaturalEquality, OrderEquality};
use crate::events::{EventHub, HeapEvent, SubscriptionId};
use crate::handle::{HandleKey, HandleState, IntervalHandle};
use crate::traits::{DoubleEndedHeap, HandleFault, HandleHeap, HeapError};
use compare::{natural, Compare};
use std::fmt;
use std::rc::Rc;

/// Double-ended priority queue with stable element handles
///
/// Ordering is decided by the [`Compare`] strategy given at construction. The heap
/// is single-threaded; callers that share one across threads must serialize
/// access themselves.
pub struct IntervalHeap<T> {
    store: CellStore<T>,
    comparer: Rc<dyn Compare<T>>,
    equality: Rc<dyn EqualityComparer<T>>,
    stamp: u64,
    events: EventHub<T>,
}

impl<T: Ord + 'static> IntervalHeap<T> {
    /// Creates an empty heap ordered by `Ord`
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty heap ordered by `Ord` with room for `cells` cells
    /// (rounded up to a power of two)
    pub fn with_capacity(cells: usize) -> Self {
        Self::from_parts(cells, Rc::new(natural()), Rc::new(NaturalEquality))
    }
}

impl<T: Ord + 'static> Default for IntervalHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalHeap<T> {
    /// Creates an empty heap ordered by `comparer`
    ///
    /// Equality for membership queries is derived from the comparer.
    pub fn with_comparer<C>(comparer: C) -> Self
    where
        C: Compare<T> + 'static,
        T: 'static,
    {
        let comparer: Rc<dyn Compare<T>> = Rc::new(comparer);
        let equality = Rc::new(OrderEquality::new(Rc::clone(&comparer)));
        Self::from_parts(DEFAULT_CAPACITY, comparer, equality)
    }

    pub(crate) fn from_parts(
        cells: usize,
        comparer: Rc<dyn Compare<T>>,
        equality: Rc<dyn EqualityComparer<T>>,
    ) -> Self {
        Self {
            store: CellStore::with_cells(cells),
            comparer,
            equality,
            stamp: 0,
            events: EventHub::new(),
        }
    }

    /// Number of values the heap holds before it must grow
    pub fn capacity(&self) -> usize {
        2 * self.store.cell_capacity()
    }

    /// Modification counter, bumped by every mutating operation
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// The ordering strategy
    pub fn comparer(&self) -> &dyn Compare<T> {
        &*self.comparer
    }

    /// The equality strategy
    pub fn equality_comparer(&self) -> &dyn EqualityComparer<T> {
        &*self.equality
    }

    /// Returns an arbitrary element
    pub fn choose(&self) -> Result<&T, HeapError> {
        if self.store.len() == 0 {
            return Err(HeapError::EmptyQueue);
        }
        Ok(self.store.value(0))
    }

    /// Returns true if an element equal to `item` is present
    ///
    /// Uses the equality comparer; O(n).
    pub fn contains(&self, item: &T) -> bool {
        self.store.iter().any(|v| self.equality.equals(v, item))
    }

    /// Number of elements equal to `item`; O(n)
    pub fn count_of(&self, item: &T) -> usize {
        self.store.iter().filter(|v| self.equality.equals(v, item)).count()
    }

    /// Reports the lifecycle state of a handle, or `None` if the handle is
    /// foreign to this heap
    pub fn handle_state(&self, handle: &IntervalHandle) -> Option<HandleState> {
        self.store.handles.state(handle)
    }

    /// Removes and returns the minimum along with the handle that was bound
    /// to it, now invalidated
    pub fn delete_min_with_handle(&mut self) -> Result<(T, Option<IntervalHandle>), HeapError> {
        if self.store.len() == 0 {
            return Err(HeapError::EmptyQueue);
        }
        Ok(self.remove_and_notify(0))
    }

    /// Removes and returns the maximum along with the handle that was bound
    /// to it, now invalidated
    pub fn delete_max_with_handle(&mut self) -> Result<(T, Option<IntervalHandle>), HeapError> {
        let slot = match self.store.len() {
            0 => return Err(HeapError::EmptyQueue),
            1 => 0,
            _ => 1,
        };
        Ok(self.remove_and_notify(slot))
    }

    /// Removes every element, invalidating all bound handles
    pub fn clear(&mut self) {
        if self.store.len() == 0 {
            return;
        }
        self.bump();
        let removed: Vec<T> = self.store.drain().map(|slot| slot.value).collect();
        if self.events.is_active() {
            for item in &removed {
                self.events.removed(item);
            }
            self.events.changed();
        }
    }

    /// Registers a change listener
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&HeapEvent<'_, T>) + 'static,
    {
        self.events.subscribe(Box::new(listener))
    }

    /// Removes a change listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Consumes the heap, returning its elements in ascending order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.store.len());
        while let Ok(item) = self.delete_min() {
            sorted.push(item);
        }
        sorted
    }

    /// Consumes the heap, returning its elements in slot order
    pub fn into_vec(mut self) -> Vec<T> {
        self.store.drain().map(|slot| slot.value).collect()
    }

    /// Copies the elements out in slot order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.store.iter().cloned().collect()
    }

    #[inline]
    pub(crate) fn store(&self) -> &CellStore<T> {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut CellStore<T> {
        &mut self.store
    }

    fn bump(&mut self) {
        self.stamp = self.stamp.wrapping_add(1);
    }

    /// Resolves a handle to the slot holding its element.
    fn locate(&self, handle: &IntervalHandle) -> Result<(HandleKey, usize), HandleFault> {
        let key = self.store.handles.resolve(handle)?;
        let slot = self.store.handles.slot_of(key).ok_or(HandleFault::Stale)?;
        if slot >= self.store.len() {
            return Err(HandleFault::Stale);
        }
        if self.store.handle_at(slot) != Some(key) {
            return Err(HandleFault::SlotMismatch);
        }
        Ok((key, slot))
    }

    fn insert(&mut self, item: T, handle: Option<HandleKey>) -> usize {
        self.store.insert(item, handle, &*self.comparer)
    }

    /// Removes the element in `slot` and repairs the heap.
    fn remove_at(&mut self, slot: usize) -> (T, Option<HandleKey>) {
        self.bump();
        let last_cell = self.store.last_cell();
        let removed = self.store.remove(slot);
        let (cell, side) = cell_of(slot);
        if cell != last_cell {
            let cmp = &*self.comparer;
            match side {
                Side::Lo => self.store.restore_lo(cell, cmp),
                Side::Hi => self.store.restore_hi(cell, cmp),
            }
        }
        (removed.value, removed.handle)
    }

    fn remove_and_notify(&mut self, slot: usize) -> (T, Option<IntervalHandle>) {
        let (item, key) = self.remove_at(slot);
        if self.events.is_active() {
            self.events.removed(&item);
            self.events.changed();
        }
        let handle = key.map(|key| self.store.handles.handle_for(key));
        (item, handle)
    }

    fn add_and_notify(&mut self, item: T, handle: Option<HandleKey>) {
        let slot = self.insert(item, handle);
        if self.events.is_active() {
            self.events.added(self.store.value(slot));
            self.events.changed();
        }
    }
}

impl<T> DoubleEndedHeap<T> for IntervalHeap<T> {
    fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn add(&mut self, item: T) {
        self.bump();
        self.add_and_notify(item, None);
    }

    fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        self.bump();
        let mut added = 0usize;
        for item in items {
            let slot = self.insert(item, None);
            if self.events.is_active() {
                self.events.added(self.store.value(slot));
            }
            added += 1;
        }
        if added > 0 && self.events.is_active() {
            self.events.changed();
        }
    }

    fn find_min(&self) -> Result<&T, HeapError> {
        if self.store.len() == 0 {
            return Err(HeapError::EmptyQueue);
        }
        Ok(self.store.value(0))
    }

    fn find_max(&self) -> Result<&T, HeapError> {
        match self.store.len() {
            0 => Err(HeapError::EmptyQueue),
            1 => Ok(self.store.value(0)),
            _ => Ok(self.store.value(1)),
        }
    }

    fn delete_min(&mut self) -> Result<T, HeapError> {
        self.delete_min_with_handle().map(|(item, _)| item)
    }

    fn delete_max(&mut self) -> Result<T, HeapError> {
        self.delete_max_with_handle().map(|(item, _)| item)
    }
}

impl<T> HandleHeap<T> for IntervalHeap<T> {
    type Handle = IntervalHandle;

    fn allocate_handle(&self) -> IntervalHandle {
        self.store.handles.unbound()
    }

    fn add_with_handle(&mut self, item: T) -> IntervalHandle {
        self.bump();
        // Provisional slot; insertion rebinds it wherever the value settles.
        let key = self.store.handles.issue(self.store.len());
        self.add_and_notify(item, Some(key));
        self.store.handles.handle_for(key)
    }

    fn add_reusing(&mut self, handle: &mut IntervalHandle, item: T) -> Result<(), HeapError> {
        self.store.handles.check_unbound(handle)?;
        *handle = self.add_with_handle(item);
        Ok(())
    }

    fn find(&self, handle: &IntervalHandle) -> Option<&T> {
        self.locate(handle).ok().map(|(_, slot)| self.store.value(slot))
    }

    fn get(&self, handle: &IntervalHandle) -> Result<&T, HeapError> {
        let (_, slot) = self.locate(handle)?;
        Ok(self.store.value(slot))
    }

    fn delete(&mut self, handle: &IntervalHandle) -> Result<T, HeapError> {
        let (_, slot) = self.locate(handle)?;
        Ok(self.remove_and_notify(slot).0)
    }

    fn replace(&mut self, handle: &IntervalHandle, item: T) -> Result<T, HeapError> {
        let (key, slot) = self.locate(handle)?;
        self.bump();
        let old = self.store.replace_value(slot, item);

        let len = self.store.len();
        let (cell, side) = cell_of(slot);
        let cmp = &*self.comparer;
        match side {
            Side::Lo if len == 1 => {}
            Side::Lo if len == 2 * cell + 1 => self.store.restore_leaf(cell, cmp),
            Side::Lo => self.store.restore_lo(cell, cmp),
            Side::Hi => self.store.restore_hi(cell, cmp),
        }

        if self.events.is_active() {
            self.events.removed(&old);
            if let Some(now) = self.store.handles.slot_of(key) {
                self.events.added(self.store.value(now));
            }
            self.events.changed();
        }
        Ok(old)
    }
}

impl<T: Ord + 'static> FromIterator<T> for IntervalHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.add_all(iter);
        heap
    }
}

impl<T> Extend<T> for IntervalHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<T: fmt::Debug> fmt::Debug for IntervalHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalHeap")
            .field("len", &self.store.len())
            .field("stamp", &self.stamp)
            .field("handles", &self.store.handles.len())
            .field("items", &self.store.iter().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_empty_queue_errors() {
        let mut heap: IntervalHeap<i32> = IntervalHeap::new();
        assert_eq!(heap.find_min(), Err(HeapError::EmptyQueue));
        assert_eq!(heap.find_max(), Err(HeapError::EmptyQueue));
        assert_eq!(heap.delete_min(), Err(HeapError::EmptyQueue));
        assert_eq!(heap.delete_max(), Err(HeapError::EmptyQueue));
        assert_eq!(heap.choose(), Err(HeapError::EmptyQueue));
        assert_eq!(heap.stamp(), 0);
    }

    #[test]
    fn test_single_element_is_min_and_max() {
        let mut heap = IntervalHeap::new();
        heap.add(42);
        assert_eq!(heap.find_min(), Ok(&42));
        assert_eq!(heap.find_max(), Ok(&42));
        assert_eq!(heap.delete_max(), Ok(42));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_replace_sequence_tracks_max() {
        let mut heap = IntervalHeap::new();
        heap.add(6);
        heap.add(10);
        let h = heap.add_with_handle(7);
        heap.add(21);

        assert_eq!(heap.replace(&h, 12), Ok(7));
        assert_eq!(heap.find_max(), Ok(&21));
        assert_eq!(heap.replace(&h, 34), Ok(12));
        assert_eq!(heap.find_max(), Ok(&34));
        assert_eq!(heap.replace(&h, 60), Ok(34));
        assert_eq!(heap.find_max(), Ok(&60));
        assert!(heap.check());
    }

    #[test]
    fn test_handle_reuse_after_delete() {
        let mut heap = IntervalHeap::new();
        heap.add_all([1, 2, 3]);
        let mut h = heap.add_with_handle(7);
        assert_eq!(heap.delete(&h), Ok(7));
        assert_eq!(heap.handle_state(&h), Some(HandleState::Invalidated));
        assert_eq!(heap.get(&h), Err(HeapError::InvalidHandle(HandleFault::Stale)));

        let stale = h;
        assert_eq!(heap.add_reusing(&mut h, 8), Ok(()));
        assert_eq!(heap.get(&h), Ok(&8));
        assert_eq!(heap.get(&stale), Err(HeapError::InvalidHandle(HandleFault::Stale)));
        assert!(heap.check());
    }

    #[test]
    fn test_reuse_without_delete_rejected() {
        let mut heap = IntervalHeap::new();
        let mut h = heap.add_with_handle(7);
        let before = h;
        let stamp = heap.stamp();
        assert_eq!(
            heap.add_reusing(&mut h, 8),
            Err(HeapError::InvalidHandle(HandleFault::AlreadyBound))
        );
        assert_eq!(h, before);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.stamp(), stamp);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut a = IntervalHeap::new();
        let mut b = IntervalHeap::new();
        let h = a.add_with_handle(1);
        b.add(1);
        assert_eq!(b.find(&h), None);
        assert_eq!(b.delete(&h), Err(HeapError::InvalidHandle(HandleFault::Foreign)));
        assert_eq!(b.replace(&h, 3), Err(HeapError::InvalidHandle(HandleFault::Foreign)));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_preallocated_handle() {
        let mut heap = IntervalHeap::new();
        let mut h = heap.allocate_handle();
        assert_eq!(heap.handle_state(&h), Some(HandleState::Unbound));
        assert_eq!(heap.delete(&h), Err(HeapError::InvalidHandle(HandleFault::Stale)));
        heap.add_reusing(&mut h, 5).unwrap();
        heap.add_all([1, 9]);
        assert_eq!(heap.find(&h), Some(&5));
        assert_eq!(heap.handle_state(&h), Some(HandleState::Bound));
        heap.delete(&h).unwrap();
        assert_eq!(heap.handle_state(&h), Some(HandleState::Invalidated));
    }

    #[test]
    fn test_handle_arena_bounded_by_live_elements() {
        let mut heap = IntervalHeap::new();
        for i in 0..10_000 {
            heap.add_with_handle(i);
            heap.delete_min().unwrap();
        }
        assert!(heap.is_empty());
        assert_eq!(heap.store().handles.len(), 0);

        let handles: Vec<_> = (0..64).map(|i| heap.add_with_handle(i)).collect();
        heap.add_all(0..64);
        assert_eq!(heap.store().handles.len(), 64);
        for h in &handles[..32] {
            heap.delete(h).unwrap();
        }
        assert_eq!(heap.store().handles.len(), 32);
        heap.clear();
        assert_eq!(heap.store().handles.len(), 0);
    }

    #[test]
    fn test_stale_handle_is_not_foreign() {
        let mut heap = IntervalHeap::new();
        let mut h = heap.add_with_handle(1);
        heap.delete_min().unwrap();
        // Churn so the arena recycles the freed entry under a new generation.
        for i in 0..8 {
            heap.add_with_handle(i);
        }
        assert_eq!(heap.handle_state(&h), Some(HandleState::Invalidated));
        assert_eq!(heap.get(&h), Err(HeapError::InvalidHandle(HandleFault::Stale)));
        assert_eq!(heap.delete(&h), Err(HeapError::InvalidHandle(HandleFault::Stale)));
        heap.add_reusing(&mut h, 100).unwrap();
        assert_eq!(heap.find_max(), Ok(&100));
        assert_eq!(heap.delete(&h), Ok(100));
    }

    #[test]
    fn test_delete_with_handle_returns_handle() {
        let mut heap = IntervalHeap::new();
        let low = heap.add_with_handle(1);
        let high = heap.add_with_handle(9);
        heap.add(5);

        let (min, h) = heap.delete_min_with_handle().unwrap();
        assert_eq!((min, h), (1, Some(low)));
        let (max, h) = heap.delete_max_with_handle().unwrap();
        assert_eq!((max, h), (9, Some(high)));
        assert_eq!(heap.delete_max_with_handle(), Ok((5, None)));
        assert_eq!(heap.handle_state(&low), Some(HandleState::Invalidated));
    }

    #[test]
    fn test_stamp_bumps_on_mutation_only() {
        let mut heap = IntervalHeap::new();
        heap.add(1);
        let h = heap.add_with_handle(2);
        let before = heap.stamp();
        let _ = heap.find_min();
        let _ = heap.find(&h);
        assert_eq!(heap.stamp(), before);
        heap.replace(&h, 3).unwrap();
        assert_eq!(heap.stamp(), before + 1);
        heap.delete_min().unwrap();
        assert_eq!(heap.stamp(), before + 2);
    }

    #[test]
    fn test_membership_uses_equality_comparer() {
        let mut heap = IntervalHeap::with_comparer(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
        heap.add_all([-3, 1, 4]);
        assert!(heap.contains(&3));
        assert_eq!(heap.count_of(&-4), 1);
        assert!(!heap.contains(&2));
        assert_eq!(heap.find_min(), Ok(&1));
        assert_eq!(heap.find_max(), Ok(&4));
    }

    #[test]
    fn test_sorted_outputs() {
        let heap: IntervalHeap<i32> = [5, 3, 8, 1, 9, 2].into_iter().collect();
        assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3, 5, 8, 9]);

        let mut heap = IntervalHeap::new();
        heap.extend([4, 4, 1]);
        let mut items = heap.to_vec();
        items.sort();
        assert_eq!(items, vec![1, 4, 4]);
        assert_eq!(heap.into_vec().len(), 3);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut heap = IntervalHeap::new();
        let mut h = heap.add_with_handle(3);
        heap.add(4);
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.handle_state(&h), Some(HandleState::Invalidated));
        heap.add_reusing(&mut h, 1).unwrap();
        assert_eq!(heap.get(&h), Ok(&1));
    }

    fn record(heap: &mut IntervalHeap<i32>) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        heap.subscribe(move |event: &HeapEvent<'_, i32>| {
            let entry = match event {
                HeapEvent::ItemsAdded { item, .. } => format!("added {}", item),
                HeapEvent::ItemsRemoved { item, .. } => format!("removed {}", item),
                HeapEvent::CollectionChanged => "changed".to_string(),
            };
            sink.borrow_mut().push(entry);
        });
        log
    }

    #[test]
    fn test_add_emits_added_then_changed() {
        let mut heap = IntervalHeap::new();
        let log = record(&mut heap);
        heap.add(4);
        assert_eq!(*log.borrow(), vec!["added 4", "changed"]);

        log.borrow_mut().clear();
        heap.add_with_handle(2);
        assert_eq!(*log.borrow(), vec!["added 2", "changed"]);
    }

    #[test]
    fn test_delete_emits_removed_then_changed() {
        let mut heap = IntervalHeap::new();
        heap.add_all([3, 8, 5]);
        let h = heap.add_with_handle(6);
        let log = record(&mut heap);

        heap.delete(&h).unwrap();
        assert_eq!(*log.borrow(), vec!["removed 6", "changed"]);

        log.borrow_mut().clear();
        heap.delete_min().unwrap();
        assert_eq!(*log.borrow(), vec!["removed 3", "changed"]);

        log.borrow_mut().clear();
        assert_eq!(heap.delete(&h), Err(HeapError::InvalidHandle(HandleFault::Stale)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_clear_emits_removed_per_item_then_one_changed() {
        let mut heap = IntervalHeap::new();
        heap.add_all([2, 9, 4]);
        let log = record(&mut heap);

        heap.clear();
        let entries = log.borrow().clone();
        assert_eq!(entries.len(), 4);
        let mut removed = entries[..3].to_vec();
        removed.sort();
        assert_eq!(removed, vec!["removed 2", "removed 4", "removed 9"]);
        assert_eq!(entries[3], "changed");

        log.borrow_mut().clear();
        heap.clear();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_replace_emits_removed_added_changed() {
        let mut heap = IntervalHeap::new();
        heap.add_all([6, 10]);
        let h = heap.add_with_handle(7);
        let log = record(&mut heap);

        heap.replace(&h, 30).unwrap();
        assert_eq!(*log.borrow(), vec!["removed 7", "added 30", "changed"]);

        log.borrow_mut().clear();
        heap.add_all([1, 2]);
        assert_eq!(*log.borrow(), vec!["added 1", "added 2", "changed"]);

        log.borrow_mut().clear();
        heap.delete_max().unwrap();
        heap.delete(&h).unwrap_err();
        assert_eq!(*log.borrow(), vec!["removed 30", "changed"]);
    }
}
