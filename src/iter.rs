//! Traversal of an interval heap in slot order
//!
//! None of these orders are sorted. [`Iter`] borrows the heap, so the borrow
//! checker already rules out mutation while it is alive. [`Cursor`] does not
//! borrow: it remembers the heap's stamp and position, and every step checks
//! the stamp, failing with [`HeapError::CollectionModified`] once the heap
//! has been mutated.
//!
//! ```rust
//! use rust_interval_heap::{DoubleEndedHeap, HeapError, IntervalHeap};
//!
//! let mut heap: IntervalHeap<i32> = [3, 1, 2].into_iter().collect();
//! let mut cursor = heap.cursor();
//! assert!(cursor.next(&heap).unwrap().is_some());
//!
//! heap.add(4);
//! assert_eq!(cursor.next(&heap), Err(HeapError::CollectionModified));
//! ```

use crate::cell::Slot;
use crate::interval::IntervalHeap;
use crate::traits::HeapError;
use std::fmt;
use std::iter::FusedIterator;

/// Borrowing iterator over a heap's elements in slot order
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, Slot<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|slot| &slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|slot| &slot.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

/// Owning iterator over a heap's elements in slot order
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Detached, stamp-checked position in a heap's slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    heap_id: u64,
    stamp: u64,
    next: usize,
}

impl Cursor {
    /// Returns the next element, `Ok(None)` at the end
    ///
    /// # Errors
    /// `HeapError::CollectionModified` if `heap` was mutated since the cursor
    /// was created, or is not the heap the cursor was created from.
    pub fn next<'a, T>(&mut self, heap: &'a IntervalHeap<T>) -> Result<Option<&'a T>, HeapError> {
        let store = heap.store();
        if store.handles.heap_id() != self.heap_id || heap.stamp() != self.stamp {
            return Err(HeapError::CollectionModified);
        }
        if self.next >= store.len() {
            return Ok(None);
        }
        let item = store.value(self.next);
        self.next += 1;
        Ok(Some(item))
    }

    /// Number of elements already yielded
    pub fn position(&self) -> usize {
        self.next
    }
}

impl<T> IntervalHeap<T> {
    /// Iterates over all elements in slot order (not sorted)
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.store().slots().iter(),
        }
    }

    /// Starts a detached traversal that fails if the heap is mutated
    pub fn cursor(&self) -> Cursor {
        Cursor {
            heap_id: self.store().handles.heap_id(),
            stamp: self.stamp(),
            next: 0,
        }
    }
}

impl<'a, T> IntoIterator for &'a IntervalHeap<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for IntervalHeap<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.into_vec().into_iter(),
        }
    }
}
