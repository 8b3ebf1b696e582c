//! Common traits for double-ended heap data structures
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`DoubleEndedHeap`]: Base trait giving O(1) access to both extremes and
//!   removal from either end
//! - [`HandleHeap`]: Extended trait adding handle-based lookup, deletion and
//!   replacement of arbitrary elements
//!
//! Unlike the standard `BinaryHeap`, every accessor on an empty heap reports
//! [`HeapError::EmptyQueue`] instead of returning `None`, so a caller can tell
//! a contract violation apart from a legitimately absent value.

use std::fmt;

/// Why a handle was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleFault {
    /// The handle was issued by a different heap
    Foreign,
    /// The handle is bound to a live element and cannot be bound again
    AlreadyBound,
    /// The handle is not bound, or names a slot past the end of the heap
    Stale,
    /// The slot the handle names is currently held by another handle
    SlotMismatch,
}

impl fmt::Display for HandleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleFault::Foreign => write!(f, "handle does not belong to this heap"),
            HandleFault::AlreadyBound => write!(f, "handle is already bound to an element"),
            HandleFault::Stale => write!(f, "handle is not bound or index out of range"),
            HandleFault::SlotMismatch => write!(f, "handle does not match the slot it names"),
        }
    }
}

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// A min/max query or removal was attempted on an empty heap
    EmptyQueue,
    /// The handle cannot be used for the requested operation
    InvalidHandle(HandleFault),
    /// Construction was attempted without a comparer or equality comparer
    NullComparer,
    /// The heap was mutated after a traversal started
    CollectionModified,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyQueue => write!(f, "priority queue is empty"),
            HeapError::InvalidHandle(fault) => write!(f, "invalid handle: {}", fault),
            HeapError::NullComparer => {
                write!(f, "a comparer and an equality comparer are required")
            }
            HeapError::CollectionModified => {
                write!(f, "collection was modified during traversal")
            }
        }
    }
}

impl std::error::Error for HeapError {}

impl From<HandleFault> for HeapError {
    fn from(fault: HandleFault) -> Self {
        HeapError::InvalidHandle(fault)
    }
}

/// A handle to an element in the heap
///
/// This is an opaque type that identifies a specific element in the heap.
/// Handles are weak: they never keep an element alive, and the heap may
/// invalidate them as a side effect of removal.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for double-ended priority queues
///
/// # Example
///
/// ```rust
/// use rust_interval_heap::{DoubleEndedHeap, IntervalHeap};
///
/// let mut heap = IntervalHeap::new();
/// heap.add(3);
/// heap.add(1);
/// heap.add(7);
///
/// assert_eq!(heap.find_min(), Ok(&1));
/// assert_eq!(heap.find_max(), Ok(&7));
/// assert_eq!(heap.delete_max(), Ok(7));
/// assert_eq!(heap.delete_min(), Ok(1));
/// ```
pub trait DoubleEndedHeap<T> {
    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element
    ///
    /// # Time Complexity
    /// O(log n)
    fn add(&mut self, item: T);

    /// Inserts every element of `items`, one at a time
    ///
    /// # Time Complexity
    /// O(k log n) for k items
    fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I);

    /// Returns the minimum element
    ///
    /// # Time Complexity
    /// O(1)
    fn find_min(&self) -> Result<&T, HeapError>;

    /// Returns the maximum element
    ///
    /// # Time Complexity
    /// O(1)
    fn find_max(&self) -> Result<&T, HeapError>;

    /// Removes and returns the minimum element
    ///
    /// # Time Complexity
    /// O(log n)
    fn delete_min(&mut self) -> Result<T, HeapError>;

    /// Removes and returns the maximum element
    ///
    /// # Time Complexity
    /// O(log n)
    fn delete_max(&mut self) -> Result<T, HeapError>;
}

/// Extended heap trait with handle-based operations
///
/// A handle names one specific inserted element so that it can later be read,
/// deleted or re-prioritized without a value-based search, no matter how the
/// heap has been restructured in between.
///
/// # Example
///
/// ```rust
/// use rust_interval_heap::{DoubleEndedHeap, HandleHeap, IntervalHeap};
///
/// let mut heap = IntervalHeap::new();
/// heap.add(6);
/// let handle = heap.add_with_handle(7);
/// heap.add(21);
///
/// assert_eq!(heap.replace(&handle, 40), Ok(7));
/// assert_eq!(heap.find_max(), Ok(&40));
/// assert_eq!(heap.delete(&handle), Ok(40));
/// assert!(heap.find(&handle).is_none());
/// ```
pub trait HandleHeap<T>: DoubleEndedHeap<T> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Creates a handle that is not bound to any element yet
    fn allocate_handle(&self) -> Self::Handle;

    /// Inserts an element and returns a fresh handle bound to it
    fn add_with_handle(&mut self, item: T) -> Self::Handle;

    /// Inserts an element and rebinds `handle`, which must currently name
    /// nothing, to it
    ///
    /// The handle is an out-parameter: on success it is overwritten with the
    /// binding for the new element. Other copies of the old handle stay
    /// invalid.
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the handle is bound or foreign;
    /// the heap and the handle are left unchanged.
    fn add_reusing(&mut self, handle: &mut Self::Handle, item: T) -> Result<(), HeapError>;

    /// Returns the element named by the handle, or `None` if it is not live
    fn find(&self, handle: &Self::Handle) -> Option<&T>;

    /// Returns the element named by the handle
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the handle is not live in this heap.
    fn get(&self, handle: &Self::Handle) -> Result<&T, HeapError>;

    /// Removes the element named by the handle and invalidates the handle
    ///
    /// # Time Complexity
    /// O(log n)
    fn delete(&mut self, handle: &Self::Handle) -> Result<T, HeapError>;

    /// Replaces the element named by the handle, returning the old element
    ///
    /// The handle stays bound, now naming the new element.
    ///
    /// # Time Complexity
    /// O(log n)
    fn replace(&mut self, handle: &Self::Handle, item: T) -> Result<T, HeapError>;
}
