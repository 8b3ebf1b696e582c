//! Construction settings for [`IntervalHeap`]
//!
//! ```rust
//! use rust_interval_heap::{HeapConfig, HeapError};
//!
//! let heap = HeapConfig::new()
//!     .initial_capacity(100)
//!     .comparer(|a: &u32, b: &u32| b.cmp(a))
//!     .equality_comparer(|a: &u32, b: &u32| a == b)
//!     .build()
//!     .unwrap();
//! assert_eq!(heap.capacity(), 256);
//!
//! let missing = HeapConfig::<u32>::new().build();
//! assert_eq!(missing.err(), Some(HeapError::NullComparer));
//! ```

use crate::equality::{EqualityComparer, NaturalEquality};
use crate::interval::IntervalHeap;
use crate::traits::HeapError;
use compare::{natural, Compare};
use std::fmt;
use std::rc::Rc;

/// Default capacity requested when none is given
pub const DEFAULT_CAPACITY: usize = 16;

/// Builder for an [`IntervalHeap`]
///
/// `initial_capacity` is rounded up to the next power of two and counts
/// cells; every cell holds two values.
pub struct HeapConfig<T> {
    initial_capacity: usize,
    comparer: Option<Rc<dyn Compare<T>>>,
    equality: Option<Rc<dyn EqualityComparer<T>>>,
}

impl<T> HeapConfig<T> {
    /// A configuration with the default capacity and no comparers
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            comparer: None,
            equality: None,
        }
    }

    /// Sets the number of cells to allocate up front
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the ordering strategy
    pub fn comparer<C: Compare<T> + 'static>(mut self, comparer: C) -> Self {
        self.comparer = Some(Rc::new(comparer));
        self
    }

    /// Sets the ordering strategy from an already shared comparer
    pub fn shared_comparer(mut self, comparer: Rc<dyn Compare<T>>) -> Self {
        self.comparer = Some(comparer);
        self
    }

    /// Sets the equality strategy used by membership queries
    pub fn equality_comparer<E: EqualityComparer<T> + 'static>(mut self, equality: E) -> Self {
        self.equality = Some(Rc::new(equality));
        self
    }

    /// Builds the heap
    ///
    /// # Errors
    /// Returns `HeapError::NullComparer` if the comparer or the equality
    /// comparer was not supplied.
    pub fn build(self) -> Result<IntervalHeap<T>, HeapError> {
        let (Some(comparer), Some(equality)) = (self.comparer, self.equality) else {
            tracing::debug!("interval heap construction rejected: missing comparer");
            return Err(HeapError::NullComparer);
        };
        Ok(IntervalHeap::from_parts(self.initial_capacity, comparer, equality))
    }
}

impl<T: Ord + 'static> HeapConfig<T> {
    /// A configuration ordered and compared through `Ord` / `PartialEq`
    pub fn natural() -> Self {
        Self::new().comparer(natural()).equality_comparer(NaturalEquality)
    }
}

impl<T> Default for HeapConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HeapConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapConfig")
            .field("initial_capacity", &self.initial_capacity)
            .field("comparer", &self.comparer.is_some())
            .field("equality_comparer", &self.equality.is_some())
            .finish()
    }
}
