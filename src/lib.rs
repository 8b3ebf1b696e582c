//! Interval Heap for Rust
//!
//! This crate provides a double-ended priority queue built on the interval
//! heap, with stable handles for deleting and replacing arbitrary elements.
//!
//! # Features
//!
//! - **O(1) min and max**: both extremes sit in the root cell
//! - **O(log n) add, delete_min, delete_max**: a single path is repaired per operation
//! - **Stable handles**: a handle keeps naming its element however it moves,
//!   so `delete(handle)` and `replace(handle, item)` are O(log n)
//! - **Pluggable ordering**: any [`Compare`] strategy from the `compare`
//!   crate, closures included
//! - **Change events** and stamp-checked [`Cursor`] traversal
//!
//! # Example
//!
//! ```rust
//! use rust_interval_heap::{DoubleEndedHeap, HandleHeap, IntervalHeap};
//!
//! let mut heap = IntervalHeap::new();
//! heap.add(5);
//! let handle = heap.add_with_handle(3);
//! heap.add(9);
//!
//! assert_eq!(heap.find_min(), Ok(&3));
//! assert_eq!(heap.find_max(), Ok(&9));
//!
//! heap.replace(&handle, 11).unwrap();
//! assert_eq!(heap.find_max(), Ok(&11));
//! assert_eq!(heap.delete(&handle), Ok(11));
//! ```

mod cell;
mod check;
pub mod config;
pub mod equality;
pub mod events;
pub mod handle;
pub mod interval;
pub mod iter;
mod shape;
pub mod traits;

// Re-export the main types for convenience
pub use compare::{natural, Compare, Natural};
pub use config::HeapConfig;
pub use equality::{EqualityComparer, NaturalEquality, OrderEquality};
pub use events::{HeapEvent, SubscriptionId};
pub use handle::{HandleState, IntervalHandle};
pub use interval::IntervalHeap;
pub use iter::{Cursor, IntoIter, Iter};
pub use traits::{DoubleEndedHeap, Handle, HandleFault, HandleHeap, HeapError};
