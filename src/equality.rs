//! Equality strategies for membership queries
//!
//! Ordering comes from the [`compare`] crate: the heap holds an
//! `Rc<dyn Compare<T>>` supplied at construction and consults it for every
//! ordering decision. An [`EqualityComparer`] is held alongside it for
//! `contains` / `count_of`; the heap's shape never depends on it.
//!
//! Plain closures implement [`EqualityComparer`], just as they implement
//! `Compare`:
//!
//! ```rust
//! use rust_interval_heap::equality::EqualityComparer;
//!
//! let same_len = |a: &&str, b: &&str| a.len() == b.len();
//! assert!(same_len.equals(&"ab", &"xy"));
//! ```

use compare::Compare;
use std::rc::Rc;

/// An equality notion over `T`
pub trait EqualityComparer<T: ?Sized> {
    /// Returns true if the two values are considered equal
    fn equals(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> EqualityComparer<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Equality through `T: PartialEq`
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalEquality;

impl<T: PartialEq + ?Sized> EqualityComparer<T> for NaturalEquality {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Equality derived from an ordering: two values are equal when they compare
/// as `Ordering::Equal`
pub struct OrderEquality<T: ?Sized> {
    comparer: Rc<dyn Compare<T>>,
}

impl<T: ?Sized> OrderEquality<T> {
    /// Wraps a shared comparer
    pub fn new(comparer: Rc<dyn Compare<T>>) -> Self {
        Self { comparer }
    }
}

impl<T: ?Sized> EqualityComparer<T> for OrderEquality<T> {
    fn equals(&self, a: &T, b: &T) -> bool {
        self.comparer.compares_eq(a, b)
    }
}
