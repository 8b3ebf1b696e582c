//! Change notifications
//!
//! Listeners registered with [`IntervalHeap::subscribe`] are called after the
//! heap has reached a consistent state and before the mutating call returns.
//! The order per operation is fixed:
//!
//! | Operation                        | Events                                         |
//! |----------------------------------|------------------------------------------------|
//! | `add`, `add_all`                 | `ItemsAdded` per item, then `CollectionChanged` |
//! | `delete`, `delete_min/max`       | `ItemsRemoved`, then `CollectionChanged`        |
//! | `replace`                        | `ItemsRemoved` (old), `ItemsAdded` (new), then `CollectionChanged` |
//!
//! [`IntervalHeap::subscribe`]: crate::IntervalHeap::subscribe

use std::fmt;

/// A change to the heap's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapEvent<'a, T> {
    /// `count` copies of `item` were inserted
    ItemsAdded {
        /// The inserted element
        item: &'a T,
        /// Multiplicity
        count: usize,
    },
    /// `count` copies of `item` were removed
    ItemsRemoved {
        /// The removed element
        item: &'a T,
        /// Multiplicity
        count: usize,
    },
    /// The preceding item events form one completed change
    CollectionChanged,
}

/// Token returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&HeapEvent<'_, T>)>;

pub(crate) struct EventHub<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> EventHub<T> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub(crate) fn subscribe(&mut self, listener: Listener<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn emit(&mut self, event: &HeapEvent<'_, T>) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub(crate) fn added(&mut self, item: &T) {
        self.emit(&HeapEvent::ItemsAdded { item, count: 1 });
    }

    pub(crate) fn removed(&mut self, item: &T) {
        self.emit(&HeapEvent::ItemsRemoved { item, count: 1 });
    }

    pub(crate) fn changed(&mut self) {
        self.emit(&HeapEvent::CollectionChanged);
    }
}

impl<T> fmt::Debug for EventHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
