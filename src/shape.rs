//! Shape restoration for the interval heap
//!
//! Two orderings must hold after every public operation:
//!
//! 1. within a full cell, `lo <= hi`;
//! 2. a child cell's interval lies inside its parent's: `parent.lo <= child.lo`
//!    and `child.max <= parent.hi`.
//!
//! Insertion repairs them bottom-up with [`bubble_up_min`] /
//! [`bubble_up_max`]. Removal and replacement overwrite a slot with an
//! arbitrary value and repair top-down with [`heapify_min`] /
//! [`heapify_max`], whose return value tells the caller whether the value
//! crossed to the opposite end of its cell and so needs a bubble-up on that
//! side instead.
//!
//! All moves go through [`CellStore::swap`], which keeps handle bindings
//! attached to their values. Nothing here allocates handles.
//!
//! [`bubble_up_min`]: CellStore::bubble_up_min
//! [`bubble_up_max`]: CellStore::bubble_up_max
//! [`heapify_min`]: CellStore::heapify_min
//! [`heapify_max`]: CellStore::heapify_max

use crate::cell::{hi, lo, parent, CellStore};
use crate::handle::HandleKey;
use compare::Compare;

impl<T> CellStore<T> {
    /// Moves the `lo` of `cell` toward the root while it is smaller than its
    /// parent's `lo`. Returns the slot it ends in.
    pub(crate) fn bubble_up_min(&mut self, mut cell: usize, cmp: &dyn Compare<T>) -> usize {
        while cell > 0 {
            let p = parent(cell);
            if !cmp.compares_lt(self.value(lo(cell)), self.value(lo(p))) {
                break;
            }
            self.swap(lo(cell), lo(p));
            cell = p;
        }
        lo(cell)
    }

    /// Moves the maximum of `cell` toward the root while it is greater than
    /// its parent's `hi`. Returns the slot it ends in.
    pub(crate) fn bubble_up_max(&mut self, mut cell: usize, cmp: &dyn Compare<T>) -> usize {
        let mut slot = self.max_slot(cell);
        while cell > 0 {
            let p = parent(cell);
            if !cmp.compares_gt(self.value(slot), self.value(hi(p))) {
                break;
            }
            self.swap(slot, hi(p));
            cell = p;
            slot = hi(p);
        }
        slot
    }

    /// Restores the min side below `cell` after its `lo` changed.
    ///
    /// Returns true if `lo` and `hi` of `cell` itself had to be exchanged.
    pub(crate) fn heapify_min(&mut self, cell: usize, cmp: &dyn Compare<T>) -> bool {
        let len = self.len();
        let mut swapped = false;
        if hi(cell) < len && cmp.compares_gt(self.value(lo(cell)), self.value(hi(cell))) {
            self.swap(lo(cell), hi(cell));
            swapped = true;
        }

        let left = 2 * cell + 1;
        let right = left + 1;
        let mut smallest = cell;
        if lo(left) < len && cmp.compares_lt(self.value(lo(left)), self.value(lo(smallest))) {
            smallest = left;
        }
        if lo(right) < len && cmp.compares_lt(self.value(lo(right)), self.value(lo(smallest))) {
            smallest = right;
        }

        if smallest != cell {
            self.swap(lo(smallest), lo(cell));
            self.heapify_min(smallest, cmp);
        }
        swapped
    }

    /// Restores the max side below `cell` after its `hi` changed.
    ///
    /// Returns true if `lo` and `hi` of `cell` itself had to be exchanged.
    pub(crate) fn heapify_max(&mut self, cell: usize, cmp: &dyn Compare<T>) -> bool {
        let len = self.len();
        if hi(cell) >= len {
            // Single-value leaf: nothing to order and no children.
            return false;
        }
        let mut swapped = false;
        if cmp.compares_lt(self.value(hi(cell)), self.value(lo(cell))) {
            self.swap(lo(cell), hi(cell));
            swapped = true;
        }

        let left = 2 * cell + 1;
        let right = left + 1;
        let mut largest = hi(cell);
        let mut largest_cell = cell;
        for child in [left, right] {
            if lo(child) >= len {
                break;
            }
            // A child without `hi` is the last leaf; its only value is its max.
            let candidate = self.max_slot(child);
            if cmp.compares_gt(self.value(candidate), self.value(largest)) {
                largest = candidate;
                largest_cell = child;
            }
        }

        if largest_cell != cell {
            self.swap(largest, hi(cell));
            if largest == hi(largest_cell) {
                self.heapify_max(largest_cell, cmp);
            }
        }
        swapped
    }

    /// Inserts a value, restoring both orderings. Returns the slot it ends in.
    pub(crate) fn insert(&mut self, value: T, handle: Option<HandleKey>, cmp: &dyn Compare<T>) -> usize {
        let len = self.len();
        let slot = self.push(value, handle);
        if len == 0 {
            return slot;
        }

        let cell = len / 2;
        if len % 2 == 0 {
            // New value opens cell `cell` as its `lo`; compare against the parent interval.
            let p = parent(cell);
            if cmp.compares_gt(self.value(slot), self.value(hi(p))) {
                self.swap(slot, hi(p));
                self.bubble_up_max(p, cmp)
            } else if cmp.compares_lt(self.value(slot), self.value(lo(p))) {
                self.bubble_up_min(cell, cmp)
            } else {
                slot
            }
        } else if cmp.compares_lt(self.value(hi(cell)), self.value(lo(cell))) {
            self.swap(lo(cell), hi(cell));
            self.bubble_up_min(cell, cmp)
        } else {
            self.bubble_up_max(cell, cmp)
        }
    }

    /// Repairs the heap after the value in `lo(cell)` was overwritten with an
    /// arbitrary value by removal compaction.
    pub(crate) fn restore_lo(&mut self, cell: usize, cmp: &dyn Compare<T>) {
        if self.heapify_min(cell, cmp) {
            self.bubble_up_max(cell, cmp);
        } else {
            self.bubble_up_min(cell, cmp);
        }
    }

    /// Repairs the heap after the value in `hi(cell)` was overwritten.
    pub(crate) fn restore_hi(&mut self, cell: usize, cmp: &dyn Compare<T>) {
        if self.heapify_max(cell, cmp) {
            self.bubble_up_min(cell, cmp);
        } else {
            self.bubble_up_max(cell, cmp);
        }
    }

    /// Repairs the heap after the `lo` of the single-value deepest cell was
    /// overwritten. Such a cell has no children; its value only has to fit
    /// inside the parent interval.
    pub(crate) fn restore_leaf(&mut self, cell: usize, cmp: &dyn Compare<T>) {
        if cell == 0 {
            return;
        }
        let p = parent(cell);
        if cmp.compares_gt(self.value(lo(cell)), self.value(hi(p))) {
            self.swap(lo(cell), hi(p));
            self.bubble_up_max(p, cmp);
        } else {
            self.bubble_up_min(cell, cmp);
        }
    }
}
