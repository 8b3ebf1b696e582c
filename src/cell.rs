//! Cell store backing the interval heap
//!
//! Values live in one flat vector of slots. Slot `2c` is the `lo` end of
//! cell `c` and slot `2c + 1` is its `hi` end, so a cell is a `[lo, hi]`
//! interval and only the deepest cell may be missing its `hi`:
//!
//! ```text
//!          (0 1)
//!         /     \
//!    (2 3)       (4 5)
//!    /   \       /
//!  (6 7)(8 9)(10 --)
//! ```
//!
//! Each slot carries the arena key of the handle bound to its value, if any.
//! Every primitive that moves a value rebinds that handle to the new slot, so
//! handles travel with values and never with slots.

use crate::handle::{HandleArena, HandleKey};

/// One stored value and the handle bound to it
#[derive(Debug)]
pub(crate) struct Slot<T> {
    pub(crate) value: T,
    pub(crate) handle: Option<HandleKey>,
}

/// Which end of a cell a slot index addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Lo,
    Hi,
}

#[inline]
pub(crate) const fn lo(cell: usize) -> usize {
    2 * cell
}

#[inline]
pub(crate) const fn hi(cell: usize) -> usize {
    2 * cell + 1
}

/// Parent cell of a non-root cell.
#[inline]
pub(crate) const fn parent(cell: usize) -> usize {
    (cell + 1) / 2 - 1
}

#[inline]
pub(crate) const fn cell_of(slot: usize) -> (usize, Side) {
    let side = if slot % 2 == 0 { Side::Lo } else { Side::Hi };
    (slot / 2, side)
}

#[derive(Debug)]
pub(crate) struct CellStore<T> {
    slots: Vec<Slot<T>>,
    /// Number of cells the store holds before it must grow.
    cells: usize,
    pub(crate) handles: HandleArena,
}

impl<T> CellStore<T> {
    /// Creates a store for `cells` cells; the count is rounded up to a power of two.
    pub(crate) fn with_cells(cells: usize) -> Self {
        let cells = cells.max(1).next_power_of_two();
        Self {
            slots: Vec::with_capacity(2 * cells),
            cells,
            handles: HandleArena::new(),
        }
    }

    /// Number of logical values
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn cell_capacity(&self) -> usize {
        self.cells
    }

    /// Index of the deepest occupied cell. Only meaningful when non-empty.
    #[inline]
    pub(crate) fn last_cell(&self) -> usize {
        (self.len() - 1) / 2
    }

    #[inline]
    pub(crate) fn value(&self, slot: usize) -> &T {
        &self.slots[slot].value
    }

    #[inline]
    pub(crate) fn handle_at(&self, slot: usize) -> Option<HandleKey> {
        self.slots[slot].handle
    }

    #[inline]
    pub(crate) fn has_hi(&self, cell: usize) -> bool {
        hi(cell) < self.len()
    }

    /// Slot holding the maximum of `cell`: its `hi`, or its `lo` if it is a
    /// single-value leaf.
    #[inline]
    pub(crate) fn max_slot(&self, cell: usize) -> usize {
        if self.has_hi(cell) {
            hi(cell)
        } else {
            lo(cell)
        }
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.slots.iter().map(|slot| &slot.value)
    }

    /// Doubles the cell capacity once every slot is occupied.
    fn grow_if_full(&mut self) {
        if self.slots.len() == 2 * self.cells {
            let old = self.cells;
            self.cells *= 2;
            self.slots.reserve_exact(2 * self.cells - self.slots.len());
            tracing::trace!(old_cells = old, new_cells = self.cells, "interval heap grew");
        }
    }

    #[inline]
    fn rebind(&mut self, slot: usize) {
        if let Some(key) = self.slots[slot].handle {
            self.handles.bind(key, slot);
        }
    }

    /// Appends a value at slot `len()` and returns that slot index.
    pub(crate) fn push(&mut self, value: T, handle: Option<HandleKey>) -> usize {
        self.grow_if_full();
        let slot = self.slots.len();
        self.slots.push(Slot { value, handle });
        self.rebind(slot);
        slot
    }

    /// Swaps the contents of two slots, handles included.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.slots.swap(a, b);
        self.rebind(a);
        self.rebind(b);
    }

    /// Overwrites the value in `slot`, keeping its handle, and returns the old value.
    pub(crate) fn replace_value(&mut self, slot: usize, value: T) -> T {
        std::mem::replace(&mut self.slots[slot].value, value)
    }

    /// Removes the value in `slot`, filling the hole with the last value.
    ///
    /// The removed slot's handle, if any, is invalidated. The moved value keeps
    /// its handle, rebound to `slot`.
    pub(crate) fn remove(&mut self, slot: usize) -> Slot<T> {
        let last = self.slots.len() - 1;
        let removed = self.slots.swap_remove(slot);
        if slot < last {
            self.rebind(slot);
        }
        if let Some(key) = removed.handle {
            self.handles.invalidate(key);
        }
        removed
    }

    /// Detaches every value from the store, invalidating all bound handles.
    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Slot<T>> {
        self.handles.invalidate_all();
        self.slots.drain(..)
    }
}
