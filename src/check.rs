//! Invariant diagnostics
//!
//! [`IntervalHeap::check`] walks the whole structure and verifies:
//!
//! - every full cell satisfies `lo <= hi`;
//! - every cell's interval lies inside its parent's;
//! - every slot's handle is bound to exactly that slot, and every bound
//!   handle names a live slot that carries it.
//!
//! Each violation found is logged with `tracing::warn!`; the walk does not
//! stop at the first one. It never mutates the heap.

use crate::cell::{hi, lo, parent};
use crate::interval::IntervalHeap;

impl<T> IntervalHeap<T> {
    /// Verifies all structural invariants, logging every violation found
    ///
    /// Intended for tests and debugging; O(n).
    pub fn check(&self) -> bool {
        let ordered = self.check_order();
        let bound = self.check_handles();
        ordered && bound
    }

    fn check_order(&self) -> bool {
        let store = self.store();
        let cmp = self.comparer();
        let len = store.len();
        let mut ok = true;

        for cell in 0..len.div_ceil(2) {
            if store.has_hi(cell) && cmp.compares_gt(store.value(lo(cell)), store.value(hi(cell))) {
                tracing::warn!(cell, violation = "lo > hi", "interval heap check failed");
                ok = false;
            }
            if cell == 0 {
                continue;
            }
            let p = parent(cell);
            if cmp.compares_gt(store.value(lo(p)), store.value(lo(cell))) {
                tracing::warn!(cell, parent = p, violation = "parent.lo > lo", "interval heap check failed");
                ok = false;
            }
            let max = store.max_slot(cell);
            if cmp.compares_gt(store.value(max), store.value(hi(p))) {
                tracing::warn!(cell, parent = p, slot = max, violation = "max > parent.hi", "interval heap check failed");
                ok = false;
            }
        }
        ok
    }

    fn check_handles(&self) -> bool {
        let store = self.store();
        let len = store.len();
        let mut ok = true;

        for slot in 0..len {
            let Some(key) = store.handle_at(slot) else {
                continue;
            };
            match store.handles.slot_of(key) {
                Some(at) if at == slot => {}
                other => {
                    tracing::warn!(
                        cell = slot / 2,
                        slot,
                        bound_to = ?other,
                        violation = "slot handle not bound to its slot",
                        "interval heap check failed"
                    );
                    ok = false;
                }
            }
        }

        for (key, at) in store.handles.bound() {
            if at >= len || store.handle_at(at) != Some(key) {
                tracing::warn!(
                    slot = at,
                    len,
                    violation = "bound handle names a slot that does not carry it",
                    "interval heap check failed"
                );
                ok = false;
            }
        }
        ok
    }
}
