//! Stress tests that push the interval heap through long operation sequences
//!
//! Every test uses a seeded RNG so failures reproduce, and calls `check()`
//! along the way so a broken invariant is caught where it happens rather
//! than at the end.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_interval_heap::{DoubleEndedHeap, HandleHeap, HandleState, IntervalHeap};

const N: usize = 1000;

fn random_values(seed: u64, n: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-10_000..10_000)).collect()
}

/// Delete every element through its handle, in random order
#[test]
fn test_random_deletes_by_handle() {
    let mut rng = StdRng::seed_from_u64(0x1f2e_3d4c);
    let values = random_values(1, N);
    let mut heap = IntervalHeap::new();
    let mut entries: Vec<_> = values.iter().map(|&v| (heap.add_with_handle(v), v)).collect();
    assert!(heap.check());

    entries.shuffle(&mut rng);
    for (i, (handle, value)) in entries.iter().enumerate() {
        assert_eq!(heap.delete(handle), Ok(*value));
        assert_eq!(heap.len(), N - i - 1);
        assert!(heap.check(), "invariant broken after deleting {} elements", i + 1);
    }
    assert!(heap.is_empty());
    assert!(entries
        .iter()
        .all(|(h, _)| heap.handle_state(h) == Some(HandleState::Invalidated)));
}

/// delete_min returns the sorted sequence
#[test]
fn test_delete_min_sorts() {
    let values = random_values(2, N);
    let mut expected = values.clone();
    expected.sort();

    let mut heap = IntervalHeap::new();
    heap.add_all(values);
    assert!(heap.check());

    let mut drained = Vec::with_capacity(N);
    while let Ok(item) = heap.delete_min() {
        drained.push(item);
    }
    assert_eq!(drained, expected);
}

/// delete_max returns the reverse-sorted sequence
#[test]
fn test_delete_max_sorts_descending() {
    let values = random_values(3, N);
    let mut expected = values.clone();
    expected.sort_by(|a, b| b.cmp(a));

    let mut heap = IntervalHeap::new();
    for v in values {
        heap.add(v);
    }

    let mut drained = Vec::with_capacity(N);
    while let Ok(item) = heap.delete_max() {
        drained.push(item);
        if drained.len() % 97 == 0 {
            assert!(heap.check());
        }
    }
    assert_eq!(drained, expected);
}

/// Alternating delete_max / delete_min meets in the middle
#[test]
fn test_alternating_extremes() {
    let values = random_values(4, N);
    let mut sorted = values.clone();
    sorted.sort();

    let mut heap: IntervalHeap<i32> = values.into_iter().collect();
    for round in 0..N / 2 {
        assert_eq!(heap.delete_max(), Ok(sorted[N - 1 - round]));
        assert_eq!(heap.delete_min(), Ok(sorted[round]));
        assert!(heap.check());
    }
    assert!(heap.is_empty());
}

/// Random replaces keep every handle pointing at its element
#[test]
fn test_random_replaces() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut heap = IntervalHeap::new();
    let mut entries: Vec<_> = random_values(6, 500)
        .into_iter()
        .map(|v| (heap.add_with_handle(v), v))
        .collect();

    for step in 0..2000 {
        let idx = rng.gen_range(0..entries.len());
        let next = rng.gen_range(-20_000..20_000);
        let (handle, current) = &mut entries[idx];
        assert_eq!(heap.replace(handle, next), Ok(*current));
        *current = next;
        if step % 50 == 0 {
            assert!(heap.check());
        }
    }

    assert!(heap.check());
    for (handle, value) in &entries {
        assert_eq!(heap.get(handle), Ok(value));
    }
    let min = entries.iter().map(|(_, v)| *v).min();
    let max = entries.iter().map(|(_, v)| *v).max();
    assert_eq!(heap.find_min().ok().copied(), min);
    assert_eq!(heap.find_max().ok().copied(), max);
}

/// Interleaved adds, handle deletes, reuse and extreme removals
#[test]
fn test_mixed_workload() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut heap = IntervalHeap::new();
    let mut live = Vec::new();
    let mut dead = Vec::new();

    for _ in 0..5000 {
        match rng.gen_range(0..6) {
            0 | 1 => {
                let v = rng.gen_range(-1000..1000);
                live.push((heap.add_with_handle(v), v));
            }
            2 if !live.is_empty() => {
                let idx = rng.gen_range(0..live.len());
                let (h, v) = live.swap_remove(idx);
                assert_eq!(heap.delete(&h), Ok(v));
                dead.push(h);
            }
            3 if !dead.is_empty() => {
                let mut h = dead.pop().unwrap();
                let v = rng.gen_range(-1000..1000);
                heap.add_reusing(&mut h, v).unwrap();
                live.push((h, v));
            }
            4 => {
                if let Ok((v, handle)) = heap.delete_min_with_handle() {
                    let h = handle.unwrap();
                    let idx = live.iter().position(|(lh, _)| *lh == h).unwrap();
                    assert_eq!(live.swap_remove(idx).1, v);
                    dead.push(h);
                }
            }
            _ => {
                if let Ok((v, handle)) = heap.delete_max_with_handle() {
                    let h = handle.unwrap();
                    let idx = live.iter().position(|(lh, _)| *lh == h).unwrap();
                    assert_eq!(live.swap_remove(idx).1, v);
                    dead.push(h);
                }
            }
        }
        assert_eq!(heap.len(), live.len());
    }
    assert!(heap.check());
}

/// Growth from the smallest capacity keeps everything reachable
#[test]
fn test_growth_from_minimal_capacity() {
    let mut heap = IntervalHeap::with_capacity(1);
    assert_eq!(heap.capacity(), 2);
    let handles: Vec<_> = (0..N as i32).map(|i| heap.add_with_handle(i)).collect();
    assert!(heap.capacity() >= N);
    assert!(heap.check());
    for (i, h) in handles.iter().enumerate() {
        assert_eq!(heap.find(h), Some(&(i as i32)));
    }
}

/// Handle churn does not grow bookkeeping past the live elements
#[test]
fn test_handle_churn_keeps_arena_bounded() {
    let mut heap = IntervalHeap::new();
    let mut kept = None;
    for i in 0..100_000 {
        let h = heap.add_with_handle(i);
        if i == 50_000 {
            kept = Some(h);
        }
        heap.delete_min().unwrap();
    }
    assert!(heap.is_empty());
    assert_eq!(kept.map(|h| heap.handle_state(&h)), Some(Some(HandleState::Invalidated)));
    assert!(format!("{:?}", heap).contains("handles: 0"));
}
