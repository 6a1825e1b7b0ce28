/*!
# Indexed Min-Heap with Decrease-Key

A mutable binary min-heap of `(TokenKey, priority)` pairs with a positional
index mapping each live key to its current heap slot, so that
[`IndexedHeap::decrease_key`] can locate and sift an arbitrary entry in
`O(log n)` rather than the `O(n)` a plain `BinaryHeap` would need. This is
the one nontrivial data structure classical Dijkstra (C3) needs that
`std::collections::BinaryHeap` cannot provide on its own, since the standard
heap has no way to find or update an entry already inside it.
*/

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::core::graph::TokenKey;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    priority: f64,
}

impl Entry {
    /// Total order over the priority, via `OrderedFloat`, so a stray NaN
    /// (never produced by the weight function in normal operation, since
    /// non-positive rates are clamped rather than logged) cannot silently
    /// break the heap invariant.
    fn key(&self) -> OrderedFloat<f64> {
        OrderedFloat(self.priority)
    }
}

/// An indexed binary min-heap keyed by [`TokenKey`] with `f64` priorities.
///
/// # Invariants
/// - Heap property: `priority[parent(i)] <= priority[i]` for all `i > 0`.
/// - Positional consistency: for every live key, `positions[key]` points at
///   its actual slot in `heap`; every swap updates both slots.
#[derive(Debug, Default)]
pub struct IndexedHeap {
    heap: Vec<(TokenKey, Entry)>,
    positions: HashMap<TokenKey, usize>,
    /// Monotone counter incremented on every structural mutation (swap,
    /// insert, extract, decrease-key), used solely for metrics.
    pub operations: u64,
}

impl IndexedHeap {
    pub fn new() -> Self {
        IndexedHeap {
            heap: Vec::new(),
            positions: HashMap::new(),
            operations: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn contains(&self, key: &TokenKey) -> bool {
        self.positions.contains_key(key)
    }

    /// Appends `key` with `priority` at the end and sifts it up.
    ///
    /// # Panics
    /// Panics if `key` is already present; callers that are unsure should use
    /// [`IndexedHeap::decrease_key`] instead, which inserts when absent.
    pub fn insert(&mut self, key: TokenKey, priority: f64) {
        assert!(
            !self.positions.contains_key(&key),
            "key already present in heap"
        );
        let idx = self.heap.len();
        self.positions.insert(key.clone(), idx);
        self.heap.push((key, Entry { priority }));
        self.operations += 1;
        self.sift_up(idx);
    }

    /// Removes and returns the root, or `None` if the heap is empty.
    pub fn extract_min(&mut self) -> Option<(TokenKey, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        self.operations += 1;
        let last = self.heap.len() - 1;
        self.swap_slots(0, last);
        let (key, entry) = self.heap.pop().expect("heap nonempty");
        self.positions.remove(&key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((key, entry.priority))
    }

    /// Inserts `key` if absent; otherwise updates its priority and sifts up
    /// iff `new_priority` is strictly smaller than the current one. A no-op
    /// when `new_priority` is greater than or equal to the current priority.
    pub fn decrease_key(&mut self, key: TokenKey, new_priority: f64) {
        match self.positions.get(&key).copied() {
            None => self.insert(key, new_priority),
            Some(idx) => {
                if OrderedFloat(new_priority) < self.heap[idx].1.key() {
                    self.heap[idx].1.priority = new_priority;
                    self.operations += 1;
                    self.sift_up(idx);
                }
            }
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].1.key() < self.heap[parent].1.key() {
                self.swap_slots(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;
            if left < len && self.heap[left].1.key() < self.heap[smallest].1.key() {
                smallest = left;
            }
            if right < len && self.heap[right].1.key() < self.heap[smallest].1.key() {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap_slots(idx, smallest);
            idx = smallest;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].0.clone(), a);
        self.positions.insert(self.heap[b].0.clone(), b);
        self.operations += 1;
    }
}
