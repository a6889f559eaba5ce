//! Open list for the priority-ordered solvers.
//!
//! A min-heap keyed by `(key, insertion_order)`: the smallest key is popped
//! first and ties go to the entry pushed earliest.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    key: i32,
    /// Monotonically increasing; lower means pushed earlier.
    seq: u64,
    idx: usize,
}

#[derive(Debug, Default)]
pub(crate) struct OpenQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl OpenQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, idx: usize, key: i32) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { key, seq, idx }));
    }

    /// Pop the cell with the lowest key, also returning the key.
    pub(crate) fn pop(&mut self) -> Option<(usize, i32)> {
        self.heap.pop().map(|Reverse(e)| (e.idx, e.key))
    }
}
