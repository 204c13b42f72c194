use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A frontier entry: estimated total cost, insertion order, and the flat
/// index of the cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Entry {
    pub(crate) f: i32,
    pub(crate) order: u64,
    pub(crate) idx: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops smallest f first, and among
        // equal f the earliest insertion.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Append-only min-frontier with a monotonically increasing tie-break
/// counter.
///
/// Entries are never updated in place; a cell whose score improves while
/// queued keeps its original entry.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    next_order: u64,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue `idx` with priority `f`, returning the insertion order it got.
    pub(crate) fn push(&mut self, f: i32, idx: usize) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        self.heap.push(Entry { f, order, idx });
        order
    }

    pub(crate) fn pop(&mut self) -> Option<Entry> {
        self.heap.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
