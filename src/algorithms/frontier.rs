use crate::algorithms::Algorithm;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// Open-set entry. Lower priority wins, then the earlier insertion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenEntry {
    pub(crate) priority: f64,
    pub(crate) seq: u64,
    pub(crate) idx: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest priority first.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Discovered cells waiting to be expanded.
#[derive(Debug, Clone)]
pub(crate) enum Frontier {
    Queue(VecDeque<usize>),
    Stack(Vec<usize>),
    Open(BinaryHeap<OpenEntry>),
}

impl Frontier {
    pub(crate) fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => Frontier::Queue(VecDeque::new()),
            Algorithm::Dfs => Frontier::Stack(Vec::new()),
            Algorithm::AStar | Algorithm::Dijkstra | Algorithm::Greedy => {
                Frontier::Open(BinaryHeap::new())
            }
        }
    }

    /// `priority` and `seq` only matter for the open set.
    pub(crate) fn push(&mut self, idx: usize, priority: f64, seq: u64) {
        match self {
            Frontier::Queue(q) => q.push_back(idx),
            Frontier::Stack(s) => s.push(idx),
            Frontier::Open(heap) => heap.push(OpenEntry { priority, seq, idx }),
        }
    }

    /// Next cell with the priority it was pushed with. Open-set entries may
    /// be stale; the caller filters them.
    pub(crate) fn pop(&mut self) -> Option<(usize, f64)> {
        match self {
            Frontier::Queue(q) => q.pop_front().map(|i| (i, 0.0)),
            Frontier::Stack(s) => s.pop().map(|i| (i, 0.0)),
            Frontier::Open(heap) => heap.pop().map(|e| (e.idx, e.priority)),
        }
    }

    pub(crate) fn is_lazy(&self) -> bool {
        matches!(self, Frontier::Open(_))
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Frontier::Queue(q) => q.len(),
            Frontier::Stack(s) => s.len(),
            Frontier::Open(heap) => heap.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(f: &mut Frontier) -> Vec<usize> {
        std::iter::from_fn(|| f.pop().map(|(i, _)| i)).collect()
    }

    #[test]
    fn open_set_breaks_ties_by_insertion() {
        let mut f = Frontier::for_algorithm(Algorithm::AStar);
        f.push(10, 3.0, 0);
        f.push(11, 2.0, 1);
        f.push(12, 3.0, 2);
        f.push(13, 2.0, 3);
        assert_eq!(drain(&mut f), vec![11, 13, 10, 12]);
    }

    #[test]
    fn updated_entry_keeps_original_sequence() {
        let mut f = Frontier::for_algorithm(Algorithm::Dijkstra);
        f.push(1, 5.0, 0);
        f.push(2, 4.0, 1);
        // Cell 1 improves to the same priority as cell 2 and still wins.
        f.push(1, 4.0, 0);
        assert_eq!(f.pop(), Some((1, 4.0)));
        assert_eq!(f.pop(), Some((2, 4.0)));
        assert_eq!(f.pop(), Some((1, 5.0)));
    }

    #[test]
    fn queue_and_stack_order() {
        let mut q = Frontier::for_algorithm(Algorithm::Bfs);
        let mut s = Frontier::for_algorithm(Algorithm::Dfs);
        for i in 0..4 {
            q.push(i, 0.0, 0);
            s.push(i, 0.0, 0);
        }
        assert_eq!(q.len(), 4);
        assert_eq!(drain(&mut q), vec![0, 1, 2, 3]);
        assert_eq!(drain(&mut s), vec![3, 2, 1, 0]);
        assert!(!q.is_lazy());
    }
}
