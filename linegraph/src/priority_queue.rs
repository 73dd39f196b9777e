use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// The priority Dijkstra ranks nodes by (`spec.md` §4.3 "Fastest time"):
/// cumulative seconds first, number of transfers second. Lower is better
/// for both, so `DijkstraPriority` orders from worst to best and callers
/// reach for it through a min-first queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DijkstraPriority {
    pub seconds: u32,
    pub transfers: u32,
}

impl Ord for DijkstraPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .seconds
            .cmp(&self.seconds)
            .then_with(|| other.transfers.cmp(&self.transfers))
    }
}

impl PartialOrd for DijkstraPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<T> {
    priority: DijkstraPriority,
    node: T,
}

impl<T: Eq> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

impl<T: Eq> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A decrease-priority queue over nodes `T`, keyed by [`DijkstraPriority`].
///
/// Backed by a `BinaryHeap` (a min-heap here since [`DijkstraPriority`]'s
/// `Ord` is reversed) plus a best-known-priority map, the same lazy-deletion
/// technique the pack's hand-rolled Dijkstra implementations use (see
/// `jamesm2w-odbrs`'s `route_finding::find_route`): `decrease_priority`
/// never mutates an entry in place, it pushes a fresh one and leaves the
/// stale entry to be skipped on pop once it is no longer the best known
/// priority for that node.
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    best: HashMap<T, DijkstraPriority>,
}

impl<T: Eq + Hash + Clone> PriorityQueue<T> {
    pub fn new() -> Self {
        PriorityQueue {
            heap: BinaryHeap::new(),
            best: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Inserts `node` at `priority`, or decreases its priority if it is
    /// already queued with a worse one. A call with a priority no better
    /// than the current best known for `node` is a no-op.
    pub fn push_or_decrease(&mut self, node: T, priority: DijkstraPriority) {
        let is_better = match self.best.get(&node) {
            Some(&current) => priority < current,
            None => true,
        };
        if is_better {
            self.best.insert(node.clone(), priority);
            self.heap.push(Entry { priority, node });
        }
    }

    /// Pops the node with the best remaining priority, skipping stale
    /// entries left behind by `push_or_decrease`.
    pub fn pop(&mut self) -> Option<(T, DijkstraPriority)> {
        while let Some(Entry { priority, node }) = self.heap.pop() {
            if self.best.get(&node) == Some(&priority) {
                return Some((node, priority));
            }
        }
        None
    }
}

impl<T: Eq + Hash + Clone> Default for PriorityQueue<T> {
    fn default() -> Self {
        PriorityQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_seconds_first() {
        let mut queue = PriorityQueue::new();
        queue.push_or_decrease(
            "a",
            DijkstraPriority {
                seconds: 500,
                transfers: 0,
            },
        );
        queue.push_or_decrease(
            "b",
            DijkstraPriority {
                seconds: 100,
                transfers: 2,
            },
        );
        assert_eq!(
            queue.pop(),
            Some((
                "b",
                DijkstraPriority {
                    seconds: 100,
                    transfers: 2
                }
            ))
        );
        assert_eq!(
            queue.pop(),
            Some((
                "a",
                DijkstraPriority {
                    seconds: 500,
                    transfers: 0
                }
            ))
        );
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn ties_break_on_fewer_transfers() {
        let mut queue = PriorityQueue::new();
        queue.push_or_decrease(
            "more_transfers",
            DijkstraPriority {
                seconds: 100,
                transfers: 3,
            },
        );
        queue.push_or_decrease(
            "fewer_transfers",
            DijkstraPriority {
                seconds: 100,
                transfers: 1,
            },
        );
        let (node, _) = queue.pop().unwrap();
        assert_eq!(node, "fewer_transfers");
    }

    #[test]
    fn decrease_priority_replaces_stale_entry() {
        let mut queue = PriorityQueue::new();
        queue.push_or_decrease(
            "a",
            DijkstraPriority {
                seconds: 500,
                transfers: 0,
            },
        );
        // Worse priority: ignored.
        queue.push_or_decrease(
            "a",
            DijkstraPriority {
                seconds: 600,
                transfers: 0,
            },
        );
        // Better priority: replaces it.
        queue.push_or_decrease(
            "a",
            DijkstraPriority {
                seconds: 200,
                transfers: 1,
            },
        );
        assert_eq!(
            queue.pop(),
            Some((
                "a",
                DijkstraPriority {
                    seconds: 200,
                    transfers: 1
                }
            ))
        );
        assert_eq!(queue.pop(), None);
    }
}
