use std::collections::HashMap;

use linegraph::{DijkstraPriority, LineGraph, PriorityQueue};
use model::base_types::{LineId, PassengerCount, StopId};

/// Output of the fastest-path search (`spec.md` §4.3): the cumulative
/// travel time and the number of line-to-line transfers on the fastest
/// route, used to seed both `max_delay` evaluation and route-option
/// enumeration's transfer budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastestPath {
    pub seconds: u32,
    pub transfers: u32,
}

/// Dijkstra from `pickup` to `dropoff` on the (already request-augmented)
/// line graph.
///
/// The search state is `(stop, arrival_line)` rather than just `stop`:
/// relaxing an edge whose line differs from the line the current state
/// arrived on costs `transfer_seconds` and a transfer; continuing on the
/// same line costs nothing extra. `arrival_line = None` only at the seed
/// (the request's own pickup, not yet aboard any bus) — `spec.md` §4.3
/// seeds `distance(pickup) = transfer_seconds` to model the initial
/// boarding, so the very first edge taken never double-charges a
/// transfer. Edges whose line capacity is below `passengers` are skipped
/// entirely, matching "filter out edges whose line capacity < request
/// group size".
pub fn fastest_path(
    graph: &LineGraph,
    pickup: StopId,
    dropoff: StopId,
    passengers: PassengerCount,
    transfer_seconds: u32,
) -> Option<FastestPath> {
    let mut queue: PriorityQueue<(StopId, Option<LineId>)> = PriorityQueue::new();
    let mut best: HashMap<(StopId, Option<LineId>), DijkstraPriority> = HashMap::new();

    let seed_priority = DijkstraPriority {
        seconds: transfer_seconds,
        transfers: 0,
    };
    queue.push_or_decrease((pickup, None), seed_priority);
    best.insert((pickup, None), seed_priority);

    while let Some(((stop, arrival_line), priority)) = queue.pop() {
        // The heap always yields the globally smallest remaining priority,
        // so the first pop at `dropoff` (under any arrival line) is optimal.
        if stop == dropoff {
            return Some(FastestPath {
                seconds: priority.seconds,
                transfers: priority.transfers,
            });
        }

        for edge in graph.out_edges(stop) {
            let capacity = graph
                .network()
                .line(edge.line)
                .map(|line| line.capacity())
                .unwrap_or(0);
            if capacity < passengers {
                continue;
            }

            let is_transfer = match arrival_line {
                None => false,
                Some(line) => line != edge.line,
            };
            let extra_seconds = if is_transfer { transfer_seconds } else { 0 };
            let extra_transfers = if is_transfer { 1 } else { 0 };

            let next_priority = DijkstraPriority {
                seconds: priority.seconds + extra_seconds + edge.duration,
                transfers: priority.transfers + extra_transfers,
            };
            let next_state = (edge.to, Some(edge.line));
            let is_better = match best.get(&next_state) {
                Some(&current) => next_priority < current,
                None => true,
            };
            if is_better {
                best.insert(next_state, next_priority);
                queue.push_or_decrease(next_state, next_priority);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::two_line_network_with_config;

    #[test]
    fn direct_single_line_path_has_zero_transfers() {
        let (network, config) = two_line_network_with_config();
        let mut graph = LineGraph::new(&network, &config);
        graph.add_request(StopId(1), StopId(3));
        let result = fastest_path(&graph, StopId(1), StopId(3), 1, config.transfer_seconds).unwrap();
        assert_eq!(result.transfers, 0);
        graph.delete_request(StopId(1), StopId(3));
    }

    #[test]
    fn cross_line_path_counts_one_transfer() {
        let (network, config) = two_line_network_with_config();
        let mut graph = LineGraph::new(&network, &config);
        graph.add_request(StopId(1), StopId(5));
        let result = fastest_path(&graph, StopId(1), StopId(5), 1, config.transfer_seconds).unwrap();
        assert_eq!(result.transfers, 1);
        graph.delete_request(StopId(1), StopId(5));
    }

    #[test]
    fn no_path_returns_none() {
        let (network, config) = two_line_network_with_config();
        let graph = LineGraph::new(&network, &config);
        // Stop 1 (A) and stop 4 (C) are not connected without augmentation.
        assert!(fastest_path(&graph, StopId(1), StopId(4), 1, config.transfer_seconds).is_none());
    }

    #[test]
    fn capacity_below_group_size_blocks_the_line() {
        let (network, config) = two_line_network_with_config();
        let mut graph = LineGraph::new(&network, &config);
        graph.add_request(StopId(1), StopId(3));
        // Line 1 has capacity 4; a group of 5 cannot use it at all.
        assert!(fastest_path(&graph, StopId(1), StopId(3), 5, config.transfer_seconds).is_none());
        graph.delete_request(StopId(1), StopId(3));
    }
}
