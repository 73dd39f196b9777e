use std::collections::{HashMap, HashSet};

use linegraph::{LineEdge, LineGraph};
use model::base_types::{PassengerCount, RequestId, StopId};
use model::request::{RouteOption, SplitRequest};
use model::{Network, PlanningConfig, RequestPool};
use time::Time;

use crate::window::tighten_option_windows;

/// Depth-first enumeration of every feasible multi-leg route option for one
/// request (`spec.md` §4.3 "Route options"), starting from each outgoing
/// edge of `pickup`.
///
/// `edge_to_split` is the "shared map `LineEdge -> SplitRequest`" the spec
/// calls for: built fresh per request (a `SplitRequest` is request-specific,
/// so it cannot be shared across requests), it ensures that when the same
/// `(from, to, line)` edge appears as a leg in more than one route option,
/// it is represented by exactly one `SplitRequest`, whose window is widened
/// (`SplitRequest::widen`) rather than duplicated.
#[allow(clippy::too_many_arguments)]
pub fn enumerate_route_options(
    graph: &LineGraph,
    network: &Network,
    config: &PlanningConfig,
    pool: &mut RequestPool,
    request_id: RequestId,
    pickup: StopId,
    dropoff: StopId,
    passengers: PassengerCount,
    earliest_start_time: Time,
    latest_arrival_time: Time,
    numb_transfer: u32,
    max_travel_time_seconds: u32,
) -> Vec<RouteOption> {
    let transfer_budget = numb_transfer + config.number_of_extra_transfers;

    let mut raw_paths: Vec<Vec<LineEdge>> = Vec::new();
    for edge in graph.out_edges(pickup) {
        let capacity = network.line(edge.line).map(|l| l.capacity()).unwrap_or(0);
        if capacity < passengers {
            continue;
        }
        let mut visited = HashSet::new();
        visited.insert(pickup);
        visited.insert(edge.to);
        dfs(
            graph,
            network,
            dropoff,
            passengers,
            transfer_budget,
            max_travel_time_seconds,
            *edge,
            config.transfer_seconds as i64 + edge.duration as i64,
            0,
            visited,
            vec![*edge],
            &mut raw_paths,
        );
    }

    let mut edge_to_split: HashMap<LineEdge, model::base_types::SplitId> = HashMap::new();
    let mut options = Vec::new();

    for path in &raw_paths {
        let Some(windows) = tighten_option_windows(
            network,
            config,
            path,
            earliest_start_time,
            latest_arrival_time,
        ) else {
            continue;
        };

        let mut legs = Vec::with_capacity(path.len());
        for (edge, window) in path.iter().zip(windows.into_iter()) {
            let split_id = *edge_to_split.entry(*edge).or_insert_with(|| {
                let id = pool.next_split_id();
                pool.insert_split(SplitRequest::new(
                    id,
                    request_id,
                    edge.from,
                    edge.to,
                    edge.line,
                    passengers,
                    window,
                ));
                id
            });
            // Widen if this edge's split was already created by an earlier
            // option (`spec.md` §4.3: "when multiple options share a
            // SplitRequest identity, widen").
            pool.split_mut(split_id).widen(window);
            legs.push(split_id);
        }
        options.push(RouteOption::new(legs));
    }

    options
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    graph: &LineGraph,
    network: &Network,
    dropoff: StopId,
    passengers: PassengerCount,
    transfer_budget: u32,
    max_travel_time_seconds: u32,
    current_edge: LineEdge,
    cumulative_seconds: i64,
    cumulative_transfers: u32,
    visited: HashSet<StopId>,
    path: Vec<LineEdge>,
    out: &mut Vec<Vec<LineEdge>>,
) {
    if cumulative_transfers > transfer_budget || cumulative_seconds > max_travel_time_seconds as i64 {
        return;
    }

    if current_edge.to == dropoff {
        out.push(path);
        return;
    }

    for edge in graph.out_edges(current_edge.to) {
        if edge.line == current_edge.line {
            continue;
        }
        if visited.contains(&edge.to) {
            continue;
        }
        let capacity = network.line(edge.line).map(|l| l.capacity()).unwrap_or(0);
        if capacity < passengers {
            continue;
        }

        let transfer_seconds = graph.config().transfer_seconds as i64;
        let mut next_visited = visited.clone();
        next_visited.insert(edge.to);
        let mut next_path = path.clone();
        next_path.push(*edge);

        dfs(
            graph,
            network,
            dropoff,
            passengers,
            transfer_budget,
            max_travel_time_seconds,
            *edge,
            cumulative_seconds + transfer_seconds + edge.duration as i64,
            cumulative_transfers + 1,
            next_visited,
            next_path,
            out,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::two_line_network_with_config;
    use model::base_types::{PassengerCount, RequestId};

    #[test]
    fn finds_direct_option_on_single_line() {
        let (network, config) = two_line_network_with_config();
        let mut graph = LineGraph::new(&network, &config);
        graph.add_request(StopId(1), StopId(3));
        let mut pool = RequestPool::new();
        let earliest_start = Time::parse("08:00:00").unwrap();
        let latest_arrival = Time::parse("09:00:00").unwrap();

        let options = enumerate_route_options(
            &graph,
            &network,
            &config,
            &mut pool,
            RequestId(1),
            StopId(1),
            StopId(3),
            1 as PassengerCount,
            earliest_start,
            latest_arrival,
            0,
            3600,
        );

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].legs.len(), 1);
        graph.delete_request(StopId(1), StopId(3));
    }

    #[test]
    fn finds_transfer_option_across_lines() {
        let (network, config) = two_line_network_with_config();
        let mut graph = LineGraph::new(&network, &config);
        graph.add_request(StopId(1), StopId(5));
        let mut pool = RequestPool::new();
        let earliest_start = Time::parse("08:00:00").unwrap();
        let latest_arrival = Time::parse("10:00:00").unwrap();

        let options = enumerate_route_options(
            &graph,
            &network,
            &config,
            &mut pool,
            RequestId(1),
            StopId(1),
            StopId(5),
            1 as PassengerCount,
            earliest_start,
            latest_arrival,
            1,
            7200,
        );

        assert!(options.iter().any(|o| o.legs.len() == 2));
        graph.delete_request(StopId(1), StopId(5));
    }
}
