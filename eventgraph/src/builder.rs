use std::collections::{BTreeSet, HashMap};

use model::base_types::{LineId, PassengerCount, SplitId};
use model::network::line::{Direction, Line};
use model::{Network, PlanningConfig, RequestPool};

use crate::event::{Action, Event};
use crate::event_window::event_window;
use crate::sweep::candidate_partners;

/// Every valid event for one line, plus the edges connecting them
/// (`spec.md` §4.4). One [`EventGraph`] covers both directions of travel
/// on the line, since a bus assigned to it may run either way over the
/// course of the service day.
pub struct EventGraph {
    pub line: LineId,
    pub events: Vec<Event>,
    pub out_edges: Vec<Vec<usize>>,
    pub in_edges: Vec<Vec<usize>>,
    pub idle_index: usize,
}

impl EventGraph {
    pub fn node_count(&self) -> usize {
        self.events.len()
    }
}

/// Builds the full event graph for one line from every split-request leg
/// riding it. Panics if the connectivity invariant (`spec.md` §4.4
/// "Connectivity check") fails — that indicates a bug in event/edge
/// construction, not a data problem, so it is not a recoverable `Result`.
pub fn build_event_graph(pool: &RequestPool, network: &Network, config: &PlanningConfig, line: &Line) -> EventGraph {
    let legs: Vec<SplitId> = pool
        .splits()
        .filter(|s| s.line() == line.id())
        .map(|s| s.split_id())
        .collect();

    let mut events = vec![Event::idle(line.id(), line.start_time(), line.end_time())];

    for &direction in &[Direction::Forward, Direction::Backward] {
        let legs_dir: Vec<SplitId> = legs
            .iter()
            .copied()
            .filter(|&leg| line.direction_of(pool.split(leg).pickup(), pool.split(leg).dropoff()) == direction)
            .collect();
        if legs_dir.is_empty() {
            continue;
        }

        let partners = candidate_partners(pool, line, direction, &legs_dir);

        for &leg in &legs_dir {
            for (action, is_pickup) in [(Action::PickUp, true), (Action::DropOff, false)] {
                let candidate_set = partners.get(&(leg, action)).cloned().unwrap_or_default();
                let anchor_passengers = pool.split(leg).passengers();
                let capacity_remaining = line.capacity().saturating_sub(anchor_passengers);

                let mut subsets = Vec::new();
                let candidates: Vec<SplitId> = candidate_set.into_iter().collect();
                let mut chosen = BTreeSet::new();
                enumerate_subsets(pool, &candidates, 0, &mut chosen, 0, capacity_remaining, &mut subsets);

                for subset in subsets {
                    if let Some((earliest, latest)) =
                        event_window(pool, network, config, line, direction, leg, is_pickup, &subset)
                    {
                        let location = if is_pickup {
                            pool.split(leg).pickup()
                        } else {
                            pool.split(leg).dropoff()
                        };
                        let event = if is_pickup {
                            Event::pick_up(leg, subset, location, line.id(), earliest, latest)
                        } else {
                            Event::drop_off(leg, subset, location, line.id(), earliest, latest)
                        };
                        events.push(event);
                    }
                }
            }
        }
    }

    let (out_edges, in_edges) = compute_edges(pool, network, config, &events);

    let graph = EventGraph {
        line: line.id(),
        events,
        out_edges,
        in_edges,
        idle_index: 0,
    };

    check_connectivity(&graph);
    graph
}

/// Recursively enumerates every subset of `candidates[idx..]` whose total
/// passenger count stays within `capacity_remaining`, including the empty
/// subset (`spec.md` §4.4 "Event enumeration", rule 1).
fn enumerate_subsets(
    pool: &RequestPool,
    candidates: &[SplitId],
    idx: usize,
    chosen: &mut BTreeSet<SplitId>,
    chosen_passengers: PassengerCount,
    capacity_remaining: PassengerCount,
    out: &mut Vec<BTreeSet<SplitId>>,
) {
    if idx == candidates.len() {
        out.push(chosen.clone());
        return;
    }

    enumerate_subsets(pool, candidates, idx + 1, chosen, chosen_passengers, capacity_remaining, out);

    let leg = candidates[idx];
    let passengers = pool.split(leg).passengers();
    if chosen_passengers + passengers <= capacity_remaining {
        chosen.insert(leg);
        enumerate_subsets(
            pool,
            candidates,
            idx + 1,
            chosen,
            chosen_passengers + passengers,
            capacity_remaining,
            out,
        );
        chosen.remove(&leg);
    }
}

/// Builds edges by bucketing events on their after-set (candidate `A`s)
/// and before-set (candidate `B`s), as `spec.md` §4.4 "Edges" directs, so
/// only events that could possibly chain are ever compared.
fn compute_edges(
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
    events: &[Event],
) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let mut by_after: HashMap<BTreeSet<SplitId>, Vec<usize>> = HashMap::new();
    let mut by_before: HashMap<BTreeSet<SplitId>, Vec<usize>> = HashMap::new();
    for (idx, event) in events.iter().enumerate() {
        by_after.entry(event.after_set()).or_default().push(idx);
        by_before.entry(event.before_set()).or_default().push(idx);
    }

    let mut out_edges = vec![Vec::new(); events.len()];
    let mut in_edges = vec![Vec::new(); events.len()];

    for (key, a_indices) in &by_after {
        let Some(b_indices) = by_before.get(key) else {
            continue;
        };
        for &a_idx in a_indices {
            for &b_idx in b_indices {
                if a_idx == b_idx {
                    continue;
                }
                let a = &events[a_idx];
                let b = &events[b_idx];
                let a_loc = a.location(pool, network);
                let b_loc = b.location(pool, network);
                let km = network.distance_km(a_loc, b_loc, config.km_per_unit);
                let travel = config.dist_to_time(km);
                let transfer = if travel > 0 { config.transfer_seconds } else { 0 };
                if a.earliest.add_seconds(travel + transfer) <= b.latest {
                    out_edges[a_idx].push(b_idx);
                    in_edges[b_idx].push(a_idx);
                }
            }
        }
    }

    (out_edges, in_edges)
}

/// BFS forward and backward from the idle event; every non-idle event
/// must lie on some path through idle in both directions, else event or
/// edge construction has a bug (`spec.md` §4.4 "Connectivity check").
fn check_connectivity(graph: &EventGraph) {
    let forward = bfs(&graph.out_edges, graph.idle_index);
    let backward = bfs(&graph.in_edges, graph.idle_index);

    for idx in 0..graph.events.len() {
        if idx == graph.idle_index {
            continue;
        }
        assert!(
            forward.contains(&idx) && backward.contains(&idx),
            "event {:?} on line {} is not reachable from idle in both directions",
            graph.events[idx].kind,
            graph.line
        );
    }
}

fn bfs(adjacency: &[Vec<usize>], start: usize) -> std::collections::HashSet<usize> {
    let mut visited = std::collections::HashSet::new();
    let mut queue = std::collections::VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    while let Some(node) = queue.pop_front() {
        for &next in &adjacency[node] {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}
