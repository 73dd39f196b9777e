use std::collections::{HashSet, VecDeque};

use eventgraph::{Action, EventGraph};
use model::base_types::{BusId, LineId, SplitId, StopId};
use model::{Network, PlanningConfig, RequestPool};
use mip::{MipSolution, VariableIndex};
use time::Time;

use crate::plan::{BusRoute, Plan, RouteStop};

/// A binary decision variable above this value counts as activated. MIP
/// solvers routinely return `0.9999...`/`0.0001...` rather than exact 0/1,
/// so an exact-equality check would be wrong.
const ACTIVATION_THRESHOLD: f64 = 0.5;

/// One traversed event, before consecutive same-stop events are merged.
struct RawStop {
    location: StopId,
    arrival: Time,
    departure: Time,
    pick_ups: Vec<SplitId>,
    drop_offs: Vec<SplitId>,
}

/// Decodes every line's solved event graph into per-bus routes
/// (`spec.md` §4.6). `pickups_seen`/`dropoffs_seen` are tracked across the
/// whole decode, not per line, so a split shared by a bug in the solver's
/// flow cannot be picked up or dropped off twice.
pub fn decode_plan(
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
    index: &VariableIndex,
    solution: &MipSolution,
) -> Plan {
    let mut routes = Vec::new();
    let mut pickups_seen: HashSet<SplitId> = HashSet::new();
    let mut dropoffs_seen: HashSet<SplitId> = HashSet::new();

    let mut line_ids: Vec<LineId> = index.line_graphs.keys().copied().collect();
    line_ids.sort_by_key(|l| l.0);

    for line_id in line_ids {
        let graph = &index.line_graphs[&line_id];
        let mut out_queues = activated_out_queues(line_id, graph, index, solution);

        let mut bus_ids: Vec<BusId> = network.buses_on_line(line_id).map(|b| b.id()).collect();
        bus_ids.sort_by_key(|b| b.0);

        for bus_id in bus_ids {
            let raw = walk_one_bus(
                graph,
                &mut out_queues,
                pool,
                network,
                config,
                index,
                solution,
                &mut pickups_seen,
                &mut dropoffs_seen,
            );
            routes.push(BusRoute {
                bus: bus_id,
                stops: merge_consecutive(raw),
            });
        }
    }

    Plan { routes }
}

/// For each event, the activated edges leaving it, sorted by target index
/// for determinism (`spec.md` §5) and queued so each bus's walk consumes
/// a distinct occurrence (`spec.md` §4.6 "visit counter per node").
fn activated_out_queues(line_id: LineId, graph: &EventGraph, index: &VariableIndex, solution: &MipSolution) -> Vec<VecDeque<usize>> {
    graph
        .out_edges
        .iter()
        .enumerate()
        .map(|(a_idx, targets)| {
            let mut activated: Vec<usize> = targets
                .iter()
                .copied()
                .filter(|&b_idx| solution.get_value(index.x_vars[&(line_id, a_idx, b_idx)]) > ACTIVATION_THRESHOLD)
                .collect();
            activated.sort_unstable();
            activated.into_iter().collect()
        })
        .collect()
}

/// Walks one bus's tour out of `IdleEvent(line)` and back, one activated
/// edge at a time (`spec.md` §4.6). A bus with no activated edge out of
/// idle never left the depot; it is materialized as a single `RawStop`
/// spanning the whole service window.
#[allow(clippy::too_many_arguments)]
fn walk_one_bus(
    graph: &EventGraph,
    out_queues: &mut [VecDeque<usize>],
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
    index: &VariableIndex,
    solution: &MipSolution,
    pickups_seen: &mut HashSet<SplitId>,
    dropoffs_seen: &mut HashSet<SplitId>,
) -> Vec<RawStop> {
    let line = network.line(graph.line).expect("event graph's line must exist in the network");
    let depot = line.depot();

    if out_queues[graph.idle_index].is_empty() {
        return vec![RawStop {
            location: depot,
            arrival: line.start_time(),
            departure: line.end_time(),
            pick_ups: Vec::new(),
            drop_offs: Vec::new(),
        }];
    }

    let mut stops = vec![RawStop {
        location: depot,
        arrival: line.start_time(),
        departure: line.start_time(),
        pick_ups: Vec::new(),
        drop_offs: Vec::new(),
    }];

    let mut current_idx = graph.idle_index;
    let mut current_departure = line.start_time();

    loop {
        let Some(next_idx) = out_queues[current_idx].pop_front() else {
            assert_eq!(
                current_idx, graph.idle_index,
                "bus tour on line {} stalled away from idle at event {:?}: solver produced an unbalanced flow",
                graph.line, graph.events[current_idx].kind
            );
            break;
        };

        let from_loc = graph.events[current_idx].location(pool, network);
        let to_loc = graph.events[next_idx].location(pool, network);
        let travel = config.dist_to_time(network.distance_km(from_loc, to_loc, config.km_per_unit));
        let arrival = current_departure.add_seconds(travel);

        if next_idx == graph.idle_index {
            stops.push(RawStop {
                location: depot,
                arrival,
                departure: arrival,
                pick_ups: Vec::new(),
                drop_offs: Vec::new(),
            });
            break;
        }

        let (split, action) = graph.events[next_idx].anchor().expect("non-idle event has an anchor");
        let departure = decode_absolute_time(pool, config, index, solution, split, action);

        let mut pick_ups = Vec::new();
        let mut drop_offs = Vec::new();
        match action {
            Action::PickUp => {
                if pickups_seen.insert(split) {
                    pick_ups.push(split);
                } else {
                    println!(
                        "decoder: split {} already picked up elsewhere, skipping duplicate pickup on line {}",
                        split, graph.line
                    );
                }
            }
            Action::DropOff => {
                if dropoffs_seen.insert(split) {
                    drop_offs.push(split);
                } else {
                    println!(
                        "decoder: split {} already dropped off elsewhere, skipping duplicate drop-off on line {}",
                        split, graph.line
                    );
                }
            }
        }

        stops.push(RawStop {
            location: to_loc,
            arrival,
            departure,
            pick_ups,
            drop_offs,
        });

        current_idx = next_idx;
        current_departure = departure;
    }

    stops
}

/// Recovers the absolute departure/arrival instant from a `B_s^±` value.
/// `EventMilpModel::add_continuous_var` bounds `B` to
/// `[transfer_seconds, transfer_seconds + window_span]`
/// (`mip::builder::build_milp`), so `B - transfer_seconds` is the offset
/// past the leg's earliest instant.
fn decode_absolute_time(
    pool: &RequestPool,
    config: &PlanningConfig,
    index: &VariableIndex,
    solution: &MipSolution,
    split: SplitId,
    action: Action,
) -> Time {
    let window = pool.split(split).window();
    let (b_var, earliest) = match action {
        Action::PickUp => (index.b_plus[&split], window.earliest_start),
        Action::DropOff => (index.b_minus[&split], window.earliest_arrival),
    };
    let offset = (solution.get_value(b_var) - config.transfer_seconds as f64).max(0.0);
    earliest.add_seconds(offset.round() as u32)
}

/// Merges consecutive raw events sharing the same stop into one
/// `RouteStop` (`spec.md` §4.6), accumulating their pickup/drop-off sets
/// and keeping the first arrival and the last departure.
fn merge_consecutive(raw: Vec<RawStop>) -> Vec<RouteStop> {
    let mut merged: Vec<RouteStop> = Vec::new();
    for stop in raw {
        if let Some(last) = merged.last_mut() {
            if last.stop == stop.location {
                last.departure = stop.departure;
                last.pick_ups.extend(stop.pick_ups);
                last.drop_offs.extend(stop.drop_offs);
                continue;
            }
        }
        merged.push(RouteStop {
            stop: stop.location,
            arrival: stop.arrival,
            departure: stop.departure,
            pick_ups: stop.pick_ups,
            drop_offs: stop.drop_offs,
        });
    }
    merged
}
