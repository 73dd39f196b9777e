//! Translates the per-line event graphs into the variables, constraints
//! and objective of `spec.md` §4.5.

use std::collections::HashMap;

use good_lp::{constraint, Expression, Variable};

use eventgraph::{build_event_graph, Action, EventGraph};
use model::base_types::{LineId, RequestId, SplitId};
use model::{Network, PlanningConfig, RequestPool};

use crate::solver::EventMilpModel;

/// Every variable the builder created, keyed the way `decoder` needs to
/// look them up again after solving (`spec.md` §4.6 "Input: activated
/// edges... and `B_s^±` values").
pub struct VariableIndex {
    pub line_graphs: HashMap<LineId, EventGraph>,
    pub x_vars: HashMap<(LineId, usize, usize), Variable>,
    pub q_vars: HashMap<RequestId, Variable>,
    pub z_vars: HashMap<(RequestId, usize), Variable>,
    pub b_plus: HashMap<SplitId, Variable>,
    pub b_minus: HashMap<SplitId, Variable>,
}

impl VariableIndex {
    fn graph_of(&self, split: SplitId, pool: &RequestPool) -> &EventGraph {
        let line = pool.split(split).line();
        self.line_graphs
            .get(&line)
            .expect("every split's line has an event graph built for it")
    }

    /// Indices of every event in `split`'s line graph that is a `PickUp`
    /// or `DropOff` anchored at `split` (`spec.md` §4.5 "any-event-with-
    /// anchor-s"). There is one such event per feasible co-rider subset,
    /// so more than one index is the common case.
    fn anchored_events(&self, pool: &RequestPool, split: SplitId, action: Action) -> Vec<usize> {
        let graph = self.graph_of(split, pool);
        graph
            .events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.anchor() == Some((split, action)))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Euclidean driving distance summed over every base (non-temporary) edge
/// of the line network, used only to size the acceptance penalty
/// (`spec.md` §4.5): consecutive-stop distance along every line, both
/// directions being symmetric so counted once per line.
fn total_network_distance_km(network: &Network, config: &PlanningConfig) -> f64 {
    network
        .lines()
        .map(|line| {
            line.stops()
                .windows(2)
                .map(|pair| network.distance_km(pair[0], pair[1], config.km_per_unit))
                .sum::<f64>()
        })
        .sum()
}

fn event_action_window(pool: &RequestPool, split: SplitId, action: Action) -> (time::Time, time::Time) {
    let window = pool.split(split).window();
    match action {
        Action::PickUp => (window.earliest_start, window.latest_start),
        Action::DropOff => (window.earliest_arrival, window.latest_arrival),
    }
}

/// Builds the event-graph MILP for the whole network (`spec.md` §4.5).
/// Every line gets its own [`EventGraph`] (`eventgraph::build_event_graph`,
/// which panics if connectivity is violated — a graph-builder bug, not
/// input data, per `spec.md` §7).
pub fn build_milp(pool: &RequestPool, network: &Network, config: &PlanningConfig) -> (EventMilpModel, VariableIndex) {
    let mut model = EventMilpModel::new();

    let line_graphs: HashMap<LineId, EventGraph> = network
        .lines()
        .map(|line| (line.id(), build_event_graph(pool, network, config, line)))
        .collect();

    let mut x_vars: HashMap<(LineId, usize, usize), Variable> = HashMap::new();
    for (&line_id, graph) in &line_graphs {
        for (a_idx, targets) in graph.out_edges.iter().enumerate() {
            for &b_idx in targets {
                x_vars.insert((line_id, a_idx, b_idx), model.add_binary_var());
            }
        }
    }

    let mut b_plus: HashMap<SplitId, Variable> = HashMap::new();
    let mut b_minus: HashMap<SplitId, Variable> = HashMap::new();
    for split in pool.splits() {
        let window = split.window();
        let transfer = config.transfer_seconds as f64;
        let pickup_span = window.latest_start.delta_seconds(window.earliest_start) as f64;
        let dropoff_span = window.latest_arrival.delta_seconds(window.earliest_arrival) as f64;
        b_plus.insert(split.split_id(), model.add_continuous_var(transfer, transfer + pickup_span));
        b_minus.insert(
            split.split_id(),
            model.add_continuous_var(transfer, transfer + dropoff_span),
        );
    }

    let mut q_vars: HashMap<RequestId, Variable> = HashMap::new();
    let mut z_vars: HashMap<(RequestId, usize), Variable> = HashMap::new();
    for request_id in pool.request_ids_in_order() {
        let request = pool.request(request_id);
        if !request.is_feasible() {
            continue;
        }
        q_vars.insert(request_id, model.add_binary_var());
        let option_count = request.preprocessing().expect("checked is_feasible").route_options.len();
        for k in 0..option_count {
            z_vars.insert((request_id, k), model.add_binary_var());
        }
    }

    let index = VariableIndex {
        line_graphs,
        x_vars,
        q_vars,
        z_vars,
        b_plus,
        b_minus,
    };

    add_flow_conservation(&mut model, &index);
    add_fleet_limit(&mut model, &index, network);
    add_option_activation(&mut model, &index, pool);
    add_idle_timing(&mut model, &index, pool, network, config);
    add_inter_event_timing(&mut model, &index, pool, network, config);
    add_max_ride_time(&mut model, &index, pool);
    add_same_option_succession(&mut model, &index, pool, config);
    add_request_acceptance(&mut model, &index, pool);

    set_objective(&mut model, &index, pool, network, config);

    (model, index)
}

/// Constraint 1: flow conservation at every event, idle included.
fn add_flow_conservation(model: &mut EventMilpModel, index: &VariableIndex) {
    for (&line_id, graph) in &index.line_graphs {
        for node_idx in 0..graph.node_count() {
            let inflow: Expression = graph.in_edges[node_idx]
                .iter()
                .map(|&a| index.x_vars[&(line_id, a, node_idx)])
                .sum();
            let outflow: Expression = graph.out_edges[node_idx]
                .iter()
                .map(|&b| index.x_vars[&(line_id, node_idx, b)])
                .sum();
            model.add_linear_constraint(constraint!(inflow - outflow == 0));
        }
    }
}

/// Constraint 3: activated outgoing-from-idle edges capped at the line's
/// bus count.
fn add_fleet_limit(model: &mut EventMilpModel, index: &VariableIndex, network: &Network) {
    for (&line_id, graph) in &index.line_graphs {
        let bus_count = network.buses_on_line(line_id).count() as f64;
        let outgoing: Expression = graph.out_edges[graph.idle_index]
            .iter()
            .map(|&b| index.x_vars[&(line_id, graph.idle_index, b)])
            .sum();
        model.add_linear_constraint(constraint!(outgoing <= bus_count));
    }
}

/// Constraint 2: a route option may only be selected if, for every one of
/// its legs, at least one incoming edge into that leg's pickup event is
/// activated. Every leg needs its own copy of this constraint, not just
/// the option's first leg: nothing else in the model forces a later leg's
/// pickup event onto an activated path, so a transfer option's second and
/// further legs would otherwise be free to stay unactivated while `z`/`q`
/// still collect the acceptance reward.
fn add_option_activation(model: &mut EventMilpModel, index: &VariableIndex, pool: &RequestPool) {
    for (&(request_id, k), &z) in &index.z_vars {
        let option = &pool.request(request_id).preprocessing().expect("feasible").route_options[k];
        for &leg in &option.legs {
            let line = pool.split(leg).line();
            let graph = &index.line_graphs[&line];

            let mut incoming_sum = Expression::from(0.0);
            for node_idx in index.anchored_events(pool, leg, Action::PickUp) {
                for &a in &graph.in_edges[node_idx] {
                    incoming_sum += index.x_vars[&(line, a, node_idx)];
                }
            }
            model.add_linear_constraint(constraint!(incoming_sum - z >= 0));
        }
    }
}

/// Constraint 4: bus service-window timing at each line's idle event.
fn add_idle_timing(
    model: &mut EventMilpModel,
    index: &VariableIndex,
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
) {
    for split in pool.splits() {
        let split_id = split.split_id();
        let line_id = split.line();
        let graph = &index.line_graphs[&line_id];
        let line = network.line(line_id).expect("split's line must exist");
        let window = split.window();

        // Incoming: split's drop-off event has an edge to idle.
        let dropoff_nodes = index.anchored_events(pool, split_id, Action::DropOff);
        let incoming_to_idle: Vec<usize> = dropoff_nodes
            .iter()
            .copied()
            .filter(|&node| graph.out_edges[node].contains(&graph.idle_index))
            .collect();
        if !incoming_to_idle.is_empty() {
            let duration = config.dist_to_time(network.distance_km(split.dropoff(), line.depot(), config.km_per_unit)) as f64;
            let sum_x: Expression = incoming_to_idle
                .iter()
                .map(|&node| index.x_vars[&(line_id, node, graph.idle_index)])
                .sum();
            let b_minus = index.b_minus[&split_id];
            let bound = line.end_time().delta_seconds(window.earliest_arrival) as f64;
            model.add_linear_constraint(constraint!(duration * sum_x + b_minus <= bound));
        }

        // Outgoing: split's pickup event has an edge from idle.
        let pickup_nodes = index.anchored_events(pool, split_id, Action::PickUp);
        let outgoing_from_idle: Vec<usize> = pickup_nodes
            .iter()
            .copied()
            .filter(|&node| graph.in_edges[node].contains(&graph.idle_index))
            .collect();
        if !outgoing_from_idle.is_empty() {
            let duration = config.dist_to_time(network.distance_km(line.depot(), split.pickup(), config.km_per_unit)) as f64;
            let sum_x: Expression = outgoing_from_idle
                .iter()
                .map(|&node| index.x_vars[&(line_id, graph.idle_index, node)])
                .sum();
            let b_plus = index.b_plus[&split_id];
            let bound = line.start_time().delta_seconds(window.earliest_start) as f64 + config.transfer_seconds as f64;
            model.add_linear_constraint(constraint!(b_plus - duration * sum_x >= bound));
        }
    }
}

/// Constraint 5: precedence timing along every non-idle edge.
fn add_inter_event_timing(
    model: &mut EventMilpModel,
    index: &VariableIndex,
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
) {
    for (&line_id, graph) in &index.line_graphs {
        for (a_idx, event_a) in graph.events.iter().enumerate() {
            if event_a.is_idle() {
                continue;
            }
            for &b_idx in &graph.out_edges[a_idx] {
                let event_b = &graph.events[b_idx];
                if event_b.is_idle() {
                    continue;
                }
                let (s1, action1) = event_a.anchor().expect("checked non-idle");
                let (s2, action2) = event_b.anchor().expect("checked non-idle");

                let loc1 = event_a.location(pool, network);
                let loc2 = event_b.location(pool, network);
                let duration = config.dist_to_time(network.distance_km(loc1, loc2, config.km_per_unit));
                let service_time = if duration > 0 { config.transfer_seconds } else { 0 };

                let (earliest1, latest1) = event_action_window(pool, s1, action1);
                let (earliest2, _) = event_action_window(pool, s2, action2);

                let span1 = latest1.delta_seconds(earliest1);
                let earliest_delta = earliest1.delta_seconds(earliest2);
                let big_m =
                    (span1 + duration as i64 + config.transfer_seconds as i64 + earliest_delta.max(0)) as f64;

                let b1 = if action1 == Action::PickUp {
                    index.b_plus[&s1]
                } else {
                    index.b_minus[&s1]
                };
                let b2 = if action2 == Action::PickUp {
                    index.b_plus[&s2]
                } else {
                    index.b_minus[&s2]
                };
                let x = index.x_vars[&(line_id, a_idx, b_idx)];

                let rhs = service_time as f64 - big_m + duration as f64 + earliest_delta as f64;
                model.add_linear_constraint(constraint!(-big_m * x + b2 - b1 >= rhs));
            }
        }
    }
}

/// Constraint 6: total ride time of an accepted route option bounded by
/// the request's `max_travel_time`.
fn add_max_ride_time(model: &mut EventMilpModel, index: &VariableIndex, pool: &RequestPool) {
    for (&(request_id, k), _z) in &index.z_vars {
        let request = pool.request(request_id);
        let preprocessing = request.preprocessing().expect("feasible");
        let option = &preprocessing.route_options[k];
        let first = pool.split(option.first());
        let last = pool.split(option.last());

        let b_plus_first = index.b_plus[&first.split_id()];
        let b_minus_last = index.b_minus[&last.split_id()];
        let bound = preprocessing.max_travel_time_seconds as f64
            + first.window().earliest_start.delta_seconds(last.window().earliest_arrival) as f64;
        model.add_linear_constraint(constraint!(b_minus_last - b_plus_first <= bound));
    }
}

/// Constraint 7: successive legs within one option must hand the
/// passenger off in order, relaxed by a big-M tied to `z_{r,k}` so it only
/// binds when that option is actually selected.
fn add_same_option_succession(
    model: &mut EventMilpModel,
    index: &VariableIndex,
    pool: &RequestPool,
    config: &PlanningConfig,
) {
    for (&(request_id, k), &z) in &index.z_vars {
        let option = &pool.request(request_id).preprocessing().expect("feasible").route_options[k];
        for pair in option.legs.windows(2) {
            let current = pool.split(pair[0]);
            let next = pool.split(pair[1]);

            let current_span = current
                .window()
                .latest_arrival
                .delta_seconds(current.window().earliest_arrival);
            let next_span = next.window().latest_start.delta_seconds(next.window().earliest_start);
            let delta = current
                .window()
                .earliest_arrival
                .delta_seconds(next.window().earliest_start);
            let big_m = (current_span + next_span + 2 * config.transfer_seconds as i64 + delta.abs()) as f64;

            let b_plus_next = index.b_plus[&next.split_id()];
            let b_minus_current = index.b_minus[&current.split_id()];
            model.add_linear_constraint(constraint!(
                b_plus_next - b_minus_current + big_m * z >= delta as f64
            ));
        }
    }
}

/// Constraint 8: a request is accepted iff exactly one of its route
/// options is selected.
fn add_request_acceptance(model: &mut EventMilpModel, index: &VariableIndex, pool: &RequestPool) {
    for (&request_id, &q) in &index.q_vars {
        let option_count = pool.request(request_id).preprocessing().expect("feasible").route_options.len();
        let sum_z: Expression = (0..option_count).map(|k| index.z_vars[&(request_id, k)]).sum();
        model.add_linear_constraint(constraint!(q - sum_z == 0));
    }
}

/// `spec.md` §4.5's single-phase objective: minimise total activated-edge
/// distance, penalized heavily for every denied request so that accepting
/// one more request always dominates any amount of extra driving.
fn set_objective(
    model: &mut EventMilpModel,
    index: &VariableIndex,
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
) {
    let mut terms = Vec::with_capacity(index.x_vars.len() + index.q_vars.len());
    for (&(line_id, a_idx, b_idx), &x) in &index.x_vars {
        let graph = &index.line_graphs[&line_id];
        let loc_a = graph.events[a_idx].location(pool, network);
        let loc_b = graph.events[b_idx].location(pool, network);
        let km = network.distance_km(loc_a, loc_b, config.km_per_unit);
        terms.push((x, km));
    }

    let penalty = 2.0 * total_network_distance_km(network, config) * pool.len() as f64 + 1.0;
    for &q in index.q_vars.values() {
        terms.push((q, -penalty));
    }

    model.set_linear_objective(terms);
}
