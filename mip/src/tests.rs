use model::base_types::{BusId, Coordinate, LineId, PassengerCount, RequestId, StopId};
use model::max_delay::MaxDelayExpr;
use model::network::{Bus, Line, Network, Stop};
use model::request::Request;
use model::{ContextKind, PlanningConfig, RequestPool, SolverKind};
use time::Time;

use linegraph::LineGraph;

use crate::builder::build_milp;
use crate::solver::SolverParams;

/// `spec.md` §8 S1: a single line `[A, B, C]`, one bus, capacity 4,
/// service window `08:00-10:00`, two non-overlapping two-passenger
/// requests A -> C. Both should be accepted.
fn s1_fixture() -> (Network, PlanningConfig, RequestPool) {
    let stops = vec![
        Stop::new(StopId(1), Coordinate::new(0.0, 0.0)),
        Stop::new(StopId(2), Coordinate::new(1.0, 0.0)),
        Stop::new(StopId(3), Coordinate::new(2.0, 0.0)),
    ];
    let lines = vec![Line::new(
        LineId(1),
        vec![StopId(1), StopId(2), StopId(3)],
        StopId(1),
        4,
        Time::parse("08:00:00").unwrap(),
        Time::parse("10:00:00").unwrap(),
    )];
    let buses = vec![Bus::new(BusId(1), LineId(1))];
    let network = Network::new(stops, lines, buses);

    let config = PlanningConfig {
        average_kmh: 30.0,
        km_per_unit: 1.0,
        capacity_per_line: Some(4),
        number_of_extra_transfers: 1,
        max_delay_equation: MaxDelayExpr::parse("x").unwrap(),
        transfer_seconds: 60,
        time_window_seconds: 600,
        context: ContextKind::Static,
        solver: SolverKind::EventMilp,
    };

    let mut pool = RequestPool::new();
    pool.insert_request(Request::new(
        RequestId(1),
        2 as PassengerCount,
        StopId(1),
        StopId(3),
        Time::parse("08:05:00").unwrap(),
        Time::parse("07:00:00").unwrap(),
    ));
    pool.insert_request(Request::new(
        RequestId(2),
        2 as PassengerCount,
        StopId(1),
        StopId(3),
        Time::parse("08:30:00").unwrap(),
        Time::parse("07:00:00").unwrap(),
    ));

    let mut graph = LineGraph::new(&network, &config);
    preprocessing::preprocess_all(&mut graph, &network, &config, &mut pool);

    (network, config, pool)
}

#[test]
fn builds_one_request_variable_per_feasible_request() {
    let (network, config, pool) = s1_fixture();
    let (_, index) = build_milp(&pool, &network, &config);

    assert_eq!(index.q_vars.len(), 2);
    assert!(index.z_vars.len() >= 2);
    assert!(!index.x_vars.is_empty());
    // Every split gets exactly one B+ and one B- variable.
    assert_eq!(index.b_plus.len(), pool.split_count());
    assert_eq!(index.b_minus.len(), pool.split_count());
}

#[test]
fn fleet_limit_equals_bus_count_on_line() {
    let (network, config, pool) = s1_fixture();
    let (_, index) = build_milp(&pool, &network, &config);
    let graph = &index.line_graphs[&LineId(1)];
    // One bus on the line: at most one activated edge leaving idle.
    assert_eq!(network.buses_on_line(LineId(1)).count(), 1);
    assert!(!graph.out_edges[graph.idle_index].is_empty());
}

#[test]
fn solves_s1_and_accepts_both_requests() {
    let (network, config, pool) = s1_fixture();
    let (mut model, index) = build_milp(&pool, &network, &config);
    model.set_parameters(SolverParams {
        time_limit: std::time::Duration::from_secs(30),
        threads: 1,
        mip_gap: 0.0,
    });
    let solution = model.solve().expect("S1 is feasible for one bus");

    for (&request_id, &q) in &index.q_vars {
        let accepted = solution.get_value(q) > 0.5;
        assert!(accepted, "request {:?} should be accepted in S1", request_id);
    }
}
