use model::base_types::{BusId, Coordinate, LineId, PassengerCount, RequestId, StopId};
use model::max_delay::MaxDelayExpr;
use model::network::{Bus, Line, Network, Stop};
use model::request::Request;
use model::{ContextKind, PlanningConfig, RequestPool, SolverKind};
use time::Time;

use linegraph::LineGraph;
use mip::{build_milp, SolverParams};

use crate::validate::validate_and_finalize;

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

/// `spec.md` §8 S1 end to end: preprocess, solve, decode, validate. Both
/// requests must come out accepted with consistent actual times.
#[test]
fn s1_both_requests_accepted_and_validated() {
    let (network, config, mut pool) = s1_fixture();
    let (mut model, index) = build_milp(&pool, &network, &config);
    model.set_parameters(SolverParams {
        time_limit: std::time::Duration::from_secs(30),
        threads: 1,
        mip_gap: 0.0,
    });
    let solution = model.solve().expect("S1 is feasible for one bus");
    let plan = decoder::decode_plan(&pool, &network, &config, &index, &solution);

    let ledger = validate_and_finalize(&plan, &mut pool, &network, &config);

    for request_id in [RequestId(1), RequestId(2)] {
        let request = pool.request(request_id);
        assert!(request.is_accepted(), "request {} should be accepted in S1", request_id);
        let outcome = request.outcome().unwrap();
        assert!(outcome.actual_start_time >= request.earliest_start_time());
        assert!(outcome.actual_end_time > outcome.actual_start_time);
    }

    assert!(ledger.km_travelled_total > 0.0);
    assert!(!ledger.km_per_request.is_empty());
}

/// `spec.md` §8 S2: capacity 3, both requests want a group of 2 at
/// overlapping-enough times that only one can be served together with the
/// other; the validator must not choke on the denied request, and the
/// accepted one must still satisfy every window check.
#[test]
fn s2_capacity_binding_denies_one_request_cleanly() {
    let stops = vec![
        Stop::new(StopId(1), Coordinate::new(0.0, 0.0)),
        Stop::new(StopId(2), Coordinate::new(1.0, 0.0)),
        Stop::new(StopId(3), Coordinate::new(2.0, 0.0)),
    ];
    let lines = vec![Line::new(
        LineId(1),
        vec![StopId(1), StopId(2), StopId(3)],
        StopId(1),
        3,
        Time::parse("08:00:00").unwrap(),
        Time::parse("10:00:00").unwrap(),
    )];
    let buses = vec![Bus::new(BusId(1), LineId(1))];
    let network = Network::new(stops, lines, buses);
    let config = PlanningConfig {
        average_kmh: 30.0,
        km_per_unit: 1.0,
        capacity_per_line: Some(3),
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
        Time::parse("08:06:00").unwrap(),
        Time::parse("07:00:00").unwrap(),
    ));

    let mut graph = LineGraph::new(&network, &config);
    preprocessing::preprocess_all(&mut graph, &network, &config, &mut pool);

    let (mut model, index) = build_milp(&pool, &network, &config);
    model.set_parameters(SolverParams {
        time_limit: std::time::Duration::from_secs(30),
        threads: 1,
        mip_gap: 0.0,
    });
    let solution = model.solve().expect("S2 is feasible");
    let plan = decoder::decode_plan(&pool, &network, &config, &index, &solution);

    validate_and_finalize(&plan, &mut pool, &network, &config);

    let accepted = pool.requests().filter(|r| r.is_accepted()).count();
    assert_eq!(accepted, 1, "capacity 3 can't fit two groups of 2 together");
}
