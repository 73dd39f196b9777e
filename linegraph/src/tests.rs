use model::base_types::{BusId, Coordinate, LineId, StopId};
use model::max_delay::MaxDelayExpr;
use model::network::{Bus, Line, Network, Stop};
use model::{ContextKind, PlanningConfig, SolverKind};
use time::Time;

use crate::LineGraph;

fn test_config() -> PlanningConfig {
    PlanningConfig {
        average_kmh: 30.0,
        km_per_unit: 1.0,
        capacity_per_line: Some(4),
        number_of_extra_transfers: 1,
        max_delay_equation: MaxDelayExpr::parse("x/2").unwrap(),
        transfer_seconds: 120,
        time_window_seconds: 600,
        context: ContextKind::Static,
        solver: SolverKind::EventMilp,
    }
}

/// Two crossing lines sharing stop `X` (the only transfer stop):
/// L1 = [A, X, B], L2 = [C, X, D].
fn two_line_network() -> Network {
    let stops = vec![
        Stop::new(StopId(1), Coordinate::new(0.0, 0.0)),  // A
        Stop::new(StopId(2), Coordinate::new(1.0, 0.0)),   // X
        Stop::new(StopId(3), Coordinate::new(2.0, 0.0)),   // B
        Stop::new(StopId(4), Coordinate::new(1.0, 1.0)),   // C
        Stop::new(StopId(5), Coordinate::new(1.0, -1.0)),  // D
    ];
    let lines = vec![
        Line::new(
            LineId(1),
            vec![StopId(1), StopId(2), StopId(3)],
            StopId(1),
            4,
            Time::parse("08:00:00").unwrap(),
            Time::parse("20:00:00").unwrap(),
        ),
        Line::new(
            LineId(2),
            vec![StopId(4), StopId(2), StopId(5)],
            StopId(4),
            4,
            Time::parse("08:00:00").unwrap(),
            Time::parse("20:00:00").unwrap(),
        ),
    ];
    let buses = vec![Bus::new(BusId(1), LineId(1)), Bus::new(BusId(2), LineId(2))];
    Network::new(stops, lines, buses)
}

fn snapshot(graph: &LineGraph) -> (Vec<crate::LineEdge>, Vec<crate::LineEdge>) {
    let mut out: Vec<_> = [1u32, 2, 3, 4, 5]
        .iter()
        .flat_map(|&id| graph.out_edges(StopId(id)).to_vec())
        .collect();
    let mut inc: Vec<_> = [1u32, 2, 3, 4, 5]
        .iter()
        .flat_map(|&id| graph.in_edges(StopId(id)).to_vec())
        .collect();
    out.sort_by_key(|e| (e.from.0, e.to.0, e.line.0));
    inc.sort_by_key(|e| (e.from.0, e.to.0, e.line.0));
    (out, inc)
}

#[test]
fn base_graph_only_connects_transfer_stops() {
    let network = two_line_network();
    let config = test_config();
    let graph = LineGraph::new(&network, &config);

    // X is the only transfer stop; A, B, C, D are not nodes of the base graph.
    assert!(graph.is_transfer_stop(StopId(2)));
    assert!(!graph.is_transfer_stop(StopId(1)));
    assert!(graph.out_edges(StopId(1)).is_empty());
    assert!(graph.out_edges(StopId(2)).is_empty());
}

#[test]
fn add_request_then_delete_request_restores_graph_exactly() {
    let network = two_line_network();
    let config = test_config();
    let mut graph = LineGraph::new(&network, &config);

    let before = snapshot(&graph);

    graph.add_request(StopId(1), StopId(5));
    assert!(!graph.out_edges(StopId(1)).is_empty());
    assert!(!graph.in_edges(StopId(5)).is_empty());

    graph.delete_request(StopId(1), StopId(5));
    let after = snapshot(&graph);

    assert_eq!(before, after);
    assert!(graph.out_edges(StopId(1)).is_empty());
    assert!(graph.in_edges(StopId(5)).is_empty());
}

#[test]
fn repeated_add_delete_cycles_do_not_accumulate_state() {
    let network = two_line_network();
    let config = test_config();
    let mut graph = LineGraph::new(&network, &config);
    let before = snapshot(&graph);

    for _ in 0..5 {
        graph.add_request(StopId(1), StopId(4));
        graph.add_request(StopId(3), StopId(5));
        graph.delete_request(StopId(3), StopId(5));
        graph.delete_request(StopId(1), StopId(4));
    }

    assert_eq!(before, snapshot(&graph));
}

#[test]
fn add_request_connects_endpoint_to_every_transfer_stop_on_its_line() {
    let network = two_line_network();
    let config = test_config();
    let mut graph = LineGraph::new(&network, &config);

    graph.add_request(StopId(1), StopId(3));
    // A (stop 1) comes before X on line 1: edge A -> X.
    assert!(graph.out_edges(StopId(1)).iter().any(|e| e.to == StopId(2)));
    // B (stop 3) comes after X on line 1: edge X -> B.
    assert!(graph.in_edges(StopId(3)).iter().any(|e| e.from == StopId(2)));
    graph.delete_request(StopId(1), StopId(3));
}
