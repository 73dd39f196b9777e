use model::base_types::{BusId, Coordinate, LineId, StopId};
use model::max_delay::MaxDelayExpr;
use model::network::{Bus, Line, Network, Stop};
use model::{ContextKind, PlanningConfig, SolverKind};
use time::Time;

/// Two crossing lines sharing stop `X` (stop 2), used across unit tests in
/// this crate: L1 = [A(1), X(2), B(3)], L2 = [C(4), X(2), D(5)].
pub fn two_line_network_with_config() -> (Network, PlanningConfig) {
    let stops = vec![
        Stop::new(StopId(1), Coordinate::new(0.0, 0.0)),
        Stop::new(StopId(2), Coordinate::new(1.0, 0.0)),
        Stop::new(StopId(3), Coordinate::new(2.0, 0.0)),
        Stop::new(StopId(4), Coordinate::new(1.0, 1.0)),
        Stop::new(StopId(5), Coordinate::new(1.0, -1.0)),
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
    let network = Network::new(stops, lines, buses);

    let config = PlanningConfig {
        average_kmh: 30.0,
        km_per_unit: 1.0,
        capacity_per_line: Some(4),
        number_of_extra_transfers: 1,
        max_delay_equation: MaxDelayExpr::parse("x/2").unwrap(),
        transfer_seconds: 120,
        time_window_seconds: 600,
        context: ContextKind::Static,
        solver: SolverKind::EventMilp,
    };
    (network, config)
}
