use std::collections::HashMap;

use decoder::{BusRoute, Plan, RouteStop};
use model::base_types::{BusId, RequestId, SplitId, StopId};
use model::request::RequestOutcome;
use model::{Network, PlanningConfig, RequestPool};
use time::Time;

/// Slack added to the max-ride-time check to absorb the rounding a MIP
/// solver's continuous `B` values and this crate's `round()`-based
/// seconds conversions introduce (`spec.md` §4.7 "+ ε").
const MAX_RIDE_EPSILON_SECONDS: i64 = 1;

/// One split's lifecycle as the bus routes are replayed. A split is
/// created `Unboarded`, becomes `OnBoard` the moment its bus's decoded
/// pickup event fires, and `Delivered` the moment its drop-off fires. Any
/// other transition (double pickup, drop-off before pickup, a split never
/// reaching `Delivered`) is a bug in the upstream solver/decoder and is a
/// fatal `assert!`, per `spec.md` §7's "plan validation" taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitLifecycle {
    Unboarded,
    OnBoard { bus: BusId },
    Delivered { bus: BusId, at: Time },
}

/// One accounting record kept per split while replaying its bus route,
/// used both for the per-request final checks and for the distance KPIs
/// of `SPEC_FULL.md` §17.
struct SplitRecord {
    board_time: Option<Time>,
    deliver_time: Option<Time>,
    deliver_stop: Option<StopId>,
}

/// Distance accounting accumulated while replaying every bus's route,
/// the raw material `report::build_report` turns into the KPI lines.
#[derive(Debug, Default)]
pub struct DistanceLedger {
    pub km_travelled_total: f64,
    pub km_empty_total: f64,
    pub km_per_request: HashMap<RequestId, f64>,
}

/// Replays every bus's decoded route (`spec.md` §4.7), checks every
/// invariant, records each accepted request's `actual_start_time`/
/// `actual_end_time` into `pool`, and returns the distance ledger used for
/// the KPI report. Panics on any invariant breach: a decoded plan that
/// fails here is a solver/decoder bug, not bad input (`spec.md` §7).
pub fn validate_and_finalize(plan: &Plan, pool: &mut RequestPool, network: &Network, config: &PlanningConfig) -> DistanceLedger {
    let mut records: HashMap<SplitId, SplitRecord> = pool
        .splits()
        .map(|s| {
            (
                s.split_id(),
                SplitRecord {
                    board_time: None,
                    deliver_time: None,
                    deliver_stop: None,
                },
            )
        })
        .collect();

    let mut ledger = DistanceLedger::default();

    for route in &plan.routes {
        replay_bus_route(route, pool, network, config, &mut records, &mut ledger);
    }

    for request_id in pool.request_ids_in_order().collect::<Vec<_>>() {
        finalize_request(request_id, pool, &records);
    }

    ledger
}

/// Replays one bus's ordered `RouteStop`s (`spec.md` §4.7): at each stop,
/// first processes drop-offs, then pick-ups (same ordering as the
/// event-graph local sweep, `spec.md` §4.4), checks the inter-stop
/// travel-time invariant, and accumulates distance for the KPI ledger.
fn replay_bus_route(
    route: &BusRoute,
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
    records: &mut HashMap<SplitId, SplitRecord>,
    ledger: &mut DistanceLedger,
) {
    let mut onboard: Vec<SplitId> = Vec::new();

    for window in route.stops.windows(2) {
        let (prev, next) = (&window[0], &window[1]);
        check_segment_travel_time(prev, next, network, config);

        let km = network.distance_km(prev.stop, next.stop, config.km_per_unit);
        ledger.km_travelled_total += km;
        if onboard.is_empty() {
            ledger.km_empty_total += km;
        } else {
            for &split in &onboard {
                let request = pool.split(split).parent();
                *ledger.km_per_request.entry(request).or_insert(0.0) += km;
            }
        }

        apply_stop(next, route.bus, pool, records, &mut onboard);
    }

    // A bus with a single `RouteStop` (never left idle) still needs its
    // (empty) stop processed so double-pickup bookkeeping stays correct
    // for buses that serve nothing.
    if route.stops.len() == 1 {
        apply_stop(&route.stops[0], route.bus, pool, records, &mut onboard);
    }

    assert!(
        onboard.is_empty(),
        "bus {} ended its route with split(s) {:?} still on board: unbalanced pickup/drop-off flow",
        route.bus,
        onboard
    );
}

/// `spec.md` §4.7 "per-segment check": the straight-line travel time
/// between two consecutive stops must fit within the decoded dwell.
fn check_segment_travel_time(prev: &RouteStop, next: &RouteStop, network: &Network, config: &PlanningConfig) {
    let travel_time = config.dist_to_time(network.distance_km(prev.stop, next.stop, config.km_per_unit)) as i64;
    let available = next.arrival.delta_seconds(prev.departure);
    assert!(
        travel_time <= available,
        "segment {} -> {} needs {}s but only {}s elapsed between departure {} and arrival {}",
        prev.stop,
        next.stop,
        travel_time,
        available,
        prev.departure,
        next.arrival
    );
}

/// Applies one `RouteStop`'s drop-offs then pick-ups to the running
/// `onboard` set and per-split lifecycle records.
fn apply_stop(
    stop: &RouteStop,
    bus: BusId,
    pool: &RequestPool,
    records: &mut HashMap<SplitId, SplitRecord>,
    onboard: &mut Vec<SplitId>,
) {
    for &split in &stop.drop_offs {
        let position = onboard
            .iter()
            .position(|&s| s == split)
            .unwrap_or_else(|| panic!("split {} dropped off on bus {} without having boarded it", split, bus));
        onboard.remove(position);

        let record = records.get_mut(&split).expect("split must be preprocessed before decoding");
        record.deliver_time = Some(stop.departure);
        record.deliver_stop = Some(stop.stop);
        let _ = pool; // split lookups below use `pool` only for parent/pickup/dropoff stops
    }

    for &split in &stop.pick_ups {
        let record = records.get_mut(&split).expect("split must be preprocessed before decoding");
        assert!(
            record.board_time.is_none(),
            "split {} picked up more than once (on bus {})",
            split,
            bus
        );
        record.board_time = Some(stop.departure);
        onboard.push(split);
    }
}

/// Chains a request's legs into the order they actually ran (by boarding
/// time), checks continuity between legs, records `actual_start_time`/
/// `actual_end_time`, and checks the request-level window and max-ride-
/// time invariants (`spec.md` §4.7 "per-request final checks").
fn finalize_request(request_id: RequestId, pool: &mut RequestPool, records: &HashMap<SplitId, SplitRecord>) {
    let request = pool.request(request_id);
    let Some(preprocessing) = request.preprocessing() else {
        return;
    };

    let mut legs: Vec<SplitId> = preprocessing
        .route_options
        .iter()
        .flat_map(|option| option.legs.iter().copied())
        .collect();
    legs.sort_unstable_by_key(|s| s.0);
    legs.dedup();

    let mut ridden: Vec<(SplitId, Time, Time, StopId)> = legs
        .into_iter()
        .filter_map(|split_id| {
            let record = &records[&split_id];
            match (record.board_time, record.deliver_time, record.deliver_stop) {
                (Some(board), Some(deliver), Some(stop)) => Some((split_id, board, deliver, stop)),
                _ => None,
            }
        })
        .collect();

    if ridden.is_empty() {
        // No leg of any route option was ever boarded: correctly denied.
        return;
    }

    ridden.sort_by_key(|&(_, board, ..)| board);

    for pair in ridden.windows(2) {
        let (first_split, _, first_deliver, first_stop) = pair[0];
        let (second_split, second_board, ..) = pair[1];
        assert!(
            pool.split(second_split).pickup() == first_stop,
            "request {} transfers from split {} (dropped at {}) to split {} (boards at {}): stops don't line up",
            request_id,
            first_split,
            first_stop,
            second_split,
            pool.split(second_split).pickup()
        );
        assert!(
            second_board.delta_seconds(first_deliver) >= 0,
            "request {} boards split {} at {} before split {} delivers it at {}",
            request_id,
            second_split,
            second_board,
            first_split,
            first_deliver
        );
    }

    let (first_split, actual_start, ..) = ridden[0];
    let (last_split, _, actual_end, last_stop) = *ridden.last().unwrap();

    assert!(
        pool.split(first_split).pickup() == request.pickup(),
        "request {}'s first ridden leg does not start at its own pickup stop",
        request_id
    );
    assert!(
        last_stop == request.dropoff(),
        "request {}'s last ridden leg does not end at its own dropoff stop",
        request_id
    );

    let earliest_start = request.earliest_start_time();
    let latest_start = preprocessing.latest_start_time;
    let earliest_arrival = preprocessing.earliest_arrival_time;
    let latest_arrival = preprocessing.latest_arrival_time;

    assert!(
        actual_start >= earliest_start && actual_start <= latest_start,
        "request {} picked up at {}, outside window [{}, {}]",
        request_id,
        actual_start,
        earliest_start,
        latest_start
    );
    assert!(
        actual_end >= earliest_arrival && actual_end <= latest_arrival,
        "request {} delivered at {}, outside window [{}, {}]",
        request_id,
        actual_end,
        earliest_arrival,
        latest_arrival
    );

    let max_ride = latest_arrival.delta_seconds(latest_start);
    let actual_ride = actual_end.delta_seconds(actual_start);
    assert!(
        actual_ride <= max_ride + MAX_RIDE_EPSILON_SECONDS,
        "request {} rode for {}s, exceeding the {}s max ride time",
        request_id,
        actual_ride,
        max_ride
    );

    pool.request_mut(request_id).set_outcome(RequestOutcome {
        actual_start_time: actual_start,
        actual_end_time: actual_end,
    });
}
