//! Request preprocessing (`spec.md` §4.3): for each request, the fastest
//! line-graph path and transfer count, the set of feasible multi-leg route
//! options, and time windows tightened per leg.

pub mod fastest_path;
pub mod route_options;
pub mod window;

#[cfg(test)]
mod test_support;

use linegraph::LineGraph;
use model::base_types::RequestId;
use model::request::PreprocessedRequest;
use model::{Network, PlanningConfig, RequestPool};

pub use fastest_path::{fastest_path, FastestPath};
pub use route_options::enumerate_route_options;

/// Preprocesses a single request: augments the line graph with its
/// pickup/dropoff, runs the fastest-path search, evaluates `max_delay`,
/// enumerates route options, and restores the line graph exactly
/// (`spec.md` §4.2's add/delete contract). Always leaves `graph` the way
/// it found it, even when the request turns out infeasible.
///
/// A request whose pickup cannot reach its dropoff gets an empty
/// `route_options` list rather than aborting the run — the deny-and-
/// continue resolution of `spec.md` §9's Open Question, recorded in
/// `DESIGN.md`.
pub fn preprocess_request(
    graph: &mut LineGraph,
    network: &Network,
    config: &PlanningConfig,
    pool: &mut RequestPool,
    request_id: RequestId,
) {
    let (pickup, dropoff, passengers, earliest_start_time) = {
        let request = pool.request(request_id);
        (
            request.pickup(),
            request.dropoff(),
            request.passengers(),
            request.earliest_start_time(),
        )
    };

    graph.add_request(pickup, dropoff);

    let preprocessed = match fastest_path::fastest_path(graph, pickup, dropoff, passengers, config.transfer_seconds)
    {
        None => PreprocessedRequest {
            fastest_time_seconds: 0,
            numb_transfer: 0,
            latest_start_time: earliest_start_time.add_seconds(config.time_window_seconds),
            earliest_arrival_time: earliest_start_time,
            latest_arrival_time: earliest_start_time,
            max_travel_time_seconds: 0,
            route_options: Vec::new(),
        },
        Some(fastest) => {
            let fastest_minutes = fastest.seconds as f64 / 60.0;
            let max_delay_minutes = config.max_delay_equation.eval(fastest_minutes);
            let max_delay_seconds = (max_delay_minutes * 60.0).round() as i64;

            let latest_start_time = earliest_start_time.add_seconds(config.time_window_seconds);
            let earliest_arrival_time = earliest_start_time.add_seconds(fastest.seconds);
            let latest_arrival_seconds =
                earliest_arrival_time.seconds() as i64 + max_delay_seconds.max(0);
            let latest_arrival_time = time::Time::from_seconds(latest_arrival_seconds.max(0) as u32);

            let max_travel_time_seconds =
                latest_arrival_time.delta_seconds(latest_start_time).max(0) as u32;

            let route_options = if max_travel_time_seconds == 0 {
                Vec::new()
            } else {
                enumerate_route_options(
                    graph,
                    network,
                    config,
                    pool,
                    request_id,
                    pickup,
                    dropoff,
                    passengers,
                    earliest_start_time,
                    latest_arrival_time,
                    fastest.transfers,
                    max_travel_time_seconds,
                )
            };

            PreprocessedRequest {
                fastest_time_seconds: fastest.seconds,
                numb_transfer: fastest.transfers,
                latest_start_time,
                earliest_arrival_time,
                latest_arrival_time,
                max_travel_time_seconds,
                route_options,
            }
        }
    };

    pool.request_mut(request_id).set_preprocessing(preprocessed);
    graph.delete_request(pickup, dropoff);
}

/// Preprocesses every request currently in `pool`, in insertion order
/// (`spec.md` §5: deterministic, insertion-ordered iteration).
pub fn preprocess_all(
    graph: &mut LineGraph,
    network: &Network,
    config: &PlanningConfig,
    pool: &mut RequestPool,
) {
    let ids: Vec<RequestId> = pool.request_ids_in_order().collect();
    for id in ids {
        preprocess_request(graph, network, config, pool, id);
    }
}
