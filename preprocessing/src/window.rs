use model::request::SplitWindow;
use model::{Network, PlanningConfig};
use time::Time;

use linegraph::LineEdge;

/// Per-leg time windows for one route option (`spec.md` §4.3 "Time-window
/// tightening"). Returns `None` if tightening produces an infeasible
/// window (`earliest > latest`) on any leg — the whole option is then
/// discarded by the caller rather than half-registered.
pub fn tighten_option_windows(
    network: &Network,
    config: &PlanningConfig,
    legs: &[LineEdge],
    request_earliest_start: Time,
    request_latest_arrival: Time,
) -> Option<Vec<SplitWindow>> {
    let total_distance_km: f64 = legs
        .iter()
        .map(|leg| network.distance_km(leg.from, leg.to, config.km_per_unit))
        .sum();
    let shortest_time =
        config.dist_to_time(total_distance_km) as i64 + (legs.len() as i64) * config.transfer_seconds as i64;

    let request_latest_start = request_earliest_start.add_seconds(config.time_window_seconds);

    let mut windows = Vec::with_capacity(legs.len());
    let mut cum: i64 = 0;

    for (i, leg) in legs.iter().enumerate() {
        let segment_time = leg.duration as i64;
        let transfer_seconds = config.transfer_seconds as i64;

        let earliest_start = if i == 0 {
            request_earliest_start
        } else {
            shift(request_earliest_start, cum)?
        };
        let earliest_arrival = shift(earliest_start, segment_time + transfer_seconds)?;
        let cum_including_segment = cum + segment_time + transfer_seconds;

        let latest_arrival = shift(
            request_latest_arrival,
            -(shortest_time - cum_including_segment),
        )?;
        let latest_start = if i == 0 {
            request_latest_start
        } else {
            shift(latest_arrival, -(segment_time + transfer_seconds))?
        };

        if earliest_start > latest_start || earliest_arrival > latest_arrival {
            return None;
        }

        windows.push(SplitWindow {
            earliest_start,
            latest_start,
            earliest_arrival,
            latest_arrival,
        });
        cum = cum_including_segment;
    }

    Some(windows)
}

fn shift(time: Time, delta_seconds: i64) -> Option<Time> {
    let result = time.seconds() as i64 + delta_seconds;
    if result < 0 {
        None
    } else {
        Some(Time::from_seconds(result as u32))
    }
}

