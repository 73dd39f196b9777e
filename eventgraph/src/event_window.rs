use std::collections::{BTreeMap, BTreeSet};

use model::base_types::SplitId;
use model::network::line::{Direction, Line};
use model::{Network, PlanningConfig, RequestPool};
use time::Time;

/// `event_window` from `spec.md` §4.4: the shared `[earliest, latest]`
/// window during which the bus may perform `anchor`'s action (pickup if
/// `is_pickup`, else dropoff) with exactly `other_legs` aboard alongside
/// it. Returns `None` if no such window exists.
///
/// Implementation note (see `DESIGN.md`): the source's prose describes a
/// single forward sweep that (a) walks every stop at/before the anchor
/// where some leg boards, raising a running `current` time and failing if
/// it ever exceeds a `latest_start`, then (b) walks every stop at/after
/// the anchor where some (other) leg alights, discounting each one's
/// `latest_arrival` back to the anchor's own time reference. This is that
/// sweep, restructured around two per-stop-index maps (`board_at`,
/// `alight_at`) built once from `other_legs` plus the anchor itself,
/// rather than the three ad-hoc "portions" of the prose. Both walks only
/// ever step from one candidate stop (a key of `board_at`/`alight_at`) to
/// the next candidate stop, taking the direct distance between them —
/// never summing segment distances across intervening stops the sweep
/// never touches, matching the original's `calc_distance(curr_stop, key)`
/// jump between successive candidate stops.
pub fn event_window(
    pool: &RequestPool,
    network: &Network,
    config: &PlanningConfig,
    line: &Line,
    direction: Direction,
    anchor: SplitId,
    is_pickup: bool,
    other_legs: &BTreeSet<SplitId>,
) -> Option<(Time, Time)> {
    let stops = line.stops_in_direction(direction);
    let index_of = |stop_id| stops.iter().position(|&s| s == stop_id);

    let anchor_stop = if is_pickup {
        pool.split(anchor).pickup()
    } else {
        pool.split(anchor).dropoff()
    };
    let anchor_idx = index_of(anchor_stop)?;

    let travel_seconds = |a_idx: usize, b_idx: usize| -> u32 {
        let km = network.distance_km(stops[a_idx], stops[b_idx], config.km_per_unit);
        config.dist_to_time(km)
    };

    let mut board_at: BTreeMap<usize, Vec<SplitId>> = BTreeMap::new();
    let mut alight_at: BTreeMap<usize, Vec<SplitId>> = BTreeMap::new();
    for &leg in other_legs {
        let split = pool.split(leg);
        let p_idx = index_of(split.pickup())?;
        let d_idx = index_of(split.dropoff())?;
        if p_idx <= anchor_idx {
            board_at.entry(p_idx).or_default().push(leg);
        }
        if d_idx >= anchor_idx {
            alight_at.entry(d_idx).or_default().push(leg);
        }
    }
    if is_pickup {
        board_at.entry(anchor_idx).or_default().push(anchor);
    } else {
        alight_at.entry(anchor_idx).or_default().push(anchor);
    }

    // Forward walk through each candidate stop where some leg boards, up
    // to (and including) the anchor stop — direct distance between
    // successive candidate stops, skipping any intervening stop no leg
    // ever boards or alights at.
    let mut current = Time::from_seconds(0);
    let mut prev_idx: Option<usize> = None;
    for idx in board_at.keys().copied().collect::<Vec<_>>() {
        if let Some(p) = prev_idx {
            current = current.add_seconds(travel_seconds(p, idx));
        }
        let legs = board_at.get(&idx).expect("idx came from board_at.keys()");
        let max_earliest = legs
            .iter()
            .map(|&l| pool.split(l).window().earliest_start)
            .max()
            .expect("non-empty board group");
        current = current.max(max_earliest);
        let min_latest = legs
            .iter()
            .map(|&l| pool.split(l).window().latest_start)
            .min()
            .expect("non-empty board group");
        if current > min_latest {
            return None;
        }
        current = current.add_seconds(config.transfer_seconds);
        prev_idx = Some(idx);
    }

    let (earliest, mut latest_bound) = if is_pickup {
        let earliest = current
            .checked_sub_seconds(config.transfer_seconds)
            .unwrap_or(current);
        let group = board_at.get(&anchor_idx).expect("anchor boards at anchor_idx");
        let latest = group
            .iter()
            .map(|&l| pool.split(l).window().latest_start)
            .min()
            .expect("non-empty board group");
        (earliest, latest)
    } else {
        let group = alight_at.get(&anchor_idx).expect("anchor alights at anchor_idx");
        let latest = group
            .iter()
            .map(|&l| pool.split(l).window().latest_arrival)
            .min()
            .expect("non-empty alight group");
        (current, latest)
    };

    if earliest > latest_bound {
        return None;
    }

    // Forward walk past the anchor stop, through every stop where some
    // other (still-aboard) leg alights, discounting its latest_arrival
    // back to the anchor's own time reference.
    let mut current_time = earliest;
    let mut rem_acc: u32 = 0;
    let mut prev_idx = anchor_idx;
    let remaining_alight_stops: Vec<usize> = alight_at.keys().copied().filter(|&idx| idx > anchor_idx).collect();
    for idx in remaining_alight_stops {
        let travel = travel_seconds(prev_idx, idx);
        current_time = current_time.add_seconds(travel);
        rem_acc += travel;
        for &leg in alight_at.get(&idx).expect("key came from alight_at") {
            let window = pool.split(leg).window();
            if current_time > window.latest_arrival {
                return None;
            }
            let discounted = window
                .latest_arrival
                .checked_sub_seconds(rem_acc + config.transfer_seconds)
                .unwrap_or(Time::from_seconds(0));
            latest_bound = latest_bound.min(discounted);
        }
        rem_acc += config.transfer_seconds;
        current_time = current_time.add_seconds(config.transfer_seconds);
        prev_idx = idx;
    }

    if earliest > latest_bound {
        return None;
    }

    Some((earliest, latest_bound))
}
