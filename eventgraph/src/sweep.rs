use std::collections::{BTreeSet, HashMap};

use model::base_types::SplitId;
use model::network::line::{Direction, Line};
use model::RequestPool;

use crate::event::Action;

type PartnerMap = HashMap<(SplitId, Action), BTreeSet<SplitId>>;

/// Spatial sweep along a line's stops in `direction` order (`spec.md` §4.4
/// "Local sweep"): at each stop, legs dropped there become partners of
/// everything still aboard, and of each other — but only one way: between
/// two legs dropped at the same stop, only the one with the later
/// `latest_arrival` registers the other as a partner, breaking the
/// symmetric tie the spec calls out. Pickups are handled the same way
/// afterwards, keyed on `latest_start`.
pub fn local_sweep(pool: &RequestPool, line: &Line, direction: Direction, legs: &[SplitId]) -> PartnerMap {
    let mut status: BTreeSet<SplitId> = BTreeSet::new();
    let mut partners: PartnerMap = HashMap::new();

    for stop in line.stops_in_direction(direction) {
        let dropped: Vec<SplitId> = legs
            .iter()
            .copied()
            .filter(|&s| status.contains(&s) && pool.split(s).dropoff() == stop)
            .collect();
        if !dropped.is_empty() {
            let before = status.clone();
            let continuing: BTreeSet<SplitId> = before.iter().copied().filter(|s| !dropped.contains(s)).collect();
            for &s in &dropped {
                let mut set = continuing.clone();
                let s_latest = pool.split(s).window().latest_arrival;
                for &other in &dropped {
                    if other == s {
                        continue;
                    }
                    if pool.split(other).window().latest_arrival <= s_latest {
                        set.insert(other);
                    }
                }
                partners.insert((s, Action::DropOff), set);
            }
            for &s in &dropped {
                status.remove(&s);
            }
        }

        let picked: Vec<SplitId> = legs
            .iter()
            .copied()
            .filter(|&s| pool.split(s).pickup() == stop)
            .collect();
        if !picked.is_empty() {
            let before_add = status.clone();
            for &s in &picked {
                let mut set = before_add.clone();
                let s_latest = pool.split(s).window().latest_start;
                for &other in &picked {
                    if other == s {
                        continue;
                    }
                    if pool.split(other).window().latest_start <= s_latest {
                        set.insert(other);
                    }
                }
                partners.insert((s, Action::PickUp), set);
            }
            for &s in &picked {
                status.insert(s);
            }
        }
    }

    partners
}

/// Temporal sweep over the distinct time instants of every leg's window
/// (`spec.md` §4.4 "Temporal sweep"). Opening and closing are processed
/// with a before-snapshot of the open sets so that legs whose windows
/// happen to coincide at the same instant never register themselves as
/// their own partner.
pub fn temporal_sweep(pool: &RequestPool, legs: &[SplitId]) -> PartnerMap {
    let mut instants: BTreeSet<time::Time> = BTreeSet::new();
    for &s in legs {
        let w = pool.split(s).window();
        instants.insert(w.earliest_start);
        instants.insert(w.latest_start);
        instants.insert(w.earliest_arrival);
        instants.insert(w.latest_arrival);
    }

    let mut open_pickup: BTreeSet<SplitId> = BTreeSet::new();
    let mut open_dropoff: BTreeSet<SplitId> = BTreeSet::new();
    let mut union_set: BTreeSet<SplitId> = BTreeSet::new();
    let mut partners: PartnerMap = HashMap::new();

    for t in instants {
        let opening_pickup: Vec<SplitId> = legs
            .iter()
            .copied()
            .filter(|&s| pool.split(s).window().earliest_start == t)
            .collect();
        let opening_dropoff: Vec<SplitId> = legs
            .iter()
            .copied()
            .filter(|&s| pool.split(s).window().earliest_arrival == t)
            .collect();

        let union_before = union_set.clone();
        let open_pickup_before = open_pickup.clone();
        let open_dropoff_before = open_dropoff.clone();

        for &s in &opening_pickup {
            partners
                .entry((s, Action::PickUp))
                .or_default()
                .extend(union_before.iter().copied().filter(|&other| other != s));
        }
        for &s in &opening_dropoff {
            partners
                .entry((s, Action::DropOff))
                .or_default()
                .extend(union_before.iter().copied().filter(|&other| other != s));
        }
        for &s in &opening_pickup {
            for &other in open_dropoff_before.iter().filter(|&&other| other != s) {
                partners.entry((other, Action::DropOff)).or_default().insert(s);
            }
        }
        for &s in &opening_dropoff {
            for &other in open_pickup_before.iter().filter(|&&other| other != s) {
                partners.entry((other, Action::PickUp)).or_default().insert(s);
            }
        }

        for &s in &opening_pickup {
            union_set.insert(s);
            open_pickup.insert(s);
        }
        for &s in &opening_dropoff {
            union_set.insert(s);
            open_dropoff.insert(s);
        }

        for &s in legs {
            let w = pool.split(s).window();
            if w.latest_start == t {
                open_pickup.remove(&s);
            }
            if w.latest_arrival == t {
                open_dropoff.remove(&s);
                union_set.remove(&s);
            }
        }
    }

    partners
}

/// Intersection of the local and temporal partner sets per leg/action —
/// "the fundamental speed" of `spec.md` §4.4: spatial pruning rejects
/// partners that can never share the vehicle, temporal pruning rejects
/// partners whose windows never overlap.
pub fn candidate_partners(
    pool: &RequestPool,
    line: &Line,
    direction: Direction,
    legs: &[SplitId],
) -> PartnerMap {
    let local = local_sweep(pool, line, direction, legs);
    let temporal = temporal_sweep(pool, legs);

    let mut result: PartnerMap = HashMap::new();
    for (key, local_set) in &local {
        if let Some(temporal_set) = temporal.get(key) {
            let intersection: BTreeSet<SplitId> = local_set.intersection(temporal_set).copied().collect();
            result.insert(*key, intersection);
        }
    }
    result
}
