use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use model::base_types::{LineId, SplitId, StopId};
use model::{Network, RequestPool};
use time::Time;

/// Which action a split-request performs at an event: boarding or
/// alighting (`spec.md` §3's `PickUpEvent`/`DropOffEvent`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PickUp,
    DropOff,
}

/// The identity-bearing part of an [`Event`]: `spec.md` §3 defines an
/// event's identity as `(variant, first, remaining, location, line)`.
/// Kept separate from the time window so `Event`'s `Eq`/`Hash` can ignore
/// the window (two events with the same identity always have the same
/// window, since both are derived from `event_window`, but identity is
/// what the spec's hashing/bucketing keys off of).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Idle { line: LineId },
    PickUp {
        first: SplitId,
        remaining: BTreeSet<SplitId>,
        location: StopId,
        line: LineId,
    },
    DropOff {
        first: SplitId,
        remaining: BTreeSet<SplitId>,
        location: StopId,
        line: LineId,
    },
}

/// One node of the [`crate::EventGraph`] (`spec.md` §3 "Event").
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub earliest: Time,
    pub latest: Time,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}
impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl Event {
    pub fn idle(line: LineId, earliest: Time, latest: Time) -> Self {
        Event {
            kind: EventKind::Idle { line },
            earliest,
            latest,
        }
    }

    pub fn pick_up(
        first: SplitId,
        remaining: BTreeSet<SplitId>,
        location: StopId,
        line: LineId,
        earliest: Time,
        latest: Time,
    ) -> Self {
        Event {
            kind: EventKind::PickUp {
                first,
                remaining,
                location,
                line,
            },
            earliest,
            latest,
        }
    }

    pub fn drop_off(
        first: SplitId,
        remaining: BTreeSet<SplitId>,
        location: StopId,
        line: LineId,
        earliest: Time,
        latest: Time,
    ) -> Self {
        Event {
            kind: EventKind::DropOff {
                first,
                remaining,
                location,
                line,
            },
            earliest,
            latest,
        }
    }

    pub fn line(&self) -> LineId {
        match &self.kind {
            EventKind::Idle { line } => *line,
            EventKind::PickUp { line, .. } => *line,
            EventKind::DropOff { line, .. } => *line,
        }
    }

    pub fn time_window(&self) -> (Time, Time) {
        (self.earliest, self.latest)
    }

    pub fn location(&self, pool: &RequestPool, network: &Network) -> StopId {
        match &self.kind {
            EventKind::Idle { line } => network
                .line(*line)
                .expect("event's line must exist")
                .depot(),
            EventKind::PickUp { first, .. } => pool.split(*first).pickup(),
            EventKind::DropOff { first, .. } => pool.split(*first).dropoff(),
        }
    }

    /// The set of in-vehicle legs immediately before this event
    /// (`spec.md` §3 "In-vehicle set").
    pub fn before_set(&self) -> BTreeSet<SplitId> {
        match &self.kind {
            EventKind::Idle { .. } => BTreeSet::new(),
            EventKind::PickUp { remaining, .. } => remaining.clone(),
            EventKind::DropOff { first, remaining, .. } => {
                let mut set = remaining.clone();
                set.insert(*first);
                set
            }
        }
    }

    /// The set of in-vehicle legs immediately after this event.
    pub fn after_set(&self) -> BTreeSet<SplitId> {
        match &self.kind {
            EventKind::Idle { .. } => BTreeSet::new(),
            EventKind::PickUp { first, remaining, .. } => {
                let mut set = remaining.clone();
                set.insert(*first);
                set
            }
            EventKind::DropOff { remaining, .. } => remaining.clone(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.kind, EventKind::Idle { .. })
    }

    /// The anchor split-request and its action, for non-idle events.
    pub fn anchor(&self) -> Option<(SplitId, Action)> {
        match &self.kind {
            EventKind::Idle { .. } => None,
            EventKind::PickUp { first, .. } => Some((*first, Action::PickUp)),
            EventKind::DropOff { first, .. } => Some((*first, Action::DropOff)),
        }
    }
}
