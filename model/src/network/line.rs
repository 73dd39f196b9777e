use time::Time;

use crate::base_types::{Capacity, LineId, StopId};

/// A line is walked in one of two directions: `Forward` follows
/// `Line::stops()` in order, `Backward` follows it in reverse. A
/// [`crate::request::SplitRequest`]'s direction is `Forward` when its
/// pickup stop precedes its dropoff stop in the line's stop order, else
/// `Backward` (`spec.md` §4.4 "Direction partitioning").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// A bus line: an ordered stop sequence, a depot, a shared capacity and a
/// service window (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    stops: Vec<StopId>,
    depot: StopId,
    capacity: Capacity,
    start_time: Time,
    end_time: Time,
}

impl Line {
    pub fn new(
        id: LineId,
        stops: Vec<StopId>,
        depot: StopId,
        capacity: Capacity,
        start_time: Time,
        end_time: Time,
    ) -> Self {
        Line {
            id,
            stops,
            depot,
            capacity,
            start_time,
            end_time,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn depot(&self) -> StopId {
        self.depot
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn start_time(&self) -> Time {
        self.start_time
    }

    pub fn end_time(&self) -> Time {
        self.end_time
    }

    /// Position of `stop` in the line's forward stop order, if it is on
    /// this line at all.
    pub fn index_of(&self, stop: StopId) -> Option<usize> {
        self.stops.iter().position(|&s| s == stop)
    }

    pub fn contains(&self, stop: StopId) -> bool {
        self.stops.contains(&stop)
    }

    /// `Forward` if `pickup` is visited before `dropoff` on this line,
    /// `Backward` otherwise. Panics if either stop is not on the line: the
    /// caller is expected to have validated both stops belong to this
    /// line's split-request first.
    pub fn direction_of(&self, pickup: StopId, dropoff: StopId) -> Direction {
        let pickup_idx = self.index_of(pickup).expect("pickup stop must be on line");
        let dropoff_idx = self
            .index_of(dropoff)
            .expect("dropoff stop must be on line");
        if pickup_idx < dropoff_idx {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// The line's stops walked in the given direction.
    pub fn stops_in_direction(&self, direction: Direction) -> Vec<StopId> {
        match direction {
            Direction::Forward => self.stops.clone(),
            Direction::Backward => self.stops.iter().rev().copied().collect(),
        }
    }
}
