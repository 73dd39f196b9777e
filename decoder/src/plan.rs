use model::base_types::{BusId, SplitId, StopId};
use time::Time;

/// One stop on a decoded bus route (`spec.md` §4.6): a stop id, the
/// decoded arrival/departure instants, and the split-requests boarding or
/// alighting there. Consecutive raw events at the same stop are merged
/// into a single `RouteStop` before this type is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub stop: StopId,
    pub arrival: Time,
    pub departure: Time,
    pub pick_ups: Vec<SplitId>,
    pub drop_offs: Vec<SplitId>,
}

impl RouteStop {
    pub fn is_transfer_point(&self) -> bool {
        !self.pick_ups.is_empty() && !self.drop_offs.is_empty()
    }
}

/// The decoded route of one bus: an ordered sequence of `RouteStop`s
/// starting and ending at its line's depot.
#[derive(Debug, Clone)]
pub struct BusRoute {
    pub bus: BusId,
    pub stops: Vec<RouteStop>,
}

/// Every bus's decoded route, the input to `executor`'s replay/validation
/// pass.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub routes: Vec<BusRoute>,
}
