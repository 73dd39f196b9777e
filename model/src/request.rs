use time::Time;

use crate::base_types::{LineId, PassengerCount, RequestId, SplitId, StopId};

/// One leg of one route option of one request: a unique split id, the
/// parent request, pickup/dropoff stop, the line ridden, and a time window
/// tightened for this leg (`spec.md` §3, §4.3). Built during preprocessing;
/// immutable once preprocessing for its parent request has finished.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    split_id: SplitId,
    parent: RequestId,
    pickup: StopId,
    dropoff: StopId,
    line: LineId,
    passengers: PassengerCount,
    window: SplitWindow,
}

/// The four time points referenced throughout the event-graph sweeps
/// (`spec.md` §4.4): earliest/latest departure at the pickup stop and
/// earliest/latest arrival at the dropoff stop, tightened per
/// `spec.md` §4.3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitWindow {
    pub earliest_start: Time,
    pub latest_start: Time,
    pub earliest_arrival: Time,
    pub latest_arrival: Time,
}

impl SplitRequest {
    pub fn new(
        split_id: SplitId,
        parent: RequestId,
        pickup: StopId,
        dropoff: StopId,
        line: LineId,
        passengers: PassengerCount,
        window: SplitWindow,
    ) -> Self {
        SplitRequest {
            split_id,
            parent,
            pickup,
            dropoff,
            line,
            passengers,
            window,
        }
    }

    pub fn split_id(&self) -> SplitId {
        self.split_id
    }

    pub fn parent(&self) -> RequestId {
        self.parent
    }

    pub fn pickup(&self) -> StopId {
        self.pickup
    }

    pub fn dropoff(&self) -> StopId {
        self.dropoff
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn passengers(&self) -> PassengerCount {
        self.passengers
    }

    pub fn window(&self) -> SplitWindow {
        self.window
    }

    /// Widens this leg's window to the union of two tightenings computed
    /// for it via two different route options (`spec.md` §4.3: "when
    /// multiple options share a SplitRequest identity, widen").
    pub fn widen(&mut self, other: SplitWindow) {
        self.window.earliest_start = self.window.earliest_start.min(other.earliest_start);
        self.window.latest_start = self.window.latest_start.max(other.latest_start);
        self.window.earliest_arrival = self.window.earliest_arrival.min(other.earliest_arrival);
        self.window.latest_arrival = self.window.latest_arrival.max(other.latest_arrival);
    }
}

/// An ordered list of split-request ids whose concatenation moves one
/// passenger from pickup to dropoff, zero or more transfers (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct RouteOption {
    pub legs: Vec<SplitId>,
}

impl RouteOption {
    pub fn new(legs: Vec<SplitId>) -> Self {
        assert!(!legs.is_empty(), "a route option must have at least one leg");
        RouteOption { legs }
    }

    pub fn first(&self) -> SplitId {
        self.legs[0]
    }

    pub fn last(&self) -> SplitId {
        *self.legs.last().unwrap()
    }
}

/// Output of preprocessing for one request (`spec.md` §4.3): the fastest
/// achievable time and transfer count, the derived time windows, and every
/// feasible route option.
#[derive(Debug, Clone)]
pub struct PreprocessedRequest {
    pub fastest_time_seconds: u32,
    pub numb_transfer: u32,
    pub latest_start_time: Time,
    pub earliest_arrival_time: Time,
    pub latest_arrival_time: Time,
    pub max_travel_time_seconds: u32,
    pub route_options: Vec<RouteOption>,
}

/// The actual pickup/dropoff instants recorded by the executor for an
/// accepted request. Absence (the request stays `None`) means denied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestOutcome {
    pub actual_start_time: Time,
    pub actual_end_time: Time,
}

/// A passenger transportation request (`spec.md` §3). Created during
/// ingestion with only the raw fields populated; `preprocessing` is filled
/// in by the preprocessing phase, `outcome` by the executor.
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    passengers: PassengerCount,
    pickup: StopId,
    dropoff: StopId,
    earliest_start_time: Time,
    register_time: Time,
    preprocessing: Option<PreprocessedRequest>,
    outcome: Option<RequestOutcome>,
}

impl Request {
    pub fn new(
        id: RequestId,
        passengers: PassengerCount,
        pickup: StopId,
        dropoff: StopId,
        earliest_start_time: Time,
        register_time: Time,
    ) -> Self {
        Request {
            id,
            passengers,
            pickup,
            dropoff,
            earliest_start_time,
            register_time,
            preprocessing: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn passengers(&self) -> PassengerCount {
        self.passengers
    }

    pub fn pickup(&self) -> StopId {
        self.pickup
    }

    pub fn dropoff(&self) -> StopId {
        self.dropoff
    }

    pub fn earliest_start_time(&self) -> Time {
        self.earliest_start_time
    }

    pub fn register_time(&self) -> Time {
        self.register_time
    }

    pub fn preprocessing(&self) -> Option<&PreprocessedRequest> {
        self.preprocessing.as_ref()
    }

    pub fn set_preprocessing(&mut self, preprocessing: PreprocessedRequest) {
        self.preprocessing = Some(preprocessing);
    }

    /// A request with no feasible path has no route options at all; it is
    /// denied before the MIP is even built (`SPEC_FULL.md` §11's
    /// deny-and-continue resolution of the source's infeasibility assert).
    pub fn is_feasible(&self) -> bool {
        self.preprocessing
            .as_ref()
            .is_some_and(|p| !p.route_options.is_empty())
    }

    pub fn outcome(&self) -> Option<RequestOutcome> {
        self.outcome
    }

    pub fn set_outcome(&mut self, outcome: RequestOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome.is_some()
    }
}
