use std::time::Duration as WallDuration;

use crate::base_types::Capacity;
use crate::errors::ModelError;
use crate::max_delay::MaxDelayExpr;

/// Which context driver orders the time-keyed batches of new requests
/// (`spec.md` §5). Only `Static` is implemented; see
/// `runner::DynamicContext` for the documented extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Static,
}

impl ContextKind {
    pub fn parse(value: &str) -> Result<ContextKind, ModelError> {
        match value {
            "static" => Ok(ContextKind::Static),
            other => Err(ModelError::UnknownContext(other.to_string())),
        }
    }
}

/// Which planner builds and solves the event-graph MIP. Only `EventMilp` is
/// implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    EventMilp,
}

impl SolverKind {
    pub fn parse(value: &str) -> Result<SolverKind, ModelError> {
        match value {
            "eventMILP" => Ok(SolverKind::EventMilp),
            other => Err(ModelError::UnknownSolver(other.to_string())),
        }
    }
}

/// Immutable, process-wide planning parameters (`spec.md` §9, Design Note
/// 1). Threaded by reference through every pipeline phase rather than read
/// from module-level globals.
#[derive(Debug, Clone)]
pub struct PlanningConfig {
    pub average_kmh: f64,
    pub km_per_unit: f64,
    pub capacity_per_line: Option<Capacity>,
    pub number_of_extra_transfers: u32,
    pub max_delay_equation: MaxDelayExpr,
    pub transfer_seconds: u32,
    pub time_window_seconds: u32,
    pub context: ContextKind,
    pub solver: SolverKind,
}

impl PlanningConfig {
    pub fn dist_to_time(&self, distance_km: f64) -> u32 {
        time::seconds_for_distance(distance_km, self.average_kmh)
    }
}

/// Mutable, per-run counters and phase timings (`spec.md` §9, Design Note
/// 1). Owned by the runner, passed `&mut` into each phase, and emitted as
/// part of the final report (`SPEC_FULL.md` §17).
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    pub event_graph_nodes: usize,
    pub event_graph_edges: usize,
    pub number_of_splits: usize,
    pub integrality_gap_first: Option<f64>,
    pub integrality_gap_second: Option<f64>,
    pub time_reading: Option<WallDuration>,
    pub time_preprocessing: Option<WallDuration>,
    pub time_building_event_graph: Option<WallDuration>,
    pub time_building_mip: Option<WallDuration>,
    pub time_solving_first: Option<WallDuration>,
    pub time_solving_second: Option<WallDuration>,
    pub time_decoding: Option<WallDuration>,
    pub time_validating: Option<WallDuration>,
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry::default()
    }
}
