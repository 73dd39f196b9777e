//! The static context driver (`spec.md` §5) and the stubbed extension
//! point for a rolling-horizon driver (`SPEC_FULL.md` §18), plus the
//! top-level error type the CLI binary turns into an exit code.

pub mod pipeline;

use model::{PlanningConfig, RequestPool};
use thiserror::Error;

/// The union of every error this crate's pipeline can propagate
/// (`spec.md` §7): malformed input at load time, or the solver finding no
/// feasible solution at all. Event-graph and plan-validation breaches are
/// *not* part of this enum — per `SPEC_FULL.md` §11 they are internal
/// invariant violations and panic rather than returning a `Result`.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error(transparent)]
    Model(#[from] model::ModelError),
    #[error(transparent)]
    Solver(#[from] mip::MipError),
}

/// Orders time-keyed batches of new requests and calls the planner/
/// executor for each (`spec.md` §2 "Context driver", §5). `StaticContext`
/// is the only implementation the static path needs: a single batch
/// released at the start of the service day.
pub trait ContextDriver {
    fn run(
        &mut self,
        network: &model::Network,
        config: &PlanningConfig,
        telemetry: &mut model::Telemetry,
    ) -> Result<(RequestPool, decoder::Plan, executor::DistanceLedger), PlanningError>;
}

/// The complete, correct context: every request is known up front and
/// planned in a single batch (`spec.md` §1 "Non-goals: fully dynamic
/// re-planning... only the static context is complete and correct").
pub struct StaticContext {
    pub requests: Vec<model::Request>,
}

impl ContextDriver for StaticContext {
    fn run(
        &mut self,
        network: &model::Network,
        config: &PlanningConfig,
        telemetry: &mut model::Telemetry,
    ) -> Result<(RequestPool, decoder::Plan, executor::DistanceLedger), PlanningError> {
        let requests = std::mem::take(&mut self.requests);
        pipeline::plan_batch(requests, network, config, telemetry)
    }
}

/// The rolling-horizon driver named as an open question in `spec.md` §9:
/// the original's `walk_route`/`execute_plan(time_next)` is "partially
/// implemented and likely buggy (iterating a dict as `(k, v)`-unpacked
/// membership test)". `SPEC_FULL.md` §18 resolves this as an intentional,
/// well-defined extension point rather than a faithful port of that bug:
/// anyone implementing it should replay `StaticContext::run` per trigger
/// instant against a snapshot of bus/request state, not attempt to reuse
/// the original's membership-test logic.
pub struct DynamicContext;

impl ContextDriver for DynamicContext {
    fn run(
        &mut self,
        _network: &model::Network,
        _config: &PlanningConfig,
        _telemetry: &mut model::Telemetry,
    ) -> Result<(RequestPool, decoder::Plan, executor::DistanceLedger), PlanningError> {
        todo!("rolling-horizon re-planning is not implemented; see SPEC_FULL.md §18")
    }
}
