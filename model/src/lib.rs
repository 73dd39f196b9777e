pub mod base_types;
pub mod config;
pub mod errors;
pub mod json_serialisation;
pub mod max_delay;
pub mod network;
pub mod pool;
pub mod request;

pub use config::{ContextKind, PlanningConfig, SolverKind, Telemetry};
pub use errors::ModelError;
pub use network::{Bus, Line, Network, Stop};
pub use pool::RequestPool;
pub use request::{PreprocessedRequest, Request, RequestOutcome, RouteOption, SplitRequest, SplitWindow};
