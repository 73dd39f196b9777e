use thiserror::Error;

use crate::base_types::{LineId, StopId};

/// Errors raised while loading or validating the static network/config/
/// request inputs (`spec.md` §7 "input malformed" taxonomy). These are all
/// caller-recoverable: a malformed input file terminates the run with a
/// descriptive message, it never panics the process.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("malformed config: {0}")]
    MalformedConfig(String),

    #[error("malformed network file: {0}")]
    MalformedNetwork(String),

    #[error("malformed request record at row {row}: {reason}")]
    MalformedRequest { row: usize, reason: String },

    #[error("line {0} has no capacity: neither a per-line capacity nor a global capacityPerLine is configured")]
    MissingCapacity(LineId),

    #[error("unknown context kind {0:?}, only \"static\" is implemented")]
    UnknownContext(String),

    #[error("unknown solver kind {0:?}, only \"eventMILP\" is implemented")]
    UnknownSolver(String),

    #[error("stop {0} is not part of the network")]
    UnknownStop(StopId),

    #[error("line {0} is not part of the network")]
    UnknownLine(LineId),

    #[error("invalid max-delay expression: {0}")]
    InvalidMaxDelayExpression(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Time(#[from] time::TimeParseError),
}
