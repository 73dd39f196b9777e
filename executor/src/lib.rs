//! Plan replay and validation (`spec.md` §4.7): replays a decoded [`Plan`]
//! against the network and request pool, checks every invariant named in
//! `spec.md` §8, and derives the KPI report of `SPEC_FULL.md` §17.

pub mod report;
pub mod validate;

pub use report::{write_reports, ExecutionReport};
pub use validate::{validate_and_finalize, DistanceLedger};

#[cfg(test)]
mod tests;
