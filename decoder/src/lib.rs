//! Plan decoder (`spec.md` §4.6): walks the activated event-graph edges
//! per bus into an ordered route of `RouteStop`s with decoded arrival and
//! departure times.

mod plan;
mod walk;

pub use plan::{BusRoute, Plan, RouteStop};
pub use walk::decode_plan;
