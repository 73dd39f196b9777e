//! Per-line event graph construction (`spec.md` §4.4): the combinatorial
//! enumeration of feasible pickup/dropoff events and the edges chaining
//! them into rideable sequences, feeding the MIP builder.

pub mod builder;
pub mod event;
pub mod event_window;
pub mod sweep;

pub use builder::{build_event_graph, EventGraph};
pub use event::{Action, Event, EventKind};
pub use event_window::event_window;
pub use sweep::{candidate_partners, local_sweep, temporal_sweep};

#[cfg(test)]
mod tests;
