use derive_more::Display;

pub mod coordinate;

pub use coordinate::Coordinate;

/// Stable integer id of a [`crate::network::Stop`]. Synthetic depot stops
/// (a depot coordinate not matching any declared stop) are assigned ids
/// past the highest id seen in the network file, mirroring the source.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopId(pub u32);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub u32);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusId(pub u32);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u32);

/// Id of a [`crate::request::SplitRequest`]. Assigned by a process-wide
/// counter as split requests are created during preprocessing, never
/// reused, never reset mid-run.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SplitId(pub u32);

/// Number of passengers travelling together; always `>= 1`.
pub type PassengerCount = u32;

/// Capacity of a line's buses; always `>= 1`.
pub type Capacity = u32;

/// Travel distance in kilometres.
pub type Kilometers = f64;

/// Cost in the objective's distance units (kilometres, unless the MIP
/// builder is asked to weight them).
pub type Cost = f64;
