use model::base_types::{LineId, StopId};

/// A directed edge of the line graph: travel from `from` to `to` along
/// `line`, taking `duration` seconds (`spec.md` §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineEdge {
    pub from: StopId,
    pub to: StopId,
    pub line: LineId,
    pub duration: u32,
}

impl LineEdge {
    pub fn new(from: StopId, to: StopId, line: LineId, duration: u32) -> Self {
        LineEdge {
            from,
            to,
            line,
            duration,
        }
    }
}
