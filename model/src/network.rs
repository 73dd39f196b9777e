pub mod bus;
pub mod line;
pub mod stop;

pub use bus::Bus;
pub use line::Line;
pub use stop::Stop;

use std::collections::HashMap;

use crate::base_types::{BusId, LineId, StopId};

/// The static, run-wide bus network: loaded once from the network file,
/// immutable for the whole run (`spec.md` §3 "Lifecycle").
#[derive(Debug, Clone)]
pub struct Network {
    stops: HashMap<StopId, Stop>,
    lines: HashMap<LineId, Line>,
    buses: HashMap<BusId, Bus>,
}

impl Network {
    pub fn new(stops: Vec<Stop>, lines: Vec<Line>, buses: Vec<Bus>) -> Self {
        Network {
            stops: stops.into_iter().map(|s| (s.id(), s)).collect(),
            lines: lines.into_iter().map(|l| (l.id(), l)).collect(),
            buses: buses.into_iter().map(|b| (b.id(), b)).collect(),
        }
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.buses.get(&id)
    }

    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn buses(&self) -> impl Iterator<Item = &Bus> {
        self.buses.values()
    }

    pub fn buses_on_line(&self, line: LineId) -> impl Iterator<Item = &Bus> {
        self.buses.values().filter(move |b| b.line() == line)
    }

    /// Euclidean distance between two stops, scaled to kilometres via
    /// `km_per_unit`.
    pub fn distance_km(&self, a: StopId, b: StopId, km_per_unit: f64) -> f64 {
        let stop_a = self.stop(a).expect("stop id must be valid");
        let stop_b = self.stop(b).expect("stop id must be valid");
        stop_a.coordinate().unit_distance(&stop_b.coordinate()) * km_per_unit
    }
}
