use serde::Deserialize;
use std::path::Path;

use crate::base_types::{BusId, Coordinate, LineId, StopId};
use crate::errors::ModelError;
use crate::network::{Bus, Line, Network, Stop};

#[derive(Debug, Deserialize)]
struct StopFile {
    id: u32,
    coordinates: (f64, f64),
}

#[derive(Debug, Deserialize)]
struct LineFile {
    id: u32,
    stops: Vec<u32>,
    depot: (f64, f64),
    capacity: Option<u32>,
    #[serde(rename = "startTime")]
    start_time: String,
    #[serde(rename = "endTime")]
    end_time: String,
}

#[derive(Debug, Deserialize)]
struct BusFile {
    id: u32,
    line: u32,
}

#[derive(Debug, Deserialize)]
struct NetworkFile {
    stops: Vec<StopFile>,
    lines: Vec<LineFile>,
    buses: Vec<BusFile>,
}

pub fn load_network(
    path: &Path,
    capacity_per_line: Option<u32>,
) -> Result<Network, ModelError> {
    let text = std::fs::read_to_string(path)?;
    parse_network(&text, capacity_per_line)
}

pub fn parse_network(text: &str, capacity_per_line: Option<u32>) -> Result<Network, ModelError> {
    let raw: NetworkFile = serde_json::from_str(text)?;

    let mut stops: Vec<Stop> = raw
        .stops
        .iter()
        .map(|s| Stop::new(StopId(s.id), Coordinate::new(s.coordinates.0, s.coordinates.1)))
        .collect();

    let mut next_synthetic_id = stops.iter().map(|s| s.id().0).max().map_or(0, |m| m + 1);

    let mut lines = Vec::with_capacity(raw.lines.len());
    for line_file in &raw.lines {
        let depot_coord = Coordinate::new(line_file.depot.0, line_file.depot.1);
        let depot_id = match stops.iter().find(|s| s.coordinate() == depot_coord) {
            Some(existing) => existing.id(),
            None => {
                let id = StopId(next_synthetic_id);
                next_synthetic_id += 1;
                stops.push(Stop::new(id, depot_coord));
                id
            }
        };

        let capacity = line_file
            .capacity
            .or(capacity_per_line)
            .ok_or(ModelError::MissingCapacity(LineId(line_file.id)))?;

        let start_time = time::Time::parse(&line_file.start_time)?;
        let end_time = time::Time::parse(&line_file.end_time)?;

        lines.push(Line::new(
            LineId(line_file.id),
            line_file.stops.iter().map(|&id| StopId(id)).collect(),
            depot_id,
            capacity,
            start_time,
            end_time,
        ));
    }

    let buses: Vec<Bus> = raw
        .buses
        .iter()
        .map(|b| Bus::new(BusId(b.id), LineId(b.line)))
        .collect();

    Ok(Network::new(stops, lines, buses))
}
