use serde::Deserialize;
use std::path::Path;

use crate::base_types::{RequestId, StopId};
use crate::errors::ModelError;
use crate::request::Request;

#[derive(Debug, Deserialize)]
struct RequestRecord {
    id: u32,
    #[serde(rename = "registerTime")]
    register_time: String,
    #[serde(rename = "earliestStart")]
    earliest_start: String,
    #[serde(rename = "pickupStopId")]
    pickup_stop_id: u32,
    #[serde(rename = "dropoffStopId")]
    dropoff_stop_id: u32,
    #[serde(rename = "groupSize")]
    group_size: u32,
}

pub fn load_requests(path: &Path) -> Result<Vec<Request>, ModelError> {
    let text = std::fs::read_to_string(path)?;
    parse_requests(&text)
}

pub fn parse_requests(text: &str) -> Result<Vec<Request>, ModelError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(text.as_bytes());
    let mut requests = Vec::new();
    for (row, record) in reader.deserialize().enumerate() {
        let record: RequestRecord = record?;
        let register_time = time::Time::parse(&record.register_time).map_err(|e| {
            ModelError::MalformedRequest {
                row,
                reason: e.to_string(),
            }
        })?;
        let earliest_start = time::Time::parse(&record.earliest_start).map_err(|e| {
            ModelError::MalformedRequest {
                row,
                reason: e.to_string(),
            }
        })?;
        if record.group_size == 0 {
            return Err(ModelError::MalformedRequest {
                row,
                reason: "groupSize must be at least 1".to_string(),
            });
        }
        requests.push(Request::new(
            RequestId(record.id),
            record.group_size,
            StopId(record.pickup_stop_id),
            StopId(record.dropoff_stop_id),
            earliest_start,
            register_time,
        ));
    }
    Ok(requests)
}
