use serde::Deserialize;
use std::path::Path;

use crate::config::{ContextKind, PlanningConfig, SolverKind};
use crate::errors::ModelError;
use crate::max_delay::MaxDelayExpr;

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "averageKmH")]
    average_km_h: f64,
    #[serde(rename = "KmPerUnit")]
    km_per_unit: f64,
    #[serde(rename = "capacityPerLine")]
    capacity_per_line: Option<u32>,
    #[serde(rename = "numberOfExtraTransfers")]
    number_of_extra_transfers: u32,
    #[serde(rename = "maxDelayEquation")]
    max_delay_equation: String,
    #[serde(rename = "transferMinutes")]
    transfer_minutes: u32,
    #[serde(rename = "timeWindowMinutes")]
    time_window_minutes: u32,
    context: String,
    solver: String,
}

pub fn load_config(path: &Path) -> Result<PlanningConfig, ModelError> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<PlanningConfig, ModelError> {
    let raw: ConfigFile = serde_json::from_str(text)?;
    let max_delay_equation = MaxDelayExpr::parse(&raw.max_delay_equation)?;
    Ok(PlanningConfig {
        average_kmh: raw.average_km_h,
        km_per_unit: raw.km_per_unit,
        capacity_per_line: raw.capacity_per_line,
        number_of_extra_transfers: raw.number_of_extra_transfers,
        max_delay_equation,
        transfer_seconds: raw.transfer_minutes * 60,
        time_window_seconds: raw.time_window_minutes * 60,
        context: ContextKind::parse(&raw.context)?,
        solver: SolverKind::parse(&raw.solver)?,
    })
}
