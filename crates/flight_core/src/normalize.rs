//! Normalization of a raw flight record into the fixed output schema
//!
//! The upstream record shape is controlled entirely by the tracking site, so
//! every projected leaf falls back to a placeholder when absent. A record
//! where every leaf is a placeholder carries no usable information and is
//! rejected.

use chrono::{Local, TimeZone};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::LookupError;

/// Fallback for any field the upstream record does not carry
pub const PLACEHOLDER: &str = "N/A";

/// Aircraft identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AircraftInfo {
    pub friendly_type: String,
    pub aircraft_type: String,
}

/// One endpoint of the flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirportInfo {
    pub code: String,
    pub airport: String,
    pub city: String,
}

/// Scheduled/actual/estimated times for one gate event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateTimes {
    pub scheduled: String,
    pub actual: String,
    pub estimated: String,
}

/// Fixed-shape flight summary returned to API callers
///
/// Created fresh per lookup and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedFlightInfo {
    pub aircraft: AircraftInfo,
    pub origin: AirportInfo,
    pub destination: AirportInfo,
    pub flight_status: String,
    pub departure: GateTimes,
    pub arrival: GateTimes,
    pub flight_duration: String,
    pub route: String,
}

impl NormalizedFlightInfo {
    /// Project one raw flight record into the output schema
    pub fn project(record: &Value) -> Self {
        let ete_minutes = record
            .get("flightPlan")
            .and_then(|plan| plan.get("ete"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
            / 60;

        Self {
            aircraft: AircraftInfo {
                friendly_type: str_at(record, &["aircraft", "friendlyType"]),
                aircraft_type: str_at(record, &["aircraft", "type"]),
            },
            origin: AirportInfo {
                code: str_at(record, &["origin", "icao"]),
                airport: str_at(record, &["origin", "friendlyName"]),
                city: str_at(record, &["origin", "friendlyLocation"]),
            },
            destination: AirportInfo {
                code: str_at(record, &["destination", "icao"]),
                airport: str_at(record, &["destination", "friendlyName"]),
                city: str_at(record, &["destination", "friendlyLocation"]),
            },
            flight_status: str_at(record, &["flightStatus"]),
            departure: gate_times_at(record, "gateDepartureTimes"),
            arrival: gate_times_at(record, "gateArrivalTimes"),
            flight_duration: format!("{ete_minutes} minutes"),
            route: str_at(record, &["flightPlan", "route"]),
        }
    }

    /// True when no projected leaf carries real data
    pub fn is_placeholder_only(&self) -> bool {
        let top_level = [
            self.flight_status.as_str(),
            self.flight_duration.as_str(),
            self.route.as_str(),
        ];
        let nested = [
            self.aircraft.friendly_type.as_str(),
            self.aircraft.aircraft_type.as_str(),
            self.origin.code.as_str(),
            self.origin.airport.as_str(),
            self.origin.city.as_str(),
            self.destination.code.as_str(),
            self.destination.airport.as_str(),
            self.destination.city.as_str(),
            self.departure.scheduled.as_str(),
            self.departure.actual.as_str(),
            self.departure.estimated.as_str(),
            self.arrival.scheduled.as_str(),
            self.arrival.actual.as_str(),
            self.arrival.estimated.as_str(),
        ];

        top_level
            .iter()
            .all(|v| *v == PLACEHOLDER || *v == "0 minutes")
            && nested.iter().all(|v| *v == PLACEHOLDER)
    }
}

/// Normalize the extracted `flights` mapping
///
/// The first value in received order is taken as the canonical record
/// (`serde_json` is built with `preserve_order`, so this is the first key the
/// upstream emitted, not incidental hash order).
///
/// # Returns
/// * `Ok(info)` for a record with at least one real field
/// * `Err(LookupError::NoData)` when the mapping is empty
/// * `Err(LookupError::AllPlaceholders)` when every field is a placeholder
pub fn normalize_flights(flights: &Map<String, Value>) -> Result<NormalizedFlightInfo, LookupError> {
    let record = flights.values().next().ok_or_else(|| {
        debug!("No valid flight data found");
        LookupError::NoData
    })?;

    let info = NormalizedFlightInfo::project(record);
    if info.is_placeholder_only() {
        debug!("All retrieved fields are placeholders");
        return Err(LookupError::AllPlaceholders);
    }
    Ok(info)
}

/// Epoch seconds to a local `"%Y-%m-%d %H:%M:%S"` string
///
/// Zero is treated the same as absent: the upstream emits 0 for times it has
/// no value for, so a real midnight-1970 timestamp is indistinguishable from
/// missing data.
pub fn format_time(timestamp: Option<i64>) -> String {
    match timestamp {
        Some(secs) if secs != 0 => Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        _ => PLACEHOLDER.to_string(),
    }
}

fn str_at(record: &Value, path: &[&str]) -> String {
    let mut current = record;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return PLACEHOLDER.to_string(),
        }
    }
    current
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn gate_times_at(record: &Value, group: &str) -> GateTimes {
    let time_at = |key: &str| {
        format_time(
            record
                .get(group)
                .and_then(|times| times.get(key))
                .and_then(Value::as_i64),
        )
    };
    GateTimes {
        scheduled: time_at("scheduled"),
        actual: time_at("actual"),
        estimated: time_at("estimated"),
    }
}
