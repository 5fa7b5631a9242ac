//! Shared data types for the climate API.
//!
//! Field names on the serialized types are part of the public JSON
//! interface (`prcp`, `tobs`, `min_temperature`, ...) and must not change.

use serde::{Deserialize, Serialize};

/// Date string format used throughout the dataset (`YYYY-MM-DD`).
///
/// Dates are stored as text and compared lexicographically, which is only
/// correct because this format is fixed-width and zero-padded.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A station row: code and display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
}

/// Number of measurements recorded by one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationActivity {
    pub station: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// One day of precipitation at some station. `prcp` is null when the
/// station did not report precipitation that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationRecord {
    pub date: String,
    pub prcp: Option<f64>,
}

/// A single temperature observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TobsRecord {
    pub date: String,
    pub tobs: f64,
}

/// Temperature observations of the most active station over the trailing
/// window of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostActiveTobs {
    pub most_active_station: String,
    pub tobs: Vec<TobsRecord>,
}

/// Per-date temperature aggregate across all stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub date: String,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_temperature: f64,
}

/// Body of the start-date and date-range routes.
///
/// `end_date` is omitted from the JSON for the open-ended start-date route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<String>,
    pub temperature_data: Vec<DailyTemperature>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_precipitation_serializes_as_null() {
        let record = PrecipitationRecord {
            date: "2016-08-23".to_string(),
            prcp: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2016-08-23", "prcp": null}));
    }

    #[test]
    fn test_open_ended_summary_omits_end_date() {
        let summary = TemperatureSummary {
            start_date: "2017-08-23".to_string(),
            end_date: None,
            temperature_data: Vec::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("end_date").is_none());
        assert_eq!(json["start_date"], "2017-08-23");
    }

    #[test]
    fn test_ranged_summary_includes_end_date() {
        let summary = TemperatureSummary {
            start_date: "2017-08-01".to_string(),
            end_date: Some("2017-08-23".to_string()),
            temperature_data: vec![DailyTemperature {
                date: "2017-08-01".to_string(),
                min_temperature: 72.0,
                max_temperature: 81.0,
                avg_temperature: 76.5,
            }],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["end_date"], "2017-08-23");
        assert_eq!(json["temperature_data"][0]["avg_temperature"], 76.5);
    }
}
