//! Route logic for the climate API.
//!
//! Each function answers one route: it issues the store queries for that
//! route and decides what counts as "nothing found". The store performs
//! all filtering and aggregation.

use chrono::{Duration, NaiveDate};

use crate::error::QueryError;
use crate::model::{
    DATE_FORMAT, MostActiveTobs, PrecipitationRecord, StationActivity, TemperatureSummary,
};
use crate::store::ClimateStore;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Query parameters that are fixed per deployment rather than per request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    /// Earliest date returned by the precipitation route.
    pub precipitation_cutoff: String,
    /// Length of the trailing window for the tobs route, in days.
    pub tobs_window_days: i64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            precipitation_cutoff: "2016-08-23".to_string(),
            tobs_window_days: 365,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim surrounding whitespace from a date path parameter.
///
/// The result is not validated: a non-date string is compared
/// lexicographically like any other and typically matches nothing.
pub fn canonicalize_date(raw: &str) -> String {
    raw.trim().to_string()
}

/// The date `days` calendar days before `latest`, as `YYYY-MM-DD`.
pub fn window_start(latest: &str, days: i64) -> Result<String, QueryError> {
    let latest_date = NaiveDate::parse_from_str(latest, DATE_FORMAT)
        .map_err(|_| QueryError::InvalidStoredDate(latest.to_string()))?;
    let start = latest_date
        .checked_sub_signed(Duration::days(days))
        .ok_or_else(|| QueryError::InvalidStoredDate(latest.to_string()))?;
    Ok(start.format(DATE_FORMAT).to_string())
}

/// The station with the most measurements.
///
/// Ties go to the lexicographically smallest station code, regardless of
/// the order the store returned the rows in.
pub fn pick_most_active(activity: &[StationActivity]) -> Option<&StationActivity> {
    activity
        .iter()
        .min_by(|a, b| b.count.cmp(&a.count).then_with(|| a.station.cmp(&b.station)))
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// All precipitation records on or after `cutoff`. An empty list is a valid answer.
pub fn precipitation(
    store: &mut dyn ClimateStore,
    cutoff: &str,
) -> Result<Vec<PrecipitationRecord>, QueryError> {
    Ok(store.precipitation_since(cutoff)?)
}

/// Station codes and names flattened into one list:
/// `[code, name, code, name, ...]`.
pub fn station_list(store: &mut dyn ClimateStore) -> Result<Vec<String>, QueryError> {
    let stations = store.stations()?;
    Ok(stations
        .into_iter()
        .flat_map(|s| [s.station, s.name])
        .collect())
}

/// Temperature observations of the most active station over the last
/// `window_days` days of the dataset.
pub fn most_active_tobs(
    store: &mut dyn ClimateStore,
    window_days: i64,
) -> Result<MostActiveTobs, QueryError> {
    let activity = store.station_activity()?;
    let station = pick_most_active(&activity)
        .map(|a| a.station.clone())
        .ok_or_else(|| QueryError::NotFound("No measurements available.".to_string()))?;

    let latest = store
        .latest_date()?
        .ok_or_else(|| QueryError::NotFound("No measurements available.".to_string()))?;
    let cutoff = window_start(&latest, window_days)?;

    let tobs = store.tobs_for_station_since(&station, &cutoff)?;

    Ok(MostActiveTobs {
        most_active_station: station,
        tobs,
    })
}

/// Daily min/max/avg temperature from `start` to the end of the dataset.
pub fn temperature_from(
    store: &mut dyn ClimateStore,
    start: &str,
) -> Result<TemperatureSummary, QueryError> {
    let start = canonicalize_date(start);
    let temperature_data = store.daily_temperatures(&start, None)?;

    if temperature_data.is_empty() {
        return Err(QueryError::NotFound(format!(
            "No temperature data found from {} onwards.",
            start
        )));
    }

    Ok(TemperatureSummary {
        start_date: start,
        end_date: None,
        temperature_data,
    })
}

/// Daily min/max/avg temperature between `start` and `end`, both inclusive.
pub fn temperature_between(
    store: &mut dyn ClimateStore,
    start: &str,
    end: &str,
) -> Result<TemperatureSummary, QueryError> {
    let start = canonicalize_date(start);
    let end = canonicalize_date(end);
    let temperature_data = store.daily_temperatures(&start, Some(&end))?;

    if temperature_data.is_empty() {
        return Err(QueryError::NotFound(format!(
            "No temperature data found between {} and {}.",
            start, end
        )));
    }

    Ok(TemperatureSummary {
        start_date: start,
        end_date: Some(end),
        temperature_data,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
