//! Storage seam for the climate dataset.
//!
//! Each `ClimateStore` method maps to exactly one SQL statement against the
//! fixed two-table schema:
//!
//! ```text
//! station(id, station, name, latitude, longitude, elevation)
//! measurement(id, station, date, prcp, tobs)
//! ```
//!
//! The database does all filtering, grouping and aggregation. Un-grouped
//! listings come back in storage order (`ORDER BY id`), grouped ones by date.

pub mod postgres;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::postgres::PostgresStore;
pub use self::sqlite::SqliteStore;

use crate::error::StoreError;
use crate::model::{DailyTemperature, PrecipitationRecord, Station, StationActivity, TobsRecord};

/// Read-only access to the `station` and `measurement` tables.
pub trait ClimateStore {
    /// Whether a table with this name exists in the connected database.
    fn has_table(&mut self, name: &str) -> Result<bool, StoreError>;

    /// Every measurement's `(date, prcp)` with `date >= cutoff`.
    fn precipitation_since(&mut self, cutoff: &str) -> Result<Vec<PrecipitationRecord>, StoreError>;

    /// Every station row.
    fn stations(&mut self) -> Result<Vec<Station>, StoreError>;

    /// Measurement count per station, highest first.
    fn station_activity(&mut self) -> Result<Vec<StationActivity>, StoreError>;

    /// `MAX(date)` over all measurements; `None` when the table is empty.
    fn latest_date(&mut self) -> Result<Option<String>, StoreError>;

    /// Temperature observations for one station with `date >= cutoff`.
    fn tobs_for_station_since(
        &mut self,
        station: &str,
        cutoff: &str,
    ) -> Result<Vec<TobsRecord>, StoreError>;

    /// Min/max/avg `tobs` per date for `start <= date [<= end]`.
    fn daily_temperatures(
        &mut self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<DailyTemperature>, StoreError>;
}
