//! `ClimateStore` backed by the dataset's SQLite file (`hawaii.sqlite`).

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};

use super::ClimateStore;
use crate::error::StoreError;
use crate::model::{DailyTemperature, PrecipitationRecord, Station, StationActivity, TobsRecord};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the dataset file read-only. Fails if the file does not exist.
    pub fn open_read_only(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl ClimateStore for SqliteStore {
    fn has_table(&mut self, name: &str) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn precipitation_since(
        &mut self,
        cutoff: &str,
    ) -> Result<Vec<PrecipitationRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, prcp FROM measurement WHERE date >= ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([cutoff], |row| {
            Ok(PrecipitationRecord {
                date: row.get(0)?,
                prcp: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn stations(&mut self) -> Result<Vec<Station>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT station, name FROM station ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Station {
                station: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn station_activity(&mut self) -> Result<Vec<StationActivity>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT station, COUNT(station) AS n
             FROM measurement
             GROUP BY station
             ORDER BY n DESC, station ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StationActivity {
                station: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn latest_date(&mut self) -> Result<Option<String>, StoreError> {
        // MAX over an empty table yields a single NULL row
        let latest: Option<String> =
            self.conn
                .query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))?;
        Ok(latest)
    }

    fn tobs_for_station_since(
        &mut self,
        station: &str,
        cutoff: &str,
    ) -> Result<Vec<TobsRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, tobs FROM measurement
             WHERE station = ?1 AND date >= ?2
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![station, cutoff], |row| {
            Ok(TobsRecord {
                date: row.get(0)?,
                tobs: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn daily_temperatures(
        &mut self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<DailyTemperature>, StoreError> {
        let records = match end {
            Some(end) => {
                let mut stmt = self.conn.prepare(
                    "SELECT date, MIN(tobs), MAX(tobs), AVG(tobs)
                     FROM measurement
                     WHERE date >= ?1 AND date <= ?2
                     GROUP BY date
                     ORDER BY date",
                )?;
                let rows = stmt.query_map(params![start, end], daily_temperature_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT date, MIN(tobs), MAX(tobs), AVG(tobs)
                     FROM measurement
                     WHERE date >= ?1
                     GROUP BY date
                     ORDER BY date",
                )?;
                let rows = stmt.query_map([start], daily_temperature_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(records)
    }
}

fn daily_temperature_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DailyTemperature> {
    Ok(DailyTemperature {
        date: row.get(0)?,
        min_temperature: row.get(1)?,
        max_temperature: row.get(2)?,
        avg_temperature: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{empty_store, seeded_store};

    #[test]
    fn test_has_table_reports_schema() {
        let mut store = seeded_store();
        assert!(store.has_table("measurement").unwrap());
        assert!(store.has_table("station").unwrap());
        assert!(!store.has_table("gauge_readings").unwrap());
    }

    #[test]
    fn test_precipitation_cutoff_is_inclusive() {
        let mut store = seeded_store();
        let records = store.precipitation_since("2017-08-22").unwrap();

        assert!(records.iter().all(|r| r.date.as_str() >= "2017-08-22"));
        assert!(records.iter().any(|r| r.date == "2017-08-22"));
    }

    #[test]
    fn test_precipitation_keeps_null_readings() {
        let mut store = seeded_store();
        let records = store.precipitation_since("2017-08-23").unwrap();
        assert!(records.iter().any(|r| r.prcp.is_none()));
    }

    #[test]
    fn test_stations_in_storage_order() {
        let mut store = seeded_store();
        let stations = store.stations().unwrap();
        let codes: Vec<&str> = stations.iter().map(|s| s.station.as_str()).collect();
        assert_eq!(codes, vec!["USC00519397", "USC00519281", "USC00516128"]);
    }

    #[test]
    fn test_station_activity_counts() {
        let mut store = seeded_store();
        let activity = store.station_activity().unwrap();

        assert_eq!(activity[0].station, "USC00519281");
        assert_eq!(activity[0].count, 5);
        let total: i64 = activity.iter().map(|a| a.count).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_latest_date_on_empty_table_is_none() {
        let mut store = empty_store();
        assert_eq!(store.latest_date().unwrap(), None);
    }

    #[test]
    fn test_latest_date() {
        let mut store = seeded_store();
        assert_eq!(store.latest_date().unwrap().as_deref(), Some("2017-08-23"));
    }

    #[test]
    fn test_daily_temperatures_groups_by_date() {
        let mut store = seeded_store();
        let days = store.daily_temperatures("2017-08-22", None).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2017-08-22");
        assert_eq!(days[0].min_temperature, 74.0);
        assert_eq!(days[0].max_temperature, 80.0);
        assert_eq!(days[0].avg_temperature, 77.0);
    }

    #[test]
    fn test_daily_temperatures_range_is_inclusive_on_both_ends() {
        let mut store = seeded_store();
        let days = store
            .daily_temperatures("2016-08-23", Some("2017-08-22"))
            .unwrap();

        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates.first(), Some(&"2016-08-23"));
        assert_eq!(dates.last(), Some(&"2017-08-22"));
    }

    #[test]
    fn test_open_read_only_rejects_missing_file() {
        let result = SqliteStore::open_read_only(Path::new("/nonexistent/hawaii.sqlite"));
        assert!(result.is_err());
    }
}
