//! `ClimateStore` backed by a PostgreSQL copy of the dataset.
//!
//! Expects the same `station` / `measurement` tables as the SQLite file,
//! with `date` kept as TEXT. `prcp` and `tobs` may be NUMERIC or floating
//! point; both are read through NUMERIC casts and converted to f64.

use postgres::{Client, NoTls, Row};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::ClimateStore;
use crate::error::StoreError;
use crate::model::{DailyTemperature, PrecipitationRecord, Station, StationActivity, TobsRecord};

pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    pub fn connect(url: &str) -> Result<Self, postgres::Error> {
        let client = Client::connect(url, NoTls)?;
        Ok(Self { client })
    }
}

/// Convert a NUMERIC column value to f64.
fn decimal_to_f64(value: Decimal, column: &'static str) -> Result<f64, StoreError> {
    value
        .to_f64()
        .ok_or_else(|| StoreError::NumericOutOfRange(value.to_string(), column))
}

fn daily_temperature_row(row: &Row) -> Result<DailyTemperature, StoreError> {
    Ok(DailyTemperature {
        date: row.try_get(0)?,
        min_temperature: decimal_to_f64(row.try_get(1)?, "min_temperature")?,
        max_temperature: decimal_to_f64(row.try_get(2)?, "max_temperature")?,
        avg_temperature: decimal_to_f64(row.try_get(3)?, "avg_temperature")?,
    })
}

impl ClimateStore for PostgresStore {
    fn has_table(&mut self, name: &str) -> Result<bool, StoreError> {
        let row = self.client.query_one(
            "SELECT EXISTS(
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )",
            &[&name],
        )?;
        Ok(row.try_get(0)?)
    }

    fn precipitation_since(
        &mut self,
        cutoff: &str,
    ) -> Result<Vec<PrecipitationRecord>, StoreError> {
        let rows = self.client.query(
            "SELECT date, prcp::numeric FROM measurement WHERE date >= $1 ORDER BY id",
            &[&cutoff],
        )?;

        rows.iter()
            .map(|row| -> Result<PrecipitationRecord, StoreError> {
                let prcp: Option<Decimal> = row.try_get(1)?;
                Ok(PrecipitationRecord {
                    date: row.try_get(0)?,
                    prcp: prcp.map(|p| decimal_to_f64(p, "prcp")).transpose()?,
                })
            })
            .collect()
    }

    fn stations(&mut self) -> Result<Vec<Station>, StoreError> {
        let rows = self
            .client
            .query("SELECT station, name FROM station ORDER BY id", &[])?;

        rows.iter()
            .map(|row| -> Result<Station, StoreError> {
                Ok(Station {
                    station: row.try_get(0)?,
                    name: row.try_get(1)?,
                })
            })
            .collect()
    }

    fn station_activity(&mut self) -> Result<Vec<StationActivity>, StoreError> {
        let rows = self.client.query(
            "SELECT station, COUNT(station) AS n
             FROM measurement
             GROUP BY station
             ORDER BY n DESC, station ASC",
            &[],
        )?;

        rows.iter()
            .map(|row| -> Result<StationActivity, StoreError> {
                Ok(StationActivity {
                    station: row.try_get(0)?,
                    count: row.try_get(1)?,
                })
            })
            .collect()
    }

    fn latest_date(&mut self) -> Result<Option<String>, StoreError> {
        let row = self.client.query_one("SELECT MAX(date) FROM measurement", &[])?;
        Ok(row.try_get(0)?)
    }

    fn tobs_for_station_since(
        &mut self,
        station: &str,
        cutoff: &str,
    ) -> Result<Vec<TobsRecord>, StoreError> {
        let rows = self.client.query(
            "SELECT date, tobs::numeric FROM measurement
             WHERE station = $1 AND date >= $2
             ORDER BY id",
            &[&station, &cutoff],
        )?;

        rows.iter()
            .map(|row| -> Result<TobsRecord, StoreError> {
                Ok(TobsRecord {
                    date: row.try_get(0)?,
                    tobs: decimal_to_f64(row.try_get(1)?, "tobs")?,
                })
            })
            .collect()
    }

    fn daily_temperatures(
        &mut self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<DailyTemperature>, StoreError> {
        let rows = match end {
            Some(end) => self.client.query(
                "SELECT date, MIN(tobs)::numeric, MAX(tobs)::numeric, AVG(tobs)::numeric
                 FROM measurement
                 WHERE date >= $1 AND date <= $2
                 GROUP BY date
                 ORDER BY date",
                &[&start, &end],
            )?,
            None => self.client.query(
                "SELECT date, MIN(tobs)::numeric, MAX(tobs)::numeric, AVG(tobs)::numeric
                 FROM measurement
                 WHERE date >= $1
                 GROUP BY date
                 ORDER BY date",
                &[&start],
            )?,
        };

        rows.iter().map(daily_temperature_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_decimal_conversion() {
        let value = Decimal::from_str("77.50").unwrap();
        assert_eq!(decimal_to_f64(value, "tobs").unwrap(), 77.5);
    }

    #[test]
    fn test_decimal_average_precision_survives() {
        // AVG over NUMERIC returns many fractional digits
        let value = Decimal::from_str("76.3333333333333333").unwrap();
        let converted = decimal_to_f64(value, "avg_temperature").unwrap();
        assert!((converted - 76.333_333).abs() < 1e-6);
    }
}
