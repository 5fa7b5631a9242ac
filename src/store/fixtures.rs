//! Test fixtures: a small in-memory copy of the Hawaii dataset schema.
//!
//! Row layout (id order):
//!
//! | id | station     | date       | prcp | tobs |
//! |----|-------------|------------|------|------|
//! | 1  | USC00519397 | 2016-08-22 | 0.00 | 78   |
//! | 2  | USC00519397 | 2016-08-23 | 0.08 | 81   |
//! | 3  | USC00519397 | 2017-08-22 | 0.00 | 80   |
//! | 4  | USC00519281 | 2016-08-22 | 0.10 | 73   |
//! | 5  | USC00519281 | 2016-08-23 | 1.79 | 77   |
//! | 6  | USC00519281 | 2017-05-01 | 0.02 | 75   |
//! | 7  | USC00519281 | 2017-08-22 | 0.50 | 77   |
//! | 8  | USC00519281 | 2017-08-23 | NULL | 79   |
//! | 9  | USC00516128 | 2017-08-22 | 0.00 | 74   |
//! | 10 | USC00516128 | 2017-08-23 | 0.45 | 76   |

use rusqlite::Connection;

use super::SqliteStore;

pub(crate) const SCHEMA: &str = "
    CREATE TABLE station (
        id INTEGER PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    );
    CREATE TABLE measurement (
        id INTEGER PRIMARY KEY,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT
    );";

const SEED: &str = "
    INSERT INTO station (station, name, latitude, longitude, elevation) VALUES
        ('USC00519397', 'WAIKIKI 717.2, HI US', 21.2716, -157.8168, 3.0),
        ('USC00519281', 'WAIHEE 837.5, HI US', 21.45167, -157.84889, 32.9),
        ('USC00516128', 'MANOA LYON ARBO 785.2, HI US', 21.3331, -157.8025, 152.4);
    INSERT INTO measurement (station, date, prcp, tobs) VALUES
        ('USC00519397', '2016-08-22', 0.0, 78),
        ('USC00519397', '2016-08-23', 0.08, 81),
        ('USC00519397', '2017-08-22', 0.0, 80),
        ('USC00519281', '2016-08-22', 0.1, 73),
        ('USC00519281', '2016-08-23', 1.79, 77),
        ('USC00519281', '2017-05-01', 0.02, 75),
        ('USC00519281', '2017-08-22', 0.5, 77),
        ('USC00519281', '2017-08-23', NULL, 79),
        ('USC00516128', '2017-08-22', 0.0, 74),
        ('USC00516128', '2017-08-23', 0.45, 76);";

/// In-memory store with the schema but no rows.
pub(crate) fn empty_store() -> SqliteStore {
    let conn = Connection::open_in_memory().expect("in-memory database should open");
    conn.execute_batch(SCHEMA).expect("schema should apply");
    SqliteStore::from_connection(conn)
}

/// In-memory store loaded with the rows documented above.
pub(crate) fn seeded_store() -> SqliteStore {
    let conn = Connection::open_in_memory().expect("in-memory database should open");
    conn.execute_batch(SCHEMA).expect("schema should apply");
    conn.execute_batch(SEED).expect("seed rows should insert");
    SqliteStore::from_connection(conn)
}

/// In-memory store holding exactly the given measurements and stations.
pub(crate) fn store_with(
    stations: &[(&str, &str)],
    measurements: &[(&str, &str, f64)],
) -> SqliteStore {
    let conn = Connection::open_in_memory().expect("in-memory database should open");
    conn.execute_batch(SCHEMA).expect("schema should apply");
    for (code, name) in stations {
        conn.execute(
            "INSERT INTO station (station, name) VALUES (?1, ?2)",
            rusqlite::params![code, name],
        )
        .expect("station should insert");
    }
    for (date, station, tobs) in measurements {
        conn.execute(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, NULL, ?3)",
            rusqlite::params![station, date, tobs],
        )
        .expect("measurement should insert");
    }
    SqliteStore::from_connection(conn)
}
