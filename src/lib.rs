//! surfsup_service: read-only JSON API over the Hawaii climate dataset.
//!
//! # Module structure
//!
//! ```text
//! surfsup_service
//! ├── model     - row and response types (PrecipitationRecord, DailyTemperature, ...)
//! ├── error     - StoreError / QueryError
//! ├── config    - service configuration (surfsup.toml + environment)
//! ├── db        - database URL parsing, per-request Connector, schema checks
//! ├── store
//! │   ├── sqlite   - ClimateStore over the dataset's SQLite file
//! │   └── postgres - ClimateStore over a PostgreSQL copy of the dataset
//! ├── climate   - route logic: cutoffs, most-active station, not-found rules
//! └── endpoint  - HTTP routing, responses and the worker-pool server
//! ```

pub mod climate;
pub mod config;
pub mod db;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod store;
