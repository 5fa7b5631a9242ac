//! Error types for the storage and query layers.

use thiserror::Error;

/// Failure while talking to the backing database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PostgreSQL query failed: {0}")]
    Postgres(#[from] postgres::Error),

    /// A NUMERIC value that does not fit in an f64.
    #[error("numeric value {0} in column '{1}' cannot be represented as f64")]
    NumericOutOfRange(String, &'static str),
}

/// Failure answering a climate route.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query ran but produced nothing to return. Mapped to HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// A date stored in the dataset is not in `YYYY-MM-DD` form.
    #[error("stored date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidStoredDate(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound(_))
    }
}
