//! Data handling for the air quality dashboard

pub mod cache;
pub mod dataset;
pub mod stats;

use thiserror::Error;

// Re-exports
pub use cache::DatasetCache;
pub use dataset::{Dataset, Field, Observation};
pub use stats::FieldSummary;

/// Errors that can occur while loading the observation table
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("missing column '{0}' in header row")]
    MissingColumn(String),

    #[error("row {row}: {year}-{month}-{day} is not a valid calendar date")]
    InvalidDate {
        row: usize,
        year: i32,
        month: u32,
        day: u32,
    },

    #[error("no observation rows in {0}")]
    Empty(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
