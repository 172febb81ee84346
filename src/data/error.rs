use thiserror::Error;

/// Failure to turn an external source into a [`Catalog`](super::model::Catalog).
///
/// Every variant is fatal to the session that attempted the load; nothing is
/// partially rendered.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: '{column}' value {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("malformed catalog: {0}")]
    Malformed(String),
}
