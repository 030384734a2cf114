use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// LoadError – everything that can go wrong before a dataset exists
// ---------------------------------------------------------------------------

/// Failure to turn a source file into typed rows or boundary features.
///
/// Numeric coercion problems are *not* errors: bad cells become `0.0`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A column the rows cannot exist without (`Country`, `Year`).
    #[error("source is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("invalid geometry: {0}")]
    Geometry(String),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
