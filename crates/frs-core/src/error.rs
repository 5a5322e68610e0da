use std::path::PathBuf;

use thiserror::Error;

use frs_ingest::IngestError;
use frs_transform::TransformError;

#[derive(Debug, Error)]
pub enum FrsError {
    /// The store holds no survey year at all.
    #[error("no FRS data available in {store}; run `frs save` first")]
    NoDataAvailable { store: PathBuf },

    #[error("no FRS data stored for {year}")]
    YearNotFound { year: i32 },

    #[error("table '{table}' not found for {year}")]
    TableNotFound { table: String, year: i32 },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode codebook: {0}")]
    CodebookEncode(#[from] serde_json::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl FrsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for FrsError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FrsError>;
