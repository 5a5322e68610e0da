//! Error types for entity transformations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A column needed to derive an identifier is absent.
    #[error("column '{column}' not found in table '{table}'")]
    MissingColumn { column: String, table: String },

    /// A table does not have the shape an operation requires.
    #[error("schema error in table '{table}': {reason}")]
    Schema { table: String, reason: String },

    /// Uprating parameters are incomplete for the requested years.
    #[error("uprating configuration error: {reason}")]
    Configuration { reason: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TransformError {
    pub(crate) fn schema(table: &str, reason: impl Into<String>) -> Self {
        Self::Schema {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
