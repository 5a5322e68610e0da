//! Error types for FRS data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during data ingestion operations.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Table Errors ===
    /// Failed to parse a delimited table with Polars.
    #[error("failed to parse table {path}: {message}")]
    TableParse { path: PathBuf, message: String },

    /// Table named by the caller does not exist in the source.
    #[error("table '{name}' not found in {path}")]
    TableNotFound { name: String, path: PathBuf },

    // === Release Errors ===
    /// Archive could not be opened or extracted.
    #[error("failed to extract archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Release folder has no data in a supported format.
    #[error("unsupported release layout in {path}: {reason}")]
    UnsupportedRelease { path: PathBuf, reason: String },

    // === Metadata Errors ===
    /// Metadata file has unexpected format.
    #[error("unexpected metadata format in {path}: {reason}")]
    MetadataFormat { path: PathBuf, reason: String },

    /// Invalid value in metadata field.
    #[error("invalid {field} value '{value}' in {path}")]
    InvalidValue {
        field: String,
        value: String,
        path: PathBuf,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
