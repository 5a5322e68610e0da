//! Reading FRS inputs from disk.
//!
//! Everything here is I/O: raw release tables, the persisted CSV layout,
//! zipped releases, codebook JSON and uprating configuration. No entity
//! logic lives in this crate.

pub mod archive;
pub mod codebook;
pub mod delimited;
pub mod discovery;
pub mod error;
pub mod source;
pub mod uprating;

pub use archive::extract_zip;
pub use codebook::{load_codebook, parse_codebook};
pub use delimited::{read_delimited_table, write_csv_table};
pub use discovery::{ReleaseLayout, list_files_with_extension, locate_release_data, table_name};
pub use error::{IngestError, Result};
pub use source::{RawTableSource, TabDirectory};
pub use uprating::{load_population_projection, load_uprating_parameters, parse_uprating_parameters};
