//! Delimited table reading and writing with Polars.
//!
//! Raw FRS releases ship tab-delimited `.tab` files; the persisted store
//! uses comma-delimited `.csv`. Both go through the same reader, which
//! infers column types over the whole file so that sparse numeric columns
//! are not mistaken for text by a short sample.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Read a delimited file with a header row into a DataFrame.
pub fn read_delimited_table(path: &Path, separator: u8) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|options| options.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| table_parse(path, &e))?
        .finish()
        .map_err(|e| table_parse(path, &e))?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read delimited table"
    );
    Ok(df)
}

/// Write a DataFrame as comma-delimited CSV with a header row.
pub fn write_csv_table(path: &Path, data: &DataFrame) -> Result<()> {
    let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data = data.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut data)
        .map_err(|e| table_parse(path, &e))?;
    debug!(path = %path.display(), rows = data.height(), "wrote csv table");
    Ok(())
}

fn table_parse(path: &Path, error: &PolarsError) -> IngestError {
    IngestError::TableParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
