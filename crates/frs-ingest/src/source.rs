//! Raw table sources.
//!
//! The save pipeline reads raw release tables through [`RawTableSource`], so
//! that alternative extract formats can be plugged in without touching the
//! indexing code.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use crate::delimited::read_delimited_table;
use crate::discovery::{list_files_with_extension, table_name};
use crate::error::{IngestError, Result};

/// A collection of raw tables addressable by name.
pub trait RawTableSource {
    /// Names of all tables available, in a stable order.
    fn table_names(&self) -> Result<Vec<String>>;

    /// Read one table by name.
    fn read_table(&self, name: &str) -> Result<DataFrame>;
}

/// A release `tab/` folder of tab-delimited extracts.
#[derive(Debug, Clone)]
pub struct TabDirectory {
    dir: PathBuf,
}

impl TabDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn files(&self) -> Result<Vec<PathBuf>> {
        list_files_with_extension(&self.dir, "tab")
    }
}

impl RawTableSource for TabDirectory {
    fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.files()?.iter().map(|path| table_name(path)).collect())
    }

    fn read_table(&self, name: &str) -> Result<DataFrame> {
        let wanted = name.trim().to_ascii_lowercase();
        let path = self
            .files()?
            .into_iter()
            .find(|path| table_name(path) == wanted)
            .ok_or_else(|| IngestError::TableNotFound {
                name: name.to_string(),
                path: self.dir.clone(),
            })?;
        read_delimited_table(&path, b'\t')
    }
}
