//! On-disk layout of indexed FRS data.
//!
//! ```text
//! <root>/
//!   2019/
//!     adult.csv
//!     househol.csv
//!     codebook.json
//!   2020/
//!     ...
//! ```
//!
//! Each table is a comma-delimited CSV whose first column is the entity
//! identifier of the table's level.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use frs_common::ColumnLookup;
use frs_ingest::{list_files_with_extension, load_codebook, read_delimited_table, table_name, write_csv_table};
use frs_model::Codebook;
use frs_transform::{EntityFrame, TransformError};

use crate::error::{FrsError, Result};

/// File name of the per-year codebook.
pub const CODEBOOK_FILE: &str = "codebook.json";

const TABLE_EXTENSION: &str = "csv";

#[derive(Debug, Clone)]
pub struct FrsStore {
    root: PathBuf,
}

impl FrsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn year_dir(&self, year: i32) -> PathBuf {
        self.root.join(year.to_string())
    }

    /// Stored survey years in ascending order. A missing root has none.
    pub fn years(&self) -> Result<Vec<i32>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(|e| FrsError::io(&self.root, e))?;
        let mut years = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FrsError::io(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(year) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<i32>().ok())
            {
                years.push(year);
            }
        }
        years.sort_unstable();
        Ok(years)
    }

    pub fn latest_year(&self) -> Result<Option<i32>> {
        Ok(self.years()?.last().copied())
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.year_dir(year).is_dir()
    }

    pub fn table_names(&self, year: i32) -> Result<Vec<String>> {
        let dir = self.existing_year_dir(year)?;
        let files = list_files_with_extension(&dir, TABLE_EXTENSION)?;
        Ok(files.iter().map(|path| table_name(path)).collect())
    }

    pub fn table_path(&self, year: i32, table: &str) -> PathBuf {
        self.year_dir(year).join(table_file_name(table))
    }

    /// Reads a stored table, keyed by its first column.
    pub fn read_table(&self, year: i32, table: &str) -> Result<EntityFrame> {
        self.existing_year_dir(year)?;
        let path = self.table_path(year, table);
        if !path.is_file() {
            return Err(FrsError::TableNotFound {
                table: table.to_string(),
                year,
            });
        }
        let data = read_delimited_table(&path, b',')?;
        let frame = EntityFrame::from_keyed(table_name(&path), data)?;
        debug!(year, table = %frame.name, rows = frame.record_count(), "loaded stored table");
        Ok(frame)
    }

    /// Reads a stored table restricted to the key and `columns`.
    ///
    /// Columns are matched case-insensitively; an absent column is an error.
    pub fn read_table_columns(&self, year: i32, table: &str, columns: &[&str]) -> Result<EntityFrame> {
        let frame = self.read_table(year, table)?;
        let lookup = ColumnLookup::new(frame.column_names());
        let mut selected = vec![frame.key_column().to_string()];
        for column in columns {
            let name = lookup.get(column).ok_or_else(|| TransformError::MissingColumn {
                column: column.to_string(),
                table: frame.name.clone(),
            })?;
            if !selected.iter().any(|existing| existing == name) {
                selected.push(name.to_string());
            }
        }
        let data = frame.data.select(selected)?;
        Ok(EntityFrame::new(frame.name, frame.level, data)?)
    }

    pub fn write_table(&self, year: i32, frame: &EntityFrame) -> Result<PathBuf> {
        let dir = self.year_dir(year);
        fs::create_dir_all(&dir).map_err(|e| FrsError::io(&dir, e))?;
        let path = self.table_path(year, &frame.name);
        write_csv_table(&path, &frame.data)?;
        Ok(path)
    }

    /// Reads the year's codebook, if one was saved.
    pub fn read_codebook(&self, year: i32) -> Result<Option<Codebook>> {
        let path = self.existing_year_dir(year)?.join(CODEBOOK_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(load_codebook(&path)?))
    }

    pub fn write_codebook(&self, year: i32, codebook: &Codebook) -> Result<PathBuf> {
        let dir = self.year_dir(year);
        fs::create_dir_all(&dir).map_err(|e| FrsError::io(&dir, e))?;
        write_codebook_file(&dir, codebook)
    }

    /// Opens a hidden directory under the root that collects a full
    /// replacement for `year`.
    ///
    /// Nothing stored for the year changes until [`StagedYear::commit`].
    pub fn stage_year(&self, year: i32) -> Result<StagedYear<'_>> {
        fs::create_dir_all(&self.root).map_err(|e| FrsError::io(&self.root, e))?;
        let dir = self.scratch_dir(&format!(".staging-{year}-"))?;
        debug!(year, path = %dir.path().display(), "staging year");
        Ok(StagedYear {
            store: self,
            year,
            dir,
        })
    }

    fn scratch_dir(&self, prefix: &str) -> Result<TempDir> {
        tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&self.root)
            .map_err(|e| FrsError::io(&self.root, e))
    }

    /// Removes everything stored for `year`. Clearing an absent year is a no-op.
    pub fn clear_year(&self, year: i32) -> Result<()> {
        let dir = self.year_dir(year);
        if dir.is_dir() {
            fs::remove_dir_all(&dir).map_err(|e| FrsError::io(&dir, e))?;
            info!(year, path = %dir.display(), "cleared stored year");
        }
        Ok(())
    }

    fn existing_year_dir(&self, year: i32) -> Result<PathBuf> {
        let dir = self.year_dir(year);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(FrsError::YearNotFound { year })
        }
    }
}

/// Tables and codebook for one year, written aside until committed.
///
/// Dropping a staged year without committing removes what was written.
#[derive(Debug)]
pub struct StagedYear<'a> {
    store: &'a FrsStore,
    year: i32,
    dir: TempDir,
}

impl StagedYear<'_> {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn write_table(&self, frame: &EntityFrame) -> Result<PathBuf> {
        let path = self.dir.path().join(table_file_name(&frame.name));
        write_csv_table(&path, &frame.data)?;
        Ok(path)
    }

    pub fn write_codebook(&self, codebook: &Codebook) -> Result<PathBuf> {
        write_codebook_file(self.dir.path(), codebook)
    }

    /// Replaces the stored year with the staged contents.
    ///
    /// The previous year directory is moved aside first and restored if the
    /// staged directory cannot take its place.
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.store.year_dir(self.year);
        let retired = self.store.scratch_dir(&format!(".retired-{}-", self.year))?;
        let previous = retired.path().join(self.year.to_string());
        let had_previous = target.is_dir();
        if had_previous {
            fs::rename(&target, &previous).map_err(|e| FrsError::io(&target, e))?;
        }
        if let Err(err) = fs::rename(self.dir.path(), &target) {
            if had_previous && let Err(restore) = fs::rename(&previous, &target) {
                let kept = retired.keep();
                warn!(
                    year = self.year,
                    error = %restore,
                    kept = %kept.display(),
                    "could not restore previous year after failed commit"
                );
            }
            return Err(FrsError::io(&target, err));
        }
        info!(
            year = self.year,
            replaced = had_previous,
            path = %target.display(),
            "committed year"
        );
        Ok(target)
    }
}

fn table_file_name(table: &str) -> String {
    format!("{}.{TABLE_EXTENSION}", table.trim().to_ascii_lowercase())
}

fn write_codebook_file(dir: &Path, codebook: &Codebook) -> Result<PathBuf> {
    let path = dir.join(CODEBOOK_FILE);
    let text = serde_json::to_string_pretty(codebook)?;
    fs::write(&path, text).map_err(|e| FrsError::io(&path, e))?;
    Ok(path)
}
