//! Release save pipeline.
//!
//! A release downloaded from the UK Data Service is a zip whose single
//! top-level folder holds `tab/*.tab`. Saving extracts it to a temporary
//! directory, indexes each raw table into a staging directory and only then
//! swaps it in for whatever was stored under the year before. A failure at
//! any stage leaves the stored year as it was.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use frs_ingest::{
    IngestError, RawTableSource, ReleaseLayout, TabDirectory, extract_zip, load_codebook,
    locate_release_data,
};
use frs_model::EntityLevel;
use frs_transform::{index_table, resolve_level};

use crate::error::{FrsError, Result};
use crate::store::{FrsStore, StagedYear};

#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// `source` is an already-extracted folder rather than a zip.
    pub extracted: bool,
    /// Codebook JSON to store alongside the tables.
    pub codebook: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedTable {
    pub name: String,
    pub level: EntityLevel,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SaveSummary {
    pub year: i32,
    pub tables: Vec<SavedTable>,
    /// Number of codebook variables stored, if a codebook was given.
    pub codebook_variables: Option<usize>,
}

/// Saves a release into `store` as `year`.
pub fn save_release(
    store: &FrsStore,
    source: &Path,
    year: i32,
    options: &SaveOptions,
) -> Result<SaveSummary> {
    if !source.exists() {
        return Err(IngestError::FileNotFound {
            path: source.to_path_buf(),
        }
        .into());
    }
    // Parse the codebook up front so a bad file leaves the store untouched.
    let codebook = options
        .codebook
        .as_deref()
        .map(load_codebook)
        .transpose()?;

    let extraction = if options.extracted {
        None
    } else {
        let dir = tempfile::tempdir().map_err(|e| FrsError::io(std::env::temp_dir(), e))?;
        extract_zip(source, dir.path())?;
        Some(dir)
    };
    let folder = extraction
        .as_ref()
        .map_or_else(|| source.to_path_buf(), |dir| dir.path().to_path_buf());

    let tab_dir = match locate_release_data(&folder)? {
        ReleaseLayout::Tab(dir) => dir,
        ReleaseLayout::Sas(dir) => {
            warn!(path = %dir.display(), "release only ships SAS data");
            return Err(IngestError::UnsupportedRelease {
                path: dir,
                reason: "SAS7BDAT files are not supported; use the tab-delimited release"
                    .to_string(),
            }
            .into());
        }
    };

    info!(year, source = %source.display(), "saving FRS release");
    let staged = store.stage_year(year)?;
    let mut summary = stage_tables(&staged, &TabDirectory::new(tab_dir))?;
    if let Some(codebook) = codebook {
        staged.write_codebook(&codebook)?;
        summary.codebook_variables = Some(codebook.len());
    }
    staged.commit()?;
    info!(
        year,
        tables = summary.tables.len(),
        codebook = summary.codebook_variables.unwrap_or(0),
        "saved FRS release"
    );
    Ok(summary)
}

/// Indexes every table of `source` and stores it as `year`.
///
/// Existing data for the year is replaced only once every table has been
/// indexed and written.
pub fn save_tables(
    store: &FrsStore,
    source: &dyn RawTableSource,
    year: i32,
) -> Result<SaveSummary> {
    let staged = store.stage_year(year)?;
    let summary = stage_tables(&staged, source)?;
    staged.commit()?;
    Ok(summary)
}

fn stage_tables(staged: &StagedYear<'_>, source: &dyn RawTableSource) -> Result<SaveSummary> {
    let year = staged.year();
    let names = source.table_names()?;
    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let raw = source.read_table(&name)?;
        let level = resolve_level(&name, &raw);
        let frame = index_table(&name, &raw, level)?;
        staged.write_table(&frame)?;
        info!(
            year,
            table = %name,
            level = %level,
            rows = frame.record_count(),
            "staged table"
        );
        tables.push(SavedTable {
            name,
            level,
            rows: frame.record_count(),
            columns: frame.data.width(),
        });
    }
    Ok(SaveSummary {
        year,
        tables,
        codebook_variables: None,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_release(root: &Path) {
        let tab = root.join("UKDA-1234-tab").join("tab");
        fs::create_dir_all(&tab).unwrap();
        fs::write(
            tab.join("adult.tab"),
            "SERNUM\tBENUNIT\tPERSON\tINEARNS\n1\t0\t1\t1000\n1\t0\t2\t0\n",
        )
        .unwrap();
        fs::write(tab.join("househol.tab"), "SERNUM\tGROSS4\tMONTH\n1\t1500\t4\n").unwrap();
    }

    #[test]
    fn saves_extracted_release() {
        let release = TempDir::new().unwrap();
        write_release(release.path());
        let data = TempDir::new().unwrap();
        let store = FrsStore::new(data.path());

        let options = SaveOptions {
            extracted: true,
            codebook: None,
        };
        let summary = save_release(&store, release.path(), 2019, &options).unwrap();
        let names: Vec<_> = summary.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["adult", "househol"]);
        assert_eq!(summary.tables[0].level, EntityLevel::Person);

        let household = store.read_table(2019, "househol").unwrap();
        assert_eq!(household.column_names(), vec!["household_id", "GROSS4"]);
    }

    #[test]
    fn failed_resave_keeps_previous_year() {
        let release = TempDir::new().unwrap();
        write_release(release.path());
        let data = TempDir::new().unwrap();
        let store = FrsStore::new(data.path());
        let options = SaveOptions {
            extracted: true,
            codebook: None,
        };
        save_release(&store, release.path(), 2019, &options).unwrap();

        let broken = TempDir::new().unwrap();
        write_release(broken.path());
        // A person-level table without a person number cannot be indexed.
        fs::write(
            broken.path().join("UKDA-1234-tab").join("tab").join("job.tab"),
            "SERNUM\tBENUNIT\tJOBTYPE\n1\t0\t2\n",
        )
        .unwrap();
        let err = save_release(&store, broken.path(), 2019, &options).unwrap_err();
        assert!(matches!(err, FrsError::Transform(_)));

        assert_eq!(store.table_names(2019).unwrap(), vec!["adult", "househol"]);
        let adult = store.read_table(2019, "adult").unwrap();
        assert_eq!(adult.record_count(), 2);
        assert_eq!(fs::read_dir(data.path()).unwrap().count(), 1);
    }

    #[test]
    fn sas_only_release_is_rejected() {
        let release = TempDir::new().unwrap();
        fs::create_dir_all(release.path().join("UKDA-1234-sas").join("sas")).unwrap();
        let data = TempDir::new().unwrap();
        let store = FrsStore::new(data.path());
        let options = SaveOptions {
            extracted: true,
            codebook: None,
        };
        let err = save_release(&store, release.path(), 2019, &options).unwrap_err();
        assert!(matches!(
            err,
            FrsError::Ingest(IngestError::UnsupportedRelease { .. })
        ));
        assert!(!store.has_year(2019));
    }
}
