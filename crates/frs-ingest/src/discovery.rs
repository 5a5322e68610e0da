//! Locating table files inside a release or store directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Where a release keeps its tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseLayout {
    /// Tab-delimited extracts (`tab/*.tab`).
    Tab(PathBuf),
    /// SAS extracts (`sas/*.sas7bdat`); recognised but not readable.
    Sas(PathBuf),
}

/// Lists files in `dir` whose extension matches `extension` (case-insensitive).
///
/// Returns files sorted by filename.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);

        if matches {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Table name for a data file: its lower-cased stem.
pub fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Finds the data folder of an extracted release.
///
/// Looks in `folder` itself, then in each immediate subdirectory (in name
/// order), for a `tab` folder. A `sas` folder is reported only when no
/// `tab` folder exists anywhere.
pub fn locate_release_data(folder: &Path) -> Result<ReleaseLayout> {
    if !folder.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: folder.to_path_buf(),
        });
    }
    let mut candidates = vec![folder.to_path_buf()];
    candidates.extend(subdirectories(folder)?);

    let mut sas = None;
    for candidate in &candidates {
        let tab = candidate.join("tab");
        if tab.is_dir() {
            debug!(path = %tab.display(), "found tab-delimited release data");
            return Ok(ReleaseLayout::Tab(tab));
        }
        let sas_dir = candidate.join("sas");
        if sas.is_none() && sas_dir.is_dir() {
            sas = Some(sas_dir);
        }
    }
    match sas {
        Some(path) => Ok(ReleaseLayout::Sas(path)),
        None => Err(IngestError::UnsupportedRelease {
            path: folder.to_path_buf(),
            reason: "no tab or sas data folder found".to_string(),
        }),
    }
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
