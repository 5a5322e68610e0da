//! Zipped release extraction.

use std::fs::File;
use std::path::Path;

use tracing::info;
use zip::ZipArchive;

use crate::error::{IngestError, Result};

/// Extract every entry of a zip archive into `destination`.
///
/// Entry paths that would escape `destination` are rejected by the zip
/// crate itself.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<()> {
    if !archive_path.is_file() {
        return Err(IngestError::FileNotFound {
            path: archive_path.to_path_buf(),
        });
    }
    let file = File::open(archive_path).map_err(|source| IngestError::FileRead {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| IngestError::Archive {
        path: archive_path.to_path_buf(),
        message: e.to_string(),
    })?;
    let entries = archive.len();
    archive
        .extract(destination)
        .map_err(|e| IngestError::Archive {
            path: archive_path.to_path_buf(),
            message: e.to_string(),
        })?;
    info!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        entries,
        "extracted release archive"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    #[test]
    fn extracts_nested_entries() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("release.zip");
        {
            let file = File::create(&archive_path).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let options = SimpleFileOptions::default();
            zip.start_file("UKDA-8802-tab/tab/househol.tab", options)
                .unwrap();
            zip.write_all(b"SERNUM\tGROSS4\n1\t1000\n").unwrap();
            zip.finish().unwrap();
        }
        let out = dir.path().join("out");

        extract_zip(&archive_path, &out).unwrap();

        assert!(out.join("UKDA-8802-tab/tab/househol.tab").is_file());
    }

    #[test]
    fn rejects_non_zip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("release.zip");
        std::fs::write(&path, "not a zip").unwrap();
        let err = extract_zip(&path, dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::Archive { .. }));
    }
}
