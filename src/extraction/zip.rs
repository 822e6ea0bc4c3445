//! ZIP-backed extraction engine

use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::engine::{AfterEntry, BeforeEntry, EntryInfo, ExtractionEngine};

/// Extraction engine backed by the `zip` crate
///
/// Reads the archive's central directory once at initialization, then
/// extracts entries in table order. Entries whose path escapes the
/// destination are skipped rather than written.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipEngine;

impl ZipEngine {
    /// Create a ZIP engine
    pub fn new() -> Self {
        Self
    }
}

impl ExtractionEngine for ZipEngine {
    fn extract(
        &self,
        archive_path: &Path,
        dest_path: &Path,
        before: BeforeEntry<'_>,
        after: AfterEntry<'_>,
    ) -> Result<()> {
        std::fs::create_dir_all(dest_path).map_err(|e| Error::Io {
            path: dest_path.to_path_buf(),
            source: e,
        })?;

        // Opening the file and reading the central directory is engine
        // initialization; both failure modes name the archive path.
        let file = std::fs::File::open(archive_path).map_err(|e| Error::Extraction {
            archive: archive_path.to_path_buf(),
            reason: format!("failed to open archive: {}", e),
        })?;

        let mut archive = zip::ZipArchive::new(file).map_err(|e| Error::Extraction {
            archive: archive_path.to_path_buf(),
            reason: format!("failed to read archive table: {}", e),
        })?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| Error::Extraction {
                archive: archive_path.to_path_buf(),
                reason: format!("failed to read entry {}: {}", i, e),
            })?;

            let info = EntryInfo {
                name: entry.name().to_string(),
                size: entry.size(),
            };
            before(&info)?;

            let out_path = match entry.enclosed_name() {
                Some(path) => dest_path.join(path),
                None => {
                    warn!(entry = %info.name, "skipping entry with unsafe path");
                    continue;
                }
            };

            if entry.is_dir() {
                std::fs::create_dir_all(&out_path).map_err(|e| Error::Io {
                    path: out_path.clone(),
                    source: e,
                })?;
                continue;
            }

            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            let mut out = std::fs::File::create(&out_path).map_err(|e| Error::Io {
                path: out_path.clone(),
                source: e,
            })?;
            std::io::copy(&mut entry, &mut out).map_err(|e| Error::Io {
                path: out_path.clone(),
                source: e,
            })?;
            debug!(path = ?out_path, bytes = info.size, "entry written");

            after(&out_path);
        }

        Ok(())
    }
}
