//! Archive extraction with per-entry progress and cooperative cancellation
//!
//! Drives an [`ExtractionEngine`] against the assembled archive file. Before
//! each entry the extractor emits a "name - size" status line and checks the
//! cancellation flag; a set flag aborts that entry and everything after it.
//! After each entry it logs the final path. Cancellation is only actionable
//! before work starts on an entry; there is no check mid-entry and none
//! after, since the work is already done by then.

mod engine;
mod zip;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

// Re-exports
pub use engine::{AfterEntry, BeforeEntry, EntryInfo, ExtractionEngine};
pub use zip::ZipEngine;

use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{ArchiveSpec, CancelHandle, ResolvedPaths};
use crate::utils::format_bytes;

/// Extract the assembled archive into the working directory
///
/// Returns the number of files the engine wrote. Engine initialization and
/// extraction failures surface as extraction faults naming the archive path;
/// a cancellation observed at an entry boundary surfaces as a cancellation
/// fault carrying the spec's message.
pub fn extract(
    engine: &dyn ExtractionEngine,
    spec: &ArchiveSpec,
    paths: &ResolvedPaths,
    on_status: &dyn Fn(&str),
    cancel: &CancelHandle,
) -> Result<u64> {
    debug!(archive = ?paths.archive_file, dest = ?paths.work_dir, "extracting archive");

    let cancel_message = spec.cancel_message.clone();
    let mut entries: u64 = 0;

    let mut before = |entry: &EntryInfo| -> Result<()> {
        debug!(entry = %entry.name, size = entry.size, "extracting entry");
        on_status(&format!("{} - {}", entry.name, format_bytes(entry.size)));

        if cancel.is_cancelled() {
            return Err(Error::cancelled(cancel_message.as_deref()));
        }
        Ok(())
    };

    let mut after = |path: &Path| {
        debug!(path = ?path, "entry extracted");
        entries += 1;
    };

    match engine.extract(&paths.archive_file, &paths.work_dir, &mut before, &mut after) {
        Ok(()) => {
            info!(archive = ?paths.archive_file, entries, "archive extracted");
            Ok(entries)
        }
        // Cancellation and already-attributed extraction faults pass through
        Err(e @ Error::Cancelled { .. }) | Err(e @ Error::Extraction { .. }) => Err(e),
        Err(e) => Err(Error::Extraction {
            archive: paths.archive_file.clone(),
            reason: e.to_string(),
        }),
    }
}
