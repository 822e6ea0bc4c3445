//! Decompression engine seam
//!
//! The engine walks the assembled archive's file table and writes out each
//! entry, calling back twice per entry. The hooks are explicit closure
//! parameters rather than an inheritance relationship, which keeps the
//! cancellation and progress logic independent of any particular engine's
//! dispatch mechanism and makes the engine swappable in tests.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// One file record inside the archive, as presented by the engine's table
///
/// Owned entirely by the engine; the pipeline only observes it through hook
/// parameters and never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    /// Entry path relative to the archive root
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
}

/// Hook invoked before an entry is written
///
/// Returning an error aborts the extraction: the current entry and all
/// subsequent entries are not extracted, and the error propagates out of
/// [`ExtractionEngine::extract`] unchanged.
pub type BeforeEntry<'a> = &'a mut dyn FnMut(&EntryInfo) -> Result<()>;

/// Hook invoked after an entry has been fully written to its final path
pub type AfterEntry<'a> = &'a mut dyn FnMut(&Path);

/// An archive-extraction engine
///
/// Implementations parse the archive's internal file table and extract
/// entries into `dest` in table order, driving the two hooks around each
/// entry. Initialization failures (unreadable archive, unsupported format)
/// must be reported as extraction faults naming the archive path.
pub trait ExtractionEngine: Send + Sync {
    /// Extract `archive` into `dest`, invoking `before` and `after` per entry
    fn extract(
        &self,
        archive: &Path,
        dest: &Path,
        before: BeforeEntry<'_>,
        after: AfterEntry<'_>,
    ) -> Result<()>;
}
