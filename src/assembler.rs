//! Archive assembly: concatenating resource segments into one file on disk
//!
//! Segments are appended in strict ascending index order: the archive is an
//! order-sensitive byte stream, and assembly performs no reframing, only
//! concatenation. Progress is reported before the I/O for each segment so
//! the percentage reflects work about to start, and the cancellation flag is
//! checked once per segment boundary; a large in-flight write cannot be
//! interrupted early.

use std::fs::OpenOptions;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::resources::SEGMENT_CATEGORY;
use crate::segments::segment_name;
use crate::types::{ArchiveSpec, CancelHandle, ResolvedPaths};
use crate::utils::format_bytes;

/// Concatenate `segment_count` resource segments into the archive file
///
/// Opens the archive file with open-always semantics (created if missing,
/// not truncated) and shared read access, then appends each segment payload
/// in index order. Returns the total byte count written.
///
/// Per segment, in order: emit a percentage status line, check the
/// cancellation flag, load the payload from the store, append it. A set
/// flag fails the run with a cancellation fault carrying the spec's message
/// before any bytes for that segment are read or written; whatever was
/// already written stays on disk.
pub fn assemble(
    spec: &ArchiveSpec,
    paths: &ResolvedPaths,
    segment_count: usize,
    on_status: &dyn Fn(&str),
    cancel: &CancelHandle,
) -> Result<u64> {
    // Working-directory creation is idempotent; resolution normally did it
    // already, but the assembler owns the file and must not depend on that.
    if let Some(parent) = paths.archive_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut archive = OpenOptions::new()
        .write(true)
        .create(true)
        .open(&paths.archive_file)
        .map_err(|e| Error::Io {
            path: paths.archive_file.clone(),
            source: e,
        })?;

    let display_name = paths
        .archive_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::resources::ARCHIVE_FILE_NAME.to_string());

    let mut written_total: u64 = 0;

    for i in 1..=segment_count {
        on_status(&format!("{display_name} - {}%", (i * 100) / segment_count));

        let name = segment_name(i);
        debug!(segment = %name, "writing archive segment");

        if cancel.is_cancelled() {
            warn!(segment = %name, "assembly cancelled");
            return Err(Error::cancelled(spec.cancel_message.as_deref()));
        }

        let data = spec
            .store
            .load(SEGMENT_CATEGORY, &name)
            .ok_or_else(|| Error::ResourceMissing { name: name.clone() })?;

        archive.write_all(&data).map_err(|e| Error::SegmentWrite {
            archive: paths.archive_file.clone(),
            segment: name.clone(),
            source: e,
        })?;

        written_total += data.len() as u64;
        debug!(segment = %name, bytes = data.len(), "segment written");
    }

    info!(
        archive = ?paths.archive_file,
        segments = segment_count,
        bytes = written_total,
        "wrote {} from {} resource segment(s)",
        format_bytes(written_total),
        segment_count
    );

    Ok(written_total)
}
