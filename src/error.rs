//! Error types for payload-unpack
//!
//! Every failure aborts the current run immediately: there are no internal
//! retries, and partially written output (an incomplete archive file,
//! partially extracted entries) is left on disk for the caller to clean up.
//! Cancellation is mechanically a run-terminating fault too, but callers that
//! want to tell a user abort apart from a genuine failure can test for it
//! with [`Error::is_cancelled`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for payload-unpack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message attached to a cancellation fault when the caller supplied none
const DEFAULT_CANCEL_MESSAGE: &str = "Cancelled by user";

/// Main error type for payload-unpack
///
/// Display output is human-readable and final; no further translation is
/// expected downstream.
#[derive(Debug, Error)]
pub enum Error {
    /// Directory or file creation, open, or write failure
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The filesystem path the operation failed on
        path: PathBuf,
        /// The underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A resource the store was expected to resolve is absent
    #[error("resource '{name}' not found")]
    ResourceMissing {
        /// The symbolic resource name that failed to resolve
        name: String,
    },

    /// Writing a segment payload into the archive file failed
    #[error("error writing {archive} at resource '{segment}': {source}")]
    SegmentWrite {
        /// The archive file being assembled
        archive: PathBuf,
        /// The segment resource whose bytes could not be appended
        segment: String,
        /// The underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Decompression engine initialization or extraction failure
    #[error("error extracting {archive}: {reason}")]
    Extraction {
        /// The archive file that failed to extract
        archive: PathBuf,
        /// The reason extraction failed
        reason: String,
    },

    /// The cancellation flag was observed at a checked boundary
    #[error("{message}")]
    Cancelled {
        /// Caller-supplied message, or the default "Cancelled by user"
        message: String,
    },
}

impl Error {
    /// Build a cancellation fault, falling back to the default message when
    /// the caller supplied none.
    pub fn cancelled(message: Option<&str>) -> Self {
        Self::Cancelled {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_CANCEL_MESSAGE)
                .to_string(),
        }
    }

    /// Whether this fault was raised by the cooperative cancellation flag
    /// rather than a genuine I/O or extraction failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
