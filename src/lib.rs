//! # payload-unpack
//!
//! Reassembles and extracts a multi-segment compressed archive that travels
//! as binary resources inside a host executable, the file-set carrier of a
//! self-contained installer. The pipeline discovers how many resource
//! segments make up the archive, concatenates them into one archive file in
//! a working directory, and drives a decompression engine over that file
//! with per-entry progress reporting and cooperative cancellation.
//!
//! ## Design Philosophy
//!
//! - **Collaborators behind traits** - the resource store, the decompression
//!   engine, and the session environment are seams, swappable in tests
//! - **Strictly sequential** - one worker context, data flows forward only
//! - **Cooperative cancellation** - a shared flag read at segment and entry
//!   boundaries; no mid-operation interruption
//! - **No hidden recovery** - any fault aborts the run; partial output stays
//!   on disk for the caller to inspect or clean up
//!
//! ## Quick Start
//!
//! ```no_run
//! use payload_unpack::{ArchiveSpec, ExtractionPipeline, MemoryResourceStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MemoryResourceStore::new();
//!     store.insert_segment(1, vec![/* archive bytes, part 1 */]);
//!     store.insert_segment(2, vec![/* archive bytes, part 2 */]);
//!
//!     let pipeline = ExtractionPipeline::new().on_status(|line| println!("{line}"));
//!     let cancel = pipeline.cancel_handle();
//!
//!     let report = pipeline.run(ArchiveSpec::new(Arc::new(store))).await?;
//!     println!("extracted {} file(s)", report.entries);
//!     # let _ = cancel;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Archive assembly from resource segments
pub mod assembler;
/// Error types
pub mod error;
/// Archive extraction and the engine seam
pub mod extraction;
/// Pipeline orchestration
pub mod pipeline;
/// Resource store abstraction and naming convention
pub mod resources;
/// Segment discovery
pub mod segments;
/// Session environment (temp path, variable expansion)
pub mod session;
/// Core types
pub mod types;
/// Display formatting helpers
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extraction::{EntryInfo, ExtractionEngine, ZipEngine};
pub use pipeline::ExtractionPipeline;
pub use resources::{
    ARCHIVE_FILE_NAME, MemoryResourceStore, ResourceStore, list_manifest,
};
pub use session::{ProcessSession, Session};
pub use types::{ArchiveSpec, CancelHandle, Phase, Report, ResolvedPaths, StatusFn};
