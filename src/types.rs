//! Core types for payload-unpack

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::resources::ResourceStore;

/// Status callback receiving human-readable progress strings
///
/// Invoked with display text only (percentage lines during assembly,
/// "name - size" lines during extraction); no machine-readable progress is
/// emitted through this channel.
pub type StatusFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Input to one extraction run
///
/// Immutable once the run begins. The store is the opaque handle to the
/// resource-bearing module; the optional working directory overrides the
/// session temp path, and the optional message replaces the default
/// "Cancelled by user" text on a user abort.
#[derive(Clone)]
pub struct ArchiveSpec {
    /// Resource store holding the embedded archive segments
    pub store: Arc<dyn ResourceStore>,
    /// Override for the working directory; session temp path when `None`.
    /// Passes through [`crate::session::Session::expand`] before use.
    pub work_dir: Option<String>,
    /// Message carried by the cancellation fault; default when `None`
    pub cancel_message: Option<String>,
}

impl ArchiveSpec {
    /// Create a spec extracting into the session temp directory
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            work_dir: None,
            cancel_message: None,
        }
    }

    /// Override the working directory (variable references are expanded)
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<String>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Set the message carried by a cancellation fault
    #[must_use]
    pub fn with_cancel_message(mut self, message: impl Into<String>) -> Self {
        self.cancel_message = Some(message.into());
        self
    }
}

impl fmt::Debug for ArchiveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSpec")
            .field("work_dir", &self.work_dir)
            .field("cancel_message", &self.cancel_message)
            .finish_non_exhaustive()
    }
}

/// Filesystem paths derived once per run
///
/// Never recomputed mid-run. The working directory is created (recursively,
/// idempotently) at resolution time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPaths {
    /// Absolute working directory the archive is assembled in and
    /// extracted into
    pub work_dir: PathBuf,
    /// Full path of the assembled archive file inside `work_dir`
    pub archive_file: PathBuf,
}

/// Cloneable handle to a run's cancellation flag
///
/// The external caller is the single writer; the assembly and extraction
/// phases read it at segment and entry boundaries. A plain atomic boolean,
/// no lock. Once set the flag stays set for the lifetime of the handle.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Create a fresh, unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the next checked boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Pipeline phase
///
/// Advances `Idle → ResolvingPaths → CountingSegments → WritingArchive →
/// ExtractingArchive → Done`; any phase can transition to `Failed` or
/// `Cancelled`. `Done`, `Failed`, and `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No run started yet
    Idle,
    /// Expanding and creating the working directory
    ResolvingPaths,
    /// Probing the resource store for the segment count
    CountingSegments,
    /// Concatenating segments into the archive file
    WritingArchive,
    /// Driving the decompression engine
    ExtractingArchive,
    /// Run completed successfully
    Done,
    /// Run aborted by an I/O or extraction fault
    Failed,
    /// Run aborted by the cancellation flag
    Cancelled,
}

impl Phase {
    /// Convert an integer phase code to a Phase
    pub fn from_u8(phase: u8) -> Self {
        match phase {
            0 => Phase::Idle,
            1 => Phase::ResolvingPaths,
            2 => Phase::CountingSegments,
            3 => Phase::WritingArchive,
            4 => Phase::ExtractingArchive,
            5 => Phase::Done,
            7 => Phase::Cancelled,
            _ => Phase::Failed,
        }
    }

    /// Convert a Phase to its integer phase code
    pub fn to_u8(self) -> u8 {
        match self {
            Phase::Idle => 0,
            Phase::ResolvingPaths => 1,
            Phase::CountingSegments => 2,
            Phase::WritingArchive => 3,
            Phase::ExtractingArchive => 4,
            Phase::Done => 5,
            Phase::Failed => 6,
            Phase::Cancelled => 7,
        }
    }

    /// Whether the run has reached a terminal phase
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed | Phase::Cancelled)
    }
}

/// Diagnostic summary of a completed run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Number of resource segments concatenated
    pub segments: usize,
    /// Total bytes written to the archive file
    pub archive_bytes: u64,
    /// Number of files the engine wrote into the working directory
    pub entries: u64,
}
