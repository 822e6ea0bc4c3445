//! Extraction pipeline orchestration
//!
//! Runs path resolution → segment counting → archive assembly → archive
//! extraction in strict sequence on a single worker context. The pipeline
//! owns the cancellation flag and hands callers a [`CancelHandle`] clone;
//! any phase failure terminates the run with no retries; retry policy, if
//! wanted, belongs to the caller.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};

use crate::assembler;
use crate::error::{Error, Result};
use crate::extraction::{self, ExtractionEngine, ZipEngine};
use crate::resources::ARCHIVE_FILE_NAME;
use crate::segments::{count_segments, segment_name};
use crate::session::{ProcessSession, Session};
use crate::types::{ArchiveSpec, CancelHandle, Phase, Report, ResolvedPaths, StatusFn};

/// Orchestrator for one-archive extraction runs
///
/// Construction wires up the collaborators (session, engine, status sink);
/// [`ExtractionPipeline::run`] executes a spec to completion. The pipeline
/// is cheap to clone and holds no per-run state beyond the observable phase
/// and the shared cancellation flag.
#[derive(Clone)]
pub struct ExtractionPipeline {
    session: Arc<dyn Session>,
    engine: Arc<dyn ExtractionEngine>,
    status: Option<StatusFn>,
    cancel: CancelHandle,
    phase: Arc<AtomicU8>,
}

impl ExtractionPipeline {
    /// Create a pipeline with the process session and the ZIP engine
    pub fn new() -> Self {
        Self {
            session: Arc::new(ProcessSession),
            engine: Arc::new(ZipEngine::new()),
            status: None,
            cancel: CancelHandle::new(),
            phase: Arc::new(AtomicU8::new(Phase::Idle.to_u8())),
        }
    }

    /// Replace the session environment provider
    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = session;
        self
    }

    /// Replace the decompression engine
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn ExtractionEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Register the status callback receiving display strings
    #[must_use]
    pub fn on_status(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.status = Some(Arc::new(callback));
        self
    }

    /// Handle the caller uses to request cancellation of the run
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Current pipeline phase
    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Relaxed))
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.store(phase.to_u8(), Ordering::Relaxed);
    }

    /// Run the pipeline on the current thread
    ///
    /// Intended for hosts without an async runtime; identical semantics to
    /// [`ExtractionPipeline::run`].
    pub fn run_blocking(&self, spec: &ArchiveSpec) -> Result<Report> {
        let result = self.execute(spec);
        match &result {
            Ok(report) => {
                self.set_phase(Phase::Done);
                info!(
                    segments = report.segments,
                    archive_bytes = report.archive_bytes,
                    entries = report.entries,
                    "extraction run complete"
                );
            }
            Err(e) if e.is_cancelled() => {
                self.set_phase(Phase::Cancelled);
                warn!("extraction run cancelled");
            }
            Err(e) => {
                self.set_phase(Phase::Failed);
                warn!(error = %e, "extraction run failed");
            }
        }
        result
    }

    /// Run the pipeline off the async runtime's worker threads
    ///
    /// Dispatches the sequential run onto the blocking pool so a host
    /// application's control thread stays responsive. A panic inside the
    /// run surfaces as an extraction fault.
    pub async fn run(&self, spec: ArchiveSpec) -> Result<Report> {
        let pipeline = self.clone();
        spawn_blocking(move || pipeline.run_blocking(&spec))
            .await
            .map_err(|e| Error::Extraction {
                archive: PathBuf::from(ARCHIVE_FILE_NAME),
                reason: format!("extraction task panicked: {}", e),
            })?
    }

    fn execute(&self, spec: &ArchiveSpec) -> Result<Report> {
        self.set_phase(Phase::ResolvingPaths);
        let paths = self.resolve_paths(spec)?;

        self.set_phase(Phase::CountingSegments);
        let segments = count_segments(spec.store.as_ref());
        if segments == 0 {
            // Nothing to assemble: the payload is absent or mispackaged
            return Err(Error::ResourceMissing {
                name: segment_name(1),
            });
        }

        let status = |line: &str| {
            if let Some(callback) = self.status.as_ref() {
                callback(line);
            }
        };

        self.set_phase(Phase::WritingArchive);
        let archive_bytes = assembler::assemble(spec, &paths, segments, &status, &self.cancel)?;

        self.set_phase(Phase::ExtractingArchive);
        let entries = extraction::extract(
            self.engine.as_ref(),
            spec,
            &paths,
            &status,
            &self.cancel,
        )?;

        Ok(Report {
            segments,
            archive_bytes,
            entries,
        })
    }

    /// Derive the run's filesystem paths from the spec and the session
    ///
    /// Computed once per run and never revisited. The working directory is
    /// expanded, made absolute, and created (with intermediates) if absent.
    fn resolve_paths(&self, spec: &ArchiveSpec) -> Result<ResolvedPaths> {
        let raw = spec
            .work_dir
            .clone()
            .unwrap_or_else(|| self.session.temp_dir().to_string_lossy().into_owned());
        let expanded = self.session.expand(&raw);
        let work_dir = PathBuf::from(expanded);

        std::fs::create_dir_all(&work_dir).map_err(|e| Error::Io {
            path: work_dir.clone(),
            source: e,
        })?;
        let work_dir = work_dir.canonicalize().map_err(|e| Error::Io {
            path: work_dir.clone(),
            source: e,
        })?;

        let archive_file = work_dir.join(ARCHIVE_FILE_NAME);
        debug!(work_dir = ?work_dir, archive_file = ?archive_file, "resolved paths");

        Ok(ResolvedPaths {
            work_dir,
            archive_file,
        })
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}
