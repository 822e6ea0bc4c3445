//! Resource store abstraction and the embedded-resource naming convention
//!
//! The archive travels as numbered binary resources inside the host
//! executable. All segments live under one fixed category and are named
//! `RES_CAB1`, `RES_CAB2`, and so on: 1-based decimal, no padding, no gaps.
//! A separate resource may carry a newline-delimited manifest of the file
//! names inside the archive; [`list_manifest`] exposes it as an ordered
//! sequence of path strings, independent of the extraction pipeline.

use std::collections::HashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::segments::segment_name;

/// Category tag for all archive segment resources
pub const SEGMENT_CATEGORY: &str = "RES_CAB";

/// Prefix the decimal segment index is appended to
pub const SEGMENT_PREFIX: &str = "RES_CAB";

/// Category of the optional file-name manifest resource
pub const MANIFEST_CATEGORY: &str = "CUSTOM";

/// Name of the optional file-name manifest resource
pub const MANIFEST_NAME: &str = "RES_CAB_LIST";

/// Fixed name of the assembled archive file inside the working directory
pub const ARCHIVE_FILE_NAME: &str = "setup.cab";

/// Read-only key → bytes lookup over the host module's embedded resources
///
/// The store is treated as fallible: a resource that probed as present may
/// still fail to load, and callers surface that as a missing-resource fault.
pub trait ResourceStore: Send + Sync {
    /// Load the full payload of a resource, or `None` if it does not exist
    fn load(&self, category: &str, name: &str) -> Option<Vec<u8>>;

    /// Whether a resource exists under the given category and name
    ///
    /// The default probes via [`ResourceStore::load`]; stores with a cheaper
    /// existence check should override it.
    fn contains(&self, category: &str, name: &str) -> bool {
        self.load(category, name).is_some()
    }
}

/// In-memory resource store
///
/// Used by embedding hosts that carry their payload as static byte tables
/// (e.g. `include_bytes!`) and by tests as a mock of the executable's
/// resource section.
#[derive(Clone, Debug, Default)]
pub struct MemoryResourceStore {
    entries: HashMap<(String, String), Vec<u8>>,
}

impl MemoryResourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under a category and name
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) {
        self.entries.insert((category.into(), name.into()), bytes);
    }

    /// Register an archive segment under the fixed segment naming convention
    pub fn insert_segment(&mut self, index: usize, bytes: Vec<u8>) {
        self.insert(SEGMENT_CATEGORY, segment_name(index), bytes);
    }

    /// Register the file-name manifest resource (CRLF-joined)
    pub fn insert_manifest(&mut self, names: &[&str]) {
        self.insert(
            MANIFEST_CATEGORY,
            MANIFEST_NAME,
            names.join("\r\n").into_bytes(),
        );
    }
}

impl ResourceStore for MemoryResourceStore {
    fn load(&self, category: &str, name: &str) -> Option<Vec<u8>> {
        self.entries
            .get(&(category.to_string(), name.to_string()))
            .cloned()
    }

    fn contains(&self, category: &str, name: &str) -> bool {
        self.entries
            .contains_key(&(category.to_string(), name.to_string()))
    }
}

/// Read the newline-delimited file-name manifest from the store
///
/// Splits on CRLF or LF and drops blank lines. Fails with a
/// missing-resource fault when the host carries no manifest.
pub fn list_manifest(store: &dyn ResourceStore) -> Result<Vec<String>> {
    let bytes = store
        .load(MANIFEST_CATEGORY, MANIFEST_NAME)
        .ok_or_else(|| Error::ResourceMissing {
            name: MANIFEST_NAME.to_string(),
        })?;

    let text = String::from_utf8_lossy(&bytes);
    let names: Vec<String> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    debug!(count = names.len(), "read file manifest");
    Ok(names)
}
