//! Segment discovery over the resource store
//!
//! The segment count is never stored anywhere: it is discovered by probing
//! names in index order, and the absence of segment `N+1` is the terminal
//! signal. A gap terminates enumeration even if later indices happen to
//! exist, because the archive is a byte stream and a run with a hole in it
//! cannot be assembled.

use tracing::debug;

use crate::resources::{ResourceStore, SEGMENT_CATEGORY, SEGMENT_PREFIX};

/// Symbolic resource name of the segment at a 1-based index
pub fn segment_name(index: usize) -> String {
    format!("{SEGMENT_PREFIX}{index}")
}

/// Count the contiguous archive segments present in the store
///
/// Probes `RES_CAB1`, `RES_CAB2`, … and returns the length of the maximal
/// contiguous run starting at 1. Returns 0 when even segment 1 is absent;
/// that is not an error at this layer; the caller decides what an empty
/// segment set means.
pub fn count_segments(store: &dyn ResourceStore) -> usize {
    let mut index = 1;
    while store.contains(SEGMENT_CATEGORY, &segment_name(index)) {
        index += 1;
    }

    let count = index - 1;
    debug!(count, "probed archive segment count");
    count
}
