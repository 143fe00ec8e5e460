//! Per-segment results and reconstruction of the final segment list.

use crate::model::Segment;
use crate::retry::SegmentError;
use std::collections::HashSet;

/// Result of one segment after all its attempts.
#[derive(Debug)]
pub struct SegmentOutcome {
    pub index: usize,
    pub filename: String,
    pub result: Result<(), SegmentError>,
}

impl SegmentOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Segments whose index is in `downloaded`, sorted by index. Completion order
/// plays no part.
pub(super) fn in_index_order(segments: &[Segment], downloaded: &HashSet<usize>) -> Vec<Segment> {
    let mut kept: Vec<Segment> = segments
        .iter()
        .filter(|s| downloaded.contains(&s.index))
        .cloned()
        .collect();
    kept.sort_by_key(|s| s.index);
    kept
}
