//! Single-segment GET written verbatim to its own file.

use super::SegmentFetcher;
use crate::http::{HeaderSet, HttpClient};
use crate::model::Segment;
use crate::retry::SegmentError;
use std::path::Path;

/// Curl-backed segment fetcher.
#[derive(Debug, Clone, Copy)]
pub struct CurlSegmentFetcher {
    client: HttpClient,
}

impl CurlSegmentFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

impl SegmentFetcher for CurlSegmentFetcher {
    fn fetch(&self, segment: &Segment, headers: &HeaderSet, dest: &Path) -> Result<(), SegmentError> {
        let bytes = self.client.get_to_file(&segment.url, headers, dest)?;
        tracing::trace!(index = segment.index, bytes, "segment written");
        Ok(())
    }
}
