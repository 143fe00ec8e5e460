//! Stream and segment data model shared by the resolver, parser and downloader.

use std::collections::HashMap;
use std::time::Duration;

/// Extension of every segment file written to disk.
pub const SEGMENT_EXTENSION: &str = "ts";

/// Duration applied to a segment when no usable `#EXTINF` value precedes it.
pub const DEFAULT_SEGMENT_DURATION: f64 = 10.0;

/// One fetchable unit of a media stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Absolute URL of the segment.
    pub url: String,
    /// Zero-based position among the manifest's content lines. Stable ordering key.
    pub index: usize,
    /// Playback duration in seconds.
    pub duration: f64,
    /// Local file name, derived from `index` only.
    pub filename: String,
}

impl Segment {
    pub fn new(url: impl Into<String>, index: usize, duration: f64) -> Self {
        Self {
            url: url.into(),
            index,
            duration,
            filename: segment_filename(index),
        }
    }
}

/// Zero-padded, index-derived file name. Distinct indices never share a name.
pub fn segment_filename(index: usize) -> String {
    format!("segment_{:04}.{}", index, SEGMENT_EXTENSION)
}

/// Everything known about one extraction session.
#[derive(Debug, Clone, Default)]
pub struct StreamInfo {
    /// Page the manifest was discovered on.
    pub page_url: String,
    pub manifest_url: String,
    /// Directory component of `manifest_url`; prefix for relative segment lines.
    pub base_url: String,
    pub title: Option<String>,
    /// Quality hint carried from the config; not interpreted.
    pub quality: String,
    /// Sum of all segment durations.
    pub duration: Duration,
    /// Segments in playback order.
    pub segments: Vec<Segment>,
    /// Extra headers replayed on every segment request (override defaults by name).
    pub headers: HashMap<String, String>,
}

impl StreamInfo {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            ..Self::default()
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_zero_padded_and_index_derived() {
        assert_eq!(segment_filename(0), "segment_0000.ts");
        assert_eq!(segment_filename(42), "segment_0042.ts");
        assert_eq!(segment_filename(12345), "segment_12345.ts");
    }

    #[test]
    fn segment_new_derives_filename() {
        let seg = Segment::new("https://h/a.ts", 7, 4.5);
        assert_eq!(seg.filename, "segment_0007.ts");
        assert_eq!(seg.index, 7);
    }
}
