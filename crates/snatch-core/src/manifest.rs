//! HLS media playlist parsing.
//!
//! Only the parts needed to fetch segments in order are read: `#EXTINF:` gives
//! the duration of the next content line, other `#` lines are ignored, and every
//! remaining non-blank line is a segment location.

use crate::error::SnatchError;
use crate::model::{Segment, DEFAULT_SEGMENT_DURATION};
use std::time::Duration;
use url::Url;

const EXTINF_PREFIX: &str = "#EXTINF:";
const COMMENT_PREFIX: char = '#';

/// Segments in playback order plus their summed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedManifest {
    pub segments: Vec<Segment>,
    pub total_duration: Duration,
}

/// Directory component of a manifest URL, with query and fragment dropped.
///
/// `https://h/video/sub/index.m3u8?token=1` → `https://h/video/sub/`
pub fn base_url(manifest_url: &str) -> Result<String, SnatchError> {
    let mut url = Url::parse(manifest_url).map_err(|source| SnatchError::InvalidUrl {
        url: manifest_url.to_string(),
        source,
    })?;
    let dir = match url.path().rfind('/') {
        Some(i) => url.path()[..=i].to_string(),
        None => "/".to_string(),
    };
    url.set_path(&dir);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// True when `s` is a full http(s) URL and needs no base.
pub(crate) fn is_absolute(s: &str) -> bool {
    Url::parse(s).map_or(false, |u| matches!(u.scheme(), "http" | "https"))
}

/// Parse playlist text. Relative segment lines are prefixed with `base_url`.
pub fn parse(text: &str, base_url: &str) -> Result<ParsedManifest, SnatchError> {
    let mut segments = Vec::new();
    let mut current_duration = DEFAULT_SEGMENT_DURATION;

    for line in text.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix(EXTINF_PREFIX) {
            current_duration = parse_extinf(rest);
            continue;
        }
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let url = if is_absolute(line) {
            line.to_string()
        } else {
            format!("{}{}", base_url, line)
        };
        segments.push(Segment::new(url, segments.len(), current_duration));
    }

    if segments.is_empty() {
        return Err(SnatchError::NoSegments);
    }

    let total: f64 = segments.iter().map(|s| s.duration).sum();
    // Saturates when absurd EXTINF values overflow `Duration` or sum to infinity.
    let total_duration = Duration::try_from_secs_f64(total).unwrap_or(Duration::MAX);
    Ok(ParsedManifest {
        segments,
        total_duration,
    })
}

/// `10.010,title` → 10.01. Anything unusable falls back to the default.
fn parse_extinf(rest: &str) -> f64 {
    let value = rest.split(',').next().unwrap_or("").trim();
    match value.parse::<f64>() {
        Ok(d) if d.is_finite() && d >= 0.0 => d,
        _ => DEFAULT_SEGMENT_DURATION,
    }
}
