//! Output file naming.

use std::path::{Path, PathBuf};

/// Name used when the stream has no title.
pub const FALLBACK_TITLE: &str = "video";
/// Extension of the merged output file.
pub const OUTPUT_EXTENSION: &str = "mp4";
/// Maximum length, in characters, of the base name (before the extension).
pub const MAX_TITLE_CHARS: usize = 100;

const UNSAFE_CHARS: &[char] = &[' ', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replace each filesystem-unsafe character with `_`, then cut to
/// `MAX_TITLE_CHARS`. An empty title becomes `FALLBACK_TITLE`.
pub fn sanitize_title(title: &str) -> String {
    let title = if title.is_empty() { FALLBACK_TITLE } else { title };
    title
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// `<output_dir>/<sanitized title>.mp4`
pub fn build_output_path(title: &str, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", sanitize_title(title), OUTPUT_EXTENSION))
}
