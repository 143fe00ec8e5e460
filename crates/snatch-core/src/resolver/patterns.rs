//! Ordered manifest URL patterns.
//!
//! Each pattern has exactly one capture group holding the candidate URL. The
//! table is tried top to bottom and the first match wins, so entries go from
//! most to least specific: player config keys, then any quoted absolute
//! `.m3u8`, then any quoted absolute URL mentioning m3u8, then a quoted
//! relative `.m3u8` reference.

use regex::Regex;
use std::sync::OnceLock;

const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("source-key", r#"source:\s*['"](https?://[^'"]*\.m3u8[^'"]*?)['"]"#),
    ("src-key", r#"src:\s*['"](https?://[^'"]*\.m3u8[^'"]*?)['"]"#),
    ("file-key", r#"file:\s*['"](https?://[^'"]*\.m3u8[^'"]*?)['"]"#),
    ("url-key", r#"url:\s*['"](https?://[^'"]*\.m3u8[^'"]*?)['"]"#),
    ("quoted-m3u8", r#"['"](https?://[^'"]*\.m3u8[^'"]*?)['"]"#),
    ("quoted-m3u8-loose", r#"['"](https?://[^'"]*m3u8[^'"]*?)['"]"#),
    ("quoted-relative-m3u8", r#"['"]([^'"\s<>]+\.m3u8(?:\?[^'"\s<>]*)?)['"]"#),
];

/// One entry of the pattern table.
#[derive(Debug, Clone)]
pub struct ManifestPattern {
    pub name: &'static str,
    regex: Regex,
}

impl ManifestPattern {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
        })
    }

    /// First capture in `text`, if any.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// Built-in table, compiled once.
pub fn default_patterns() -> &'static [ManifestPattern] {
    static PATTERNS: OnceLock<Vec<ManifestPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DEFAULT_PATTERNS
            .iter()
            .map(|(name, p)| ManifestPattern::new(name, p).expect("built-in manifest pattern"))
            .collect()
    })
}
