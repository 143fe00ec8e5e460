//! Manifest resolver: fetch a page and find the HLS manifest URL inside it.
//!
//! Pattern priority is data (see `patterns`), not control flow; the scan only
//! walks the table in order.

mod patterns;

pub use patterns::{default_patterns, ManifestPattern};

use crate::error::SnatchError;
use crate::http::{page_headers, HttpClient};
use crate::manifest::is_absolute;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Source of page and manifest text.
pub trait PageFetcher: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String, SnatchError>;
}

/// Curl-backed fetcher sending the browser-like page headers.
#[derive(Debug, Clone)]
pub struct CurlPageFetcher {
    client: HttpClient,
    user_agent: String,
}

impl CurlPageFetcher {
    pub fn new(client: HttpClient, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }
}

impl PageFetcher for CurlPageFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, SnatchError> {
        let headers = page_headers(&self.user_agent, url);
        tracing::debug!(url, "GET page");
        self.client
            .get_text(url, &headers)
            .map_err(|source| SnatchError::Fetch {
                url: url.to_string(),
                source,
            })
    }
}

/// Turns a page URL into a manifest URL.
pub struct ManifestResolver<'a> {
    fetcher: &'a dyn PageFetcher,
    patterns: &'a [ManifestPattern],
}

impl<'a> ManifestResolver<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self {
            fetcher,
            patterns: default_patterns(),
        }
    }

    pub fn with_patterns(fetcher: &'a dyn PageFetcher, patterns: &'a [ManifestPattern]) -> Self {
        Self { fetcher, patterns }
    }

    pub fn resolve(&self, page_url: &str) -> Result<String, SnatchError> {
        self.resolve_page(page_url).map(|page| page.manifest_url)
    }

    /// Like `resolve`, also picking up the page `<title>` for output naming.
    pub fn resolve_page(&self, page_url: &str) -> Result<ResolvedPage, SnatchError> {
        let content = self.fetcher.fetch_text(page_url)?;
        let manifest_url = find_manifest_url(&content, page_url, self.patterns)?;
        Ok(ResolvedPage {
            manifest_url,
            title: page_title(&content),
        })
    }
}

/// What a page yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    pub manifest_url: String,
    pub title: Option<String>,
}

/// Text of the first `<title>` element, whitespace-collapsed; None if absent or blank.
pub fn page_title(content: &str) -> Option<String> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    let re = TITLE.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("built-in title pattern")
    });
    let raw = re.captures(content)?.get(1)?.as_str();
    let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

/// Scan `content` with `patterns` in order. An absolute capture is returned as is;
/// a relative one is resolved against `page_url`. A capture that cannot be
/// resolved is skipped and the scan continues with the next pattern.
pub fn find_manifest_url(
    content: &str,
    page_url: &str,
    patterns: &[ManifestPattern],
) -> Result<String, SnatchError> {
    for pattern in patterns {
        let Some(candidate) = pattern.capture(content) else {
            continue;
        };
        if is_absolute(candidate) {
            tracing::debug!(pattern = pattern.name, url = candidate, "manifest URL matched");
            return Ok(candidate.to_string());
        }
        match Url::parse(page_url).and_then(|base| base.join(candidate)) {
            Ok(resolved) => {
                tracing::debug!(
                    pattern = pattern.name,
                    candidate,
                    url = %resolved,
                    "relative manifest URL resolved"
                );
                return Ok(resolved.to_string());
            }
            Err(e) => {
                tracing::debug!(pattern = pattern.name, candidate, "cannot resolve: {}", e);
            }
        }
    }
    Err(SnatchError::NotFound)
}
