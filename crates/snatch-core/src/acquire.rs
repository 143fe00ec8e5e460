//! Extraction and acquisition entry points.
//!
//! `extract` turns a page URL into a parsed `StreamInfo`; `acquire_segments`
//! additionally downloads every segment into a directory. Page, manifest and
//! parse errors end the run before any segment is fetched.

use crate::config::SnatchConfig;
use crate::downloader::Downloader;
use crate::error::SnatchError;
use crate::http::HttpClient;
use crate::manifest;
use crate::model::StreamInfo;
use crate::progress::DownloadProgress;
use crate::resolver::{CurlPageFetcher, ManifestResolver, PageFetcher};
use crate::retry::SegmentError;
use std::collections::HashMap;
use std::path::Path;

/// Resolve the manifest on `page_url`, fetch it and parse it.
pub fn extract_with(
    fetcher: &dyn PageFetcher,
    page_url: &str,
    cfg: &SnatchConfig,
) -> Result<StreamInfo, SnatchError> {
    let page = ManifestResolver::new(fetcher).resolve_page(page_url)?;
    tracing::info!(manifest = %page.manifest_url, "manifest URL found");

    let base_url = manifest::base_url(&page.manifest_url)?;
    let text = fetcher.fetch_text(&page.manifest_url)?;
    let parsed = manifest::parse(&text, &base_url)?;
    tracing::info!(
        segments = parsed.segments.len(),
        duration_secs = parsed.total_duration.as_secs_f64(),
        "manifest parsed"
    );

    Ok(StreamInfo {
        page_url: page_url.to_string(),
        manifest_url: page.manifest_url,
        base_url,
        title: page.title,
        quality: cfg.quality.clone(),
        duration: parsed.total_duration,
        segments: parsed.segments,
        headers: HashMap::new(),
    })
}

/// `extract_with` using curl and the config's timeout and user agent. Blocking.
pub fn extract(page_url: &str, cfg: &SnatchConfig) -> Result<StreamInfo, SnatchError> {
    let fetcher = CurlPageFetcher::new(HttpClient::new(cfg.timeout()), cfg.user_agent.clone());
    extract_with(&fetcher, page_url, cfg)
}

/// Extract the stream on `page_url` and download all its segments into
/// `dest_dir`. On success the returned stream lists exactly the downloaded
/// segments in index order, ready for hand-off.
pub async fn acquire_segments(
    page_url: &str,
    dest_dir: &Path,
    cfg: &SnatchConfig,
    progress: &DownloadProgress,
) -> Result<StreamInfo, SnatchError> {
    cfg.validate()?;

    let url = page_url.to_string();
    let extract_cfg = cfg.clone();
    let mut stream = tokio::task::spawn_blocking(move || extract(&url, &extract_cfg))
        .await
        .map_err(|e| SnatchError::Fetch {
            url: page_url.to_string(),
            source: SegmentError::Task(e.to_string()),
        })??;

    Downloader::from_config(cfg)
        .download_all(&mut stream, dest_dir, progress)
        .await?;
    Ok(stream)
}
