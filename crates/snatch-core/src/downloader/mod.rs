//! Bounded-concurrency segment downloader.
//!
//! Fetches every segment of a stream into its own file under the destination
//! directory, at most `max_concurrency` at a time, each with linear-backoff
//! retries. The run waits for every segment to settle before reporting: a
//! single failure never cuts other segments short, but any failure fails the
//! whole run. On success the stream's segment list is rebuilt in index order.

mod outcome;
mod run;
mod segment;

pub use outcome::SegmentOutcome;
pub use segment::CurlSegmentFetcher;

use crate::config::SnatchConfig;
use crate::error::SnatchError;
use crate::http::{segment_headers, HeaderSet, HttpClient};
use crate::model::{Segment, StreamInfo};
use crate::progress::{DownloadProgress, RunStats};
use crate::retry::{RetryPolicy, SegmentError};
use run::SegmentJob;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// One attempt at fetching one segment. Retrying is the downloader's job.
pub trait SegmentFetcher: Send + Sync {
    fn fetch(&self, segment: &Segment, headers: &HeaderSet, dest: &Path)
        -> Result<(), SegmentError>;
}

/// Concurrency and retry knobs for one run.
#[derive(Debug, Clone, Copy)]
pub struct DownloadPolicy {
    pub max_concurrency: usize,
    pub retry: RetryPolicy,
}

impl DownloadPolicy {
    pub fn from_config(cfg: &SnatchConfig) -> Self {
        Self {
            max_concurrency: cfg.max_concurrency,
            retry: RetryPolicy::from_config(cfg),
        }
    }
}

pub struct Downloader {
    fetcher: Arc<dyn SegmentFetcher>,
    policy: DownloadPolicy,
    user_agent: String,
}

impl Downloader {
    pub fn new(
        fetcher: Arc<dyn SegmentFetcher>,
        policy: DownloadPolicy,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            policy,
            user_agent: user_agent.into(),
        }
    }

    /// Curl-backed downloader using the config's timeout, user agent and policy.
    pub fn from_config(cfg: &SnatchConfig) -> Self {
        let fetcher = CurlSegmentFetcher::new(HttpClient::new(cfg.timeout()));
        Self::new(
            Arc::new(fetcher),
            DownloadPolicy::from_config(cfg),
            cfg.user_agent.clone(),
        )
    }

    pub fn policy(&self) -> DownloadPolicy {
        self.policy
    }

    /// Download every segment of `stream` into `dest_dir`, updating `progress`
    /// after each settled segment.
    ///
    /// On success `stream.segments` holds exactly the downloaded segments in
    /// index order. On `PartialFailure` the stream is left untouched and any
    /// files already written stay on disk.
    pub async fn download_all(
        &self,
        stream: &mut StreamInfo,
        dest_dir: &Path,
        progress: &DownloadProgress,
    ) -> Result<(), SnatchError> {
        std::fs::create_dir_all(dest_dir)
            .map_err(|e| SnatchError::io(format!("create {}", dest_dir.display()), e))?;

        let total = stream.segments.len();
        progress.start(total, "Initializing download...");
        tracing::info!(
            total,
            max_concurrency = self.policy.max_concurrency,
            attempts = self.policy.retry.attempts(),
            dir = %dest_dir.display(),
            "starting segment downloads"
        );

        let headers = Arc::new(segment_headers(&self.user_agent, &stream.headers));
        let jobs: Vec<SegmentJob> = stream
            .segments
            .iter()
            .map(|s| SegmentJob {
                segment: s.clone(),
                path: dest_dir.join(&s.filename),
            })
            .collect();

        let started = Instant::now();
        let mut downloaded: HashSet<usize> = HashSet::with_capacity(total);
        let mut failed = 0usize;

        let lost = run::run_bounded(
            Arc::clone(&self.fetcher),
            headers,
            jobs,
            self.policy,
            |outcome| {
                match &outcome.result {
                    Ok(()) => {
                        downloaded.insert(outcome.index);
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::warn!(
                            index = outcome.index,
                            file = %outcome.filename,
                            "segment failed: {}",
                            e
                        );
                    }
                }
                let stats = RunStats {
                    succeeded: downloaded.len(),
                    failed,
                    total,
                    elapsed: started.elapsed(),
                };
                let status = stats.status_line();
                match stats.eta() {
                    Some(eta) => tracing::debug!(eta_secs = eta.as_secs(), "{}", status),
                    None => tracing::debug!("{}", status),
                }
                progress.update(stats.settled(), status);
            },
        )
        .await;
        failed += lost;

        if failed > 0 {
            tracing::warn!(failed, total, "segment downloads incomplete");
            return Err(SnatchError::PartialFailure { failed, total });
        }

        stream.segments = outcome::in_index_order(&stream.segments, &downloaded);
        tracing::info!(
            total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "all segments downloaded"
        );
        Ok(())
    }
}
