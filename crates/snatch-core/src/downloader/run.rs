//! Fan-out/fan-in of segment fetches behind a counting admission gate.
//!
//! Every segment gets its own task up front. A task must take a permit from the
//! gate before fetching, so at most `max_concurrency` fetches run at once and the
//! rest wait for a slot. Outcomes are handed to the caller in completion order.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::outcome::SegmentOutcome;
use super::{DownloadPolicy, SegmentFetcher};
use crate::http::HeaderSet;
use crate::model::Segment;
use crate::retry::{run_with_retry, SegmentError};

pub(super) struct SegmentJob {
    pub segment: Segment,
    pub path: PathBuf,
}

/// Runs all jobs and calls `on_outcome` once per finished segment. Returns the
/// number of tasks that ended without producing an outcome.
pub(super) async fn run_bounded<F>(
    fetcher: Arc<dyn SegmentFetcher>,
    headers: Arc<HeaderSet>,
    jobs: Vec<SegmentJob>,
    policy: DownloadPolicy,
    mut on_outcome: F,
) -> usize
where
    F: FnMut(SegmentOutcome),
{
    let permits = policy.max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let gate = Arc::new(Semaphore::new(permits));
    let mut set = JoinSet::new();

    for SegmentJob { segment, path } in jobs {
        let gate = Arc::clone(&gate);
        let fetcher = Arc::clone(&fetcher);
        let headers = Arc::clone(&headers);
        let retry = policy.retry;
        set.spawn(async move {
            let index = segment.index;
            let filename = segment.filename.clone();
            let result = match gate.acquire_owned().await {
                Ok(permit) => {
                    let joined = tokio::task::spawn_blocking(move || {
                        run_with_retry(&retry, |attempt| {
                            tracing::debug!(index, attempt, url = %segment.url, "fetching segment");
                            fetcher.fetch(&segment, &headers, &path)
                        })
                    })
                    .await;
                    drop(permit);
                    joined.unwrap_or_else(|e| Err(SegmentError::Task(e.to_string())))
                }
                Err(e) => Err(SegmentError::Task(e.to_string())),
            };
            SegmentOutcome {
                index,
                filename,
                result,
            }
        });
    }

    let mut lost = 0usize;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => on_outcome(outcome),
            Err(e) => {
                tracing::error!("segment task ended without a result: {}", e);
                lost += 1;
            }
        }
    }
    lost
}
