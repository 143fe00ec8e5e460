//! Download progress shared between the downloader and observers.
//!
//! The downloader is the only writer; UIs and loggers poll `snapshot()`.
//! Pass it around as `Arc<DownloadProgress>`; there is no global instance.

use std::sync::RwLock;
use std::time::Duration;

/// Consistent copy of the tracker state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Segments that have settled (downloaded or exhausted their retries).
    pub completed: usize,
    pub total: usize,
    pub status: String,
}

impl ProgressSnapshot {
    /// Fraction settled in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// Thread-safe progress counters for one download run.
#[derive(Debug, Default)]
pub struct DownloadProgress {
    inner: RwLock<ProgressSnapshot>,
}

impl DownloadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new run of `total` segments.
    pub fn start(&self, total: usize, status: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = ProgressSnapshot {
            completed: 0,
            total,
            status: status.into(),
        };
    }

    /// Record `completed` settled segments. The count never decreases and is
    /// clamped to the total.
    pub fn update(&self, completed: usize, status: impl Into<String>) {
        let status = status.into();
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.completed = completed.min(guard.total).max(guard.completed);
        guard.status = status;
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Counters for a run in progress; used to build the status line.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn settled(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Average throughput since the run started (0 if no time has passed).
    pub fn segments_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.succeeded as f64 / secs
    }

    /// Successful share of the total, as a percentage.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.succeeded as f64 / self.total as f64 * 100.0
    }

    /// Average time per successful segment times the segments still pending.
    /// None until something has succeeded.
    pub fn eta(&self) -> Option<Duration> {
        if self.succeeded == 0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.settled()) as u32;
        Some(self.elapsed / self.succeeded as u32 * remaining)
    }

    pub fn status_line(&self) -> String {
        format!(
            "Downloaded {}/{} segments ({:.1}%) - {:.1} seg/s",
            self.succeeded,
            self.total,
            self.percent(),
            self.segments_per_sec()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn update_is_monotonic_and_clamped() {
        let p = DownloadProgress::new();
        p.start(4, "starting");
        p.update(2, "two");
        p.update(1, "late");
        assert_eq!(p.snapshot().completed, 2);
        assert_eq!(p.snapshot().status, "late");
        p.update(9, "over");
        let snap = p.snapshot();
        assert_eq!(snap.completed, 4);
        assert!(snap.is_finished());
    }

    #[test]
    fn start_resets_previous_run() {
        let p = DownloadProgress::new();
        p.start(3, "a");
        p.update(3, "done");
        p.start(5, "again");
        assert_eq!(
            p.snapshot(),
            ProgressSnapshot {
                completed: 0,
                total: 5,
                status: "again".to_string()
            }
        );
    }

    #[test]
    fn concurrent_readers_see_valid_snapshots() {
        let p = Arc::new(DownloadProgress::new());
        p.start(1000, "go");
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..500 {
                        let snap = p.snapshot();
                        assert!(snap.completed >= last);
                        assert!(snap.completed <= snap.total);
                        if snap.completed == 0 {
                            assert_eq!(snap.status, "go");
                        } else {
                            assert_eq!(snap.status, format!("n={}", snap.completed));
                        }
                        last = snap.completed;
                    }
                })
            })
            .collect();
        for i in 1..=1000 {
            p.update(i, format!("n={}", i));
        }
        for r in readers {
            r.join().unwrap();
        }
    }

    #[test]
    fn status_line_format() {
        let stats = RunStats {
            succeeded: 2,
            failed: 0,
            total: 8,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(stats.status_line(), "Downloaded 2/8 segments (25.0%) - 1.0 seg/s");
        assert_eq!(stats.eta(), Some(Duration::from_secs(6)));
    }

    #[test]
    fn zero_elapsed_has_zero_rate() {
        let stats = RunStats {
            succeeded: 0,
            failed: 1,
            total: 2,
            elapsed: Duration::ZERO,
        };
        assert_eq!(stats.segments_per_sec(), 0.0);
        assert_eq!(stats.eta(), None);
        assert_eq!(stats.settled(), 1);
    }
}
