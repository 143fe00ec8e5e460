//! Terminal progress line fed by polling the shared tracker.

use snatch_core::progress::{DownloadProgress, ProgressSnapshot};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub(crate) fn render(snap: &ProgressSnapshot) -> String {
    format!(
        "\r  [{:>3.0}%] {}  ",
        snap.fraction() * 100.0,
        snap.status
    )
}

/// Print the tracker's status whenever it changes until the handle is aborted.
pub(crate) fn spawn_observer(progress: Arc<DownloadProgress>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        let mut last = ProgressSnapshot::default();
        loop {
            ticker.tick().await;
            let snap = progress.snapshot();
            if snap != last {
                eprint!("{}", render(&snap));
                let _ = std::io::stderr().flush();
                last = snap;
            }
        }
    })
}

/// Stop the observer and print the final state on its own line.
pub(crate) async fn finish(observer: JoinHandle<()>, progress: &DownloadProgress) {
    observer.abort();
    let _ = observer.await;
    let snap = progress.snapshot();
    if snap.total > 0 {
        eprintln!("{}", render(&snap));
    }
}
