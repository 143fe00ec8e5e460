//! `snatch download <url>` - resolve, download, merge.

use anyhow::{Context, Result};
use snatch_core::config::SnatchConfig;
use snatch_core::handoff::{self, FfmpegEncoder};
use snatch_core::naming;
use snatch_core::progress::DownloadProgress;
use snatch_core::acquire_segments;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::cli::progress;

pub async fn run_download(url: &str, cfg: &SnatchConfig) -> Result<()> {
    // Fail before any network work if ffmpeg is missing.
    let encoder = FfmpegEncoder::locate(cfg.verbose)?;

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output directory {}", cfg.output_dir.display()))?;
    let seg_dir = handoff::segment_dir(&cfg.output_dir);

    println!("Extracting stream from {}", url);
    let tracker = Arc::new(DownloadProgress::new());
    let observer = progress::spawn_observer(Arc::clone(&tracker));
    let acquired = acquire_segments(url, &seg_dir, cfg, &tracker).await;
    progress::finish(observer, &tracker).await;

    let stream = match acquired {
        Ok(stream) => stream,
        Err(e) => {
            if !cfg.keep_segments {
                remove_dir(&seg_dir);
            }
            return Err(e.into());
        }
    };

    let output = naming::build_output_path(stream.title.as_deref().unwrap_or(""), &cfg.output_dir);
    println!(
        "Merging {} segments ({:.0}s) into {}",
        stream.segment_count(),
        stream.duration.as_secs_f64(),
        output.display()
    );
    let merged = tokio::task::spawn_blocking({
        let stream = stream.clone();
        let seg_dir = seg_dir.clone();
        let output = output.clone();
        move || handoff::merge_segments(&stream, &seg_dir, &output, &encoder)
    })
    .await
    .context("merge task failed")??;
    tracing::info!(merged, output = %output.display(), "merge finished");

    if cfg.keep_segments {
        println!("Segments kept in {}", seg_dir.display());
    } else {
        handoff::cleanup_segments(&stream, &seg_dir)?;
        remove_dir(&seg_dir);
    }

    let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    println!(
        "Saved {} ({:.1} MiB)",
        output.display(),
        size as f64 / 1_048_576.0
    );
    Ok(())
}

fn remove_dir(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("could not remove {}: {}", dir.display(), e);
        }
    }
}
