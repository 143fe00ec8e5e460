//! `snatch inspect <url>` - show what would be downloaded.

use anyhow::{Context, Result};
use snatch_core::config::SnatchConfig;
use snatch_core::extract;
use snatch_core::naming;

pub async fn run_inspect(url: &str, cfg: &SnatchConfig) -> Result<()> {
    let page = url.to_string();
    let extract_cfg = cfg.clone();
    let stream = tokio::task::spawn_blocking(move || extract(&page, &extract_cfg))
        .await
        .context("extract task failed")??;

    println!("Page:      {}", stream.page_url);
    println!("Manifest:  {}", stream.manifest_url);
    println!("Base URL:  {}", stream.base_url);
    println!("Title:     {}", stream.title.as_deref().unwrap_or("-"));
    println!("Quality:   {}", stream.quality);
    println!("Segments:  {}", stream.segment_count());
    println!("Duration:  {:.1}s", stream.duration.as_secs_f64());
    println!(
        "Output:    {}",
        naming::build_output_path(stream.title.as_deref().unwrap_or(""), &cfg.output_dir).display()
    );
    if cfg.verbose {
        for seg in &stream.segments {
            println!("  {:>5}  {:>6.2}s  {}", seg.index, seg.duration, seg.url);
        }
    }
    Ok(())
}
