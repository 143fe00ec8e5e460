//! CLI for snatch.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use snatch_core::config::{self, SnatchConfig};
use snatch_core::logging;
use std::path::PathBuf;

use commands::{run_download, run_inspect};

/// Top-level CLI for snatch.
#[derive(Debug, Parser)]
#[command(name = "snatch")]
#[command(about = "snatch: download an HLS stream from a web page into one video file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Find the stream on a page, download every segment and merge them with ffmpeg.
    Download {
        /// Page URL that embeds the stream.
        url: String,
        #[command(flatten)]
        opts: RunOptions,
    },

    /// Resolve and parse the stream on a page without downloading it.
    Inspect {
        /// Page URL that embeds the stream.
        url: String,
        #[command(flatten)]
        opts: RunOptions,
    },
}

/// Per-run overrides for values from `config.toml`.
#[derive(Debug, Clone, Default, Args)]
pub struct RunOptions {
    /// Directory for the merged file and temporary segments.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Quality preference recorded on the stream (e.g. best).
    #[arg(short = 'q', long)]
    pub quality: Option<String>,

    /// Maximum concurrent segment downloads.
    #[arg(short = 'c', long = "concurrent", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Attempts per segment, including the first.
    #[arg(short = 'r', long, value_name = "N")]
    pub retries: Option<u32>,

    /// Per-request timeout in seconds.
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Show ffmpeg output and per-segment detail.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Keep the segment directory after merging.
    #[arg(long)]
    pub keep_segments: bool,
}

impl RunOptions {
    /// Overlay the flags that were given onto `cfg`.
    pub fn apply(&self, cfg: &mut SnatchConfig) {
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(q) = &self.quality {
            cfg.quality = q.clone();
        }
        if let Some(n) = self.concurrency {
            cfg.max_concurrency = n;
        }
        if let Some(n) = self.retries {
            cfg.retry_attempts = n;
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
        if let Some(ua) = &self.user_agent {
            cfg.user_agent = ua.clone();
        }
        cfg.verbose |= self.verbose;
        cfg.keep_segments |= self.keep_segments;
    }
}

impl CliCommand {
    pub fn options(&self) -> &RunOptions {
        match self {
            CliCommand::Download { opts, .. } | CliCommand::Inspect { opts, .. } => opts,
        }
    }

    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.command.options().apply(&mut cfg);
        init_logging(cfg.verbose);
        tracing::debug!("effective config: {:?}", cfg);
        cfg.validate()?;

        match cli.command {
            CliCommand::Download { url, .. } => run_download(&url, &cfg).await?,
            CliCommand::Inspect { url, .. } => run_inspect(&url, &cfg).await?,
        }

        Ok(())
    }
}

/// Log to the state file, or to stderr when that is unavailable.
fn init_logging(verbose: bool) {
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr(verbose);
        tracing::warn!("file logging unavailable, using stderr: {:#}", e);
    }
}

#[cfg(test)]
mod tests;
