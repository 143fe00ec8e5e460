//! Tests for download and inspect parsing.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_download_defaults() {
    match parse(&["snatch", "download", "https://example.com/watch/1"]) {
        CliCommand::Download { url, opts } => {
            assert_eq!(url, "https://example.com/watch/1");
            assert!(opts.output_dir.is_none());
            assert!(opts.concurrency.is_none());
            assert!(!opts.verbose);
            assert!(!opts.keep_segments);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_short_flags() {
    match parse(&[
        "snatch",
        "download",
        "https://example.com/v",
        "-o",
        "/tmp/out",
        "-q",
        "720p",
        "-c",
        "8",
        "-r",
        "5",
        "-t",
        "10",
        "-v",
    ]) {
        CliCommand::Download { opts, .. } => {
            assert_eq!(opts.output_dir.as_deref(), Some(Path::new("/tmp/out")));
            assert_eq!(opts.quality.as_deref(), Some("720p"));
            assert_eq!(opts.concurrency, Some(8));
            assert_eq!(opts.retries, Some(5));
            assert_eq!(opts.timeout, Some(10));
            assert!(opts.verbose);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_inspect_with_user_agent() {
    match parse(&[
        "snatch",
        "inspect",
        "https://example.com/v",
        "--user-agent",
        "curl/8",
    ]) {
        CliCommand::Inspect { url, opts } => {
            assert_eq!(url, "https://example.com/v");
            assert_eq!(opts.user_agent.as_deref(), Some("curl/8"));
        }
        _ => panic!("expected Inspect"),
    }
}

#[test]
fn cli_requires_url() {
    assert!(Cli::try_parse_from(["snatch", "download"]).is_err());
}

#[test]
fn cli_rejects_non_numeric_concurrency() {
    assert!(Cli::try_parse_from(["snatch", "download", "https://x/", "-c", "many"]).is_err());
}

#[test]
fn cli_parse_long_flags() {
    match parse(&[
        "snatch",
        "download",
        "https://example.com/v",
        "--output",
        "out",
        "--concurrent",
        "3",
        "--retries",
        "1",
        "--keep-segments",
    ]) {
        CliCommand::Download { opts, .. } => {
            assert_eq!(opts.output_dir.as_deref(), Some(Path::new("out")));
            assert_eq!(opts.concurrency, Some(3));
            assert_eq!(opts.retries, Some(1));
            assert!(opts.keep_segments);
        }
        _ => panic!("expected Download"),
    }
}
