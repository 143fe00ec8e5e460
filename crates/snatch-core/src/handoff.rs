//! Hand-off of downloaded segments to the external encoder.
//!
//! The encoder gets an index-ordered list of absolute file paths and joins them
//! without re-encoding. Files that vanished since the download are skipped with
//! a warning instead of aborting the merge.

use crate::error::SnatchError;
use crate::model::StreamInfo;
use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the concat list written next to the segments.
pub const CONCAT_LIST_NAME: &str = "segments.txt";

/// Fresh per-run segment directory: `<output_dir>/temp_<unix seconds>`.
pub fn segment_dir(output_dir: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    output_dir.join(format!("temp_{}", secs))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Absolute paths of the stream's segment files in index order, skipping (and
/// warning about) any that are missing.
pub fn segment_paths(stream: &StreamInfo, segments_dir: &Path) -> Vec<PathBuf> {
    let mut segments: Vec<_> = stream.segments.iter().collect();
    segments.sort_by_key(|s| s.index);

    let mut paths = Vec::with_capacity(segments.len());
    for seg in segments {
        let path = absolute(&segments_dir.join(&seg.filename));
        if !path.is_file() {
            tracing::warn!(index = seg.index, path = %path.display(), "segment file not found, skipping");
            continue;
        }
        paths.push(path);
    }
    paths
}

/// One concat-demuxer line; single quotes are closed, escaped and reopened.
pub fn concat_line(path: &Path) -> String {
    format!("file '{}'\n", path.display().to_string().replace('\'', "'\\''"))
}

pub fn write_concat_list(paths: &[PathBuf], list_file: &Path) -> Result<(), SnatchError> {
    let ctx = || format!("write {}", list_file.display());
    let file = fs::File::create(list_file).map_err(|e| SnatchError::io(ctx(), e))?;
    let mut writer = BufWriter::new(file);
    for p in paths {
        writer
            .write_all(concat_line(p).as_bytes())
            .map_err(|e| SnatchError::io(ctx(), e))?;
    }
    writer.flush().map_err(|e| SnatchError::io(ctx(), e))
}

/// External tool that concatenates the files named in a list into one output.
pub trait Encoder {
    fn concat(&self, list_file: &Path, output: &Path) -> Result<(), SnatchError>;
}

/// `ffmpeg` concat demuxer with stream copy.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
    verbose: bool,
}

impl FfmpegEncoder {
    pub fn with_program(program: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            program: program.into(),
            verbose,
        }
    }

    /// Find `ffmpeg` on `PATH`.
    pub fn locate(verbose: bool) -> Result<Self, SnatchError> {
        let exe = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(exe))
            .find(|p| p.is_file())
            .map(|p| Self::with_program(p, verbose))
            .ok_or_else(|| {
                SnatchError::Encoder(
                    "ffmpeg not found in PATH; install ffmpeg to merge video segments".to_string(),
                )
            })
    }

    pub fn args(list_file: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-f", "concat", "-safe", "0", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(list_file.as_os_str().to_owned());
        for a in [
            "-c",
            "copy",
            "-avoid_negative_ts",
            "make_zero",
            "-fflags",
            "+genpts",
            "-y",
        ] {
            args.push(OsString::from(a));
        }
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl Encoder for FfmpegEncoder {
    fn concat(&self, list_file: &Path, output: &Path) -> Result<(), SnatchError> {
        let (stdout, stderr) = if self.verbose {
            (Stdio::inherit(), Stdio::inherit())
        } else {
            (Stdio::null(), Stdio::null())
        };
        tracing::info!(program = %self.program.display(), output = %output.display(), "running encoder");
        let status = Command::new(&self.program)
            .args(Self::args(list_file, output))
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|e| SnatchError::Encoder(format!("failed to start ffmpeg: {}", e)))?;
        if !status.success() {
            return Err(SnatchError::Encoder(format!("ffmpeg exited with {}", status)));
        }
        Ok(())
    }
}

/// Merge the stream's segments into `output`. Returns how many files were handed
/// to the encoder. The list file is removed afterwards either way.
pub fn merge_segments(
    stream: &StreamInfo,
    segments_dir: &Path,
    output: &Path,
    encoder: &dyn Encoder,
) -> Result<usize, SnatchError> {
    let paths = segment_paths(stream, segments_dir);
    if paths.is_empty() {
        return Err(SnatchError::Encoder("no segment files to merge".to_string()));
    }
    if paths.len() < stream.segments.len() {
        tracing::warn!(
            present = paths.len(),
            expected = stream.segments.len(),
            "merging with missing segment files"
        );
    }

    let list_file = segments_dir.join(CONCAT_LIST_NAME);
    write_concat_list(&paths, &list_file)?;
    let result = encoder.concat(&list_file, output);
    if let Err(e) = fs::remove_file(&list_file) {
        tracing::debug!("could not remove {}: {}", list_file.display(), e);
    }
    result.map(|()| paths.len())
}

/// Delete the stream's segment files; already-missing files are not an error.
pub fn cleanup_segments(stream: &StreamInfo, segments_dir: &Path) -> Result<(), SnatchError> {
    for seg in &stream.segments {
        let path = segments_dir.join(&seg.filename);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(SnatchError::io(format!("remove {}", path.display()), e)),
        }
    }
    Ok(())
}
