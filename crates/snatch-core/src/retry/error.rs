//! Segment fetch error type.

use std::fmt;

/// Error returned by a single GET (page, manifest or segment).
/// Kept separate from `SnatchError` so the retry loop can wrap the last cause.
#[derive(Debug)]
pub enum SegmentError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Writing the body to disk failed.
    Storage(std::io::Error),
    /// The download task did not run to completion (panic or runtime shutdown).
    Task(String),
    /// All attempts failed; carries the error from the final attempt.
    Exhausted {
        attempts: u32,
        last: Box<SegmentError>,
    },
}

impl SegmentError {
    /// Innermost error, looking through `Exhausted`.
    pub fn last_cause(&self) -> &SegmentError {
        match self {
            SegmentError::Exhausted { last, .. } => last.last_cause(),
            other => other,
        }
    }
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::Curl(e) => write!(f, "{}", e),
            SegmentError::Http(code) => write!(f, "HTTP {}", code),
            SegmentError::Storage(e) => write!(f, "storage: {}", e),
            SegmentError::Task(msg) => write!(f, "download task failed: {}", msg),
            SegmentError::Exhausted { attempts, last } => {
                write!(f, "failed after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl std::error::Error for SegmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SegmentError::Curl(e) => Some(e),
            SegmentError::Storage(e) => Some(e),
            SegmentError::Exhausted { last, .. } => Some(last.as_ref()),
            SegmentError::Http(_) | SegmentError::Task(_) => None,
        }
    }
}
