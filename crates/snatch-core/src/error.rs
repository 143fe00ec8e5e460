//! Error taxonomy for extraction, download and hand-off.

use crate::retry::SegmentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnatchError {
    /// Page or manifest GET failed (transport error or non-2xx status). Not retried.
    #[error("fetch {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: SegmentError,
    },

    /// No manifest URL pattern matched the page content.
    #[error("no manifest URL found in page content")]
    NotFound,

    /// Manifest parsed but had no content lines.
    #[error("no segments found in manifest")]
    NoSegments,

    /// One or more segments failed after exhausting retries. Merge must not run.
    #[error("failed to download {failed} out of {total} segments")]
    PartialFailure { failed: usize, total: usize },

    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// External encoder missing, failed, or was given nothing to merge.
    #[error("encoder: {0}")]
    Encoder(String),

    #[error("invalid config: {0}")]
    Config(String),
}

impl SnatchError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SnatchError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for errors that end the run before any segment is fetched.
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            SnatchError::Fetch { .. }
                | SnatchError::NotFound
                | SnatchError::NoSegments
                | SnatchError::InvalidUrl { .. }
        )
    }
}
