pub mod config;
pub mod logging;

pub mod acquire;
pub mod downloader;
pub mod error;
pub mod handoff;
pub mod http;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod progress;
pub mod resolver;
pub mod retry;

pub use acquire::{acquire_segments, extract};
pub use error::SnatchError;
pub use model::{Segment, StreamInfo};
pub use progress::{DownloadProgress, ProgressSnapshot};
