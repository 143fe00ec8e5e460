//! CLI command handlers, one per file.

mod download;
mod inspect;

pub use download::run_download;
pub use inspect::run_inspect;
