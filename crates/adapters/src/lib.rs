//! # submission-diff-adapters
//!
//! Adapter implementations for ports (local submission store, plain
//! directories, structured loggers).
//! This crate depends on `ports`, `shared`, `domain`, and `config`.

pub mod directory;
pub mod limits;
pub mod local_store;
pub mod log_sink;
pub mod logger;

#[cfg(test)]
mod test_support;

pub use directory::load_directory_manifest;
pub use limits::StoreLimits;
pub use local_store::LocalSubmissionStore;
pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink};
pub use logger::{JsonLogger, TracingLogger, log_level_from_setting};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
