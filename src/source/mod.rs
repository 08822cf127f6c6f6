//! Sources of component health reports.
//!
//! This module provides a trait-based abstraction for receiving report
//! snapshots from various places, such as files written by probes or
//! snapshots pushed by an in-process health endpoint.

mod file;
mod snapshot;

pub use file::FileSource;
pub use snapshot::{parse_document, parse_snapshot, ReportSnapshot, SerializedHealthReport};

use std::fmt::Debug;

/// Trait for receiving report snapshots from various sources.
///
/// # Example
///
/// ```
/// use health_rollup::{FileSource, ReportSource};
///
/// let mut source = FileSource::new("health.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} components", snapshot.len());
/// }
/// ```
pub trait ReportSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<ReportSnapshot>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message if the last poll failed.
    fn error(&self) -> Option<&str>;
}
