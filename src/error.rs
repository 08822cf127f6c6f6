//! Error types for report parsing and configuration.

use thiserror::Error;

/// Errors produced while loading configuration or reading health reports.
///
/// Aggregation itself never fails; these only arise at the edges.
#[derive(Debug, Error)]
pub enum HealthError {
    /// A report carried a status code outside the known severity scale.
    #[error("component {component:?} reported unrecognized status {code:?}")]
    UnknownStatus { component: String, code: String },

    /// Configuration could not be loaded or deserialized.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// Failed to read a report file.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a report document.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for this crate.
pub type Result<T, E = HealthError> = std::result::Result<T, E>;
