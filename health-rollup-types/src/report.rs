//! Health report for a single component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Status;

/// Free-form diagnostic context attached to a report.
pub type Details = BTreeMap<String, Value>;

/// The health of one component at one point in time.
///
/// # Example
///
/// ```rust
/// use health_rollup_types::{HealthReport, Status};
///
/// let report = HealthReport::builder()
///     .status(Status::Down)
///     .detail("error", "connection refused")
///     .build();
///
/// assert_eq!(report.status, Status::Down);
/// assert_eq!(report.details["error"], "connection refused");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthReport {
    /// Status of the component.
    pub status: Status,

    /// Diagnostic context, e.g. the database product or the last error.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

impl HealthReport {
    /// Create a report with a status and no details.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            details: Details::new(),
        }
    }

    /// Shorthand for an `UP` report.
    pub fn up() -> Self {
        Self::new(Status::Up)
    }

    /// Shorthand for a `DOWN` report.
    pub fn down() -> Self {
        Self::new(Status::Down)
    }

    /// Shorthand for an `UNKNOWN` report.
    pub fn unknown() -> Self {
        Self::new(Status::Unknown)
    }

    /// Shorthand for an `OUT_OF_SERVICE` report.
    pub fn out_of_service() -> Self {
        Self::new(Status::OutOfService)
    }

    /// Create a builder for a report.
    pub fn builder() -> HealthReportBuilder {
        HealthReportBuilder::new()
    }

    /// Add a detail entry, replacing any previous value under the key.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Get a detail value.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

impl From<Status> for HealthReport {
    fn from(status: Status) -> Self {
        Self::new(status)
    }
}

/// Builder for `HealthReport`.
#[derive(Debug, Default)]
pub struct HealthReportBuilder {
    status: Status,
    details: Details,
}

impl HealthReportBuilder {
    /// Create a new builder. The status defaults to `UP`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Add a detail entry.
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Build the report.
    pub fn build(self) -> HealthReport {
        HealthReport {
            status: self.status,
            details: self.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_builder() {
        let report = HealthReport::builder()
            .status(Status::OutOfService)
            .detail("reason", "maintenance")
            .detail("window", 30)
            .build();

        assert_eq!(report.status, Status::OutOfService);
        assert_eq!(report.detail("reason"), Some(&Value::from("maintenance")));
        assert_eq!(report.detail("window"), Some(&Value::from(30)));
        assert!(report.detail("missing").is_none());
    }

    #[test]
    fn test_empty_details_are_omitted() {
        let json = serde_json::to_string(&HealthReport::up()).unwrap();
        assert_eq!(json, r#"{"status":"UP"}"#);
    }

    #[test]
    fn test_deserialize_without_details() {
        let report: HealthReport = serde_json::from_str(r#"{"status":"DOWN"}"#).unwrap();
        assert_eq!(report, HealthReport::down());
    }
}
