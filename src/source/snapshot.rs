//! Wire format for component health reports.
//!
//! A report document is a JSON object mapping component names to their
//! reports:
//!
//! ```json
//! {
//!   "db":    { "status": "UP", "details": { "database": "H2" } },
//!   "mongo": { "status": "DOWN" }
//! }
//! ```
//!
//! A full health document, as served by a health endpoint, is accepted too;
//! its `components` map is used and the top-level status is ignored:
//!
//! ```json
//! { "status": "DOWN", "components": { "db": { "status": "UP" } } }
//! ```
//!
//! Older endpoints put the components beside the overall status instead of
//! under `components`. A top-level string `status` is dropped in that case:
//!
//! ```json
//! { "status": "DOWN", "db": { "status": "UP" }, "mongo": { "status": "DOWN" } }
//! ```
//!
//! Status codes stay as strings at this layer so that an unrecognized code
//! can be rejected or mapped according to [`UnrecognizedStatusPolicy`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::UnrecognizedStatusPolicy;
use crate::error::{HealthError, Result};
use health_rollup_types::{HealthReport, HealthReportSet, Status};

/// Raw component reports keyed by component name.
pub type ReportSnapshot = BTreeMap<String, SerializedHealthReport>;

/// One component's report before its status code is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedHealthReport {
    /// Status code, e.g. `"UP"` or `"OUT_OF_SERVICE"`.
    pub status: String,

    /// Diagnostic context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

impl From<&HealthReport> for SerializedHealthReport {
    fn from(report: &HealthReport) -> Self {
        Self {
            status: report.status.code().to_string(),
            details: report.details.clone(),
        }
    }
}

/// Parse a report document in any accepted form.
///
/// Errors name the offending component field, e.g. a missing `status`.
pub fn parse_document(content: &str) -> Result<ReportSnapshot> {
    let document: Value = serde_json::from_str(content)?;
    let components = match document {
        Value::Object(mut root) => match root.remove("components") {
            Some(components) if root.get("status").map_or(false, Value::is_string) => components,
            Some(components) => {
                // A component that happens to be called "components"
                root.insert("components".to_string(), components);
                Value::Object(strip_overall_status(root))
            }
            None => Value::Object(strip_overall_status(root)),
        },
        other => other,
    };
    Ok(serde_json::from_value(components)?)
}

/// Drop the overall status of a flat endpoint document. Component entries
/// are objects, so a string `status` can only be the overall one.
fn strip_overall_status(mut root: Map<String, Value>) -> Map<String, Value> {
    if root.get("status").map_or(false, Value::is_string) {
        root.remove("status");
    }
    root
}

/// Convert raw reports to typed reports.
///
/// Fails on the first unrecognized status code under
/// [`UnrecognizedStatusPolicy::Reject`].
pub fn parse_snapshot(
    snapshot: ReportSnapshot,
    policy: UnrecognizedStatusPolicy,
) -> Result<HealthReportSet> {
    snapshot
        .into_iter()
        .map(|(name, raw)| -> Result<(String, HealthReport)> {
            let status = parse_status(&name, &raw.status, policy)?;
            let report = HealthReport {
                status,
                details: raw.details,
            };
            Ok((name, report))
        })
        .collect()
}

fn parse_status(component: &str, code: &str, policy: UnrecognizedStatusPolicy) -> Result<Status> {
    match code.parse::<Status>() {
        Ok(status) => Ok(status),
        Err(_) => match policy {
            UnrecognizedStatusPolicy::Reject => Err(HealthError::UnknownStatus {
                component: component.to_string(),
                code: code.to_string(),
            }),
            UnrecognizedStatusPolicy::MapToUnknown => {
                warn!(
                    "Component {} reported unrecognized status {:?}, treating as UNKNOWN",
                    component, code
                );
                Ok(Status::Unknown)
            }
        },
    }
}
