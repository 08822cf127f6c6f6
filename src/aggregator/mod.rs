//! Status aggregation with exclusions.
//!
//! The aggregator reduces a [`HealthReportSet`] to one report whose status
//! is the worst status among the components that are not excluded.
//!
//! ## Data Flow
//!
//! ```text
//! ReportSnapshot (raw JSON)
//!        │
//!        ▼
//! StatusAggregator::aggregate_snapshot()
//!        │
//!        ├──▶ drop names on the ExclusionList (codes never inspected)
//!        │
//!        ▼
//! parse_snapshot()  ── unrecognized codes handled per policy
//!        │
//!        ▼
//! StatusAggregator::aggregate()
//!        │
//!        └──▶ AggregateResult (max severity + per-component details)
//! ```

mod exclusion;

pub use exclusion::ExclusionList;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{AggregatorConfig, UnrecognizedStatusPolicy};
use crate::error::Result;
use crate::source::{parse_snapshot, ReportSnapshot};
use health_rollup_types::{HealthReport, HealthReportSet, Status};

/// The combined health of every non-excluded component.
///
/// `report.status` is the worst contributing status. `report.details` has
/// one entry per contributing component, keyed by name, holding that
/// component's status and details. Serializes as the report itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult {
    pub report: HealthReport,
}

impl AggregateResult {
    /// The aggregate status.
    pub fn status(&self) -> Status {
        self.report.status
    }

    /// Names of the components that contributed, in sorted order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.report.details.keys().map(String::as_str)
    }

    /// Status a contributing component reported.
    pub fn component_status(&self, name: &str) -> Option<Status> {
        self.report
            .details
            .get(name)?
            .get("status")?
            .as_str()?
            .parse()
            .ok()
    }

    pub fn into_report(self) -> HealthReport {
        self.report
    }
}

/// Combines named health reports into one, ignoring excluded components.
///
/// Holds no mutable state, so one instance can be shared across threads.
///
/// # Example
///
/// ```
/// use health_rollup::{AggregatorConfig, StatusAggregator};
/// use health_rollup_types::{HealthReportSet, Status};
///
/// let aggregator = StatusAggregator::new(&AggregatorConfig::default().exclude("cache"));
/// let reports = HealthReportSet::builder()
///     .status("db", Status::Up)
///     .status("cache", Status::Down)
///     .status("queue", Status::Unknown)
///     .build();
///
/// assert_eq!(aggregator.aggregate(&reports).status(), Status::Unknown);
/// ```
#[derive(Debug, Clone)]
pub struct StatusAggregator {
    exclusions: ExclusionList,
    empty_status: Status,
    unrecognized_status: UnrecognizedStatusPolicy,
}

impl StatusAggregator {
    /// Create an aggregator from resolved configuration.
    pub fn new(config: &AggregatorConfig) -> Self {
        let exclusions = config.exclusion_list();
        debug!(
            "Aggregator excludes [{}]",
            exclusions.iter().collect::<Vec<_>>().join(", ")
        );
        Self {
            exclusions,
            empty_status: config.empty_status,
            unrecognized_status: config.unrecognized_status,
        }
    }

    /// Create an aggregator with the given exclusions and default settings.
    pub fn with_exclusions(exclusions: ExclusionList) -> Self {
        let defaults = AggregatorConfig::default();
        Self {
            exclusions,
            empty_status: defaults.empty_status,
            unrecognized_status: defaults.unrecognized_status,
        }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    /// Status returned when no component survives exclusion.
    pub fn empty_status(&self) -> Status {
        self.empty_status
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }

    /// Names in `reports` that this aggregator ignores.
    pub fn excluded_in<'a>(&self, reports: &'a HealthReportSet) -> Vec<&'a str> {
        reports.names().filter(|n| self.is_excluded(n)).collect()
    }

    /// The reports that survive exclusion.
    pub fn filter(&self, reports: &HealthReportSet) -> HealthReportSet {
        reports
            .iter()
            .filter(|(name, _)| !self.is_excluded(name))
            .map(|(name, report)| (name.clone(), report.clone()))
            .collect()
    }

    /// Combine `reports` into one result.
    ///
    /// The status is the maximum severity among non-excluded components, or
    /// [`empty_status`](Self::empty_status) if none remain. Never fails.
    pub fn aggregate(&self, reports: &HealthReportSet) -> AggregateResult {
        let mut status: Option<Status> = None;
        let mut details = Map::new();

        for (name, report) in reports {
            if self.is_excluded(name) {
                debug!("Skipping excluded component {} ({})", name, report.status);
                continue;
            }
            status = Some(status.map_or(report.status, |s| s.worst(report.status)));
            details.insert(name.clone(), component_entry(report));
        }

        let status = status.unwrap_or_else(|| {
            debug!(
                "No components left after exclusion, using {}",
                self.empty_status
            );
            self.empty_status
        });

        AggregateResult {
            report: HealthReport {
                status,
                details: details.into_iter().collect(),
            },
        }
    }

    /// Parse a raw snapshot with this aggregator's unrecognized-status
    /// policy and aggregate it.
    ///
    /// Excluded components are dropped before their status codes are
    /// validated, so an unused backend reporting garbage cannot fail the read.
    pub fn aggregate_snapshot(&self, mut snapshot: ReportSnapshot) -> Result<AggregateResult> {
        snapshot.retain(|name, raw| {
            let excluded = self.is_excluded(name);
            if excluded {
                debug!("Skipping excluded component {} ({:?})", name, raw.status);
            }
            !excluded
        });
        let reports = parse_snapshot(snapshot, self.unrecognized_status)?;
        Ok(self.aggregate(&reports))
    }
}

/// Worst status in an iterator, `None` if it is empty.
pub fn worst_status<I>(statuses: I) -> Option<Status>
where
    I: IntoIterator<Item = Status>,
{
    statuses.into_iter().max()
}

fn component_entry(report: &HealthReport) -> Value {
    let mut entry = Map::new();
    entry.insert("status".to_string(), Value::from(report.status.code()));
    if !report.details.is_empty() {
        let details: Map<String, Value> = report
            .details
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entry.insert("details".to_string(), Value::Object(details));
    }
    Value::Object(entry)
}
