//! A set of named component reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{HealthReport, HealthReportBuilder, Status};

/// Health reports keyed by component name.
///
/// Names are unique and stored sorted, so two sets built from the same
/// entries in different orders compare equal and iterate identically.
///
/// Serializes transparently as a JSON object of `name -> report`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthReportSet {
    reports: BTreeMap<String, HealthReport>,
}

impl HealthReportSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for a report set.
    pub fn builder() -> HealthReportSetBuilder {
        HealthReportSetBuilder::new()
    }

    /// Insert a report, returning the previous report for that name.
    pub fn insert(&mut self, name: impl Into<String>, report: HealthReport) -> Option<HealthReport> {
        self.reports.insert(name.into(), report)
    }

    /// Remove a report by name.
    pub fn remove(&mut self, name: &str) -> Option<HealthReport> {
        self.reports.remove(name)
    }

    /// Get the report for a component.
    pub fn get(&self, name: &str) -> Option<&HealthReport> {
        self.reports.get(name)
    }

    /// Check whether a component is present.
    pub fn contains(&self, name: &str) -> bool {
        self.reports.contains_key(name)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of components in the set.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Iterate over components in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &HealthReport)> {
        self.reports.iter()
    }

    /// Component names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.reports.keys().map(String::as_str)
    }

    /// The most severe status in the set, or `None` if it is empty.
    pub fn worst_status(&self) -> Option<Status> {
        self.reports.values().map(|r| r.status).max()
    }

    /// Keep only the components for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &HealthReport) -> bool,
    {
        self.reports.retain(|name, report| f(name, report));
    }

    /// Consume the set, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, HealthReport> {
        self.reports
    }
}

impl From<BTreeMap<String, HealthReport>> for HealthReportSet {
    fn from(reports: BTreeMap<String, HealthReport>) -> Self {
        Self { reports }
    }
}

impl<K: Into<String>> FromIterator<(K, HealthReport)> for HealthReportSet {
    fn from_iter<I: IntoIterator<Item = (K, HealthReport)>>(iter: I) -> Self {
        Self {
            reports: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for HealthReportSet {
    type Item = (String, HealthReport);
    type IntoIter = std::collections::btree_map::IntoIter<String, HealthReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.into_iter()
    }
}

impl<'a> IntoIterator for &'a HealthReportSet {
    type Item = (&'a String, &'a HealthReport);
    type IntoIter = std::collections::btree_map::Iter<'a, String, HealthReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

/// Builder for `HealthReportSet`.
#[derive(Debug, Default)]
pub struct HealthReportSetBuilder {
    reports: BTreeMap<String, HealthReport>,
}

impl HealthReportSetBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component with a report built using a closure.
    pub fn component<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(HealthReportBuilder) -> HealthReportBuilder,
    {
        let report = f(HealthReportBuilder::new()).build();
        self.reports.insert(name.into(), report);
        self
    }

    /// Add a component with only a status.
    pub fn status(mut self, name: impl Into<String>, status: Status) -> Self {
        self.reports.insert(name.into(), HealthReport::new(status));
        self
    }

    /// Add a component with a pre-built report.
    pub fn report(mut self, name: impl Into<String>, report: HealthReport) -> Self {
        self.reports.insert(name.into(), report);
        self
    }

    /// Build the set.
    pub fn build(self) -> HealthReportSet {
        HealthReportSet {
            reports: self.reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_set_builder() {
        let reports = HealthReportSet::builder()
            .status("db", Status::Up)
            .component("cache", |r| r.status(Status::Down).detail("host", "redis:6379"))
            .report("queue", HealthReport::unknown())
            .build();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports.worst_status(), Some(Status::Down));
        assert_eq!(reports.names().collect::<Vec<_>>(), ["cache", "db", "queue"]);
    }

    #[test]
    fn test_empty_set_has_no_worst_status() {
        assert_eq!(HealthReportSet::new().worst_status(), None);
    }

    #[test]
    fn test_insertion_order_is_irrelevant() {
        let a: HealthReportSet = [("x", HealthReport::up()), ("y", HealthReport::down())]
            .into_iter()
            .collect();
        let b: HealthReportSet = [("y", HealthReport::down()), ("x", HealthReport::up())]
            .into_iter()
            .collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_names_keep_last_report() {
        let mut reports = HealthReportSet::new();
        reports.insert("db", HealthReport::down());
        let previous = reports.insert("db", HealthReport::up());

        assert_eq!(previous, Some(HealthReport::down()));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports.get("db"), Some(&HealthReport::up()));
    }

    #[test]
    fn test_serde_roundtrip() {
        let reports = HealthReportSet::builder()
            .component("db", |r| r.status(Status::Up).detail("database", "MySQL"))
            .status("mongo", Status::Down)
            .build();

        let json = serde_json::to_string(&reports).unwrap();
        assert!(json.starts_with(r#"{"db":"#));

        let parsed: HealthReportSet = serde_json::from_str(&json).unwrap();
        assert_eq!(reports, parsed);
    }
}
