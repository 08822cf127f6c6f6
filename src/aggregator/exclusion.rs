//! The set of component names left out of aggregation.

use std::collections::BTreeSet;

/// Component names that never contribute to an aggregate.
///
/// Built once from [`AggregatorConfig`](crate::AggregatorConfig) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExclusionList {
    names: BTreeSet<String>,
}

impl ExclusionList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a component is excluded.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Excluded names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
