//! # health-rollup-types
//!
//! Core types for health status aggregation. This crate defines the
//! vocabulary shared by health producers (probes, endpoints) and consumers
//! such as the `health-rollup` aggregator.
//!
//! ## Design Goals
//!
//! - **Explicit severity**: [`Status`] is a closed enum whose `Ord` *is* the
//!   severity order, so "worst of" is just `max()`
//! - **Free-form diagnostics**: reports carry an arbitrary JSON detail map
//! - **Order independent**: report sets are keyed by component name in a
//!   sorted map, so insertion order never leaks into results
//! - **Ergonomic builders**: fluent API for constructing report sets
//!
//! ## Example
//!
//! ```rust
//! use health_rollup_types::{HealthReportSet, Status};
//!
//! let reports = HealthReportSet::builder()
//!     .component("db", |r| r.status(Status::Up).detail("database", "H2"))
//!     .component("diskSpace", |r| r.status(Status::OutOfService))
//!     .build();
//!
//! assert_eq!(reports.len(), 2);
//! assert_eq!(reports.worst_status(), Some(Status::OutOfService));
//! ```
//!
//! ## Severity Order
//!
//! From least to most severe: `UP < UNKNOWN < OUT_OF_SERVICE < DOWN`.

mod report;
mod report_set;
mod status;

pub use report::*;
pub use report_set::*;
pub use status::*;
