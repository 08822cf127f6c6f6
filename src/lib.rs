//! # health-rollup
//!
//! Combines the health reports of many named components into one overall
//! status, leaving out components that are configured as excluded.
//!
//! A typical deployment probes every persistence backend it knows about,
//! but only one is active. Reports for the inactive ones are noise; the
//! aggregator drops them before picking the worst remaining status.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌─────────────────┐    ┌──────────────────┐
//! │   source     │───▶│ parse_snapshot  │───▶│ StatusAggregator │──▶ AggregateResult
//! │  FileSource  │    │ (status policy) │    │  (exclusions)    │
//! └──────────────┘    └─────────────────┘    └──────────────────┘
//!                                                    ▲
//!                                     AggregatorConfig (file + env)
//! ```
//!
//! - **[`aggregator`]**: [`StatusAggregator`], [`ExclusionList`] and [`AggregateResult`]
//! - **[`config`]**: [`AggregatorConfig`] and the backend to exclusion mapping
//! - **[`source`]**: [`ReportSource`] trait with a polled-file implementation,
//!   plus the JSON wire format
//! - **[`watch`](mod@watch)**: re-aggregation loop over a polled [`ReportSource`]
//! - **[`error`]**: [`HealthError`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Aggregate a report file, ignoring the components of unused backends
//! health-rollup --file health.json --backend mysql
//!
//! # Keep printing the aggregate as the file changes
//! health-rollup --file health.json --config rollup.toml --watch
//! ```
//!
//! ### As a library
//!
//! ```
//! use health_rollup::{AggregatorConfig, PersistenceBackend, StatusAggregator};
//! use health_rollup_types::{HealthReportSet, Status};
//!
//! let config = AggregatorConfig::default().with_backend(PersistenceBackend::InMemory);
//! let aggregator = StatusAggregator::new(&config);
//!
//! let reports = HealthReportSet::builder()
//!     .component("db", |r| r.status(Status::Up).detail("database", "H2"))
//!     .status("mongo", Status::Down)
//!     .build();
//!
//! let result = aggregator.aggregate(&reports);
//! assert_eq!(result.status(), Status::Up);
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod source;
pub mod watch;

// Re-export main types for convenience
pub use aggregator::{worst_status, AggregateResult, ExclusionList, StatusAggregator};
pub use config::{AggregatorConfig, PersistenceBackend, UnrecognizedStatusPolicy};
pub use error::HealthError;
pub use source::{
    parse_document, parse_snapshot, FileSource, ReportSnapshot, ReportSource, SerializedHealthReport,
};
pub use watch::watch;

pub use health_rollup_types::{HealthReport, HealthReportSet, Status};
