//! Aggregator configuration.
//!
//! Configuration is resolved once at startup and handed to
//! [`StatusAggregator::new`](crate::StatusAggregator::new). Sources are
//! layered, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. An optional config file (TOML, JSON or YAML, picked by extension)
//! 3. `HEALTH_ROLLUP_*` environment variables
//!
//! ```toml
//! backend = "in_memory"
//! exclusions = ["diskSpace"]
//! empty_status = "UP"
//! unrecognized_status = "reject"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::ExclusionList;
use crate::error::Result;
use health_rollup_types::Status;

/// Prefix for environment overrides, e.g. `HEALTH_ROLLUP_BACKEND=mysql`.
pub const ENV_PREFIX: &str = "HEALTH_ROLLUP";

/// Component names that belong to persistence backends.
const BACKEND_COMPONENTS: [&str; 3] = ["db", "mongo", "redis"];

/// The persistence backend active in the current deployment.
///
/// Health components of the other backends are excluded from aggregation,
/// since a probe for an unused database says nothing about this service.
///
/// Deserialization goes through [`FromStr`], so config files and
/// environment variables accept the same spellings as `--backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PersistenceBackend {
    /// Embedded H2 database.
    InMemory,
    Mysql,
    Postgres,
    Mongodb,
    Redis,
}

impl PersistenceBackend {
    /// Every supported backend.
    pub const ALL: [PersistenceBackend; 5] = [
        PersistenceBackend::InMemory,
        PersistenceBackend::Mysql,
        PersistenceBackend::Postgres,
        PersistenceBackend::Mongodb,
        PersistenceBackend::Redis,
    ];

    /// Configuration name of the backend.
    pub const fn name(&self) -> &'static str {
        match self {
            PersistenceBackend::InMemory => "in_memory",
            PersistenceBackend::Mysql => "mysql",
            PersistenceBackend::Postgres => "postgres",
            PersistenceBackend::Mongodb => "mongodb",
            PersistenceBackend::Redis => "redis",
        }
    }

    /// Name of the health component that probes this backend.
    ///
    /// All relational backends share the `db` component.
    pub const fn component(&self) -> &'static str {
        match self {
            PersistenceBackend::InMemory
            | PersistenceBackend::Mysql
            | PersistenceBackend::Postgres => "db",
            PersistenceBackend::Mongodb => "mongo",
            PersistenceBackend::Redis => "redis",
        }
    }

    /// Backend components that are not in use when this backend is active.
    pub fn inactive_components(&self) -> impl Iterator<Item = &'static str> {
        let active = self.component();
        BACKEND_COMPONENTS.into_iter().filter(move |c| *c != active)
    }
}

impl fmt::Display for PersistenceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PersistenceBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        if normalized == "h2" {
            return Ok(PersistenceBackend::InMemory);
        }
        PersistenceBackend::ALL
            .into_iter()
            .find(|b| b.name() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = PersistenceBackend::ALL.iter().map(|b| b.name()).collect();
                format!("unknown backend {:?}, expected one of: {}", s, known.join(", "))
            })
    }
}

impl TryFrom<String> for PersistenceBackend {
    type Error = String;

    fn try_from(name: String) -> std::result::Result<Self, Self::Error> {
        name.parse()
    }
}

/// What to do with a status code outside the known severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedStatusPolicy {
    /// Fail the read with [`HealthError::UnknownStatus`](crate::HealthError::UnknownStatus).
    #[default]
    Reject,
    /// Treat the code as `UNKNOWN`.
    MapToUnknown,
}

/// Settings fixed at aggregator construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Component names to leave out of aggregation.
    pub exclusions: Vec<String>,

    /// Active persistence backend, if any. Adds the other backends'
    /// components to the exclusions.
    pub backend: Option<PersistenceBackend>,

    /// Result status when no component survives exclusion.
    pub empty_status: Status,

    /// Handling of unrecognized status codes when reading reports.
    pub unrecognized_status: UnrecognizedStatusPolicy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            exclusions: Vec::new(),
            backend: None,
            empty_status: Status::Up,
            unrecognized_status: UnrecognizedStatusPolicy::default(),
        }
    }
}

impl AggregatorConfig {
    /// Load configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("exclusions"),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        info!(
            "Loaded aggregator config: backend={:?}, {} explicit exclusion(s)",
            loaded.backend.map(|b| b.name()),
            loaded.exclusions.len()
        );
        Ok(loaded)
    }

    /// Set the active backend.
    pub fn with_backend(mut self, backend: PersistenceBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Add a component to the exclusions.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.exclusions.push(name.into());
        self
    }

    /// Set the status returned when nothing survives exclusion.
    pub fn with_empty_status(mut self, status: Status) -> Self {
        self.empty_status = status;
        self
    }

    /// Set the policy for unrecognized status codes.
    pub fn with_unrecognized_status(mut self, policy: UnrecognizedStatusPolicy) -> Self {
        self.unrecognized_status = policy;
        self
    }

    /// The effective exclusion list: explicit names plus the components of
    /// inactive backends.
    pub fn exclusion_list(&self) -> ExclusionList {
        let inactive = self
            .backend
            .iter()
            .flat_map(|b| b.inactive_components())
            .map(str::to_string);
        self.exclusions.iter().cloned().chain(inactive).collect()
    }
}
