//! Runtime configuration.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `tasktrack.toml` in the working directory, then `TASKTRACK_*`
//! environment variables (for example `TASKTRACK_DATABASE_URL`).

use crate::{
    paging::{PageRequest, PageRequestError},
    store::postgres::TrackerPgPool,
};
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "tasktrack";
const ENV_PREFIX: &str = "TASKTRACK";

/// Builder type accepted by [`TrackerConfig::from_sources`].
pub type ConfigSources = config::ConfigBuilder<DefaultState>;

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    /// The configured default page size is out of range.
    #[error("invalid default page size: {0}")]
    PageSize(#[from] PageRequestError),
    /// The pool must hold at least one connection.
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
    /// No database URL was configured.
    #[error("database_url is not configured")]
    MissingDatabaseUrl,
}

/// Tracker settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// `PostgreSQL` connection URL; `None` when running in memory.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: u32,
    /// Page size used when a caller does not supply one.
    pub default_page_size: u32,
    /// `EnvFilter` directive string, e.g. `info,tasktrack=debug`.
    pub log_filter: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl TrackerConfig {
    /// Loads configuration from the default file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when a source is malformed or a value
    /// is out of range.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::from_sources(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    /// Loads configuration from explicit sources layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when a source is malformed or a value
    /// is out of range.
    pub fn from_sources(sources: ConfigSources) -> Result<Self, ConfigurationError> {
        let settings = sources
            .set_default("pool_max_size", 10_i64)?
            .set_default("default_page_size", i64::from(PageRequest::DEFAULT_SIZE))?
            .set_default("log_filter", "info")?
            .set_default("log_json", false)?
            .build()?;
        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()
    }

    fn validate(self) -> Result<Self, ConfigurationError> {
        if self.pool_max_size == 0 {
            return Err(ConfigurationError::EmptyPool);
        }
        PageRequest::first(self.default_page_size)?;
        Ok(self)
    }

    /// Returns the first page at the configured default size.
    #[must_use]
    pub fn default_page(&self) -> PageRequest {
        PageRequest::first(self.default_page_size).unwrap_or_default()
    }

    /// Builds the connection pool for
    /// [`PostgresStore`](crate::store::postgres::PostgresStore).
    ///
    /// Connections are opened lazily, so this does not contact the server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingDatabaseUrl`] when no URL is
    /// configured.
    pub fn build_pool(&self) -> Result<TrackerPgPool, ConfigurationError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(ConfigurationError::MissingDatabaseUrl)?;
        let manager = ConnectionManager::<PgConnection>::new(url);
        Ok(Pool::builder()
            .max_size(self.pool_max_size)
            .build_unchecked(manager))
    }
}
