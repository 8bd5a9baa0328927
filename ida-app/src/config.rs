use error_stack::{Report, ResultExt};
use std::str::FromStr;
use std::time::Duration;

const PORT_VAR: &str = "IDA_PORT";
const DATABASE_URL_VAR: &str = "DATABASE_URL";
const DB_POOL_SIZE_VAR: &str = "IDA_DB_POOL_SIZE";
const METRICS_ENABLED_VAR: &str = "IDA_METRICS_ENABLED";
const REQUEST_TIMEOUT_VAR: &str = "IDA_REQUEST_TIMEOUT_SECS";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
#[error("invalid configuration")]
pub struct ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Postgres connection string. The in-memory store is used when this is missing.
    pub database_url: Option<String>,
    pub db_pool_size: Option<usize>,
    pub metrics_enabled: bool,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report<ConfigError>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from whatever `lookup` returns for each variable name.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Report<ConfigError>> {
        Ok(Self {
            port: parse(&lookup, PORT_VAR)?.unwrap_or(DEFAULT_PORT),
            database_url: lookup(DATABASE_URL_VAR).filter(|url| !url.is_empty()),
            db_pool_size: parse(&lookup, DB_POOL_SIZE_VAR)?,
            metrics_enabled: parse(&lookup, METRICS_ENABLED_VAR)?.unwrap_or(true),
            request_timeout: Duration::from_secs(
                parse(&lookup, REQUEST_TIMEOUT_VAR)?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        })
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, Report<ConfigError>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .change_context(ConfigError)
                .attach_with(|| format!("{name} has an invalid value '{value}'"))
        })
        .transpose()
}
