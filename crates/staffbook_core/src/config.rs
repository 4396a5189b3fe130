//! Process configuration sourced from environment variables.
//!
//! # Responsibility
//! - Collect every tunable the binary needs into one `AppConfig` value.
//! - Keep parsing testable by accepting an injectable variable lookup.
//!
//! # Invariants
//! - Missing variables fall back to defaults.
//! - Numeric values outside their accepted range fall back to defaults.
//! - Enumerated values (log level, update policy) that do not parse are errors.

use crate::logging::{default_log_level, normalize_level};
use crate::service::employee_service::UpdateMissingPolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "STAFFBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "STAFFBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STAFFBOOK_LOG_DIR";
pub const ENV_POSTAL_ENDPOINT: &str = "STAFFBOOK_POSTAL_ENDPOINT";
pub const ENV_POSTAL_CONNECT_TIMEOUT_MS: &str = "STAFFBOOK_POSTAL_CONNECT_TIMEOUT_MS";
pub const ENV_POSTAL_REQUEST_TIMEOUT_MS: &str = "STAFFBOOK_POSTAL_REQUEST_TIMEOUT_MS";
pub const ENV_UPDATE_MISSING: &str = "STAFFBOOK_UPDATE_MISSING";

const DEFAULT_DB_FILE_NAME: &str = "staffbook.sqlite3";
const DEFAULT_POSTAL_ENDPOINT: &str = "https://viacep.com.br/ws";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                variable,
                value,
                reason,
            } => write!(f, "invalid value `{value}` for {variable}: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the HTTP postal lookup client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalConfig {
    /// Base URL; the client appends `/{digits}/json/`.
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    /// Applied to both reads and writes.
    pub request_timeout_ms: u64,
}

impl Default for PostalConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_POSTAL_ENDPOINT.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// `None` keeps logs on stderr.
    pub log_dir: Option<PathBuf>,
    pub postal: PostalConfig,
    pub update_missing: UpdateMissingPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            postal: PostalConfig::default(),
            update_missing: UpdateMissingPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let log_level = match var(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(|reason| ConfigError::InvalidValue {
                variable: ENV_LOG_LEVEL,
                value,
                reason,
            })?,
            None => defaults.log_level,
        };

        let update_missing = match var(ENV_UPDATE_MISSING) {
            Some(value) => {
                UpdateMissingPolicy::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                    variable: ENV_UPDATE_MISSING,
                    value,
                    reason: "expected ignore|reject".to_string(),
                })?
            }
            None => defaults.update_missing,
        };

        let postal = PostalConfig {
            endpoint: var(ENV_POSTAL_ENDPOINT).unwrap_or(defaults.postal.endpoint),
            connect_timeout_ms: bounded_ms(
                var(ENV_POSTAL_CONNECT_TIMEOUT_MS),
                100..=60_000,
                DEFAULT_CONNECT_TIMEOUT_MS,
            ),
            request_timeout_ms: bounded_ms(
                var(ENV_POSTAL_REQUEST_TIMEOUT_MS),
                100..=120_000,
                DEFAULT_REQUEST_TIMEOUT_MS,
            ),
        };

        Ok(Self {
            db_path: var(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            log_level,
            log_dir: var(ENV_LOG_DIR).map(PathBuf::from),
            postal,
            update_missing,
        })
    }
}

fn bounded_ms(value: Option<String>, range: std::ops::RangeInclusive<u64>, default: u64) -> u64 {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| range.contains(v))
        .unwrap_or(default)
}
