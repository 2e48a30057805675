//! Process configuration (environment variables + defaults).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use catalog_observability::LogFormat;

use crate::media::{DEFAULT_MAX_UPLOAD_BYTES, MediaConfig, NamingStrategy};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SALT_ROUNDS: u32 = 10;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value `{value}` for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Work factor for credential hashing.
    pub salt_rounds: u32,
    pub media: MediaConfig,
    pub log_format: LogFormat,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "BIND_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 8080))
        })?;

        let database = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", || {
                    DEFAULT_MAX_CONNECTIONS
                })?,
                acquire_timeout_secs: parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", || 5)?,
            }),
            None => None,
        };

        let media = MediaConfig {
            destination: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| MediaConfig::default().destination),
            naming: parse_or(&lookup, "UPLOAD_NAMING", NamingStrategy::default)?,
            max_bytes: parse_or(&lookup, "UPLOAD_MAX_BYTES", || DEFAULT_MAX_UPLOAD_BYTES)?,
        };

        Ok(Self {
            bind_addr,
            database,
            salt_rounds: parse_or(&lookup, "SALT_ROUNDS", || DEFAULT_SALT_ROUNDS)?,
            media,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::default)?,
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: core::fmt::Display,
    D: FnOnce() -> T,
{
    match lookup(key) {
        None => Ok(default()),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
