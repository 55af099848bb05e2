//! Runtime configuration, read from the environment and then overridden by
//! command-line flags.
//!
//! | Variable                  | Default                     |
//! |---------------------------|-----------------------------|
//! | `STORERATE_API_URL`       | `http://localhost:5000/api` |
//! | `STORERATE_BACKEND`       | `memory`                    |
//! | `STORERATE_STATE`         | `storerate.state`           |
//! | `STORERATE_SESSION`       | `.storerate-session.json`   |
//! | `STORERATE_TIMEOUT_SECS`  | `30`                        |
//! | `STORERATE_RATING_POLICY` | `last-write-wins`           |

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use storerate_client::DEFAULT_API_URL;
use storerate_core::RatingPolicy;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_STATE_PATH: &str = "storerate.state";
pub const DEFAULT_SESSION_PATH: &str = ".storerate-session.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where dashboard data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process entity store, persisted as a snapshot file between runs.
    Memory,
    /// The remote API.
    Http,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown backend '{other}' (expected memory or http)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub backend: BackendKind,
    pub state_path: PathBuf,
    pub session_path: PathBuf,
    pub timeout: Duration,
    /// Policy used when a fresh state file is created.
    pub rating_policy: RatingPolicy,
    pub strict_ratings: bool,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            backend: BackendKind::Memory,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rating_policy: RatingPolicy::default(),
            strict_ratings: false,
            json: false,
        }
    }
}

impl Config {
    /// Read the configuration from process environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_url: lookup("STORERATE_API_URL").unwrap_or(defaults.api_url),
            backend: try_load(&lookup, "STORERATE_BACKEND", defaults.backend)?,
            state_path: lookup("STORERATE_STATE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_path),
            session_path: lookup("STORERATE_SESSION")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_path),
            timeout: Duration::from_secs(try_load(
                &lookup,
                "STORERATE_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            rating_policy: try_load(&lookup, "STORERATE_RATING_POLICY", defaults.rating_policy)?,
            strict_ratings: false,
            json: false,
        })
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            debug!("{key} not set, using default");
            Ok(default)
        }
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
