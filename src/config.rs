//! Environment-driven configuration.
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `OPFUTURE_LOG` | level name | verbosity of future-lifecycle logging |
//! | `OPFUTURE_CLEANUP_GRACE_MS` | `u64` | destroy grace period for in-flight completers |
//!
//! Only variables that are set are applied; an unparseable value is a typed
//! error. [`FutureConfig::global`] resolves the environment once per process
//! and falls back to defaults (with a warning) if resolution fails, so
//! future creation itself never fails on a bad environment.

use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::Level;

/// Environment variable selecting the log verbosity.
pub const ENV_LOG: &str = "OPFUTURE_LOG";
/// Environment variable overriding the destroy grace period, in milliseconds.
pub const ENV_CLEANUP_GRACE_MS: &str = "OPFUTURE_CLEANUP_GRACE_MS";

/// Default grace period granted to an in-flight completer during destroy.
pub const DEFAULT_CLEANUP_GRACE: Duration = Duration::from_secs(3);

static GLOBAL: OnceLock<FutureConfig> = OnceLock::new();

/// Errors produced while resolving configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ConfigError {
    /// A variable was set to a value that does not parse.
    #[error("invalid value {value:?} for {var}")]
    InvalidValue {
        /// The environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Resolved configuration for future instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FutureConfig {
    /// Grace period granted to an in-flight completer during destroy.
    pub cleanup_grace: Duration,
    /// Verbosity selected for future-lifecycle logging.
    pub log_level: Level,
}

impl Default for FutureConfig {
    fn default() -> Self {
        Self {
            cleanup_grace: DEFAULT_CLEANUP_GRACE,
            log_level: Level::WARN,
        }
    }
}

impl FutureConfig {
    /// Resolves configuration from the environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = read_env(ENV_CLEANUP_GRACE_MS) {
            let millis: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_CLEANUP_GRACE_MS,
                value: value.clone(),
            })?;
            config.cleanup_grace = Duration::from_millis(millis);
        }
        if let Some(value) = read_env(ENV_LOG) {
            config.log_level = parse_level(&value).ok_or(ConfigError::InvalidValue {
                var: ENV_LOG,
                value,
            })?;
        }
        Ok(config)
    }

    /// Returns the process-wide configuration, resolved once.
    ///
    /// Resolution failure logs a warning and falls back to defaults so that
    /// future creation never fails on a malformed environment.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| match Self::from_env() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "invalid environment, using default config");
                Self::default()
            }
        })
    }
}

/// Installs a process-wide `tracing` subscriber honoring [`ENV_LOG`].
///
/// A no-op if a subscriber is already installed.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(FutureConfig::global().log_level)
        .try_init();
}

fn read_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}
