//! Host-side configuration for an NCD host process (SPEC_FULL §11):
//! the retry interval the scheduler's retry timer uses (spec.md §4.4,
//! §7), the log level/format the host's `tracing-subscriber` is
//! initialized with, and the per-process allocation ceiling handed to
//! every spawned [`ncd_scheduler::ProcessDescriptor`] and Sub-Process
//! Primitive child (spec.md §4.1 "Arena", §4.5).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default retry delay for a statement stuck in `DOWN_UNCLEAN` after a
/// failed `init` (spec.md §4.4 "retry timer").
pub const DEFAULT_RETRY_MS: u64 = 1000;

/// Default per-process allocation ceiling, matching
/// [`ncd_scheduler`]'s own default (spec.md §4.1 "Arena").
pub const DEFAULT_ALLOC_BUDGET_BYTES: usize = 4096;

/// Top-level configuration for the `node` host binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl HostConfig {
    /// Parses a TOML document into a [`HostConfig`]. Missing tables and
    /// fields fall back to their defaults (every field here is
    /// `#[serde(default)]`), so a host may start from an empty file.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(ConfigError::from)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(ConfigError::from)
    }
}

/// Scheduler-facing settings (spec.md §4.4 Process Scheduler, §5
/// "other timers belong to modules — the retry timer is the only
/// scheduler-owned timer").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay before the scheduler retries a statement's `init` after a
    /// failed attempt (spec.md §4.4, §7 "logs each attempt via the
    /// host logger").
    pub retry_interval_ms: u64,
    /// Default arena allocation ceiling for a root process (spec.md
    /// §4.1). A Sub-Process Primitive child gets its own ceiling via
    /// its template's own statements, not this value (spec.md §4.5).
    pub alloc_budget_bytes: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: DEFAULT_RETRY_MS,
            alloc_budget_bytes: DEFAULT_ALLOC_BUDGET_BYTES,
        }
    }
}

impl SchedulerConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

/// Log level/format settings for the host's `tracing-subscriber`
/// (SPEC_FULL §11 "Logging").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
        }
    }
}

/// Mirrors `tracing::Level`, kept as its own type so [`HostConfig`]
/// doesn't need `tracing` as a direct dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        write!(f, "{s}")
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(ConfigError::UnknownLogLevel {
                value: other.to_string(),
            }),
        }
    }
}

/// `tracing-subscriber` output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ConfigError::UnknownLogFormat {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("unknown log level {value}")]
    UnknownLogLevel { value: String },

    #[error("unknown log format {value}")]
    UnknownLogFormat { value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
