//! Command-line arguments for the `ncd-node` host binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Runs a demo NCD program to completion (or until Ctrl+C), driven by
/// the engine core (spec.md §6 "Host runtime").
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ncd-node",
    version = env!("CARGO_PKG_VERSION"),
    about = "NCD host binary: runs a demo program through the engine's process scheduler"
)]
pub struct CliArgs {
    /// Path to a TOML configuration file (retry interval, allocation
    /// ceiling, logging). Missing fields fall back to defaults; a
    /// missing file falls back entirely to defaults.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overrides the configured log level.
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<CliLogLevel>,

    /// Overrides the configured log format.
    #[arg(long = "log-format", value_enum)]
    pub log_format: Option<CliLogFormat>,

    /// Which built-in demo program to run (spec.md §8 scenarios).
    #[arg(long = "demo", value_enum, default_value_t = Demo::Linear)]
    pub demo: Demo,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for ncd_config::LogLevel {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => ncd_config::LogLevel::Error,
            CliLogLevel::Warn => ncd_config::LogLevel::Warn,
            CliLogLevel::Info => ncd_config::LogLevel::Info,
            CliLogLevel::Debug => ncd_config::LogLevel::Debug,
            CliLogLevel::Trace => ncd_config::LogLevel::Trace,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliLogFormat {
    Pretty,
    Json,
    Compact,
}

impl From<CliLogFormat> for ncd_config::LogFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Pretty => ncd_config::LogFormat::Pretty,
            CliLogFormat::Json => ncd_config::LogFormat::Json,
            CliLogFormat::Compact => ncd_config::LogFormat::Compact,
        }
    }
}

/// One demo program per named scenario of spec.md §8, built from
/// [`crate::demos`] rather than parsed (the surface syntax is out of
/// scope, per spec.md §1 Non-goals).
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    /// S1: linear advance and teardown.
    Linear,
    /// S2: retry on failure.
    Retry,
    /// S3: regress propagation.
    Regress,
    /// S4: variable resolution scoping.
    Variables,
    /// S5: template invocation with `_caller`.
    Template,
}
