// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface for the config daemon, using `clap`. Flags map
//! directly onto [`crate::config::AppConfig`] fields.

use std::time::Duration;

use clap::Parser;

use crate::config::{AppConfig, LogLevel};

/// Config daemon command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "config-daemond")]
#[command(about = concat!("Configuration management daemon v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "info", value_parser = parse_log_level)]
    pub log_level: LogLevel,

    /// Maximum samples drained per polling cycle.
    #[arg(long, default_value_t = crate::config::DEFAULT_MAX_SAMPLES_LIMIT)]
    pub max_samples_limit: usize,

    /// Polling cycle interval, in milliseconds.
    #[arg(long, default_value_t = crate::config::DEFAULT_POLLING_CYCLE_INTERVAL.as_millis() as u64)]
    pub polling_cycle_interval_ms: u64,

    /// Grace period for shutdown, in seconds.
    #[arg(long, default_value_t = 5)]
    pub shutdown_grace_period_secs: u64,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    match value.to_ascii_lowercase().as_str() {
        "error" => Ok(LogLevel::Error),
        "warn" => Ok(LogLevel::Warn),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "trace" => Ok(LogLevel::Trace),
        other => Err(format!("unknown log level: {other}")),
    }
}

impl Cli {
    /// Parses argv into validated CLI arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Converts validated CLI arguments into an [`AppConfig`].
    pub fn into_config(self) -> AppConfig {
        AppConfig::builder()
            .log_level(self.log_level)
            .verbose(self.verbose)
            .max_samples_limit(self.max_samples_limit)
            .polling_cycle_interval(Duration::from_millis(self.polling_cycle_interval_ms))
            .shutdown_grace_period(Duration::from_secs(self.shutdown_grace_period_secs))
            .build()
    }
}
