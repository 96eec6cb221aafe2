// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Configuration
//!
//! Bootstrap-phase configuration, built from validated CLI arguments plus
//! defaults. Immutable once constructed, so it is safe to share across
//! async tasks without synchronization.

use std::time::Duration;

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Validated, immutable daemon/provider configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    app_name: String,
    log_level: LogLevel,
    verbose: bool,
    /// Maximum samples drained per polling cycle (§4.E, default 500).
    max_samples_limit: usize,
    /// Interval between polling cycles when no early wake occurs (§4.E,
    /// default 5s).
    polling_cycle_interval: Duration,
    /// Grace period the shutdown coordinator waits for tasks to wind down.
    shutdown_grace_period: Duration,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn max_samples_limit(&self) -> usize {
        self.max_samples_limit
    }

    pub fn polling_cycle_interval(&self) -> Duration {
        self.polling_cycle_interval
    }

    pub fn shutdown_grace_period(&self) -> Duration {
        self.shutdown_grace_period
    }
}

/// Default polling cycle, mirrored from the original implementation.
pub const DEFAULT_POLLING_CYCLE_INTERVAL: Duration = Duration::from_secs(5);
/// Default max samples drained per cycle, mirrored from the original
/// implementation.
pub const DEFAULT_MAX_SAMPLES_LIMIT: usize = 500;

/// Builder for [`AppConfig`].
#[derive(Debug)]
pub struct AppConfigBuilder {
    app_name: String,
    log_level: LogLevel,
    verbose: bool,
    max_samples_limit: usize,
    polling_cycle_interval: Duration,
    shutdown_grace_period: Duration,
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self {
            app_name: "config-daemon".to_string(),
            log_level: LogLevel::default(),
            verbose: false,
            max_samples_limit: DEFAULT_MAX_SAMPLES_LIMIT,
            polling_cycle_interval: DEFAULT_POLLING_CYCLE_INTERVAL,
            shutdown_grace_period: Duration::from_secs(5),
        }
    }
}

impl AppConfigBuilder {
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn max_samples_limit(mut self, limit: usize) -> Self {
        self.max_samples_limit = limit;
        self
    }

    pub fn polling_cycle_interval(mut self, interval: Duration) -> Self {
        self.polling_cycle_interval = interval;
        self
    }

    pub fn shutdown_grace_period(mut self, period: Duration) -> Self {
        self.shutdown_grace_period = period;
        self
    }

    pub fn build(self) -> AppConfig {
        AppConfig {
            app_name: self.app_name,
            log_level: self.log_level,
            verbose: self.verbose,
            max_samples_limit: self.max_samples_limit,
            polling_cycle_interval: self.polling_cycle_interval,
            shutdown_grace_period: self.shutdown_grace_period,
        }
    }
}
