// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shared Error Taxonomy
//!
//! One flat, `thiserror`-derived error enum shared across the daemon's data
//! model, the provider's cache coordinator, and the persistency layer. The
//! enum itself lives in the domain crate because both sides of the wire
//! need to agree on the same kinds (§4.H of the design).

use thiserror::Error;

/// Domain-wide error kinds shared across the ConfigDaemon / ConfigProvider
/// subsystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Parameter missed: {0}")]
    ParameterMissedError(String),

    #[error("Converting error: {0}")]
    ConvertingError(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Parameter set not found: {0}")]
    ParameterSetNotFound(String),

    #[error("Parameters not found: {0}")]
    ParametersNotFound(String),

    #[error("Parameter set is not calibratable")]
    ParameterSetNotCalibratable,

    #[error("Parameter already exists: {0}")]
    ParameterAlreadyExists(String),

    #[error("Object casting error: {0}")]
    ObjectCastingError(String),

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Value casting error: {0}")]
    ValueCastingError(String),

    #[error("Value not found: {0}")]
    ValueNotFound(String),

    #[error("Proxy not ready")]
    ProxyNotReady,

    #[error("Proxy access timeout")]
    ProxyAccessTimeout,

    #[error("Proxy returned no result")]
    ProxyReturnedNoResult,

    #[error("Empty callback provided")]
    EmptyCallbackProvided,

    #[error("Callback already set")]
    CallbackAlreadySet,

    #[error("Method not supported: {0}")]
    MethodNotSupported(String),

    #[error("Failed to subscribe: {0}")]
    FailedToSubscribe(String),

    #[error("Data not found: {0}")]
    DataNotFound(String),

    #[error("Unable to save to persistency: {0}")]
    UnableToSaveToPersistency(String),
}

impl ConfigError {
    /// Broad category, used for logging/metrics classification the way
    /// `PipelineError::category` does.
    pub fn category(&self) -> &'static str {
        match self {
            ConfigError::ParameterMissedError(_) | ConfigError::ParameterNotFound(_) => "data",
            ConfigError::ConvertingError(_) | ConfigError::ObjectCastingError(_) | ConfigError::ValueCastingError(_) => {
                "casting"
            }
            ConfigError::ParsingError(_) => "parsing",
            ConfigError::ParameterSetNotFound(_) | ConfigError::ParametersNotFound(_) => "not-found",
            ConfigError::ParameterSetNotCalibratable => "calibration",
            ConfigError::ParameterAlreadyExists(_) => "conflict",
            ConfigError::ValueNotFound(_) | ConfigError::DataNotFound(_) => "not-found",
            ConfigError::ProxyNotReady | ConfigError::ProxyAccessTimeout | ConfigError::ProxyReturnedNoResult => "proxy",
            ConfigError::EmptyCallbackProvided | ConfigError::CallbackAlreadySet => "callback",
            ConfigError::MethodNotSupported(_) => "unsupported",
            ConfigError::FailedToSubscribe(_) => "subscription",
            ConfigError::UnableToSaveToPersistency(_) => "persistency",
        }
    }

    /// Whether a caller may usefully retry the operation that produced this
    /// error (transient proxy/timeout conditions only).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConfigError::ProxyAccessTimeout | ConfigError::ProxyReturnedNoResult | ConfigError::ProxyNotReady
        )
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParsingError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
