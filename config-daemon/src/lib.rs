// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # config-daemon
//!
//! Server side of the configuration-management subsystem: the daemon
//! application lifecycle ([`DaemonApp`]), the IPC-facing service surface
//! ([`DaemonService`]), the plugin host contract ([`Plugin`],
//! [`PluginCollector`]), and fault reporting ([`FaultReporter`]).

pub mod app;
pub mod fault;
pub mod plugin;
pub mod service;

pub use app::DaemonApp;
pub use fault::{Fault, FaultReporter, NoOpFaultReporter};
pub use plugin::{Plugin, PluginCollector, EXIT_CODE_FAILURE, EXIT_CODE_SUCCESS};
pub use service::{
    DaemonService, InitialQualifierStateSender, LastUpdatedParameterSetSender, QUALIFIER_STATE_SUBSCRIPTION_DEPTH,
};
