// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Plugins
//!
//! A plugin is a producer that feeds `ParameterSet`s into the collection
//! (reading them from a persisted store, a bus, or a built-in default) and
//! fires the daemon's senders when it observes a successful update. The
//! daemon itself never inspects plugin internals; it only calls
//! `initialize`, `run`, and `deinitialize` in that order (§4.B).

use std::sync::Arc;

use async_trait::async_trait;
use config_domain::{ConfigResult, ParameterSetCollection};
use config_bootstrap::shutdown::CancellationToken;

use crate::fault::FaultReporter;
use crate::service::{InitialQualifierStateSender, LastUpdatedParameterSetSender};

/// Process exit code used throughout the daemon lifecycle: plugin
/// initialization/run failures and the app's own `main` return the same
/// two codes the original implementation uses.
pub const EXIT_CODE_SUCCESS: i32 = 0;
pub const EXIT_CODE_FAILURE: i32 = 1;

/// A single configuration producer.
///
/// `run` is expected to start whatever background work the plugin needs
/// (a polling loop, a file watcher, a bus subscription) and return
/// promptly — it does not block for the plugin's entire lifetime. Ongoing
/// work must itself watch `stop_token` and wind down when cancelled.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// One-time setup. The daemon aborts startup on the first plugin whose
    /// `initialize` fails.
    async fn initialize(&self) -> ConfigResult<()>;

    /// Starts the plugin's ongoing work against the shared collection.
    async fn run(
        &self,
        collection: Arc<ParameterSetCollection>,
        last_updated_sender: LastUpdatedParameterSetSender,
        qualifier_state_sender: InitialQualifierStateSender,
        stop_token: CancellationToken,
        fault_reporter: Arc<dyn FaultReporter>,
    ) -> ConfigResult<()>;

    /// Best-effort teardown, called unconditionally during shutdown. Must
    /// not panic.
    async fn deinitialize(&self);
}

/// Produces the set of plugins a given daemon deployment runs. Analogous
/// to a small factory: the daemon calls this once during startup and
/// never constructs plugins itself.
///
/// An empty list is not itself an error — a daemon with no producers is
/// merely idle. `create_plugins` fails only when collector construction
/// itself fails (e.g. a backing config file is unreadable).
pub trait PluginCollector: Send + Sync {
    fn create_plugins(&self) -> ConfigResult<Vec<Arc<dyn Plugin>>>;
}
