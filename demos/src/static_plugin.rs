// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StaticSeedPlugin
//!
//! The simplest possible producer plugin: seeds a fixed set of parameter
//! sets into the collection at `run`, marks the daemon qualified, and
//! returns — there is no ongoing work to watch the stop token for. Real
//! plugins (reading from a bus, a calibration file, a UI) follow the same
//! `initialize` / `run` / `deinitialize` contract but keep working past
//! `run`'s return, watching `stop_token` to wind down.

use std::sync::Arc;

use async_trait::async_trait;
use config_bootstrap::shutdown::CancellationToken;
use config_daemon::fault::FaultReporter;
use config_daemon::plugin::{Plugin, PluginCollector};
use config_daemon::service::{InitialQualifierStateSender, LastUpdatedParameterSetSender};
use config_domain::{ConfigResult, InitialQualifierState, ParameterSetCollection};
use serde_json::json;

pub struct StaticSeedPlugin;

#[async_trait]
impl Plugin for StaticSeedPlugin {
    async fn initialize(&self) -> ConfigResult<()> {
        tracing::info!("StaticSeedPlugin initialized");
        Ok(())
    }

    async fn run(
        &self,
        collection: Arc<ParameterSetCollection>,
        last_updated_sender: LastUpdatedParameterSetSender,
        qualifier_state_sender: InitialQualifierStateSender,
        _stop_token: CancellationToken,
        _fault_reporter: Arc<dyn FaultReporter>,
    ) -> ConfigResult<()> {
        collection.insert("vehicle", "max_speed", json!(180))?;
        collection.insert("vehicle", "max_occupants", json!(5))?;
        collection.set_calibratable("vehicle", true);

        qualifier_state_sender.send(InitialQualifierState::Qualified);
        last_updated_sender.send("vehicle");

        tracing::info!("StaticSeedPlugin seeded the \"vehicle\" parameter set");
        Ok(())
    }

    async fn deinitialize(&self) {
        tracing::info!("StaticSeedPlugin deinitialized");
    }
}

pub struct StaticSeedPluginCollector;

impl PluginCollector for StaticSeedPluginCollector {
    fn create_plugins(&self) -> ConfigResult<Vec<Arc<dyn Plugin>>> {
        Ok(vec![Arc::new(StaticSeedPlugin)])
    }
}
