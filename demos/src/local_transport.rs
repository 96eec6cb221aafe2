// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LocalTransport
//!
//! The one concrete [`ProxyTransport`] implementation in this workspace:
//! an in-process adapter binding a [`ProviderProxy`](config_provider::ProviderProxy)
//! directly to a [`DaemonService`] living in the same address space. Real
//! deployments replace this with whatever IPC middleware ships the actual
//! bytes; this crate exists to exercise both sides of the abstract
//! contract end to end without one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config_daemon::DaemonService;
use config_domain::{ConfigError, ConfigResult, InitialQualifierState, LAST_UPDATED_EVENT_WIDTH};
use config_provider::ProxyTransport;
use serde_json::Value;
use tokio::sync::broadcast;

pub struct LocalTransport {
    service: Arc<DaemonService>,
}

impl LocalTransport {
    pub fn new(service: Arc<DaemonService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProxyTransport for LocalTransport {
    async fn get_parameter_set(&self, name: &str, _timeout: Duration) -> ConfigResult<Value> {
        // In-process calls complete immediately; `timeout` exists for the
        // benefit of transports that can actually block on the wire.
        let text = self.service.get_parameter_set(name)?;
        serde_json::from_str(&text).map_err(ConfigError::from)
    }

    fn subscribe_last_updated(&self, _depth: usize) -> Option<broadcast::Receiver<[u8; LAST_UPDATED_EVENT_WIDTH]>> {
        if self.service.is_offered() {
            Some(self.service.subscribe_last_updated())
        } else {
            None
        }
    }

    async fn initial_qualifier_state(&self, _timeout: Duration) -> ConfigResult<InitialQualifierState> {
        if !self.service.is_offered() {
            return Err(ConfigError::ProxyNotReady);
        }
        Ok(*self.service.subscribe_qualifier_state().borrow())
    }

    fn is_connected(&self) -> bool {
        self.service.is_offered()
    }
}
