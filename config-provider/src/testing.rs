// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # MockTransport
//!
//! In-crate test double for [`crate::proxy::ProxyTransport`], grounded in
//! the original's `*_mock.h` pattern: a hand-held stand-in for the daemon
//! used only by this crate's own unit tests. Not part of the public API.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use config_domain::{encode_last_updated_event, ConfigError, ConfigResult, InitialQualifierState, LAST_UPDATED_EVENT_WIDTH};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::proxy::ProxyTransport;

pub struct MockTransport {
    connected: bool,
    sets: Mutex<std::collections::HashMap<String, Value>>,
    qualifier_state: Mutex<InitialQualifierState>,
    events: broadcast::Sender<[u8; LAST_UPDATED_EVENT_WIDTH]>,
}

impl MockTransport {
    pub fn new_connected() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            connected: true,
            sets: Mutex::new(std::collections::HashMap::new()),
            qualifier_state: Mutex::new(InitialQualifierState::Unqualified),
            events,
        }
    }

    pub fn new_disconnected() -> Self {
        let mut transport = Self::new_connected();
        transport.connected = false;
        transport
    }

    pub fn seed(&self, name: &str, value: Value) {
        self.sets.lock().unwrap().insert(name.to_string(), value);
    }

    pub fn set_qualifier_state(&self, state: InitialQualifierState) {
        *self.qualifier_state.lock().unwrap() = state;
    }

    pub fn emit_last_updated(&self, name: &str) {
        let _ = self.events.send(encode_last_updated_event(name));
    }
}

#[async_trait]
impl ProxyTransport for MockTransport {
    async fn get_parameter_set(&self, name: &str, _timeout: Duration) -> ConfigResult<Value> {
        self.sets
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ParameterSetNotFound(name.to_string()))
    }

    fn subscribe_last_updated(&self, _depth: usize) -> Option<broadcast::Receiver<[u8; LAST_UPDATED_EVENT_WIDTH]>> {
        if self.connected {
            Some(self.events.subscribe())
        } else {
            None
        }
    }

    async fn initial_qualifier_state(&self, _timeout: Duration) -> ConfigResult<InitialQualifierState> {
        if self.connected {
            Ok(*self.qualifier_state.lock().unwrap())
        } else {
            Err(ConfigError::ProxyNotReady)
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
