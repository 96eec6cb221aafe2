// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DaemonService
//!
//! The daemon-side half of the IPC boundary (§4.C). Exposes:
//!
//! - a request, `get_parameter_set`, read-only against the collection;
//! - an event, `LastUpdatedParameterSet`, fired by plugins after a
//!   successful update, carried as the fixed-width payload from
//!   [`config_domain::encode_last_updated_event`];
//! - a field, the daemon-wide [`InitialQualifierState`], republished on
//!   every write regardless of whether the value actually changed.
//!
//! This module specifies the abstract contract only; it does not encode
//! an actual wire transport. A concrete binding (real IPC middleware, or
//! the in-process adapter used by the demos and by `config-provider`'s own
//! tests) implements against the channels this type exposes.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use config_domain::{
    encode_last_updated_event, ConfigError, ConfigResult, InitialQualifierState, ParameterSetCollection,
    LAST_UPDATED_EVENT_WIDTH,
};
use tokio::sync::{broadcast, watch};

/// Default capacity of the `LastUpdatedParameterSet` broadcast channel.
/// Comfortably exceeds the minimum subscription depth of 2 (§6) so that a
/// briefly-lagging subscriber does not miss events under normal load.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Subscription depth of the `InitialQualifierState` field, as opposed to
/// the depth-2 `LastUpdatedParameterSet` event subscription. A
/// `tokio::sync::watch` channel retains exactly one value by construction,
/// so this is a documentation constant rather than a tunable.
pub const QUALIFIER_STATE_SUBSCRIPTION_DEPTH: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Constructed,
    Offered,
    Stopped,
}

/// Server side of the ConfigDaemon IPC surface.
pub struct DaemonService {
    collection: Arc<ParameterSetCollection>,
    last_updated_tx: broadcast::Sender<[u8; LAST_UPDATED_EVENT_WIDTH]>,
    qualifier_state_tx: watch::Sender<InitialQualifierState>,
    lifecycle: AtomicU8,
}

impl DaemonService {
    pub fn new(collection: Arc<ParameterSetCollection>) -> Self {
        let (last_updated_tx, _) = broadcast::channel(DEFAULT_EVENT_CHANNEL_CAPACITY);
        let (qualifier_state_tx, _) = watch::channel(InitialQualifierState::Undefined);
        Self {
            collection,
            last_updated_tx,
            qualifier_state_tx,
            lifecycle: AtomicU8::new(Lifecycle::Constructed as u8),
        }
    }

    /// Begins accepting requests and serving the event/field.
    pub fn offer(&self) {
        self.lifecycle.store(Lifecycle::Offered as u8, Ordering::SeqCst);
        tracing::info!("InternalConfigProviderService offered");
    }

    /// Stops accepting requests. Idempotent.
    pub fn stop(&self) {
        self.lifecycle.store(Lifecycle::Stopped as u8, Ordering::SeqCst);
        tracing::info!("InternalConfigProviderService stopped");
    }

    pub fn is_offered(&self) -> bool {
        self.lifecycle.load(Ordering::SeqCst) == Lifecycle::Offered as u8
    }

    /// Request: returns the named set's canonical JSON form.
    pub fn get_parameter_set(&self, set_name: &str) -> ConfigResult<String> {
        if !self.is_offered() {
            return Err(ConfigError::ProxyNotReady);
        }
        self.collection.get_parameter_set(set_name)
    }

    /// Event: broadcasts that `set_name` was last-updated. Returns `false`
    /// when there are no subscribers to deliver to.
    pub fn send_last_updated(&self, set_name: &str) -> bool {
        let payload = encode_last_updated_event(set_name);
        self.last_updated_tx.send(payload).is_ok()
    }

    /// Field: republishes the daemon-wide qualifier-state lifecycle value.
    /// `watch::Sender::send` notifies subscribers unconditionally, so
    /// writes that leave the value unchanged are still observed (§4.C).
    pub fn set_initial_qualifier_state(&self, state: InitialQualifierState) {
        let _ = self.qualifier_state_tx.send(state);
    }

    pub fn subscribe_last_updated(&self) -> broadcast::Receiver<[u8; LAST_UPDATED_EVENT_WIDTH]> {
        self.last_updated_tx.subscribe()
    }

    pub fn subscribe_qualifier_state(&self) -> watch::Receiver<InitialQualifierState> {
        self.qualifier_state_tx.subscribe()
    }
}

/// Bound sender handed to a single plugin instance for the
/// `LastUpdatedParameterSet` event, created per §4.B's `Run` contract.
#[derive(Clone)]
pub struct LastUpdatedParameterSetSender {
    service: Arc<DaemonService>,
}

impl LastUpdatedParameterSetSender {
    pub fn new(service: Arc<DaemonService>) -> Self {
        Self { service }
    }

    pub fn send(&self, set_name: &str) -> bool {
        self.service.send_last_updated(set_name)
    }
}

/// Bound sender handed to a single plugin instance for the
/// `InitialQualifierState` field.
#[derive(Clone)]
pub struct InitialQualifierStateSender {
    service: Arc<DaemonService>,
}

impl InitialQualifierStateSender {
    pub fn new(service: Arc<DaemonService>) -> Self {
        Self { service }
    }

    pub fn send(&self, state: InitialQualifierState) {
        self.service.set_initial_qualifier_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_with(set_name: &str) -> Arc<DaemonService> {
        let collection = Arc::new(ParameterSetCollection::new());
        collection.insert(set_name, "p", json!(1)).unwrap();
        let service = Arc::new(DaemonService::new(collection));
        service.offer();
        service
    }

    #[test]
    fn get_parameter_set_fails_before_offer() {
        let collection = Arc::new(ParameterSetCollection::new());
        let service = DaemonService::new(collection);
        assert_eq!(service.get_parameter_set("alpha").unwrap_err(), ConfigError::ProxyNotReady);
    }

    #[test]
    fn get_parameter_set_succeeds_once_offered() {
        let service = service_with("alpha");
        assert!(service.get_parameter_set("alpha").is_ok());
    }

    #[tokio::test]
    async fn last_updated_event_reaches_subscriber() {
        let service = service_with("alpha");
        let mut rx = service.subscribe_last_updated();
        assert!(service.send_last_updated("alpha"));
        let payload = rx.recv().await.unwrap();
        assert_eq!(config_domain::decode_last_updated_event(&payload), "alpha");
    }

    #[tokio::test]
    async fn qualifier_state_field_republishes_unchanged_value() {
        let service = service_with("alpha");
        let mut rx = service.subscribe_qualifier_state();
        rx.mark_unchanged();
        service.set_initial_qualifier_state(InitialQualifierState::Qualified);
        assert!(rx.changed().await.is_ok());
        rx.mark_unchanged();
        service.set_initial_qualifier_state(InitialQualifierState::Qualified);
        assert!(rx.changed().await.is_ok());
    }
}
