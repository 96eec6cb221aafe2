// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ProviderProxy
//!
//! Client-side abstraction of the daemon's `DaemonService`: request the
//! current value of a set, subscribe to the update event, read the
//! qualifier-state field, and run the polling worker that turns a stream
//! of "last updated" events into per-set callback invocations.
//!
//! The wire binding itself is abstracted behind [`ProxyTransport`] — this
//! module specifies the polling/dedup contract against that trait, not a
//! concrete transport. [`crate::testing::MockTransport`] is the in-crate
//! double used by this module's own tests; a real deployment supplies its
//! own transport (see the workspace's `demos/` for an in-process example
//! wired against `config-daemon`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config_domain::{decode_last_updated_event, ConfigError, ConfigResult, InitialQualifierState, LAST_UPDATED_EVENT_WIDTH};
use serde_json::Value;
use tokio::sync::{broadcast, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Minimum subscription queue depth the transport must honor (§4.E).
pub const MIN_SUBSCRIPTION_DEPTH: usize = 2;

/// Default per-request timeout used by the cache coordinator when
/// refetching or reacting to an update (§4.F `kDefaultResponseTimeout`).
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(1000);

pub const DEFAULT_MAX_SAMPLES_LIMIT: usize = 500;
pub const DEFAULT_POLLING_CYCLE_INTERVAL: Duration = Duration::from_secs(5);

/// Abstract client-side binding to a `DaemonService`. A concrete
/// implementation owns whatever wire transport is in play; this trait is
/// the only contract `ProviderProxy` depends on.
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    /// Requests the named set's canonical JSON value, bounded by `timeout`.
    async fn get_parameter_set(&self, name: &str, timeout: Duration) -> ConfigResult<Value>;

    /// Subscribes to the `LastUpdatedParameterSet` event with at least
    /// `depth` queued samples. Returns `None` on subscription failure.
    fn subscribe_last_updated(&self, depth: usize) -> Option<broadcast::Receiver<[u8; LAST_UPDATED_EVENT_WIDTH]>>;

    /// Reads the current `InitialQualifierState` field, bounded by
    /// `timeout`.
    async fn initial_qualifier_state(&self, timeout: Duration) -> ConfigResult<InitialQualifierState>;

    /// Whether this transport is currently connected to a daemon.
    fn is_connected(&self) -> bool;
}

type UpdateCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Client-side proxy to the daemon, parameterized over a transport.
pub struct ProviderProxy {
    transport: Arc<dyn ProxyTransport>,
    callback: Mutex<Option<UpdateCallback>>,
    receiver: Mutex<Option<broadcast::Receiver<[u8; LAST_UPDATED_EVENT_WIDTH]>>>,
    wake: Arc<Notify>,
    stop: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
    running: AtomicBool,
}

impl ProviderProxy {
    pub fn new(transport: Arc<dyn ProxyTransport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            callback: Mutex::new(None),
            receiver: Mutex::new(None),
            wake: Arc::new(Notify::new()),
            stop: CancellationToken::new(),
            worker: Mutex::new(None),
            running: AtomicBool::new(false),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub async fn get_parameter_set(&self, name: &str, timeout: Duration) -> ConfigResult<Value> {
        self.transport.get_parameter_set(name, timeout).await
    }

    pub async fn get_initial_qualifier_state(&self, timeout: Duration) -> ConfigResult<InitialQualifierState> {
        self.transport.initial_qualifier_state(timeout).await
    }

    /// Subscribes to the update event and registers the callback invoked,
    /// once per drained name, by the polling worker. Returns `false` on
    /// transport subscription failure.
    pub async fn try_subscribe_to_last_updated_parameter_set_event(
        &self,
        callback: impl Fn(String) + Send + Sync + 'static,
    ) -> bool {
        match self.transport.subscribe_last_updated(MIN_SUBSCRIPTION_DEPTH) {
            Some(receiver) => {
                *self.receiver.lock().await = Some(receiver);
                *self.callback.lock().await = Some(Arc::new(callback));
                true
            }
            None => false,
        }
    }

    /// Spawns the polling worker. Both parameters must be strictly
    /// positive when supplied.
    pub async fn start_parameter_set_update_polling_routine(
        self: &Arc<Self>,
        max_samples_limit: Option<usize>,
        polling_cycle_interval: Option<Duration>,
    ) -> ConfigResult<()> {
        let max_samples_limit = max_samples_limit.unwrap_or(DEFAULT_MAX_SAMPLES_LIMIT);
        let polling_cycle_interval = polling_cycle_interval.unwrap_or(DEFAULT_POLLING_CYCLE_INTERVAL);

        if max_samples_limit == 0 {
            return Err(ConfigError::ValueCastingError("max_samples_limit must be positive".to_string()));
        }
        if polling_cycle_interval.is_zero() {
            return Err(ConfigError::ValueCastingError("polling_cycle_interval must be positive".to_string()));
        }

        let receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or(ConfigError::FailedToSubscribe("no active event subscription".to_string()))?;

        let this = self.clone();
        this.running.store(true, Ordering::SeqCst);
        let handle = tokio::spawn(Self::poll_loop(this, receiver, max_samples_limit, polling_cycle_interval));
        *self.worker.lock().await = Some(handle);
        Ok(())
    }

    /// Requests the worker to stop and waits for it to join.
    pub async fn stop_parameter_set_update_polling_routine(&self) {
        self.stop.cancel();
        self.wake.notify_one();
        if let Some(handle) = self.worker.lock().await.take() {
            let _ = handle.await;
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Wakes the polling worker immediately, short-circuiting its wait.
    pub fn check_parameter_set_updates(&self) {
        self.wake.notify_one();
    }

    pub fn is_polling(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn poll_loop(
        self_arc: Arc<Self>,
        mut receiver: broadcast::Receiver<[u8; LAST_UPDATED_EVENT_WIDTH]>,
        max_samples_limit: usize,
        polling_cycle_interval: Duration,
    ) {
        loop {
            let mut drained: Vec<String> = Vec::new();

            while drained.len() < max_samples_limit {
                match receiver.try_recv() {
                    Ok(payload) => {
                        let name = decode_last_updated_event(&payload);
                        if !drained.contains(&name) {
                            drained.push(name);
                        }
                    }
                    Err(broadcast::error::TryRecvError::Empty) => break,
                    Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                    Err(broadcast::error::TryRecvError::Closed) => break,
                }
            }

            if !drained.is_empty() {
                let callback = self_arc.callback.lock().await.clone();
                if let Some(callback) = callback {
                    for name in drained {
                        callback(name);
                    }
                }
            }

            tokio::select! {
                _ = self_arc.stop.cancelled() => break,
                _ = self_arc.wake.notified() => continue,
                _ = tokio::time::sleep(polling_cycle_interval) => continue,
            }
        }
    }
}
