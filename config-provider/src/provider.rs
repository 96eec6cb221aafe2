// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ConfigProvider
//!
//! The client-side cache coordinator. Owns a map of set name to cached
//! snapshot, services typed reads, registers per-set change callbacks,
//! drives the [`ProviderProxy`](crate::proxy::ProviderProxy) once it
//! connects, and integrates with the pluggable
//! [`Persistency`](crate::persistency::Persistency) layer.
//!
//! A `ConfigProvider` is constructed against a proxy that may not be
//! connected yet (the daemon may start after the consumer process, or on a
//! different host entirely); every public accessor degrades gracefully to
//! `ProxyNotReady` rather than blocking indefinitely until the proxy future
//! documented in [`ConfigProvider::new`] resolves.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use config_domain::{ConfigError, ConfigResult, InitialQualifierState};
use serde_json::Value;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cached_set::CachedParameterSet;
use crate::persistency::Persistency;
use crate::proxy::{ProviderProxy, DEFAULT_RESPONSE_TIMEOUT};

/// User-supplied reaction to a cached set changing, whether through an
/// explicit fetch or an unsolicited update event.
pub type ChangeCallback = Arc<dyn Fn(Arc<CachedParameterSet>) + Send + Sync>;

/// Tuning knobs forwarded to the proxy's polling routine once connected,
/// plus an optional one-shot "proxy became available" notification.
#[derive(Clone, Default)]
pub struct ConfigProviderOptions {
    pub max_samples_limit: Option<usize>,
    pub polling_cycle_interval: Option<Duration>,
    pub on_available: Option<Arc<dyn Fn() + Send + Sync>>,
}

struct Inner {
    cache: HashMap<String, Arc<CachedParameterSet>>,
    callbacks: HashMap<String, Option<ChangeCallback>>,
    qualifier: InitialQualifierState,
    proxy: Option<Arc<ProviderProxy>>,
}

/// Client-side cache coordinator. Cheap to clone via `Arc`; every public
/// method takes `&self`.
pub struct ConfigProvider {
    inner: Mutex<Inner>,
    persistency: Arc<dyn Persistency>,
    options: ConfigProviderOptions,
    proxy_ready: Notify,
    proxy_wait_handle: Mutex<Option<JoinHandle<()>>>,
    stop: CancellationToken,
}

impl ConfigProvider {
    /// Builds a provider, synchronously seeding its cache from
    /// `persistency`, then spawns the proxy-wait worker that resolves
    /// `proxy_future` in the background. `proxy_future` resolves to
    /// `None` if connection establishment is abandoned (e.g. the caller's
    /// stop token fired before a daemon was found).
    pub async fn new(
        persistency: Arc<dyn Persistency>,
        proxy_future: impl Future<Output = Option<Arc<ProviderProxy>>> + Send + 'static,
        options: ConfigProviderOptions,
    ) -> ConfigResult<Arc<Self>> {
        let mut cache = HashMap::new();
        let mut callbacks = HashMap::new();
        for (name, json) in persistency.read_cached_parameter_sets().await? {
            match CachedParameterSet::from_canonical_json(name.clone(), &json) {
                Ok(snapshot) => {
                    cache.insert(name.clone(), snapshot);
                    callbacks.insert(name, None);
                }
                Err(err) => warn!(set = %name, error = %err, "dropping unreadable persisted parameter set"),
            }
        }

        let provider = Arc::new(Self {
            inner: Mutex::new(Inner {
                cache,
                callbacks,
                qualifier: InitialQualifierState::default(),
                proxy: None,
            }),
            persistency,
            options,
            proxy_ready: Notify::new(),
            proxy_wait_handle: Mutex::new(None),
            stop: CancellationToken::new(),
        });

        let task_provider = provider.clone();
        let handle = tokio::spawn(async move {
            let proxy = tokio::select! {
                _ = task_provider.stop.cancelled() => None,
                proxy = proxy_future => proxy,
            };
            if let Some(proxy) = proxy {
                task_provider.on_proxy_connected(proxy).await;
            }
        });
        *provider.proxy_wait_handle.lock().await = Some(handle);

        Ok(provider)
    }

    async fn on_proxy_connected(self: &Arc<Self>, proxy: Arc<ProviderProxy>) {
        let weak = Arc::downgrade(self);
        let subscribed = proxy
            .try_subscribe_to_last_updated_parameter_set_event(move |name| {
                if let Some(provider) = weak.upgrade() {
                    tokio::spawn(async move { provider.on_last_updated_receive(name).await });
                }
            })
            .await;
        if !subscribed {
            warn!("proxy refused last-updated subscription; provider remains persisted-reads-only");
            return;
        }

        let tracked_names: Vec<String> = self.inner.lock().await.cache.keys().cloned().collect();
        for name in &tracked_names {
            match proxy.get_parameter_set(name, DEFAULT_RESPONSE_TIMEOUT).await {
                Ok(value) => {
                    let json = value.to_string();
                    if let Err(err) = self.persistency.cache_parameter_set(name, &json, false).await {
                        warn!(set = %name, error = %err, "failed to persist refetched parameter set");
                        continue;
                    }
                    match CachedParameterSet::from_canonical_json(name.clone(), &json) {
                        Ok(snapshot) => {
                            self.inner.lock().await.cache.insert(name.clone(), snapshot);
                        }
                        Err(err) => warn!(set = %name, error = %err, "refetched parameter set failed to parse"),
                    }
                }
                Err(err) => warn!(set = %name, error = %err, "failed to refetch cached parameter set at connect"),
            }
        }
        if let Err(err) = self.persistency.sync_to_storage().await {
            warn!(error = %err, "failed to sync refetched parameter sets to storage");
        }

        if let Ok(state) = proxy.get_initial_qualifier_state(DEFAULT_RESPONSE_TIMEOUT).await {
            if state.is_terminal() {
                self.inner.lock().await.qualifier = state;
            }
        }

        {
            let mut inner = self.inner.lock().await;
            for name in &tracked_names {
                inner.callbacks.entry(name.clone()).or_insert(None);
            }
            inner.proxy = Some(proxy.clone());
        }

        if let Err(err) = proxy
            .start_parameter_set_update_polling_routine(self.options.max_samples_limit, self.options.polling_cycle_interval)
            .await
        {
            warn!(error = %err, "failed to start update polling routine");
        }

        self.proxy_ready.notify_one();
        if let Some(on_available) = &self.options.on_available {
            on_available();
        }
    }

    async fn fetch_and_cache(&self, name: &str, timeout: Duration, sync: bool) -> ConfigResult<Arc<CachedParameterSet>> {
        if let Some(cached) = self.inner.lock().await.cache.get(name).cloned() {
            return Ok(cached);
        }

        let proxy = self.inner.lock().await.proxy.clone().ok_or(ConfigError::ProxyNotReady)?;
        let value: Value = proxy.get_parameter_set(name, timeout).await?;
        let json = value.to_string();
        let snapshot = CachedParameterSet::from_canonical_json(name, &json)?;
        if let Err(err) = self.persistency.cache_parameter_set(name, &json, sync).await {
            warn!(set = %name, error = %err, "failed to persist freshly fetched parameter set");
        }

        let mut inner = self.inner.lock().await;
        inner.callbacks.entry(name.to_string()).or_insert(None);
        inner.cache.insert(name.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    /// Returns the cached snapshot if present; otherwise fetches via the
    /// proxy with the given timeout (default 1000 ms), persisting the
    /// result immediately.
    pub async fn get_parameter_set(&self, name: &str, timeout: Duration) -> ConfigResult<Arc<CachedParameterSet>> {
        self.fetch_and_cache(name, timeout, true).await
    }

    /// Batch form of [`Self::get_parameter_set`]. Per-name errors are
    /// carried in the per-name result; storage is synced exactly once at
    /// the end regardless of individual outcomes.
    pub async fn get_parameter_sets_by_name_list(
        &self,
        names: &[String],
        timeout: Duration,
    ) -> Vec<(String, ConfigResult<Arc<CachedParameterSet>>)> {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            results.push((name.clone(), self.fetch_and_cache(name, timeout, false).await));
        }
        if let Err(err) = self.persistency.sync_to_storage().await {
            warn!(error = %err, "failed to sync batch-fetched parameter sets to storage");
        }
        results
    }

    /// Installs `callback` for `name`. Fails with `CallbackAlreadySet` if
    /// a non-empty callback is already installed. Does not fetch the set.
    pub async fn on_changed_parameter_set(&self, name: &str, callback: Option<ChangeCallback>) -> ConfigResult<()> {
        let callback = callback.ok_or(ConfigError::EmptyCallbackProvided)?;
        let mut inner = self.inner.lock().await;
        match inner.callbacks.get(name) {
            Some(Some(_)) => Err(ConfigError::CallbackAlreadySet),
            _ => {
                inner.callbacks.insert(name.to_string(), Some(callback));
                Ok(())
            }
        }
    }

    /// Convenience alias for [`Self::on_changed_parameter_set`].
    pub async fn on_changed_parameter_set_cbk(&self, name: &str, callback: Option<ChangeCallback>) -> ConfigResult<()> {
        self.on_changed_parameter_set(name, callback).await
    }

    /// Returns the cached terminal qualifier state if present; otherwise
    /// queries the proxy (caching the result only if it is terminal).
    pub async fn get_initial_qualifier_state(&self, timeout: Duration) -> ConfigResult<InitialQualifierState> {
        let (qualifier, proxy) = {
            let inner = self.inner.lock().await;
            (inner.qualifier, inner.proxy.clone())
        };
        if qualifier.is_terminal() {
            return Ok(qualifier);
        }
        let Some(proxy) = proxy else {
            return Ok(qualifier);
        };
        let observed = proxy.get_initial_qualifier_state(timeout).await?;
        if observed.is_terminal() {
            self.inner.lock().await.qualifier = observed;
        }
        Ok(observed)
    }

    pub async fn check_parameter_set_updates(&self) -> ConfigResult<()> {
        let proxy = self.inner.lock().await.proxy.clone().ok_or(ConfigError::ProxyNotReady)?;
        proxy.check_parameter_set_updates();
        Ok(())
    }

    /// Waits until the proxy becomes available, bounded by `timeout` and
    /// cancellable via `stop_token`. Returns `true` iff the proxy was (or
    /// became) available before either fired.
    pub async fn wait_until_connected(&self, timeout: Duration, stop_token: &CancellationToken) -> bool {
        if self.inner.lock().await.proxy.is_some() {
            return true;
        }
        tokio::select! {
            _ = self.proxy_ready.notified() => self.inner.lock().await.proxy.is_some(),
            _ = tokio::time::sleep(timeout) => false,
            _ = stop_token.cancelled() => false,
        }
    }

    pub async fn get_cached_parameter_sets_count(&self) -> usize {
        self.inner.lock().await.cache.len()
    }

    /// Invoked by the proxy polling worker (indirectly, via the
    /// subscription lambda) for each drained "last updated" name.
    async fn on_last_updated_receive(&self, name: String) {
        let tracked = self.inner.lock().await.callbacks.contains_key(&name);
        if !tracked {
            return;
        }

        let Some(proxy) = self.inner.lock().await.proxy.clone() else {
            return;
        };
        let value = match proxy.get_parameter_set(&name, DEFAULT_RESPONSE_TIMEOUT).await {
            Ok(value) => value,
            Err(err) => {
                warn!(set = %name, error = %err, "failed to refetch parameter set after update notification");
                return;
            }
        };
        let json = value.to_string();
        let snapshot = match CachedParameterSet::from_canonical_json(name.clone(), &json) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(set = %name, error = %err, "update notification carried unparseable parameter set");
                return;
            }
        };
        if let Err(err) = self.persistency.cache_parameter_set(&name, &json, true).await {
            warn!(set = %name, error = %err, "failed to persist parameter set after update notification");
        }

        let mut inner = self.inner.lock().await;
        inner.cache.insert(name.clone(), snapshot.clone());
        if let Some(Some(callback)) = inner.callbacks.get(&name) {
            callback(snapshot);
        }
    }

    /// Cancels the proxy-wait worker and, if connected, stops the proxy's
    /// polling routine, honoring the strict teardown order. Rust has no
    /// async `Drop`, so callers that need the ordering guarantee (rather
    /// than the best-effort synchronous cancellation `Drop` performs)
    /// must call this before dropping the last `Arc`.
    pub async fn shutdown(&self) {
        self.stop.cancel();
        if let Some(handle) = self.proxy_wait_handle.lock().await.take() {
            let _ = handle.await;
        }
        let proxy = self.inner.lock().await.proxy.take();
        if let Some(proxy) = proxy {
            proxy.stop_parameter_set_update_polling_routine().await;
        }
    }
}

impl Drop for ConfigProvider {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Ok(mut guard) = self.proxy_wait_handle.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn options() -> ConfigProviderOptions {
        ConfigProviderOptions {
            max_samples_limit: Some(10),
            polling_cycle_interval: Some(Duration::from_millis(20)),
            on_available: None,
        }
    }

    #[tokio::test]
    async fn get_parameter_set_fails_without_proxy() {
        let persistency = Arc::new(crate::persistency::NoOpPersistency);
        let provider = ConfigProvider::new(persistency, std::future::pending(), options()).await.unwrap();
        let err = provider.get_parameter_set("alpha", Duration::from_millis(50)).await.unwrap_err();
        assert_eq!(err, ConfigError::ProxyNotReady);
        provider.shutdown().await;
    }

    #[tokio::test]
    async fn connecting_proxy_enables_fetch_and_caches_result() {
        let transport = Arc::new(MockTransport::new_connected());
        transport.seed("alpha", json!({"parameters": {"x": 1}, "qualifier": 0}));
        let proxy = ProviderProxy::new(transport.clone());

        let persistency = Arc::new(crate::persistency::NoOpPersistency);
        let proxy_for_future = proxy.clone();
        let provider = ConfigProvider::new(persistency, async move { Some(proxy_for_future) }, options())
            .await
            .unwrap();

        assert!(provider.wait_until_connected(Duration::from_secs(1), &CancellationToken::new()).await);

        let snapshot = provider.get_parameter_set("alpha", Duration::from_millis(200)).await.unwrap();
        assert_eq!(snapshot.get_parameter_as::<i64>("x").unwrap(), 1);
        assert_eq!(provider.get_cached_parameter_sets_count().await, 1);

        provider.shutdown().await;
    }

    #[tokio::test]
    async fn update_notification_refetches_and_invokes_registered_callback() {
        let transport = Arc::new(MockTransport::new_connected());
        transport.seed("setA", json!({"parameters": {"parameter_name": 55}, "qualifier": 1}));
        let proxy = ProviderProxy::new(transport.clone());

        let persistency = Arc::new(crate::persistency::NoOpPersistency);
        let proxy_for_future = proxy.clone();
        let provider = ConfigProvider::new(persistency, async move { Some(proxy_for_future) }, options())
            .await
            .unwrap();

        assert!(provider.wait_until_connected(Duration::from_secs(1), &CancellationToken::new()).await);

        let initial = provider.get_parameter_set("setA", Duration::from_millis(200)).await.unwrap();
        assert_eq!(initial.get_parameter_as::<i64>("parameter_name").unwrap(), 55);

        let received: Arc<std::sync::Mutex<Vec<Arc<CachedParameterSet>>>> = Arc::new(std::sync::Mutex::new(Vec::new()));
        let received_clone = received.clone();
        let cb: ChangeCallback = Arc::new(move |snapshot| {
            received_clone.lock().unwrap().push(snapshot);
        });
        provider.on_changed_parameter_set("setA", Some(cb)).await.unwrap();

        transport.seed("setA", json!({"parameters": {"parameter_name": 56}, "qualifier": 3}));
        transport.emit_last_updated("setA");

        for _ in 0..50 {
            if !received.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let fired = received.lock().unwrap().clone();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].get_parameter_as::<i64>("parameter_name").unwrap(), 56);
        assert_eq!(fired[0].qualifier(), config_domain::Qualifier::Modified);

        let cached = provider.get_parameter_set("setA", Duration::from_millis(200)).await.unwrap();
        assert_eq!(cached.get_parameter_as::<i64>("parameter_name").unwrap(), 56);

        provider.shutdown().await;
    }

    #[tokio::test]
    async fn on_changed_parameter_set_rejects_duplicate_registration() {
        let persistency = Arc::new(crate::persistency::NoOpPersistency);
        let provider = ConfigProvider::new(persistency, std::future::pending(), options()).await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let cb: ChangeCallback = Arc::new(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        provider.on_changed_parameter_set("alpha", Some(cb.clone())).await.unwrap();
        let err = provider.on_changed_parameter_set("alpha", Some(cb)).await.unwrap_err();
        assert_eq!(err, ConfigError::CallbackAlreadySet);

        provider.shutdown().await;
    }

    #[tokio::test]
    async fn on_changed_parameter_set_rejects_empty_callback() {
        let persistency = Arc::new(crate::persistency::NoOpPersistency);
        let provider = ConfigProvider::new(persistency, std::future::pending(), options()).await.unwrap();
        let err = provider.on_changed_parameter_set("alpha", None).await.unwrap_err();
        assert_eq!(err, ConfigError::EmptyCallbackProvided);
        provider.shutdown().await;
    }
}
