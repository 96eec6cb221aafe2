// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DaemonApp
//!
//! The composition root's application object: owns the parameter set
//! collection, the IPC-facing [`DaemonService`], the fault reporter, and
//! every running plugin. `initialize` then `run` are called exactly once,
//! in that order, by `main`.

use std::sync::Arc;

use config_bootstrap::platform::Platform;
use config_bootstrap::shutdown::CancellationToken;
use config_domain::ParameterSetCollection;

use crate::fault::FaultReporter;
use crate::plugin::{Plugin, PluginCollector, EXIT_CODE_FAILURE, EXIT_CODE_SUCCESS};
use crate::service::{DaemonService, InitialQualifierStateSender, LastUpdatedParameterSetSender};

/// The daemon's non-fatal permission mask, applied before any file is
/// created by the process or its plugins. `0x7F` (octal `0177`) matches
/// the original implementation; the daemon logs and continues if setting
/// it fails rather than aborting startup.
const DAEMON_UMASK: u32 = 0x7F;

/// Owns the daemon's lifecycle: plugin preparation, service offering, and
/// the run loop that blocks until a stop is requested.
pub struct DaemonApp {
    collection: Arc<ParameterSetCollection>,
    fault_reporter: Arc<dyn FaultReporter>,
    plugin_collector: Arc<dyn PluginCollector>,
    service: Option<Arc<DaemonService>>,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl DaemonApp {
    /// Step 1 of §4.D: sets the process umask. The service itself is not
    /// constructed until `initialize` (step 4), after plugin collection
    /// and initialization (steps 2-3), matching the documented order.
    pub fn new(
        collection: Arc<ParameterSetCollection>,
        fault_reporter: Arc<dyn FaultReporter>,
        plugin_collector: Arc<dyn PluginCollector>,
        platform: &dyn Platform,
    ) -> Self {
        if let Err(err) = platform.set_process_umask(DAEMON_UMASK) {
            tracing::error!("Failed to set umask for config daemon process: {err}");
        }

        Self {
            collection,
            fault_reporter,
            plugin_collector,
            service: None,
            plugins: Vec::new(),
        }
    }

    /// Panics if called before `initialize` has completed successfully;
    /// every caller in this workspace only calls this after `initialize`.
    pub fn service(&self) -> Arc<DaemonService> {
        self.service.clone().expect("DaemonApp::service() called before initialize()")
    }

    /// Prepares plugins, initializes them, then creates the IPC service and
    /// the fault reporter, per §4.D steps 2-5. Aborts on the first plugin
    /// whose `initialize` fails.
    pub async fn initialize(&mut self) -> Result<(), i32> {
        let plugins = self.plugin_collector.create_plugins().map_err(|err| {
            tracing::error!("Plugin collector failed to produce plugins: {err}");
            EXIT_CODE_FAILURE
        })?;
        tracing::debug!("Created {} plugins", plugins.len());
        self.plugins = plugins;

        for plugin in &self.plugins {
            if let Err(err) = plugin.initialize().await {
                tracing::warn!("Plugin.initialize() failed: {err}");
                return Err(EXIT_CODE_FAILURE);
            }
        }

        // Step 4: exactly one service is ever constructed here, and
        // `DaemonService::new` is infallible, so the "zero services" abort
        // named in §4.D has no reachable path in this port — see DESIGN.md.
        self.service = Some(Arc::new(DaemonService::new(self.collection.clone())));

        self.fault_reporter.initialize();
        Ok(())
    }

    /// Starts every plugin, offers the service, and blocks until
    /// `stop_token` is cancelled. Every plugin's `deinitialize` runs
    /// exactly once on the way out, regardless of how `run` returns.
    pub async fn run(&mut self, stop_token: CancellationToken) -> i32 {
        let result = self.run_until_stopped(stop_token).await;

        tracing::info!("Exiting plugin execution scope");
        for plugin in &self.plugins {
            plugin.deinitialize().await;
        }

        match result {
            Ok(()) => EXIT_CODE_SUCCESS,
            Err(code) => code,
        }
    }

    async fn run_until_stopped(&mut self, stop_token: CancellationToken) -> Result<(), i32> {
        let service = self.service.clone().expect("DaemonApp::run() called before initialize()");

        for plugin in &self.plugins {
            // Senders are handles over the shared service rather than a
            // factory-bound callback, so construction here is infallible.
            let last_updated_sender = LastUpdatedParameterSetSender::new(service.clone());
            let qualifier_state_sender = InitialQualifierStateSender::new(service.clone());

            plugin
                .run(
                    self.collection.clone(),
                    last_updated_sender,
                    qualifier_state_sender,
                    stop_token.clone(),
                    self.fault_reporter.clone(),
                )
                .await
                .map_err(|err| {
                    tracing::error!("Plugin.run() failed: {err}");
                    EXIT_CODE_FAILURE
                })?;
        }

        tracing::info!("InternalConfigProviderService offered");
        service.offer();

        stop_token.cancelled().await;

        tracing::info!("Stop requested");
        service.stop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::NoOpFaultReporter;
    use async_trait::async_trait;
    use config_domain::ConfigResult;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct StubPlatform;
    impl Platform for StubPlatform {
        fn cpu_count(&self) -> usize {
            1
        }
        fn line_separator(&self) -> &'static str {
            "\n"
        }
        fn platform_name(&self) -> &'static str {
            "stub"
        }
        fn temp_dir(&self) -> std::path::PathBuf {
            std::env::temp_dir()
        }
        fn is_elevated(&self) -> bool {
            false
        }
        fn set_permissions(&self, _path: &std::path::Path, _mode: u32) -> Result<(), config_bootstrap::platform::PlatformError> {
            Ok(())
        }
        fn set_process_umask(&self, _mode: u32) -> Result<u32, config_bootstrap::platform::PlatformError> {
            Ok(0)
        }
    }

    struct RecordingPlugin {
        initialized: Arc<AtomicBool>,
        ran: Arc<AtomicBool>,
        deinitialized: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Plugin for RecordingPlugin {
        async fn initialize(&self) -> ConfigResult<()> {
            self.initialized.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn run(
            &self,
            _collection: Arc<ParameterSetCollection>,
            _last_updated_sender: LastUpdatedParameterSetSender,
            _qualifier_state_sender: InitialQualifierStateSender,
            _stop_token: CancellationToken,
            _fault_reporter: Arc<dyn FaultReporter>,
        ) -> ConfigResult<()> {
            self.ran.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn deinitialize(&self) {
            self.deinitialized.store(true, Ordering::SeqCst);
        }
    }

    struct SinglePluginCollector(Arc<dyn Plugin>);
    impl PluginCollector for SinglePluginCollector {
        fn create_plugins(&self) -> ConfigResult<Vec<Arc<dyn Plugin>>> {
            Ok(vec![self.0.clone()])
        }
    }

    struct EmptyPluginCollector;
    impl PluginCollector for EmptyPluginCollector {
        fn create_plugins(&self) -> ConfigResult<Vec<Arc<dyn Plugin>>> {
            Ok(vec![])
        }
    }

    struct FailingPluginCollector;
    impl PluginCollector for FailingPluginCollector {
        fn create_plugins(&self) -> ConfigResult<Vec<Arc<dyn Plugin>>> {
            Err(config_domain::ConfigError::MethodNotSupported(
                "backing config file is unreadable".to_string(),
            ))
        }
    }

    #[tokio::test]
    async fn full_lifecycle_runs_and_tears_down_every_plugin() {
        let initialized = Arc::new(AtomicBool::new(false));
        let ran = Arc::new(AtomicBool::new(false));
        let deinitialized = Arc::new(AtomicBool::new(false));
        let plugin = Arc::new(RecordingPlugin {
            initialized: initialized.clone(),
            ran: ran.clone(),
            deinitialized: deinitialized.clone(),
        });

        let mut app = DaemonApp::new(
            Arc::new(ParameterSetCollection::new()),
            Arc::new(NoOpFaultReporter),
            Arc::new(SinglePluginCollector(plugin)),
            &StubPlatform,
        );

        app.initialize().await.unwrap();
        assert!(initialized.load(Ordering::SeqCst));

        let shutdown = config_bootstrap::shutdown::ShutdownCoordinator::new(Duration::from_secs(1));
        let token = shutdown.token();
        let service = app.service();

        let run_handle = tokio::spawn(async move { app.run(token).await });

        // Give the run loop a chance to offer the service before stopping it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(service.is_offered());

        shutdown.initiate_shutdown();
        let exit_code = run_handle.await.unwrap();

        assert_eq!(exit_code, EXIT_CODE_SUCCESS);
        assert!(ran.load(Ordering::SeqCst));
        assert!(deinitialized.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn initialize_succeeds_with_no_plugins() {
        // An empty plugin list is not itself an error (§4.D step 2) — only
        // collector construction failing aborts startup.
        let mut app = DaemonApp::new(
            Arc::new(ParameterSetCollection::new()),
            Arc::new(NoOpFaultReporter),
            Arc::new(EmptyPluginCollector),
            &StubPlatform,
        );
        assert!(app.initialize().await.is_ok());
    }

    #[tokio::test]
    async fn initialize_fails_when_plugin_collector_errors() {
        let mut app = DaemonApp::new(
            Arc::new(ParameterSetCollection::new()),
            Arc::new(NoOpFaultReporter),
            Arc::new(FailingPluginCollector),
            &StubPlatform,
        );
        assert_eq!(app.initialize().await.unwrap_err(), EXIT_CODE_FAILURE);
    }
}
