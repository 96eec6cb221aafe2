// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Runs a config daemon and a `ConfigProvider` in the same process, wired
//! together over [`LocalTransport`](config_demos::LocalTransport), and
//! prints the seeded `vehicle` parameter set once the provider has fetched
//! and cached it. Demonstrates the abstract `ProxyTransport` contract end
//! to end without any real IPC middleware.

use std::sync::Arc;
use std::time::Duration;

use config_bootstrap::platform::create_platform;
use config_bootstrap::shutdown::ShutdownCoordinator;
use config_daemon::{DaemonApp, NoOpFaultReporter};
use config_demos::{LocalTransport, StaticSeedPluginCollector};
use config_domain::ParameterSetCollection;
use config_provider::{ConfigProvider, ConfigProviderOptions, NoOpPersistency, ProviderProxy, ProxyTransport};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let platform = create_platform();
    let mut app = DaemonApp::new(
        Arc::new(ParameterSetCollection::new()),
        Arc::new(NoOpFaultReporter),
        Arc::new(StaticSeedPluginCollector),
        platform.as_ref(),
    );
    app.initialize().await.expect("daemon failed to initialize");

    let service = app.service();
    let daemon_shutdown = ShutdownCoordinator::new(Duration::from_secs(5));
    let daemon_token = daemon_shutdown.token();
    let daemon_handle = tokio::spawn(async move { app.run(daemon_token).await });

    while !service.is_offered() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let transport: Arc<dyn ProxyTransport> = Arc::new(LocalTransport::new(service));
    let proxy = ProviderProxy::new(transport);
    let provider = ConfigProvider::new(
        Arc::new(NoOpPersistency),
        std::future::ready(Some(proxy)),
        ConfigProviderOptions {
            max_samples_limit: Some(10),
            polling_cycle_interval: Some(Duration::from_millis(200)),
            on_available: None,
        },
    )
    .await
    .expect("failed to construct provider");

    let connected = provider
        .wait_until_connected(Duration::from_secs(2), &tokio_util::sync::CancellationToken::new())
        .await;
    if !connected {
        eprintln!("provider never connected to the daemon");
        daemon_shutdown.initiate_shutdown();
        let _ = daemon_handle.await;
        return;
    }

    match provider.get_parameter_set("vehicle", Duration::from_millis(500)).await {
        Ok(snapshot) => {
            let max_speed: i64 = snapshot.get_parameter_as("max_speed").expect("max_speed present");
            let max_occupants: i64 = snapshot.get_parameter_as("max_occupants").expect("max_occupants present");
            println!("vehicle: max_speed={max_speed} max_occupants={max_occupants} qualifier={:?}", snapshot.qualifier());
        }
        Err(err) => eprintln!("failed to fetch vehicle parameter set: {err}"),
    }

    provider.shutdown().await;
    daemon_shutdown.initiate_shutdown();
    let _ = daemon_handle.await;
}
