// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Standalone config daemon: seeds a `StaticSeedPlugin`, offers the IPC
//! service, and runs until SIGINT/SIGTERM/SIGHUP.

use std::sync::Arc;

use config_bootstrap::platform::create_platform;
use config_bootstrap::shutdown::ShutdownCoordinator;
use config_bootstrap::signals::create_signal_handler;
use config_bootstrap::Cli;
use config_daemon::{DaemonApp, NoOpFaultReporter};
use config_demos::StaticSeedPluginCollector;
use config_domain::ParameterSetCollection;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let config = cli.into_config();

    let filter = if config.is_verbose() { "debug" } else { config.log_level().to_tracing_level().as_str() };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let platform = create_platform();
    let mut app = DaemonApp::new(
        Arc::new(ParameterSetCollection::new()),
        Arc::new(NoOpFaultReporter),
        Arc::new(StaticSeedPluginCollector),
        platform.as_ref(),
    );

    if let Err(code) = app.initialize().await {
        std::process::exit(code);
    }

    let shutdown = ShutdownCoordinator::new(config.shutdown_grace_period());
    let token = shutdown.token();

    let signal_handler = create_signal_handler();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        signal_handler
            .wait_for_signal(Box::new(move || shutdown_for_signal.initiate_shutdown()))
            .await;
    });

    let exit_code = app.run(token).await;
    std::process::exit(exit_code);
}
