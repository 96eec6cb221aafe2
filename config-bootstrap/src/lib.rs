// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the enterprise application layers
//! (domain, daemon, provider) and provides:
//!
//! - **Platform abstraction** - OS-specific operations (POSIX vs Windows)
//! - **Signal handling** - Graceful shutdown (SIGTERM, SIGINT, SIGHUP)
//! - **Shutdown coordination** - Cancellation tokens with a grace period
//! - **CLI argument parsing** - `clap`-derived configuration
//! - **Exit codes** - Unix exit code conventions (BSD `sysexits.h`)
//!
//! ## Architecture Position
//!
//! Bootstrap can see every other crate in the workspace; no other crate
//! depends on bootstrap in the opposite direction except the daemon
//! binary's composition root.

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod logger;
pub mod platform;
pub mod shutdown;
pub mod signals;

pub use cli::Cli;
pub use config::AppConfig;
pub use exit_code::ExitCode;
pub use shutdown::{CancellationToken, ShutdownCoordinator};
