// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared pieces for the workspace's two end-to-end demo binaries: a
//! concrete in-process [`ProxyTransport`](config_provider::ProxyTransport)
//! implementation and a minimal producer plugin.

pub mod local_transport;
pub mod static_plugin;

pub use local_transport::LocalTransport;
pub use static_plugin::{StaticSeedPlugin, StaticSeedPluginCollector};
