// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Client side of the configuration-management subsystem.
//!
//! [`ConfigProvider`] is the cache coordinator a consumer process links
//! against; it fetches parameter sets on demand, caches them, optionally
//! persists them via a pluggable [`Persistency`], subscribes to change
//! notifications through a [`ProviderProxy`], and exposes typed reads on
//! the cached snapshots via [`CachedParameterSet`].
//!
//! The wire binding between a `ProviderProxy` and a running daemon is left
//! abstract behind [`ProxyTransport`]; concrete transports live outside
//! this crate.

pub mod cached_set;
pub mod persistency;
pub mod provider;
pub mod proxy;

#[cfg(test)]
mod testing;

pub use cached_set::CachedParameterSet;
pub use persistency::{NoOpPersistency, Persistency};
pub use provider::{ChangeCallback, ConfigProvider, ConfigProviderOptions};
pub use proxy::{ProviderProxy, ProxyTransport, DEFAULT_MAX_SAMPLES_LIMIT, DEFAULT_POLLING_CYCLE_INTERVAL, DEFAULT_RESPONSE_TIMEOUT};
