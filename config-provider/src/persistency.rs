// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Persistency
//!
//! Pluggable read/cache/sync layer sitting alongside the cache
//! coordinator: seeds the cache at construction, persists new and updated
//! sets as they arrive, and syncs buffered writes to the backing store.
//! [`NoOpPersistency`] is the mandatory default; a storage-backed
//! implementation (file, database) is pluggable.

use async_trait::async_trait;
use config_domain::ConfigResult;

/// Abstraction over a durable store for parameter set snapshots.
///
/// Implementations must be safe to call concurrently; the cache
/// coordinator never holds its own lock across a call into this trait.
#[async_trait]
pub trait Persistency: Send + Sync {
    /// Populates the coordinator's cache from durable storage. Returns
    /// `(set_name, canonical_json)` pairs; a no-op implementation returns
    /// an empty vector.
    async fn read_cached_parameter_sets(&self) -> ConfigResult<Vec<(String, String)>>;

    /// Write-through of a single entry. When `sync` is `true`, the
    /// implementation additionally flushes to the backing store before
    /// returning.
    async fn cache_parameter_set(&self, name: &str, canonical_json: &str, sync: bool) -> ConfigResult<()>;

    /// Flushes any buffered writes. Idempotent.
    async fn sync_to_storage(&self) -> ConfigResult<()>;
}

/// Default persistency: reads nothing back, discards every write. Every
/// deployment must carry some `Persistency` implementation even when it
/// has no backing store, the way the bootstrap crate always carries a
/// `FaultReporter`.
#[derive(Debug, Default)]
pub struct NoOpPersistency;

#[async_trait]
impl Persistency for NoOpPersistency {
    async fn read_cached_parameter_sets(&self) -> ConfigResult<Vec<(String, String)>> {
        Ok(Vec::new())
    }

    async fn cache_parameter_set(&self, _name: &str, _canonical_json: &str, _sync: bool) -> ConfigResult<()> {
        Ok(())
    }

    async fn sync_to_storage(&self) -> ConfigResult<()> {
        Ok(())
    }
}
