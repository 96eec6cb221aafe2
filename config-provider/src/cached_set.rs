// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CachedParameterSet
//!
//! A reference-counted, read-only snapshot of a [`ParameterSet`]'s
//! canonical JSON, keyed by set name. Replaced atomically on update;
//! never mutated in place, so consumers holding an older snapshot keep
//! observing it even after the cache moves on.

use std::sync::Arc;

use config_domain::{ConfigResult, FromParameterValue, ParameterSet, Qualifier};
use serde_json::Value;

/// Immutable snapshot of one parameter set, as observed at fetch time.
#[derive(Debug)]
pub struct CachedParameterSet {
    name: String,
    set: ParameterSet,
}

impl CachedParameterSet {
    /// Builds a snapshot from a set's canonical JSON text, as returned by
    /// both the daemon's `GetParameterSet` request and the persistency
    /// layer's stored form.
    pub fn from_canonical_json(name: impl Into<String>, text: &str) -> ConfigResult<Arc<Self>> {
        let set = ParameterSet::from_canonical_json(text)?;
        Ok(Arc::new(Self { name: name.into(), set }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualifier(&self) -> Qualifier {
        self.set.qualifier()
    }

    pub fn get_parameter(&self, param_name: &str) -> ConfigResult<Value> {
        self.set.get_parameter(param_name)
    }

    pub fn get_parameter_as<T: FromParameterValue>(&self, param_name: &str) -> ConfigResult<T> {
        self.set.get_parameter_as(param_name)
    }

    /// Canonical JSON form, suitable for writing straight through to the
    /// persistency layer.
    pub fn as_canonical_json(&self) -> ConfigResult<String> {
        self.set.as_canonical_json()
    }

    /// The `parameters` object alone, without the qualifier envelope —
    /// the consumer-facing "parameters as string" view.
    pub fn parameters_as_json(&self) -> ConfigResult<String> {
        self.set.parameters_as_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_canonical_json_and_reads_back() {
        let snapshot = CachedParameterSet::from_canonical_json(
            "alpha",
            r#"{"parameters":{"foo":42},"qualifier":1}"#,
        )
        .unwrap();
        assert_eq!(snapshot.name(), "alpha");
        assert_eq!(snapshot.qualifier(), Qualifier::Qualified);
        assert_eq!(snapshot.get_parameter_as::<i32>("foo").unwrap(), 42);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(CachedParameterSet::from_canonical_json("alpha", "not json").is_err());
    }

    #[test]
    fn parameters_as_json_omits_the_qualifier_envelope() {
        let snapshot = CachedParameterSet::from_canonical_json(
            "alpha",
            r#"{"parameters":{"foo":42},"qualifier":1}"#,
        )
        .unwrap();
        assert_eq!(snapshot.parameters_as_json().unwrap(), r#"{"foo":42}"#);
    }
}
