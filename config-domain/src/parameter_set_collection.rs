// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ParameterSetCollection
//!
//! The daemon's top-level data model: a name-keyed map of [`ParameterSet`]s
//! guarded by a single mutex. No method holds the lock across IPC or file
//! I/O — every public method here acquires the lock, does pure in-memory
//! work, and releases it before returning.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::parameter_set::ParameterSet;
use crate::qualifier::Qualifier;

/// Thread-safe registry of named parameter sets.
#[derive(Debug, Default)]
pub struct ParameterSetCollection {
    sets: Mutex<HashMap<String, ParameterSet>>,
}

impl ParameterSetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter into the named set, creating the set on first
    /// use. Delegates the non-overwrite rule to `ParameterSet::add`.
    pub fn insert(&self, set_name: &str, param_name: &str, value: Value) -> ConfigResult<()> {
        let mut sets = self.lock();
        let set = sets.entry(set_name.to_string()).or_default();
        set.add(param_name, value)
    }

    /// Parses `raw_json_text` as a JSON object of `{ name: value }` pairs
    /// and applies it as an atomic update against the named set. Error
    /// messages mirror the original implementation's wording exactly,
    /// since external tooling parses them.
    pub fn update_parameter_set(&self, set_name: &str, raw_json_text: &str) -> ConfigResult<()> {
        let parsed: Value = serde_json::from_str(raw_json_text)
            .map_err(|e| ConfigError::ParsingError(format!("Can't parse input set data as json format: {e}")))?;

        let updates = parsed
            .as_object()
            .ok_or_else(|| ConfigError::ParsingError("Set data expected to be object json formatted".to_string()))?;

        let mut sets = self.lock();
        let set = sets
            .get_mut(set_name)
            .ok_or_else(|| ConfigError::ParameterSetNotFound("Parameter set is not found".to_string()))?;
        set.update(updates)
    }

    /// Returns the named set's canonical JSON form.
    pub fn get_parameter_set(&self, set_name: &str) -> ConfigResult<String> {
        let sets = self.lock();
        let set = sets
            .get(set_name)
            .ok_or_else(|| ConfigError::ParameterSetNotFound(set_name.to_string()))?;
        set.as_canonical_json()
    }

    /// Reads a single parameter's value from the named set.
    pub fn get_parameter_from_set(&self, set_name: &str, param_name: &str) -> ConfigResult<Value> {
        let sets = self.lock();
        let set = sets
            .get(set_name)
            .ok_or_else(|| ConfigError::ParameterSetNotFound(set_name.to_string()))?;
        set.get_parameter(param_name)
    }

    /// Sets the calibratable gate for a set. Returns `false` (rather than
    /// erroring) when the set does not exist, matching the original's
    /// best-effort boolean-return contract for this specific operation.
    pub fn set_calibratable(&self, set_name: &str, calibratable: bool) -> bool {
        let mut sets = self.lock();
        match sets.get_mut(set_name) {
            Some(set) => {
                set.set_calibratable(calibratable);
                true
            }
            None => false,
        }
    }

    pub fn is_calibratable(&self, set_name: &str) -> ConfigResult<bool> {
        let sets = self.lock();
        let set = sets
            .get(set_name)
            .ok_or_else(|| ConfigError::ParameterSetNotFound(set_name.to_string()))?;
        Ok(set.is_calibratable())
    }

    pub fn get_parameter_set_qualifier(&self, set_name: &str) -> ConfigResult<Qualifier> {
        let sets = self.lock();
        let set = sets
            .get(set_name)
            .ok_or_else(|| ConfigError::ParameterSetNotFound(set_name.to_string()))?;
        Ok(set.qualifier())
    }

    pub fn set_parameter_set_qualifier(&self, set_name: &str, qualifier: Qualifier) -> ConfigResult<()> {
        let mut sets = self.lock();
        let set = sets
            .get_mut(set_name)
            .ok_or_else(|| ConfigError::ParameterSetNotFound(set_name.to_string()))?;
        set.set_qualifier(qualifier);
        Ok(())
    }

    /// Whether a set with this name currently exists.
    pub fn contains(&self, set_name: &str) -> bool {
        self.lock().contains_key(set_name)
    }

    /// Number of sets currently registered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all registered sets, for diagnostics and polling-worker
    /// iteration.
    pub fn set_names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ParameterSet>> {
        self.sets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_creates_set_on_first_use() {
        let collection = ParameterSetCollection::new();
        collection.insert("alpha", "foo", json!(1)).unwrap();
        assert!(collection.contains("alpha"));
        assert_eq!(collection.get_parameter_from_set("alpha", "foo").unwrap(), json!(1));
    }

    #[test]
    fn insert_does_not_overwrite_existing_parameter() {
        let collection = ParameterSetCollection::new();
        collection.insert("alpha", "foo", json!(1)).unwrap();
        let err = collection.insert("alpha", "foo", json!(2)).unwrap_err();
        assert_eq!(err, ConfigError::ParameterAlreadyExists("foo".to_string()));
    }

    #[test]
    fn update_parameter_set_rejects_non_json() {
        let collection = ParameterSetCollection::new();
        collection.insert("alpha", "foo", json!(1)).unwrap();
        collection.set_calibratable("alpha", true);
        let err = collection.update_parameter_set("alpha", "not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParsingError(_)));
    }

    #[test]
    fn update_parameter_set_rejects_non_object_json() {
        let collection = ParameterSetCollection::new();
        collection.insert("alpha", "foo", json!(1)).unwrap();
        collection.set_calibratable("alpha", true);
        let err = collection.update_parameter_set("alpha", "[1,2,3]").unwrap_err();
        assert_eq!(
            err,
            ConfigError::ParsingError("Set data expected to be object json formatted".to_string())
        );
    }

    #[test]
    fn update_parameter_set_rejects_unknown_set() {
        let collection = ParameterSetCollection::new();
        let err = collection.update_parameter_set("missing", "{}").unwrap_err();
        assert_eq!(
            err,
            ConfigError::ParameterSetNotFound("Parameter set is not found".to_string())
        );
    }

    #[test]
    fn update_parameter_set_applies_through_to_the_set() {
        let collection = ParameterSetCollection::new();
        collection.insert("alpha", "foo", json!(1)).unwrap();
        collection.set_calibratable("alpha", true);
        collection.update_parameter_set("alpha", r#"{"foo": 2}"#).unwrap();
        assert_eq!(collection.get_parameter_from_set("alpha", "foo").unwrap(), json!(2));
    }

    #[test]
    fn set_calibratable_reports_missing_set() {
        let collection = ParameterSetCollection::new();
        assert!(!collection.set_calibratable("missing", true));
    }

    #[test]
    fn qualifier_round_trips_per_set() {
        let collection = ParameterSetCollection::new();
        collection.insert("alpha", "foo", json!(1)).unwrap();
        collection.set_parameter_set_qualifier("alpha", Qualifier::Qualified).unwrap();
        assert_eq!(collection.get_parameter_set_qualifier("alpha").unwrap(), Qualifier::Qualified);
    }
}
