// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ParameterSet Value Object
//!
//! A named, typed collection of configuration parameters with a
//! qualification state. Parameter names are unique within a set; values are
//! stored as raw `serde_json::Value` since no name is stored on the
//! parameter itself — the containing set owns the name.
//!
//! The `parameters` map is a `BTreeMap`, which keeps keys in lexicographic
//! order for free: this is what makes the canonical JSON serialization
//! (§6) reproducible and what makes `ContainsSameContent` a straight map
//! comparison.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::qualifier::Qualifier;

/// Canonical wire/persistence form: `{ "parameters": {...}, "qualifier": u8 }`
/// with `parameters` sorted lexicographically by name.
#[derive(Debug, Serialize, Deserialize)]
struct CanonicalForm {
    parameters: BTreeMap<String, Value>,
    qualifier: u8,
}

/// A named collection of parameters with a qualification state and a
/// calibratable flag gating mutation.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    parameters: BTreeMap<String, Value>,
    qualifier: Qualifier,
    calibratable: bool,
}

impl ParameterSet {
    /// Creates a new, empty parameter set. Not calibratable until
    /// `set_calibratable(true)` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new parameter. Never overwrites; succeeds even when the
    /// set is not calibratable (§4.A: `Add` is unaffected by the
    /// calibratable gate, which guards `Update` only).
    pub fn add(&mut self, name: impl Into<String>, value: Value) -> ConfigResult<()> {
        let name = name.into();
        if self.parameters.contains_key(&name) {
            return Err(ConfigError::ParameterAlreadyExists(name));
        }
        self.parameters.insert(name, value);
        Ok(())
    }

    /// Two-phase update: first verifies every name in `updates` exists,
    /// then applies all of them. Either all values are replaced, or none
    /// are (§8 property 2). Fails immediately, without inspecting
    /// `updates`, if the set is not calibratable (§8 property 3).
    pub fn update(&mut self, updates: &serde_json::Map<String, Value>) -> ConfigResult<()> {
        if !self.calibratable {
            return Err(ConfigError::ParameterSetNotCalibratable);
        }

        for name in updates.keys() {
            if !self.parameters.contains_key(name) {
                return Err(ConfigError::ParametersNotFound(name.clone()));
            }
        }

        for (name, value) in updates {
            // Entry is guaranteed present by the verification pass above.
            self.parameters.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    /// Reads a single parameter's value by name, cloned.
    pub fn get_parameter(&self, name: &str) -> ConfigResult<Value> {
        self.parameters
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ParameterMissedError(name.to_string()))
    }

    pub fn set_calibratable(&mut self, calibratable: bool) {
        self.calibratable = calibratable;
    }

    pub fn is_calibratable(&self) -> bool {
        self.calibratable
    }

    pub fn set_qualifier(&mut self, qualifier: Qualifier) {
        self.qualifier = qualifier;
    }

    pub fn qualifier(&self) -> Qualifier {
        self.qualifier
    }

    /// Canonical JSON form used on the wire and for persistence: parameters
    /// sorted lexicographically by name, qualifier as its wire `u8`.
    pub fn as_canonical_json(&self) -> ConfigResult<String> {
        let form = CanonicalForm {
            parameters: self.parameters.clone(),
            qualifier: self.qualifier.as_u8(),
        };
        serde_json::to_string(&form).map_err(ConfigError::from)
    }

    /// Reconstructs a `ParameterSet` from its canonical JSON form.
    /// `calibratable` is not part of the wire form (it is daemon-local
    /// state); the reconstructed set is not calibratable until explicitly
    /// set, matching the way daemon restarts re-apply calibratable flags
    /// out of band.
    pub fn from_canonical_json(text: &str) -> ConfigResult<Self> {
        let form: CanonicalForm = serde_json::from_str(text)?;
        let qualifier = Qualifier::try_from(form.qualifier)?;
        Ok(Self {
            parameters: form.parameters,
            qualifier,
            calibratable: false,
        })
    }

    /// Structural equality over the `parameters` object only; qualifier is
    /// ignored (§4.A).
    pub fn contains_same_content(&self, other: &ParameterSet) -> bool {
        self.parameters == other.parameters
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    /// JSON form of the `parameters` object alone, without the qualifier
    /// envelope — the provider-side "parameters as string" view, distinct
    /// from [`Self::as_canonical_json`]'s full wire envelope.
    pub fn parameters_as_json(&self) -> ConfigResult<String> {
        serde_json::to_string(&self.parameters).map_err(ConfigError::from)
    }
}
