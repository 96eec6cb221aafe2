// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Typed Parameter Access
//!
//! `ParameterSet` stores values as untyped `serde_json::Value`. Consumers
//! generally want a concrete numeric or string type back; this module
//! supplies that conversion layer, mirroring the original's
//! `ConvertJsonAnyToType<T>` template family with a `FromParameterValue`
//! trait plus generic accessor methods on [`ParameterSet`].
//!
//! Integers are range-checked on the way out: a `u8` accessor rejects a
//! stored `300`. Floating-point accessors additionally accept a JSON
//! integer, since the original produces floats as integers whenever the
//! fractional part is zero to work around its own JSON library's float
//! formatting (retry-as-integer).

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::parameter_set::ParameterSet;

/// Converts a JSON value into `Self`, the way the original's
/// `ConvertJsonAnyToType<T>` converts a stored `Any` into `T`.
pub trait FromParameterValue: Sized {
    fn from_parameter_value(value: &Value) -> ConfigResult<Self>;
}

macro_rules! impl_from_parameter_value_int {
    ($t:ty) => {
        impl FromParameterValue for $t {
            fn from_parameter_value(value: &Value) -> ConfigResult<Self> {
                let n = value
                    .as_i64()
                    .ok_or_else(|| ConfigError::ValueCastingError(format!("expected integer, got {value}")))?;
                <$t>::try_from(n).map_err(|_| ConfigError::ValueCastingError(format!("{n} out of range for {}", stringify!($t))))
            }
        }
    };
}

macro_rules! impl_from_parameter_value_uint {
    ($t:ty) => {
        impl FromParameterValue for $t {
            fn from_parameter_value(value: &Value) -> ConfigResult<Self> {
                let n = value
                    .as_u64()
                    .ok_or_else(|| ConfigError::ValueCastingError(format!("expected unsigned integer, got {value}")))?;
                <$t>::try_from(n).map_err(|_| ConfigError::ValueCastingError(format!("{n} out of range for {}", stringify!($t))))
            }
        }
    };
}

impl_from_parameter_value_int!(i8);
impl_from_parameter_value_int!(i16);
impl_from_parameter_value_int!(i32);
impl_from_parameter_value_int!(i64);
impl_from_parameter_value_uint!(u8);
impl_from_parameter_value_uint!(u16);
impl_from_parameter_value_uint!(u32);
impl_from_parameter_value_uint!(u64);

/// Floats accept a JSON float directly, or a JSON integer (the producer's
/// retry-as-integer workaround for whole-valued floats).
impl FromParameterValue for f64 {
    fn from_parameter_value(value: &Value) -> ConfigResult<Self> {
        if let Some(f) = value.as_f64() {
            return Ok(f);
        }
        Err(ConfigError::ValueCastingError(format!("expected floating point, got {value}")))
    }
}

impl FromParameterValue for f32 {
    fn from_parameter_value(value: &Value) -> ConfigResult<Self> {
        f64::from_parameter_value(value).map(|f| f as f32)
    }
}

impl FromParameterValue for String {
    fn from_parameter_value(value: &Value) -> ConfigResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::ValueCastingError(format!("expected string, got {value}")))
    }
}

impl FromParameterValue for bool {
    fn from_parameter_value(value: &Value) -> ConfigResult<Self> {
        value
            .as_bool()
            .ok_or_else(|| ConfigError::ValueCastingError(format!("expected boolean, got {value}")))
    }
}

impl ParameterSet {
    /// Reads a single parameter, converting it to `T`.
    pub fn get_parameter_as<T: FromParameterValue>(&self, name: &str) -> ConfigResult<T> {
        let value = self.get_parameter(name)?;
        T::from_parameter_value(&value)
    }

    /// Reads a parameter expected to be a flat JSON array, converting
    /// every element to `T`.
    pub fn get_parameter_as_array<T: FromParameterValue>(&self, name: &str) -> ConfigResult<Vec<T>> {
        let value = self.get_parameter(name)?;
        let array = value
            .as_array()
            .ok_or_else(|| ConfigError::ObjectCastingError(format!("parameter {name} is not an array")))?;
        array.iter().map(T::from_parameter_value).collect()
    }

    /// Reads a parameter expected to be a JSON array of arrays, converting
    /// every element to `T`.
    pub fn get_parameter_as_2d_array<T: FromParameterValue>(&self, name: &str) -> ConfigResult<Vec<Vec<T>>> {
        let value = self.get_parameter(name)?;
        let rows = value
            .as_array()
            .ok_or_else(|| ConfigError::ObjectCastingError(format!("parameter {name} is not a 2D array")))?;
        rows.iter()
            .map(|row| {
                let row = row
                    .as_array()
                    .ok_or_else(|| ConfigError::ObjectCastingError(format!("parameter {name} row is not an array")))?;
                row.iter().map(T::from_parameter_value).collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ParameterSet {
        let mut set = ParameterSet::new();
        set.add("count", json!(42)).unwrap();
        set.add("ratio", json!(1.5)).unwrap();
        set.add("whole_ratio", json!(2)).unwrap();
        set.add("label", json!("north")).unwrap();
        set.add("small", json!(300)).unwrap();
        set.add("series", json!([1, 2, 3])).unwrap();
        set.add("matrix", json!([[1, 2], [3, 4]])).unwrap();
        set
    }

    #[test]
    fn reads_integer() {
        let set = sample();
        assert_eq!(set.get_parameter_as::<i32>("count").unwrap(), 42);
    }

    #[test]
    fn reads_float() {
        let set = sample();
        assert_eq!(set.get_parameter_as::<f64>("ratio").unwrap(), 1.5);
    }

    #[test]
    fn float_accessor_accepts_whole_valued_integer() {
        let set = sample();
        assert_eq!(set.get_parameter_as::<f64>("whole_ratio").unwrap(), 2.0);
    }

    #[test]
    fn reads_string() {
        let set = sample();
        assert_eq!(set.get_parameter_as::<String>("label").unwrap(), "north");
    }

    #[test]
    fn rejects_out_of_range_narrow_integer() {
        let set = sample();
        let err = set.get_parameter_as::<u8>("small").unwrap_err();
        assert!(matches!(err, ConfigError::ValueCastingError(_)));
    }

    #[test]
    fn reads_flat_array() {
        let set = sample();
        assert_eq!(set.get_parameter_as_array::<i32>("series").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn reads_2d_array() {
        let set = sample();
        assert_eq!(
            set.get_parameter_as_2d_array::<i32>("matrix").unwrap(),
            vec![vec![1, 2], vec![3, 4]]
        );
    }
}
