// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Parameter Set Qualifier
//!
//! Records the provenance/state of a single `ParameterSet`. Serialized as a
//! `u8` on the wire and in persistence, per the canonical JSON form.

use crate::error::ConfigError;

/// Provenance/state of a `ParameterSet`.
///
/// Wire encoding: `0=Unqualified, 1=Qualified, 2=Default, 3=Modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Qualifier {
    #[default]
    Unqualified = 0,
    Qualified = 1,
    Default = 2,
    Modified = 3,
}

impl Qualifier {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Qualifier {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Qualifier::Unqualified),
            1 => Ok(Qualifier::Qualified),
            2 => Ok(Qualifier::Default),
            3 => Ok(Qualifier::Modified),
            other => Err(ConfigError::ValueCastingError(format!(
                "qualifier value out of range: {other}"
            ))),
        }
    }
}

impl From<Qualifier> for u8 {
    fn from(value: Qualifier) -> Self {
        value.as_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        for q in [Qualifier::Unqualified, Qualifier::Qualified, Qualifier::Default, Qualifier::Modified] {
            assert_eq!(Qualifier::try_from(q.as_u8()).unwrap(), q);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Qualifier::try_from(4).is_err());
        assert!(Qualifier::try_from(255).is_err());
    }

    #[test]
    fn default_is_unqualified() {
        assert_eq!(Qualifier::default(), Qualifier::Unqualified);
    }
}
