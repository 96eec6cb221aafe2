// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Initial Qualifier State (Lifecycle)
//!
//! A separate six-valued lifecycle describing how the overall
//! parameter-qualification process has progressed, distinct from the
//! per-set `Qualifier`. Progresses monotonically:
//! `Undefined -> InProgress -> Qualifying -> {Default | Unqualified |
//! Qualified}`. Only the three terminal values are cacheable on the
//! provider side.

use crate::error::ConfigError;

/// Lifecycle state of the daemon-wide qualification process.
///
/// Wire encoding: `0=Undefined, 1=InProgress, 2=Default, 3=Qualifying,
/// 4=Unqualified, 5=Qualified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum InitialQualifierState {
    #[default]
    Undefined = 0,
    InProgress = 1,
    Default = 2,
    Qualifying = 3,
    Unqualified = 4,
    Qualified = 5,
}

impl InitialQualifierState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Terminal values are the only ones the provider is permitted to cache.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InitialQualifierState::Default | InitialQualifierState::Unqualified | InitialQualifierState::Qualified
        )
    }
}

impl TryFrom<u8> for InitialQualifierState {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InitialQualifierState::Undefined),
            1 => Ok(InitialQualifierState::InProgress),
            2 => Ok(InitialQualifierState::Default),
            3 => Ok(InitialQualifierState::Qualifying),
            4 => Ok(InitialQualifierState::Unqualified),
            5 => Ok(InitialQualifierState::Qualified),
            other => Err(ConfigError::ValueCastingError(format!(
                "initial qualifier state value out of range: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_terminal_states_are_cacheable() {
        assert!(!InitialQualifierState::Undefined.is_terminal());
        assert!(!InitialQualifierState::InProgress.is_terminal());
        assert!(!InitialQualifierState::Qualifying.is_terminal());
        assert!(InitialQualifierState::Default.is_terminal());
        assert!(InitialQualifierState::Unqualified.is_terminal());
        assert!(InitialQualifierState::Qualified.is_terminal());
    }

    #[test]
    fn round_trips_through_u8() {
        for s in [
            InitialQualifierState::Undefined,
            InitialQualifierState::InProgress,
            InitialQualifierState::Default,
            InitialQualifierState::Qualifying,
            InitialQualifierState::Unqualified,
            InitialQualifierState::Qualified,
        ] {
            assert_eq!(InitialQualifierState::try_from(s.as_u8()).unwrap(), s);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(InitialQualifierState::try_from(6).is_err());
    }
}
