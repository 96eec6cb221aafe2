// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # config-domain
//!
//! Data model for the configuration-management subsystem: [`ParameterSet`],
//! [`ParameterSetCollection`], the [`Qualifier`]/[`InitialQualifierState`]
//! enums, the shared [`ConfigError`] taxonomy, and the fixed-width wire
//! encoding for the `LastUpdatedParameterSet` event. Synchronous and free
//! of any IPC/async runtime dependency: every public method here does pure
//! in-memory work under a short-lived lock, never across I/O.

mod error;
mod parameter_set;
mod parameter_set_collection;
mod qualifier;
mod qualifier_state;
mod typed_access;
mod wire;

pub use error::{ConfigError, ConfigResult};
pub use parameter_set::ParameterSet;
pub use parameter_set_collection::ParameterSetCollection;
pub use qualifier::Qualifier;
pub use qualifier_state::InitialQualifierState;
pub use typed_access::FromParameterValue;
pub use wire::{decode_last_updated_event, encode_last_updated_event, LAST_UPDATED_EVENT_WIDTH};
