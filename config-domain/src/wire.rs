// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Wire Encoding for the `LastUpdatedParameterSet` Event
//!
//! The event payload is a fixed 41-byte UTF-8 buffer (§6). The sender
//! zero-fills the buffer then copies the set name, truncated at 41 bytes if
//! longer; the receiver reads bytes up to the first NUL as the name. The
//! width is not explained in the original sources — it is mirrored here
//! unchanged (§9 Open Question 1).

/// Width, in bytes, of the `LastUpdatedParameterSet` event payload.
pub const LAST_UPDATED_EVENT_WIDTH: usize = 41;

/// Encodes a set name into the fixed-width, NUL-padded event payload.
/// Names longer than [`LAST_UPDATED_EVENT_WIDTH`] are truncated.
pub fn encode_last_updated_event(set_name: &str) -> [u8; LAST_UPDATED_EVENT_WIDTH] {
    let mut buf = [0u8; LAST_UPDATED_EVENT_WIDTH];
    let bytes = set_name.as_bytes();
    let n = bytes.len().min(LAST_UPDATED_EVENT_WIDTH);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf
}

/// Decodes a fixed-width event payload back into a set name, taking bytes
/// up to the first NUL. Invalid UTF-8 in the leading run is treated as a
/// lossless-as-possible conversion rather than an error, since the
/// original producer always writes a valid UTF-8 name.
pub fn decode_last_updated_event(payload: &[u8; LAST_UPDATED_EVENT_WIDTH]) -> String {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_short_name() {
        let payload = encode_last_updated_event("setA");
        assert_eq!(decode_last_updated_event(&payload), "setA");
        assert_eq!(payload.len(), LAST_UPDATED_EVENT_WIDTH);
        assert_eq!(payload[4], 0);
    }

    #[test]
    fn truncates_names_longer_than_width() {
        let long_name = "x".repeat(LAST_UPDATED_EVENT_WIDTH + 10);
        let payload = encode_last_updated_event(&long_name);
        assert_eq!(decode_last_updated_event(&payload), "x".repeat(LAST_UPDATED_EVENT_WIDTH));
    }

    #[test]
    fn decodes_bytes_up_to_first_nul_only() {
        let mut payload = [0u8; LAST_UPDATED_EVENT_WIDTH];
        payload[0] = b'a';
        payload[1] = b'b';
        // Remaining bytes stay zero; decode must stop at first NUL.
        assert_eq!(decode_last_updated_event(&payload), "ab");
    }
}
