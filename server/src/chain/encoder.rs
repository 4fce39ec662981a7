//! Caller-supplied identifier text → fixed-width contract arguments.
//!
//! Both parsers are pure and safe to call from any number of requests at
//! once. What happens to malformed text is decided by a single
//! [`InputPolicy`] so the lenient behaviour can be swapped for a strict one
//! without touching the call sites.

use ethers::types::Address;
use thiserror::Error;

/// Width of a `bytes32` argument in hex characters.
const BYTES32_HEX_LEN: usize = 64;

/// Width of an address in hex characters.
const ADDRESS_HEX_LEN: usize = 40;

/// How malformed identifier text is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputPolicy {
    /// Malformed text silently becomes the zero value (a warning is logged).
    #[default]
    ZeroFill,
    /// Malformed text is rejected with an [`EncodeError`].
    Strict,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{field} is not valid hex: {reason}")]
    MalformedHex { field: &'static str, reason: String },
    #[error("{field} must be {expected} hex characters, got {actual}")]
    BadLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

fn strip_address_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode hex pairs up to the first invalid one, keeping what came before.
fn decode_hex_prefix(text: &str) -> (Vec<u8>, Option<hex::FromHexError>) {
    let mut out = Vec::with_capacity(text.len() / 2);
    for pair in text.as_bytes().chunks(2) {
        match hex::decode(pair) {
            Ok(byte) => out.extend(byte),
            Err(e) => return (out, Some(e)),
        }
    }
    (out, None)
}

/// Parse `input` as a left-zero-padded `bytes32`.
///
/// Only a lowercase `0x` prefix is stripped. Shorter text is padded on the
/// left, longer text keeps only its first 64 hex characters.
pub fn parse_bytes32(input: &str, policy: InputPolicy) -> Result<[u8; 32], EncodeError> {
    let text = input.strip_prefix("0x").unwrap_or(input);

    let decoded = if !text.is_ascii() {
        Err("non-ascii input".to_string())
    } else {
        let text = &text[..text.len().min(BYTES32_HEX_LEN)];
        hex::decode(format!("{text:0>64}")).map_err(|e| e.to_string())
    };

    match decoded {
        Ok(bytes) => {
            let mut out = [0u8; 32];
            out.copy_from_slice(&bytes);
            Ok(out)
        }
        Err(reason) => match policy {
            InputPolicy::ZeroFill => {
                log::warn!("failed to parse bytes32 from {input:?}, using zero value: {reason}");
                Ok([0u8; 32])
            }
            InputPolicy::Strict => Err(EncodeError::MalformedHex {
                field: "ephemeralPublicKey",
                reason,
            }),
        },
    }
}

/// Parse `input` as a 20-byte address.
///
/// With [`InputPolicy::ZeroFill`] the parse never fails: odd-length text gets
/// one leading `0`, decoding stops at the first invalid pair, and the bytes
/// decoded so far are right-aligned (longer input keeps its last 20 bytes).
pub fn parse_address(input: &str, policy: InputPolicy) -> Result<Address, EncodeError> {
    let text = strip_address_prefix(input);

    if policy == InputPolicy::Strict {
        if text.len() != ADDRESS_HEX_LEN {
            return Err(EncodeError::BadLength {
                field: "burnAddress",
                expected: ADDRESS_HEX_LEN,
                actual: text.len(),
            });
        }
        let bytes = hex::decode(text).map_err(|e| EncodeError::MalformedHex {
            field: "burnAddress",
            reason: e.to_string(),
        })?;
        return Ok(Address::from_slice(&bytes));
    }

    let padded;
    let text = if text.len() % 2 == 1 {
        padded = format!("0{text}");
        padded.as_str()
    } else {
        text
    };

    let (bytes, err) = decode_hex_prefix(text);
    if let Some(e) = err {
        log::warn!(
            "failed to parse address from {input:?}, keeping {} decoded bytes: {e}",
            bytes.len()
        );
    }

    let mut out = [0u8; 20];
    let take = bytes.len().min(20);
    out[20 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    Ok(Address::from(out))
}
