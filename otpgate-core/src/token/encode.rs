//! Canonical token segment encoding
//!
//! Serializes a value to JSON bytes and applies URL-safe, unpadded base64.
//! Determinism is what makes signatures reproducible: struct fields
//! serialize in declaration order and map payloads must use `BTreeMap`, so
//! structurally identical values always yield byte-identical segments.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Serialize};

use crate::Result;

/// Encode a value as a token segment
pub fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decode a token segment back into a value
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| crate::OtpGateError::Internal(format!("invalid segment encoding: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}
