//! Session token issuance
//!
//! Builds the three-segment signed token handed out after a successful
//! verification:
//! - Deterministic canonical encoding of header and payload
//! - HMAC-SHA256 signature over the dot-joined encodings
//! - URL-safe, unpadded base64 throughout

pub mod encode;
pub mod sign;

pub use encode::*;
pub use sign::*;
