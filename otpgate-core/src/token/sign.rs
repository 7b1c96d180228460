//! HMAC-SHA256 token signing

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{encode_segment, OtpGateError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Fixed token header: `{"alg":"HS256","typ":"JWT"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl TokenHeader {
    pub fn hs256() -> Self {
        TokenHeader {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Symmetric signing key, provisioned once and read-only thereafter
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        SigningSecret(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    // Key material stays out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret({} bytes)", self.0.len())
    }
}

/// Issues three-segment signed tokens over arbitrary claims
pub struct TokenSigner {
    secret: SigningSecret,
}

impl TokenSigner {
    /// Create a signer from a provisioned secret
    pub fn new(secret: SigningSecret) -> Self {
        TokenSigner { secret }
    }

    /// Sign the dot-joined header and payload encodings, returning the
    /// URL-safe unpadded base64 of the raw digest
    pub fn sign(&self, header_b64: &str, payload_b64: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| OtpGateError::Internal(format!("hmac init failed: {}", e)))?;

        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());

        let digest = mac.finalize().into_bytes();
        Ok(URL_SAFE_NO_PAD.encode(digest))
    }

    /// Build the full `header.payload.signature` token for the given claims
    pub fn create_token<T: Serialize>(&self, claims: &T) -> Result<String> {
        let header_b64 = encode_segment(&TokenHeader::hs256())?;
        let payload_b64 = encode_segment(claims)?;
        let signature = self.sign(&header_b64, &payload_b64)?;

        Ok(format!("{}.{}.{}", header_b64, payload_b64, signature))
    }
}
