//! Core data types for otpgate

use rand::Rng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Expiry window for a login code: 15 minutes, in nanoseconds
pub const OTP_TTL_NANOS: u64 = 900 * 1_000_000_000;

/// Email address used as the lookup key for OTP records
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(address: &str) -> crate::Result<Self> {
        if address.is_empty() {
            return Err(crate::OtpGateError::Validation(
                "email is required".to_string(),
            ));
        }

        Ok(Email(address.to_string()))
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Six-digit numeric login code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a fresh code: uniform in [100000, 999999], so always six
    /// decimal digits with no leading zero to truncate
    pub fn generate() -> Self {
        let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        OtpCode(n.to_string())
    }

    /// Compare against a submitted code in constant time.
    /// Exact string equality, no normalization.
    pub fn matches(&self, submitted: &str) -> bool {
        let ours = self.0.as_bytes();
        let theirs = submitted.as_bytes();
        if ours.len() != theirs.len() {
            return false;
        }
        ours.ct_eq(theirs).into()
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque record identifier, assigned once per email and stable across
/// code regenerations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(ulid::Ulid);

impl RecordId {
    /// Generate a new globally unique id
    pub fn new() -> Self {
        RecordId(ulid::Ulid::new())
    }

    /// Get the underlying ULID
    pub fn as_ulid(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable OTP record, one per email that has ever requested a code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub id: RecordId,
    pub email: Email,
    pub otp: OtpCode,
    /// Nanoseconds since the UNIX epoch at which `otp` was generated
    pub issued_at: u64,
}

impl OtpRecord {
    /// Create the first record for an email with a fresh id and code
    pub fn issue(email: Email, now_ns: u64) -> Self {
        OtpRecord {
            id: RecordId::new(),
            email,
            otp: OtpCode::generate(),
            issued_at: now_ns,
        }
    }

    /// Replace the code and timestamp together, keeping id and email.
    /// Invariant: `otp` and `issued_at` never change independently.
    pub fn rotate(&mut self, now_ns: u64) {
        self.otp = OtpCode::generate();
        self.issued_at = now_ns;
    }

    /// Whether the code has lapsed at `now_ns`.
    /// The boundary is inclusive: exactly 15 minutes counts as expired.
    pub fn is_expired(&self, now_ns: u64) -> bool {
        now_ns.saturating_sub(self.issued_at) >= OTP_TTL_NANOS
    }
}

/// Ephemeral session token payload, built per successful verification
/// and immediately serialized; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub id: RecordId,
    pub otp: OtpCode,
    pub email: Email,
    /// When the verified code was generated, nanoseconds since epoch
    pub otp_generated_at: u64,
    /// When this token was issued, nanoseconds since epoch
    pub issued_at: u64,
}

impl SessionClaims {
    /// Assemble claims from a verified record
    pub fn from_record(record: &OtpRecord, now_ns: u64) -> Self {
        SessionClaims {
            id: record.id.clone(),
            otp: record.otp.clone(),
            email: record.email.clone(),
            otp_generated_at: record.issued_at,
            issued_at: now_ns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_code_is_six_digits() {
        for _ in 0..100 {
            let code = OtpCode::generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_str().as_bytes()[0], b'0');
        }
    }

    #[test]
    fn test_otp_code_match_is_exact() {
        let code = OtpCode("123456".to_string());
        assert!(code.matches("123456"));
        assert!(!code.matches("123457"));
        assert!(!code.matches("12345"));
        assert!(!code.matches(" 123456"));
        assert!(!code.matches(""));
    }

    #[test]
    fn test_rotate_keeps_id_and_email() {
        let email = Email::new("a@x.com").unwrap();
        let mut record = OtpRecord::issue(email.clone(), 10);
        let id = record.id.clone();

        record.rotate(20);

        assert_eq!(record.id, id);
        assert_eq!(record.email, email);
        assert_eq!(record.issued_at, 20);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let record = OtpRecord::issue(Email::new("a@x.com").unwrap(), 1_000);

        assert!(!record.is_expired(1_000));
        assert!(!record.is_expired(1_000 + OTP_TTL_NANOS - 1));
        assert!(record.is_expired(1_000 + OTP_TTL_NANOS));
        assert!(record.is_expired(1_000 + OTP_TTL_NANOS + 1));
    }

    #[test]
    fn test_expiry_tolerates_clock_behind_issue_time() {
        let record = OtpRecord::issue(Email::new("a@x.com").unwrap(), 1_000);
        assert!(!record.is_expired(0));
    }

    #[test]
    fn test_session_claims_wire_field_names() {
        let record = OtpRecord::issue(Email::new("a@x.com").unwrap(), 42);
        let claims = SessionClaims::from_record(&record, 43);

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("otpGeneratedAt").is_some());
        assert!(json.get("issuedAt").is_some());
        assert_eq!(json["otpGeneratedAt"], 42);
        assert_eq!(json["issuedAt"], 43);
    }
}
