//! OTP lifecycle service
//!
//! The central state machine: per email, `NoRecord -> Issued(otp, issued_at)`,
//! and every new request moves `Issued -> Issued(otp', issued_at')` in place.
//! Verification reads the record without consuming it.

use std::sync::Arc;
use tracing::{debug, warn};

use otpgate_core::*;

use crate::{NoopMailer, OtpMailer, OtpStore, SecretStore, StorageEngine};

/// Result of a successful verification
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub claims: SessionClaims,
    pub token: String,
}

/// Orchestrates code issuance, storage and verification
pub struct OtpService {
    store: OtpStore,
    secrets: SecretStore,
    clock: Arc<dyn Clock>,
    mailer: Arc<dyn OtpMailer>,
}

impl OtpService {
    /// Create a service with the platform clock and the stub mailer
    pub fn new(engine: StorageEngine) -> Result<Self> {
        Self::with_collaborators(engine, Arc::new(SystemClock), Arc::new(NoopMailer))
    }

    /// Create a service with injected collaborators
    pub fn with_collaborators(
        engine: StorageEngine,
        clock: Arc<dyn Clock>,
        mailer: Arc<dyn OtpMailer>,
    ) -> Result<Self> {
        Ok(OtpService {
            store: engine.otp_store()?,
            secrets: engine.secret_store()?,
            clock,
            mailer,
        })
    }

    /// Issue a login code for an email and hand it to the mailer.
    ///
    /// A first-time email gets a fresh record id; a returning one keeps its
    /// id and has code and timestamp replaced together. The code itself is
    /// never returned to the caller.
    pub fn request_otp(&self, email: &str) -> Result<()> {
        let email = Email::new(email)?;
        let now = self.clock.now_ns();

        let record = match self.store.get(&email)? {
            Some(mut existing) => {
                existing.rotate(now);
                existing
            }
            None => OtpRecord::issue(email, now),
        };

        self.store.put(&record)?;
        debug!(email = %record.email, id = %record.id, "login code issued");

        self.mailer.deliver(&record.email, &record.otp)
    }

    /// Check a submitted code and, on success, issue a signed session token.
    ///
    /// Mismatch is reported before expiry, so a wrong code never learns
    /// whether the stored one had lapsed. The record is not consumed on
    /// success; a new request or the 15-minute window retires it.
    pub fn verify_otp(&self, email: &str, otp: &str) -> Result<VerifiedSession> {
        let email = Email::new(email)?;
        if otp.is_empty() {
            return Err(OtpGateError::Validation("otp is required".to_string()));
        }

        let record = self
            .store
            .get(&email)?
            .ok_or_else(|| OtpGateError::RecordNotFound {
                email: email.as_str().to_string(),
            })?;

        if !record.otp.matches(otp) {
            warn!(email = %email, "login code mismatch");
            return Err(OtpGateError::InvalidOtp);
        }

        let now = self.clock.now_ns();
        if record.is_expired(now) {
            debug!(email = %email, issued_at = record.issued_at, "login code expired");
            return Err(OtpGateError::OtpExpired);
        }

        let claims = SessionClaims::from_record(&record, now);
        let secret = self.secrets.signing_secret()?;
        let token = TokenSigner::new(secret).create_token(&claims)?;

        debug!(email = %email, id = %record.id, "session token issued");
        Ok(VerifiedSession { claims, token })
    }

    /// Get the underlying record store
    pub fn store(&self) -> &OtpStore {
        &self.store
    }
}
