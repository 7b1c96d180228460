//! Email delivery seam
//!
//! Actual delivery belongs to an external collaborator; the lifecycle only
//! reserves the call site. The generated code never travels back to the
//! requester through the API.

use otpgate_core::{Email, OtpCode, Result};
use tracing::info;

/// Delivers a freshly generated login code to its recipient
pub trait OtpMailer: Send + Sync {
    fn deliver(&self, email: &Email, code: &OtpCode) -> Result<()>;
}

/// Stub mailer that acknowledges delivery without sending anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMailer;

impl OtpMailer for NoopMailer {
    fn deliver(&self, email: &Email, _code: &OtpCode) -> Result<()> {
        info!(email = %email, "login code generated, delivery delegated");
        Ok(())
    }
}

/// Mailer that records deliveries for assertions
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingMailer {
    deliveries: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of (email, code) pairs handed to the mailer so far
    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl OtpMailer for RecordingMailer {
    fn deliver(&self, email: &Email, code: &OtpCode) -> Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push((email.as_str().to_string(), code.as_str().to_string()));
        Ok(())
    }
}
