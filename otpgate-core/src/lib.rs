//! Core data models and token signing for otpgate


pub mod clock;
pub mod error;
pub mod token;
pub mod types;

pub use clock::*;
pub use error::*;
pub use token::*;
pub use types::*;

/// Result type alias for otpgate operations
pub type Result<T> = std::result::Result<T, OtpGateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_creation() {
        let email = Email::new("a@x.com").unwrap();
        assert_eq!(email.as_str(), "a@x.com");
    }

    #[test]
    fn test_email_validation() {
        assert!(Email::new("user@example.com").is_ok());
        assert!(Email::new("").is_err());
    }

    #[test]
    fn test_otp_record_issue() {
        let email = Email::new("a@x.com").unwrap();
        let record = OtpRecord::issue(email, 1_000);

        assert_eq!(record.email.as_str(), "a@x.com");
        assert_eq!(record.issued_at, 1_000);
        assert_eq!(record.otp.as_str().len(), 6);
    }
}
