//! Error types for otpgate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OtpGateError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no login code on record for {email}")]
    RecordNotFound { email: String },

    #[error("the supplied login code is invalid")]
    InvalidOtp,

    #[error("the login code has expired")]
    OtpExpired,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
