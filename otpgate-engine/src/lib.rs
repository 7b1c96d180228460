//! Durable storage and OTP lifecycle, backed by fjall

use fjall::{Config, Keyspace, PersistMode};
use std::path::Path;
use std::sync::Arc;
use otpgate_core::*;

pub mod mailer;
pub mod service;
pub mod store;

pub use mailer::*;
pub use service::*;
pub use store::*;

/// Storage engine wrapping a fjall keyspace
#[derive(Clone)]
pub struct StorageEngine {
    keyspace: Arc<Keyspace>,
}

impl StorageEngine {
    /// Open or create the engine at the given path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::new(path);
        let keyspace = Arc::new(
            config
                .open()
                .map_err(|e| OtpGateError::Storage(e.to_string()))?,
        );

        Ok(StorageEngine { keyspace })
    }

    /// Create temporary storage engine for testing
    #[cfg(any(test, feature = "test-utils"))]
    pub fn temp() -> Result<(Self, tempfile::TempDir)> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| OtpGateError::Internal(e.to_string()))?;
        let engine = Self::new(temp_dir.path())?;
        Ok((engine, temp_dir))
    }

    /// Open the OTP record store
    pub fn otp_store(&self) -> Result<OtpStore> {
        OtpStore::open(self.clone())
    }

    /// Open the secret store
    pub fn secret_store(&self) -> Result<SecretStore> {
        SecretStore::open(self.clone())
    }

    /// Get the underlying keyspace
    pub(crate) fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// Persist all changes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .map_err(|e| OtpGateError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_engine_creation() {
        let (engine, _temp) = StorageEngine::temp().unwrap();
        assert!(engine.otp_store().is_ok());
        assert!(engine.secret_store().is_ok());
    }

    #[test]
    fn test_engine_reopens_existing_data() {
        let temp_dir = tempfile::tempdir().unwrap();

        {
            let engine = StorageEngine::new(temp_dir.path()).unwrap();
            let secrets = engine.secret_store().unwrap();
            secrets.provision(SIGNING_SECRET_NAME, b"s3cret").unwrap();
        }

        let engine = StorageEngine::new(temp_dir.path()).unwrap();
        let secrets = engine.secret_store().unwrap();
        assert_eq!(
            secrets.get(SIGNING_SECRET_NAME).unwrap(),
            Some(b"s3cret".to_vec())
        );
    }
}
