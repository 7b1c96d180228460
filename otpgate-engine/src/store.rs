//! Durable stores over fjall partitions
//!
//! Two partitions: OTP records keyed by email, and named process secrets.
//! Both are plain single-key read/write; a write replaces the previous
//! value wholesale.

use fjall::{Partition, PartitionCreateOptions};
use std::sync::Arc;
use tracing::debug;

use otpgate_core::*;

use crate::StorageEngine;

/// Name under which the token signing secret is provisioned
pub const SIGNING_SECRET_NAME: &str = "jwtsecret";

/// Persistent map from email to the latest OTP record
pub struct OtpStore {
    partition: Arc<Partition>,
    engine: StorageEngine,
}

impl OtpStore {
    /// Create or open the record partition
    pub(crate) fn open(engine: StorageEngine) -> Result<Self> {
        let partition = Arc::new(
            engine
                .keyspace()
                .open_partition("otp_records", PartitionCreateOptions::default())
                .map_err(|e| OtpGateError::Storage(e.to_string()))?,
        );

        Ok(OtpStore { partition, engine })
    }

    /// Look up the record for an email, if any
    pub fn get(&self, email: &Email) -> Result<Option<OtpRecord>> {
        match self.partition.get(email.as_str()) {
            Ok(Some(bytes)) => {
                let record: OtpRecord =
                    serde_json::from_slice(&bytes).map_err(OtpGateError::Serialization)?;
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(OtpGateError::Storage(e.to_string())),
        }
    }

    /// Write a record, replacing any previous one for the same email
    pub fn put(&self, record: &OtpRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record).map_err(OtpGateError::Serialization)?;

        self.partition
            .insert(record.email.as_str(), bytes)
            .map_err(|e| OtpGateError::Storage(e.to_string()))?;

        self.engine.persist()?;
        debug!(email = %record.email, id = %record.id, "stored otp record");
        Ok(())
    }
}

/// Persistent named secrets, provisioned at startup and read-only after
pub struct SecretStore {
    partition: Arc<Partition>,
    engine: StorageEngine,
}

impl SecretStore {
    /// Create or open the secret partition
    pub(crate) fn open(engine: StorageEngine) -> Result<Self> {
        let partition = Arc::new(
            engine
                .keyspace()
                .open_partition("secrets", PartitionCreateOptions::default())
                .map_err(|e| OtpGateError::Storage(e.to_string()))?,
        );

        Ok(SecretStore { partition, engine })
    }

    /// Look up a secret by name
    pub fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.partition.get(name) {
            Ok(Some(bytes)) => Ok(Some(bytes.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(OtpGateError::Storage(e.to_string())),
        }
    }

    /// Store a secret under a name
    pub fn provision(&self, name: &str, secret: &[u8]) -> Result<()> {
        self.partition
            .insert(name, secret)
            .map_err(|e| OtpGateError::Storage(e.to_string()))?;

        self.engine.persist()?;
        debug!(name, "provisioned secret");
        Ok(())
    }

    /// Fetch the token signing secret.
    /// Absence is a configuration fault, never silently defaulted.
    pub fn signing_secret(&self) -> Result<SigningSecret> {
        match self.get(SIGNING_SECRET_NAME)? {
            Some(bytes) => Ok(SigningSecret::from_bytes(bytes)),
            None => Err(OtpGateError::Configuration(format!(
                "signing secret '{}' is not provisioned",
                SIGNING_SECRET_NAME
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_record_roundtrip() {
        let (engine, _temp) = StorageEngine::temp().unwrap();
        let store = engine.otp_store().unwrap();

        let email = Email::new("a@x.com").unwrap();
        assert!(store.get(&email).unwrap().is_none());

        let record = OtpRecord::issue(email.clone(), 1_000);
        store.put(&record).unwrap();

        let loaded = store.get(&email).unwrap().unwrap();
        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.otp, record.otp);
        assert_eq!(loaded.issued_at, 1_000);
    }

    #[test]
    fn test_put_overwrites_previous_record() {
        let (engine, _temp) = StorageEngine::temp().unwrap();
        let store = engine.otp_store().unwrap();

        let email = Email::new("a@x.com").unwrap();
        let mut record = OtpRecord::issue(email.clone(), 1_000);
        store.put(&record).unwrap();

        record.rotate(2_000);
        store.put(&record).unwrap();

        let loaded = store.get(&email).unwrap().unwrap();
        assert_eq!(loaded.issued_at, 2_000);
        assert_eq!(loaded.id, record.id);
    }

    #[test]
    fn test_signing_secret_absent_is_configuration_error() {
        let (engine, _temp) = StorageEngine::temp().unwrap();
        let secrets = engine.secret_store().unwrap();

        assert!(matches!(
            secrets.signing_secret(),
            Err(OtpGateError::Configuration(_))
        ));

        secrets.provision(SIGNING_SECRET_NAME, b"k").unwrap();
        assert_eq!(secrets.signing_secret().unwrap().as_bytes(), b"k");
    }
}
