//! Signature devices and the records of their chains.

use serde::{Deserialize, Serialize};
use sigchain_keys::{Algorithm, EncodedKeyPair};
use std::fmt;
use uuid::Uuid;

/// A registered identity owning one key pair and one signature chain.
///
/// The counter only moves through the device store, under the device lock.
#[derive(Clone, Serialize)]
pub struct Device {
    id: String,
    algorithm: Algorithm,
    public_key: String,
    #[serde(skip_serializing)]
    private_key: String,
    signature_counter: u64,
    label: String,
}

impl Device {
    /// A fresh device with a random id and an empty chain
    pub fn new(algorithm: Algorithm, keys: EncodedKeyPair, label: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), algorithm, keys, label)
    }

    pub fn with_id(
        id: impl Into<String>,
        algorithm: Algorithm,
        keys: EncodedKeyPair,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            algorithm,
            public_key: keys.public_pem,
            private_key: keys.private_pem,
            signature_counter: 0,
            label: label.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// SPKI PEM of the device's public key
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// PKCS#8 PEM of the device's private key
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Number of signatures recorded for this device
    pub fn signature_counter(&self) -> u64 {
        self.signature_counter
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn advance_counter(&mut self) -> u64 {
        self.signature_counter += 1;
        self.signature_counter
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("algorithm", &self.algorithm)
            .field("signature_counter", &self.signature_counter)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// One link of a device's chain. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub id: String,
    pub device_id: String,
    pub signature_counter: u64,
    /// Base64 of the raw signature bytes, exactly as chained into the next payload
    pub signature_value: String,
}

impl SignatureRecord {
    pub fn new(
        device_id: impl Into<String>,
        signature_counter: u64,
        signature_value: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            device_id: device_id.into(),
            signature_counter,
            signature_value: signature_value.into(),
        }
    }
}
