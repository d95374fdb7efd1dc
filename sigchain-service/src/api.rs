//! Request and response shapes of the inbound operations, with validation.

use serde::{Deserialize, Serialize};
use sigchain_keys::Algorithm;

use crate::domain::Device;
use crate::error::{Result, ServiceError};
use crate::orchestrator::SignOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeviceRequest {
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub label: String,
}

impl CreateDeviceRequest {
    pub fn new(algorithm: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            label: label.into(),
        }
    }

    /// Check required fields and resolve the algorithm. Matching is exact and
    /// case-sensitive; there is no fallback algorithm.
    pub fn validate(&self) -> Result<Algorithm> {
        if self.algorithm.is_empty() {
            return Err(ServiceError::Validation(vec!["algorithm is required".to_string()]));
        }
        self.algorithm.parse::<Algorithm>().map_err(|_| {
            let allowed: Vec<&str> = Algorithm::ALL.iter().map(|a| a.as_str()).collect();
            ServiceError::Validation(vec![format!(
                "algorithm must be one of: {}",
                allowed.join(" ")
            )])
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceResponse {
    pub id: String,
    pub algorithm: Algorithm,
    pub public_key: String,
    pub signature_counter: u64,
    pub label: String,
}

impl From<&Device> for DeviceResponse {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id().to_string(),
            algorithm: device.algorithm(),
            public_key: device.public_key().to_string(),
            signature_counter: device.signature_counter(),
            label: device.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub data: String,
}

impl SignRequest {
    pub fn new(device_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            data: data.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.device_id.is_empty() {
            errors.push("device_id is required".to_string());
        }
        if self.data.is_empty() {
            errors.push("data is required".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResponse {
    /// Base64 of the raw signature bytes
    pub signature: String,
    /// The exact payload that was signed
    pub signed_data: String,
}

impl From<SignOutcome> for SignatureResponse {
    fn from(outcome: SignOutcome) -> Self {
        Self {
            signature: outcome.record.signature_value,
            signed_data: outcome.signed_data,
        }
    }
}
