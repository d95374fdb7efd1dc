// Signing orchestrator
//
// Performs one atomic "sign and advance the chain" step for a device:
//
//   Start -> LockAcquired -> Computed -> Persisted -> CounterAdvanced -> Done
//
// The device lock is held from before the chain state is read until after the
// counter has advanced, and is released on every exit path by the guard's
// drop. The signature record is stored before the counter moves.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sigchain_common::logging::{Component, Logger};
use sigchain_common::{log_debug, log_error};
use sigchain_keys::signer_from_pem;
use std::fmt;
use std::sync::Arc;

use crate::chain;
use crate::domain::SignatureRecord;
use crate::error::{Result, ServiceError};
use crate::store::{DeviceStore, SignatureStore};

/// Progress of a single sign request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignStage {
    Start,
    LockAcquired,
    Computed,
    Persisted,
    CounterAdvanced,
    Done,
}

impl fmt::Display for SignStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignStage::Start => "start",
            SignStage::LockAcquired => "lock-acquired",
            SignStage::Computed => "computed",
            SignStage::Persisted => "persisted",
            SignStage::CounterAdvanced => "counter-advanced",
            SignStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of a successful sign: the stored record and the exact signed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    pub record: SignatureRecord,
    pub signed_data: String,
}

pub struct SigningOrchestrator {
    devices: Arc<dyn DeviceStore>,
    signatures: Arc<dyn SignatureStore>,
    logger: Logger,
}

impl SigningOrchestrator {
    pub fn new(
        devices: Arc<dyn DeviceStore>,
        signatures: Arc<dyn SignatureStore>,
        logger: &Logger,
    ) -> Self {
        Self {
            devices,
            signatures,
            logger: logger.with_component(Component::Chain),
        }
    }

    /// Sign `data` as the next link of `device_id`'s chain.
    ///
    /// Blocks while another request holds the same device's lock.
    pub fn sign(&self, device_id: &str, data: &str) -> Result<SignOutcome> {
        let logger = self.logger.with_device(device_id);
        let mut stage = SignStage::Start;

        match self.sign_locked(device_id, data, &mut stage) {
            Ok(outcome) => {
                log_debug!(
                    logger,
                    "signature {} recorded at counter {}",
                    outcome.record.id,
                    outcome.record.signature_counter
                );
                Ok(outcome)
            }
            Err(err @ ServiceError::Chain(_)) => {
                log_error!(logger, "data integrity violation at stage {stage}: {err}");
                Err(err)
            }
            Err(err) => {
                log_error!(logger, "sign failed at stage {stage}: {err}");
                Err(err)
            }
        }
    }

    fn sign_locked(
        &self,
        device_id: &str,
        data: &str,
        stage: &mut SignStage,
    ) -> Result<SignOutcome> {
        // Unknown devices are rejected without creating a lock for them
        self.devices.get(device_id)?;

        let lock = self.devices.lock_for(device_id);
        let guard = lock.acquire();
        *stage = SignStage::LockAcquired;

        // Re-read under the lock: the snapshot above may predate a concurrent sign
        let device = self.devices.get(device_id)?;
        let latest = match self.signatures.latest_for(device_id) {
            Ok(record) => Some(record),
            Err(ServiceError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };

        let step = chain::next_step(&device, latest.as_ref(), data)?;
        *stage = SignStage::Computed;

        let signer = signer_from_pem(device.algorithm(), device.private_key())?;
        let signature = signer.sign(step.payload.as_bytes())?;

        let record = SignatureRecord::new(device_id, step.counter, STANDARD.encode(signature));
        self.signatures.create(record.clone())?;
        *stage = SignStage::Persisted;

        let counter = self.devices.increment_counter(&guard)?;
        *stage = SignStage::CounterAdvanced;
        if counter != step.counter + 1 {
            return Err(ServiceError::Chain(format!(
                "device {device_id} counter advanced to {counter}, expected {}",
                step.counter + 1
            )));
        }

        drop(guard);
        *stage = SignStage::Done;

        Ok(SignOutcome {
            record,
            signed_data: step.payload,
        })
    }
}
