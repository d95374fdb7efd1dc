use dashmap::DashMap;

use super::SignatureStore;
use crate::domain::SignatureRecord;
use crate::error::{Result, ServiceError};

/// Process-lifetime signature storage, one ordered chain per device.
#[derive(Default)]
pub struct InMemorySignatureStore {
    chains: DashMap<String, Vec<SignatureRecord>>, // device_id -> records ordered by counter
    owners: DashMap<String, String>,               // signature_id -> device_id
}

impl InMemorySignatureStore {
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
            owners: DashMap::new(),
        }
    }
}

impl SignatureStore for InMemorySignatureStore {
    fn create(&self, record: SignatureRecord) -> Result<()> {
        let mut chain = self.chains.entry(record.device_id.clone()).or_default();

        let expected = chain.last().map_or(0, |last| last.signature_counter + 1);
        if record.signature_counter != expected {
            return Err(ServiceError::Chain(format!(
                "device {} expects counter {expected}, got {}",
                record.device_id, record.signature_counter
            )));
        }

        self.owners.insert(record.id.clone(), record.device_id.clone());
        chain.push(record);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<SignatureRecord> {
        let not_found = || ServiceError::NotFound(format!("signature with id {id} not found"));
        let device_id = self.owners.get(id).map(|d| d.clone()).ok_or_else(not_found)?;
        self.chains
            .get(&device_id)
            .and_then(|chain| chain.iter().find(|r| r.id == id).cloned())
            .ok_or_else(not_found)
    }

    fn latest_for(&self, device_id: &str) -> Result<SignatureRecord> {
        self.chains
            .get(device_id)
            .and_then(|chain| chain.last().cloned())
            .ok_or_else(|| {
                ServiceError::NotFound(format!("no signatures found for device {device_id}"))
            })
    }

    fn list_all(&self) -> Vec<SignatureRecord> {
        self.chains
            .iter()
            .flat_map(|chain| chain.value().clone())
            .collect()
    }

    fn list_by_device(&self, device_id: &str) -> Vec<SignatureRecord> {
        self.chains
            .get(device_id)
            .map(|chain| chain.clone())
            .unwrap_or_default()
    }
}
