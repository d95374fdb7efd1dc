use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::DeviceStore;
use crate::domain::Device;
use crate::error::{Result, ServiceError};
use crate::locks::{DeviceLock, DeviceLockGuard, DeviceLockRegistry};

/// Process-lifetime device storage.
#[derive(Default)]
pub struct InMemoryDeviceStore {
    devices: DashMap<String, Device>, // device_id -> device
    locks: DeviceLockRegistry,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: DashMap::new(),
            locks: DeviceLockRegistry::new(),
        }
    }
}

impl DeviceStore for InMemoryDeviceStore {
    fn create(&self, device: Device) -> Result<()> {
        match self.devices.entry(device.id().to_string()) {
            Entry::Occupied(entry) => Err(ServiceError::AlreadyExists(format!(
                "device with id {} already exists",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(device);
                Ok(())
            }
        }
    }

    fn get(&self, id: &str) -> Result<Device> {
        self.devices
            .get(id)
            .map(|d| d.clone())
            .ok_or_else(|| ServiceError::device_not_found(id))
    }

    fn increment_counter(&self, guard: &DeviceLockGuard<'_>) -> Result<u64> {
        let id = guard.device_id();
        let mut device = self
            .devices
            .get_mut(id)
            .ok_or_else(|| ServiceError::device_not_found(id))?;
        Ok(device.advance_counter())
    }

    fn lock_for(&self, id: &str) -> DeviceLock {
        self.locks.lock_for(id)
    }

    fn list_all(&self) -> Vec<Device> {
        self.devices.iter().map(|d| d.value().clone()).collect()
    }

    fn count(&self) -> usize {
        self.devices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigchain_keys::{Algorithm, EncodedKeyPair};

    fn device(id: &str) -> Device {
        let keys = EncodedKeyPair {
            public_pem: "public".to_string(),
            private_pem: "private".to_string(),
        };
        Device::with_id(id, Algorithm::Ecc, keys, "label")
    }

    #[test]
    fn test_create_and_get() {
        let store = InMemoryDeviceStore::new();
        store.create(device("d1")).unwrap();

        let fetched = store.get("d1").unwrap();
        assert_eq!(fetched.id(), "d1");
        assert_eq!(fetched.signature_counter(), 0);
        assert_eq!(store.count(), 1);
        assert!(store.get("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let store = InMemoryDeviceStore::new();
        store.create(device("d1")).unwrap();
        let err = store.create(device("d1")).unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_increment_requires_lock_and_targets_locked_device() {
        let store = InMemoryDeviceStore::new();
        store.create(device("d1")).unwrap();
        store.create(device("d2")).unwrap();

        let lock = store.lock_for("d1");
        let guard = lock.acquire();
        assert_eq!(store.increment_counter(&guard).unwrap(), 1);
        assert_eq!(store.increment_counter(&guard).unwrap(), 2);
        drop(guard);

        assert_eq!(store.get("d1").unwrap().signature_counter(), 2);
        assert_eq!(store.get("d2").unwrap().signature_counter(), 0);
    }

    #[test]
    fn test_increment_unknown_device() {
        let store = InMemoryDeviceStore::new();
        let lock = store.lock_for("ghost");
        let guard = lock.acquire();
        assert!(store.increment_counter(&guard).unwrap_err().is_not_found());
    }

    #[test]
    fn test_snapshots_are_detached() {
        let store = InMemoryDeviceStore::new();
        store.create(device("d1")).unwrap();

        let mut snapshot = store.get("d1").unwrap();
        snapshot.advance_counter();
        assert_eq!(store.get("d1").unwrap().signature_counter(), 0);
    }
}
