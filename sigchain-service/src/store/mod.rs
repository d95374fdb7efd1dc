// Storage contracts for devices and signature records
//
// The signing core only talks to these traits. Devices are handed out as
// snapshots; the only way to change a device's counter is through an entry
// point that requires the device's lock guard.

mod device;
mod signature;

pub use device::InMemoryDeviceStore;
pub use signature::InMemorySignatureStore;

use crate::domain::{Device, SignatureRecord};
use crate::error::Result;
use crate::locks::{DeviceLock, DeviceLockGuard};

pub trait DeviceStore: Send + Sync {
    /// Insert a new device. Fails with `AlreadyExists` if the id is taken.
    fn create(&self, device: Device) -> Result<()>;

    /// Snapshot of a device, or `NotFound`.
    fn get(&self, id: &str) -> Result<Device>;

    /// Advance the locked device's counter by one and return the new value.
    fn increment_counter(&self, guard: &DeviceLockGuard<'_>) -> Result<u64>;

    /// The per-device lock serializing chain mutations.
    fn lock_for(&self, id: &str) -> DeviceLock;

    fn list_all(&self) -> Vec<Device>;

    fn count(&self) -> usize;
}

pub trait SignatureStore: Send + Sync {
    /// Append a record to its device's chain. The record's counter must be
    /// the next one in that chain, otherwise the store rejects it.
    fn create(&self, record: SignatureRecord) -> Result<()>;

    fn get(&self, id: &str) -> Result<SignatureRecord>;

    /// The record with the highest counter for `device_id`, or `NotFound`.
    fn latest_for(&self, device_id: &str) -> Result<SignatureRecord>;

    fn list_all(&self) -> Vec<SignatureRecord>;

    /// Records of one device ordered by counter.
    fn list_by_device(&self, device_id: &str) -> Vec<SignatureRecord>;
}
