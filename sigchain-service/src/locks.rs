// Device lock registry
//
// One mutex per device id, created on first use and kept for the lifetime of
// the process. Every chain-mutating operation for a device runs while holding
// that device's lock; the registry map itself is only touched to look up or
// insert a handle, never while signing.

use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct DeviceLockRegistry {
    locks: DashMap<String, Arc<Mutex<()>>>, // device_id -> lock
}

impl DeviceLockRegistry {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Handle to the lock for `device_id`, creating it on first request.
    ///
    /// Concurrent first calls for the same id race on the map shard lock,
    /// so exactly one mutex is ever created per id.
    pub fn lock_for(&self, device_id: &str) -> DeviceLock {
        let mutex = self
            .locks
            .entry(device_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        DeviceLock {
            device_id: device_id.to_string(),
            mutex,
        }
    }

    /// Number of devices that have had a lock handed out
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Shared handle to one device's lock.
#[derive(Clone)]
pub struct DeviceLock {
    device_id: String,
    mutex: Arc<Mutex<()>>,
}

impl DeviceLock {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Block until the device lock is held. Released when the guard drops.
    pub fn acquire(&self) -> DeviceLockGuard<'_> {
        // The mutex protects ordering only, so a panic in a previous holder
        // leaves nothing inconsistent behind it.
        let guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        DeviceLockGuard {
            device_id: &self.device_id,
            _guard: guard,
        }
    }

    /// Whether two handles refer to the same underlying lock
    pub fn same_lock(&self, other: &DeviceLock) -> bool {
        Arc::ptr_eq(&self.mutex, &other.mutex)
    }
}

/// Proof that the holder owns a device's lock.
///
/// Store entry points that mutate chain state take this guard instead of a
/// bare id, so they can only act on the device that is actually locked.
pub struct DeviceLockGuard<'a> {
    device_id: &'a str,
    _guard: MutexGuard<'a, ()>,
}

impl DeviceLockGuard<'_> {
    pub fn device_id(&self) -> &str {
        self.device_id
    }
}
