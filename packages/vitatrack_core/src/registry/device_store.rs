//! In-memory device storage
//!
//! Holds the authoritative device list for a session. Insertion order is
//! preserved and ids are unique.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::device::Device;
use super::RegistryError;

/// A store shared between the registry and its connection controller.
pub type SharedStore = Arc<RwLock<DeviceStore>>;

// Critical sections never panic mid-update, so a poisoned lock still guards a
// consistent store.
pub(crate) fn read(store: &RwLock<DeviceStore>) -> RwLockReadGuard<'_, DeviceStore> {
    store.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write(store: &RwLock<DeviceStore>) -> RwLockWriteGuard<'_, DeviceStore> {
    store.write().unwrap_or_else(|e| e.into_inner())
}

/// Owns the set of known devices.
#[derive(Debug, Default, Clone)]
pub struct DeviceStore {
    devices: Vec<Device>,
}

impl DeviceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully-formed device. Rejects an id that is already present.
    pub fn add(&mut self, device: Device) -> Result<(), RegistryError> {
        if self.position(&device.id).is_some() {
            log::error!("Refusing duplicate device id {}", device.id);
            return Err(RegistryError::DuplicateId(device.id));
        }
        self.devices.push(device);
        Ok(())
    }

    /// Remove the device with the given id. Absent ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Device> {
        self.position(id).map(|index| self.devices.remove(index))
    }

    /// Snapshot of every device, in insertion order.
    pub fn list(&self) -> Vec<Device> {
        self.devices.clone()
    }

    /// Look up a device by id.
    pub fn find(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Borrowing iterator, for projections that do not need a snapshot.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.devices.iter().position(|d| d.id == id)
    }
}
