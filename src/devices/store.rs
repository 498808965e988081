//! Device storage.
//!
//! # Design Decisions
//! - Storage is a trait so the service can run against other backends
//! - The in-memory store is a `DashMap`; check-and-insert goes through the
//!   entry API so concurrent creates of one serial cannot both succeed

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use crate::devices::model::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("there is no such device")]
    NotFound,

    #[error("such device is already in database")]
    AlreadyExists,
}

pub trait DeviceStore: Send + Sync {
    fn get(&self, serial_num: &str) -> Result<Device, StoreError>;
    fn create(&self, device: Device) -> Result<(), StoreError>;
    fn delete(&self, serial_num: &str) -> Result<(), StoreError>;
    fn update(&self, device: Device) -> Result<(), StoreError>;
}

/// Process-local device store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    devices: DashMap<String, Device>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl DeviceStore for MemoryStore {
    fn get(&self, serial_num: &str) -> Result<Device, StoreError> {
        self.devices
            .get(serial_num)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound)
    }

    fn create(&self, device: Device) -> Result<(), StoreError> {
        match self.devices.entry(device.serial_num.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(device);
                Ok(())
            }
        }
    }

    fn delete(&self, serial_num: &str) -> Result<(), StoreError> {
        self.devices
            .remove(serial_num)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn update(&self, device: Device) -> Result<(), StoreError> {
        match self.devices.get_mut(device.serial_num.as_str()) {
            Some(mut entry) => {
                *entry = device;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}
