//! Application layer over a [`DeviceStore`].

use std::sync::Arc;

use crate::devices::model::Device;
use crate::devices::store::{DeviceStore, StoreError};

#[derive(Clone)]
pub struct DeviceService {
    store: Arc<dyn DeviceStore>,
}

impl DeviceService {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self { store }
    }

    pub fn get_device(&self, serial_num: &str) -> Result<Device, StoreError> {
        self.store.get(serial_num)
    }

    pub fn create_device(&self, device: Device) -> Result<(), StoreError> {
        let serial_num = device.serial_num.clone();
        self.store.create(device)?;
        tracing::info!(serial_num = %serial_num, "Device created");
        Ok(())
    }

    pub fn delete_device(&self, serial_num: &str) -> Result<(), StoreError> {
        self.store.delete(serial_num)?;
        tracing::info!(serial_num = %serial_num, "Device deleted");
        Ok(())
    }

    pub fn update_device(&self, device: Device) -> Result<(), StoreError> {
        let serial_num = device.serial_num.clone();
        self.store.update(device)?;
        tracing::info!(serial_num = %serial_num, "Device updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::store::MemoryStore;
    use std::sync::Mutex;

    /// Store that records every call it receives.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
    }

    impl DeviceStore for RecordingStore {
        fn get(&self, serial_num: &str) -> Result<Device, StoreError> {
            self.calls.lock().unwrap().push(format!("get {}", serial_num));
            Err(StoreError::NotFound)
        }

        fn create(&self, device: Device) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(format!("create {}", device.serial_num));
            Ok(())
        }

        fn delete(&self, serial_num: &str) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(format!("delete {}", serial_num));
            Err(StoreError::NotFound)
        }

        fn update(&self, device: Device) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(format!("update {}", device.serial_num));
            Ok(())
        }
    }

    #[test]
    fn test_delegates_to_store() {
        let store = Arc::new(RecordingStore::default());
        let service = DeviceService::new(store.clone());

        service.create_device(Device::new("123", "model1", "1.1.1.1")).unwrap();
        assert_eq!(service.get_device("1"), Err(StoreError::NotFound));
        service.update_device(Device::new("123", "model1", "1.1.1.2")).unwrap();
        assert_eq!(service.delete_device("124"), Err(StoreError::NotFound));

        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["create 123", "get 1", "update 123", "delete 124"]
        );
    }

    #[test]
    fn test_lifecycle_against_memory_store() {
        let service = DeviceService::new(Arc::new(MemoryStore::new()));
        let devices = [
            Device::new("123", "model1", "1.1.1.1"),
            Device::new("124", "model2", "1.1.1.2"),
            Device::new("125", "model3", "1.1.1.3"),
        ];

        for device in &devices {
            service.create_device(device.clone()).unwrap();
        }
        for device in &devices {
            assert_eq!(&service.get_device(&device.serial_num).unwrap(), device);
        }

        assert_eq!(
            service.create_device(devices[0].clone()),
            Err(StoreError::AlreadyExists)
        );

        let moved = Device::new("123", "model1", "1.1.1.9");
        service.update_device(moved.clone()).unwrap();
        assert_eq!(service.get_device("123").unwrap(), moved);

        service.delete_device("123").unwrap();
        assert_eq!(service.get_device("123"), Err(StoreError::NotFound));
    }
}
