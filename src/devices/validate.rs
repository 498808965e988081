//! Input rules for device fields.

use std::net::IpAddr;

use thiserror::Error;

use crate::devices::model::Device;

const MIN_SERIAL_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceValidationError {
    #[error("serialNum should be at least 3 characters long")]
    SerialNumLength,

    #[error("serialNum should contain only digits or letters")]
    SerialNumChar,

    #[error("field cannot be empty")]
    EmptyField,

    #[error("IP field is in wrong format")]
    InvalidIp,
}

/// A serial number has at least three characters, all ASCII letters or digits.
pub fn validate_serial_num(serial_num: &str) -> Result<(), DeviceValidationError> {
    if serial_num.len() < MIN_SERIAL_LEN {
        return Err(DeviceValidationError::SerialNumLength);
    }
    if !serial_num.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DeviceValidationError::SerialNumChar);
    }
    Ok(())
}

/// Full check for create and update: every field present, serial and IP well formed.
pub fn validate_device(device: &Device) -> Result<(), DeviceValidationError> {
    if device.serial_num.is_empty() || device.model.is_empty() || device.ip.is_empty() {
        return Err(DeviceValidationError::EmptyField);
    }
    validate_serial_num(&device.serial_num)?;
    if device.ip.parse::<IpAddr>().is_err() {
        return Err(DeviceValidationError::InvalidIp);
    }
    Ok(())
}
