use serde::{Deserialize, Serialize};

/// A registered network device, keyed by serial number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub serial_num: String,
    pub model: String,
    pub ip: String,
}

impl Device {
    pub fn new(serial_num: impl Into<String>, model: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            serial_num: serial_num.into(),
            model: model.into(),
            ip: ip.into(),
        }
    }
}
