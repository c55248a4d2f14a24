use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Device reporting ambient illumination
    LightSensor,
    /// Camera without an exposed light sensor
    Camera,
    /// Any type this service does not know about
    Unknown,
}

impl DeviceType {
    /// Whether devices of this type take part in illumination collection.
    pub fn is_light_capable(&self) -> bool {
        matches!(self, DeviceType::LightSensor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::LightSensor => "light_sensor",
            DeviceType::Camera => "camera",
            DeviceType::Unknown => "unknown",
        }
    }
}

impl From<String> for DeviceType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "light_sensor" => DeviceType::LightSensor,
            "camera" => DeviceType::Camera,
            _ => DeviceType::Unknown,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    #[default]
    Offline,
    Error,
}

impl From<String> for DeviceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "online" => DeviceStatus::Online,
            "error" => DeviceStatus::Error,
            _ => DeviceStatus::Offline,
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "online"),
            DeviceStatus::Offline => write!(f, "offline"),
            DeviceStatus::Error => write!(f, "error"),
        }
    }
}
