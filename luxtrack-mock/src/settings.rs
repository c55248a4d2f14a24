use std::error::Error;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use time::UtcOffset;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emulator {
    /// Local time zone of the emulated devices, in whole hours
    pub utc_offset_hours: i8,
    pub command_delay_min_ms: u64,
    pub command_delay_max_ms: u64,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Emulator {
    pub fn utc_offset(&self) -> Result<UtcOffset, time::error::ComponentRange> {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0)
    }

    pub fn command_delay_ms(&self) -> RangeInclusive<u64> {
        let min = self.command_delay_min_ms.min(self.command_delay_max_ms);
        let max = self.command_delay_min_ms.max(self.command_delay_max_ms);

        min..=max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub emulator: Emulator,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let settings: Settings = toml::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/mock.toml"
        )))?;

        Ok(settings)
    }
}
