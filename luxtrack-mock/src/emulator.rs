use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;

use luxtrack_api::{DeviceConfig, DeviceStatusPayload, LightSensorPayload};
use rand::Rng;
use rand::rngs::StdRng;
use time::OffsetDateTime;

use crate::simulate::IlluminationModel;

pub const FIRMWARE_VERSION: &str = "1.0.0";
pub const DATA_SOURCE: &str = "mock";

/// Pseudo hardware state, created the first time a device is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    /// Percent, 80..=99
    pub battery_level: u8,
    /// dBm, -79..=-50
    pub signal_strength: i16,
}

impl DeviceState {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            battery_level: 80 + rng.random_range(0..20),
            signal_strength: -50 - rng.random_range(0..30),
        }
    }
}

/// Emulated BC4 devices. Owns the per-device state table and the random
/// source shared by every simulated value.
pub struct Emulator {
    model: IlluminationModel,
    states: Mutex<HashMap<String, DeviceState>>,
    rng: Mutex<StdRng>,
    command_delay_ms: RangeInclusive<u64>,
}

impl Emulator {
    pub fn new(model: IlluminationModel, rng: StdRng, command_delay_ms: RangeInclusive<u64>) -> Self {
        Self {
            model,
            states: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
            command_delay_ms,
        }
    }

    pub fn device_state(&self, device_id: &str) -> DeviceState {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(state) = states.get(device_id) {
            return *state;
        }

        let state = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            DeviceState::random(&mut *rng)
        };
        states.insert(device_id.to_string(), state);

        tracing::debug!(device_id, ?state, "created emulated device state");

        state
    }

    pub fn status(&self, device_id: &str, now: OffsetDateTime) -> DeviceStatusPayload {
        let state = self.device_state(device_id);

        DeviceStatusPayload {
            device_id: device_id.to_string(),
            online: true,
            battery_level: state.battery_level,
            signal_strength: state.signal_strength,
            firmware_version: FIRMWARE_VERSION.to_string(),
            timestamp: now,
        }
    }

    pub fn light_reading(&self, device_id: &str, now: OffsetDateTime) -> LightSensorPayload {
        let light_value = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.model.value_at(now, &mut *rng)
        };

        LightSensorPayload {
            device_id: device_id.to_string(),
            light_value,
            timestamp: Some(now),
            data_source: Some(DATA_SOURCE.to_string()),
            unit: Some("lux".to_string()),
        }
    }

    /// Delay a command takes to "execute" on the device.
    pub fn command_delay(&self) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        Duration::from_millis(rng.random_range(self.command_delay_ms.clone()))
    }

    pub fn default_config(&self, device_id: &str, now: OffsetDateTime) -> DeviceConfig {
        DeviceConfig {
            device_id: Some(device_id.to_string()),
            status_light_switch: Some(true),
            alarm_light_switch: Some(false),
            video_quality: Some("1080p".to_string()),
            night_vision: Some(true),
            motion_detection: Some(true),
            timestamp: Some(now),
        }
    }
}
