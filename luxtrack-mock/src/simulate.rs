use rand::Rng;
use time::{OffsetDateTime, UtcOffset};

/// Lux at solar noon before jitter.
pub const PEAK_DAYLIGHT_LUX: f64 = 800.0;
/// Lux at the day/night boundary before jitter.
pub const MIN_DAYLIGHT_LUX: f64 = 200.0;
/// Upper bound (exclusive) of the uniform night baseline.
pub const MAX_NIGHT_LUX: f64 = 50.0;
/// Relative amplitude of the jitter applied on top of the baseline.
pub const JITTER_RATIO: f64 = 0.10;
pub const MAX_LUX: f64 = 1000.0;

const SUNRISE_HOUR: f64 = 6.0;
const SUNSET_HOUR: f64 = 18.0;
const NOON_HOUR: f64 = 12.0;

/// Synthetic illumination curve: a daytime envelope peaking at noon, a dim
/// random baseline at night and bounded jitter on top of both.
#[derive(Debug, Clone, Copy)]
pub struct IlluminationModel {
    offset: UtcOffset,
}

impl IlluminationModel {
    /// `offset` is the local time zone the day/night boundaries refer to.
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Hour of day in the model's time zone, minutes included.
    pub fn hour_of_day(&self, timestamp: OffsetDateTime) -> f64 {
        let local = timestamp.to_offset(self.offset);

        local.hour() as f64 + local.minute() as f64 / 60.0
    }

    /// Deterministic daytime envelope, `None` outside of `[06:00, 18:00)`.
    pub fn daylight_baseline(hour: f64) -> Option<f64> {
        if !(SUNRISE_HOUR..SUNSET_HOUR).contains(&hour) {
            return None;
        }

        // 0 at noon, 1 at sunrise and sunset
        let noon_distance = (hour - NOON_HOUR).abs() / (NOON_HOUR - SUNRISE_HOUR);

        Some(PEAK_DAYLIGHT_LUX - (PEAK_DAYLIGHT_LUX - MIN_DAYLIGHT_LUX) * noon_distance)
    }

    /// Baseline before jitter. Night values are drawn from `rng`.
    pub fn baseline<R: Rng + ?Sized>(&self, timestamp: OffsetDateTime, rng: &mut R) -> f64 {
        Self::daylight_baseline(self.hour_of_day(timestamp))
            .unwrap_or_else(|| rng.random_range(0.0..MAX_NIGHT_LUX))
    }

    pub fn value_at<R: Rng + ?Sized>(&self, timestamp: OffsetDateTime, rng: &mut R) -> f64 {
        let baseline = self.baseline(timestamp, rng);
        let variation = baseline * JITTER_RATIO * rng.random_range(-1.0..=1.0);

        (baseline + variation).clamp(0.0, MAX_LUX)
    }
}

impl Default for IlluminationModel {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}
