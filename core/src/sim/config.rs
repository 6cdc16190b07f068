use crate::prelude::{EmulatorError, EmulatorResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and randomization ranges for the idle/track cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub idle_min_s: f32,
    pub idle_max_s: f32,
    pub distance_min_m: f32,
    pub distance_max_m: f32,
    pub speed_min_kmh: f32,
    pub speed_max_kmh: f32,
    pub bearing_min_deg: f32,
    pub bearing_max_deg: f32,
    pub pass_threshold_m: f32,
    pub tick_s: f32,
    pub approaching: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            idle_min_s: 3.0,
            idle_max_s: 6.0,
            distance_min_m: 10.0,
            distance_max_m: 100.0,
            speed_min_kmh: 30.0,
            speed_max_kmh: 70.0,
            bearing_min_deg: -5.0,
            bearing_max_deg: 5.0,
            pass_threshold_m: 2.0,
            tick_s: 0.1,
            approaching: true,
        }
    }
}

/// Whole microseconds, so 0.1 s maps to exactly 100 ms.
pub fn seconds(value: f32) -> Duration {
    Duration::from_micros((value.max(0.0) * 1_000_000.0).round() as u64)
}

fn check_range(name: &str, low: f32, high: f32) -> EmulatorResult<()> {
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(EmulatorError::InvalidScenario(format!(
            "{} range [{}, {}] is empty or not finite",
            name, low, high
        )));
    }
    Ok(())
}

impl ScenarioConfig {
    /// Rejects configurations whose tracks could never end. Bearings of any
    /// finite size are accepted; the angle byte wraps modulo 256.
    pub fn validate(&self) -> EmulatorResult<()> {
        check_range("idle", self.idle_min_s, self.idle_max_s)?;
        check_range("distance", self.distance_min_m, self.distance_max_m)?;
        check_range("speed", self.speed_min_kmh, self.speed_max_kmh)?;
        check_range("bearing", self.bearing_min_deg, self.bearing_max_deg)?;

        if self.idle_min_s < 0.0 {
            return Err(EmulatorError::InvalidScenario(
                "idle duration cannot be negative".into(),
            ));
        }
        if self.speed_min_kmh <= 0.0 {
            return Err(EmulatorError::InvalidScenario(format!(
                "minimum speed {} km/h would never close on the sensor",
                self.speed_min_kmh
            )));
        }
        if !self.tick_s.is_finite() || self.tick_s <= 0.0 {
            return Err(EmulatorError::InvalidScenario(format!(
                "tick period {} s must be positive",
                self.tick_s
            )));
        }
        if !self.pass_threshold_m.is_finite() || self.pass_threshold_m >= self.distance_min_m {
            return Err(EmulatorError::InvalidScenario(format!(
                "pass threshold {} m must sit below the minimum spawn distance {} m",
                self.pass_threshold_m, self.distance_min_m
            )));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        seconds(self.tick_s)
    }
}
