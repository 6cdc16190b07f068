use crate::math::kinematics::KinematicsHelper;
use crate::math::random::RandomSource;
use crate::sim::config::ScenarioConfig;
use serde::{Deserialize, Serialize};

/// Kinematic state of the one simulated vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub distance_m: f32,
    pub speed_kmh: f32,
    pub bearing_deg: f32,
    pub approaching: bool,
}

impl TargetState {
    pub fn new(distance_m: f32, speed_kmh: f32, bearing_deg: f32, approaching: bool) -> Self {
        Self {
            distance_m,
            speed_kmh,
            bearing_deg,
            approaching,
        }
    }

    /// Draws distance, speed and bearing from the scenario ranges.
    pub fn spawn<R: RandomSource + ?Sized>(config: &ScenarioConfig, rng: &mut R) -> Self {
        let distance_m = rng.uniform(config.distance_min_m, config.distance_max_m);
        let speed_kmh = rng.uniform(config.speed_min_kmh, config.speed_max_kmh);
        let bearing_deg = rng.uniform(config.bearing_min_deg, config.bearing_max_deg);
        Self::new(distance_m, speed_kmh, bearing_deg, config.approaching)
    }

    /// Moves the target one tick closer.
    pub fn advance(&mut self, tick_s: f32) {
        self.distance_m -= KinematicsHelper::step_distance(self.speed_kmh, tick_s);
    }

    pub fn has_passed(&self, threshold_m: f32) -> bool {
        self.distance_m <= threshold_m
    }
}
