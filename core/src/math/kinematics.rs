/// Conversion factor between km/h and m/s.
pub const KMH_PER_MPS: f32 = 3.6;

pub struct KinematicsHelper;

impl KinematicsHelper {
    pub fn kmh_to_mps(speed_kmh: f32) -> f32 {
        speed_kmh / KMH_PER_MPS
    }

    /// Distance covered in one tick of `tick_s` seconds at `speed_kmh`.
    pub fn step_distance(speed_kmh: f32, tick_s: f32) -> f32 {
        Self::kmh_to_mps(speed_kmh) * tick_s
    }

    /// Number of ticks until a target starting at `distance_m` closes to
    /// `threshold_m` or less. `None` when the target never gets there.
    pub fn ticks_to_reach(distance_m: f32, threshold_m: f32, speed_kmh: f32, tick_s: f32) -> Option<u64> {
        if distance_m <= threshold_m {
            return Some(0);
        }
        let step = Self::step_distance(speed_kmh, tick_s);
        if !step.is_finite() || step <= 0.0 {
            return None;
        }
        let ticks = ((distance_m - threshold_m) / step).ceil();
        Some(ticks.max(1.0) as u64)
    }
}
