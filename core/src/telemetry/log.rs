use crate::sim::target::TargetState;
use log::{info, warn};

/// Turns driver events into log lines.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn road_clear(&self) {
        self.record("[STATUS] Road clear");
    }

    pub fn target_appearing(&self, target: &TargetState) {
        info!(
            "[DETECT] Car appearing at {:.1}m, speed {:.1} km/h, bearing {:.1} deg",
            target.distance_m, target.speed_kmh, target.bearing_deg
        );
    }

    pub fn frame_sent(&self, target: &TargetState, frame_len: usize) {
        info!(
            "[FRAME] Sent {} bytes, target at {:.1}m, speed {:.1} km/h",
            frame_len, target.distance_m, target.speed_kmh
        );
    }

    pub fn target_passed(&self) {
        self.record("[STATUS] Car passed");
    }

    pub fn frame_dropped(&self, error: &std::io::Error) {
        warn!("[FRAME] Dropped frame after sink error: {}", error);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
