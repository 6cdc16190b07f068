use crate::math::random::RandomSource;
use crate::sim::target::TargetState;
use serde::{Deserialize, Serialize};

/// Size in bytes of one encoded target record.
pub const TARGET_RECORD_LEN: usize = 5;

/// Targets closer than this report a strong return.
pub const NEAR_FIELD_M: f32 = 50.0;
pub const NEAR_SNR: (u8, u8) = (150, 255);
pub const FAR_SNR: (u8, u8) = (50, 150);

/// One encoded target record in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub angle: u8,
    pub distance: u8,
    pub direction: u8,
    pub speed: u8,
    pub snr: u8,
}

impl TargetRecord {
    pub fn to_bytes(&self) -> [u8; TARGET_RECORD_LEN] {
        [self.angle, self.distance, self.direction, self.speed, self.snr]
    }
}

/// Low byte of a whole-valued float, taken modulo 256 so magnitudes past
/// any integer width still wrap. Non-finite values count as 0.
fn wrap_to_byte(whole: f32) -> u8 {
    if !whole.is_finite() {
        return 0;
    }
    (whole as f64).rem_euclid(256.0) as u8
}

/// Angle is reported as degrees offset by 0x80 and wraps past a byte.
pub fn encode_angle(bearing_deg: f32) -> u8 {
    wrap_to_byte(bearing_deg.round()).wrapping_add(128)
}

pub fn encode_distance(distance_m: f32) -> u8 {
    wrap_to_byte(distance_m.trunc())
}

pub fn encode_direction(approaching: bool) -> u8 {
    if approaching {
        0x01
    } else {
        0x00
    }
}

pub fn encode_speed(speed_kmh: f32) -> u8 {
    wrap_to_byte(speed_kmh.trunc())
}

pub fn snr_for_distance<R: RandomSource + ?Sized>(distance_m: f32, rng: &mut R) -> u8 {
    let (low, high) = if distance_m < NEAR_FIELD_M {
        NEAR_SNR
    } else {
        FAR_SNR
    };
    rng.byte_between(low, high)
}

pub fn encode_target<R: RandomSource + ?Sized>(state: &TargetState, rng: &mut R) -> TargetRecord {
    TargetRecord {
        angle: encode_angle(state.bearing_deg),
        distance: encode_distance(state.distance_m),
        direction: encode_direction(state.approaching),
        speed: encode_speed(state.speed_kmh),
        snr: snr_for_distance(state.distance_m, rng),
    }
}

/// The five payload bytes of a single target: angle, distance, direction, speed, snr.
pub fn target_payload<R: RandomSource + ?Sized>(
    state: &TargetState,
    rng: &mut R,
) -> [u8; TARGET_RECORD_LEN] {
    encode_target(state, rng).to_bytes()
}
