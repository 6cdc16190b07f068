use ld2451core::math::SeededRandom;
use ld2451core::protocol::frame::hex_dump;
use ld2451core::protocol::{encode_target, Frame, TargetRecord};
use ld2451core::TargetState;
use serde::Serialize;

/// One frame built from a fixed target, for checking receivers by hand.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub target: TargetState,
    pub record: TargetRecord,
    pub length_field: u16,
    pub frame_len: usize,
    pub hex: String,
}

pub fn probe(target: TargetState, seed: Option<u64>) -> ProbeReport {
    let mut rng = SeededRandom::new(seed);
    let record = encode_target(&target, &mut rng);
    let bytes = Frame::single(record).to_bytes();

    ProbeReport {
        target,
        record,
        length_field: u16::from_le_bytes([bytes[4], bytes[5]]),
        frame_len: bytes.len(),
        hex: hex_dump(&bytes),
    }
}
