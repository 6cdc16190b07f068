use crate::prelude::{EmulatorError, EmulatorResult};
use crate::protocol::target::{TargetRecord, TARGET_RECORD_LEN};

pub const HEADER: [u8; 4] = [0xF4, 0xF3, 0xF2, 0xF1];
pub const TRAILER: [u8; 4] = [0xF8, 0xF7, 0xF6, 0xF5];
pub const LENGTH_FIELD_LEN: usize = 2;
/// Target count byte plus alarm byte.
pub const PREAMBLE_LEN: usize = 2;
pub const ALARM_ACTIVE: u8 = 0x01;
pub const MAX_TARGETS_PER_FRAME: usize = u8::MAX as usize;

pub const SINGLE_TARGET_FRAME_LEN: usize =
    HEADER.len() + LENGTH_FIELD_LEN + PREAMBLE_LEN + TARGET_RECORD_LEN + TRAILER.len();

/// A data frame as sent by the sensor: header, LE length, count, alarm,
/// target records and trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    alarm: u8,
    targets: Vec<TargetRecord>,
}

impl Frame {
    pub fn single(record: TargetRecord) -> Self {
        Self {
            alarm: ALARM_ACTIVE,
            targets: vec![record],
        }
    }

    pub fn with_targets(alarm: u8, targets: Vec<TargetRecord>) -> EmulatorResult<Self> {
        if targets.is_empty() {
            return Err(EmulatorError::InvalidFrame(
                "a data frame carries at least one target".into(),
            ));
        }
        if targets.len() > MAX_TARGETS_PER_FRAME {
            return Err(EmulatorError::FrameTooLarge(targets.len()));
        }
        Ok(Self { alarm, targets })
    }

    pub fn alarm(&self) -> u8 {
        self.alarm
    }

    pub fn targets(&self) -> &[TargetRecord] {
        &self.targets
    }

    /// Count byte, alarm byte and every record; the span LENGTH describes.
    fn inner_bytes(&self) -> Vec<u8> {
        let mut inner = Vec::with_capacity(PREAMBLE_LEN + self.targets.len() * TARGET_RECORD_LEN);
        // Bounded by `with_targets`.
        inner.push(self.targets.len() as u8);
        inner.push(self.alarm);
        for record in &self.targets {
            inner.extend_from_slice(&record.to_bytes());
        }
        inner
    }

    pub fn encoded_len(&self) -> usize {
        HEADER.len()
            + LENGTH_FIELD_LEN
            + PREAMBLE_LEN
            + self.targets.len() * TARGET_RECORD_LEN
            + TRAILER.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let inner = self.inner_bytes();
        let length = inner.len() as u16;

        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&HEADER);
        bytes.extend_from_slice(&length.to_le_bytes());
        bytes.extend_from_slice(&inner);
        bytes.extend_from_slice(&TRAILER);
        bytes
    }
}

/// Space-separated uppercase hex, the way serial monitors print frames.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(distance: u8) -> TargetRecord {
        TargetRecord {
            angle: 131,
            distance,
            direction: 1,
            speed: 55,
            snr: 200,
        }
    }

    #[test]
    fn single_target_frame_layout() {
        let bytes = Frame::single(record(42)).to_bytes();
        assert_eq!(
            bytes,
            vec![
                0xF4, 0xF3, 0xF2, 0xF1, 0x07, 0x00, 0x01, 0x01, 131, 42, 1, 55, 200, 0xF8, 0xF7,
                0xF6, 0xF5
            ]
        );
        assert_eq!(bytes.len(), SINGLE_TARGET_FRAME_LEN);
        assert_eq!(SINGLE_TARGET_FRAME_LEN, 4 + 2 + 2 + 5 + 4);
    }

    #[test]
    fn length_counts_records_present() {
        let frame = Frame::with_targets(ALARM_ACTIVE, vec![record(10), record(20), record(30)])
            .unwrap();
        let bytes = frame.to_bytes();
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 2 + 3 * 5);
        assert_eq!(bytes[6], 3);
        assert_eq!(bytes.len(), frame.encoded_len());
        assert_eq!(&bytes[bytes.len() - 4..], &TRAILER);
    }

    #[test]
    fn rejects_empty_and_oversized_frames() {
        assert!(matches!(
            Frame::with_targets(ALARM_ACTIVE, vec![]),
            Err(EmulatorError::InvalidFrame(_))
        ));
        assert!(matches!(
            Frame::with_targets(ALARM_ACTIVE, vec![record(1); 256]),
            Err(EmulatorError::FrameTooLarge(256))
        ));
    }

    #[test]
    fn hex_dump_formats_bytes() {
        assert_eq!(hex_dump(&[0xF4, 0x07, 0x00]), "F4 07 00");
    }
}
