//! Wire format of the sensor's target data frame.

pub mod frame;
pub mod target;

pub use frame::{hex_dump, Frame, SINGLE_TARGET_FRAME_LEN};
pub use target::{encode_target, target_payload, TargetRecord};
