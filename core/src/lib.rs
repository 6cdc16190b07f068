//! Frame encoder and scenario driver for an LD2451 traffic radar emulator.
//!
//! The sensor reports approaching vehicles as framed binary records over a
//! serial link. This crate builds those frames byte for byte and paces them
//! from a simple kinematic model of one vehicle at a time; transports and
//! process wiring live in the emulator binary.

pub mod math;
pub mod prelude;
pub mod protocol;
pub mod sim;
pub mod telemetry;

pub use prelude::{ByteSink, Clock, EmulatorError, EmulatorResult};
pub use protocol::{Frame, TargetRecord};
pub use sim::{ScenarioConfig, ScenarioDriver, TargetState};
