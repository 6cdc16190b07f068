//! Idle/track state machine that paces frames onto the sink.

pub mod clock;
pub mod config;
pub mod scenario;
pub mod target;

pub use clock::{ManualClock, ShutdownSignal, SystemClock};
pub use config::ScenarioConfig;
pub use scenario::{Phase, RunSummary, ScenarioDriver, StepOutcome, StopReason, WritePolicy};
pub use target::TargetState;
