use std::io::{self, Write};
use std::time::Duration;

/// Failure reported by a [`Clock`] implementation.
#[derive(thiserror::Error, Debug)]
pub enum ClockError {
    #[error("timer unavailable: {0}")]
    Unavailable(String),
    #[error("sleep of {0:?} ended early")]
    EarlyWake(Duration),
}

/// Common error type for the encoder and scenario driver.
#[derive(thiserror::Error, Debug)]
pub enum EmulatorError {
    #[error("sink write failed: {0}")]
    SinkWrite(#[source] io::Error),
    #[error("clock failure: {0}")]
    Clock(#[from] ClockError),
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("frame too large: {0} target records")]
    FrameTooLarge(usize),
}

pub type EmulatorResult<T> = Result<T, EmulatorError>;

/// How a sleep request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Cancelled,
}

/// Destination for complete frames. Each call carries exactly one frame.
pub trait ByteSink {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

impl<W: Write> ByteSink for W {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.write_all(frame)?;
        self.flush()
    }
}

/// Timed suspension used by the driver between idle periods and ticks.
pub trait Clock {
    fn sleep(&mut self, duration: Duration) -> Result<Wake, ClockError>;
}
