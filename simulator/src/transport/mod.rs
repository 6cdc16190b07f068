pub mod hexlog;
pub mod serial;

pub use hexlog::HexLogSink;
pub use serial::SerialSink;
