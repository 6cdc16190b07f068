use ld2451core::protocol::frame::hex_dump;
use log::info;
use std::io::{self, Write};

/// Sink that prints each frame as a hex line instead of touching a port.
#[derive(Default)]
pub struct HexLogSink {
    pending: Vec<u8>,
    frames: u64,
}

impl HexLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Write for HexLogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.frames += 1;
        info!("[TX] {}", hex_dump(&self.pending));
        self.pending.clear();
        Ok(())
    }
}
