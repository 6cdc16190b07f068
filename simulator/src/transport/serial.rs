use anyhow::Context;
use log::{debug, info};
use serial2::SerialPort;
use std::io::{self, Write};

/// Serial link to the receiver under test. The sensor talks 8N1; only the
/// baud rate is configurable.
pub struct SerialSink {
    port: SerialPort,
    path: String,
}

impl SerialSink {
    pub fn open(path: &str, baud: u32) -> anyhow::Result<Self> {
        let port = SerialPort::open(path, baud)
            .with_context(|| format!("opening serial port {} at {} baud", path, baud))?;
        info!("LD2451 emulator attached to {} ({} baud)", path, baud);
        Ok(Self {
            port,
            path: path.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Write for SerialSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.port.write(buf)?;
        debug!("{} <- {} bytes", self.path, written);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}
