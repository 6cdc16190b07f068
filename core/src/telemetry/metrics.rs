use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub frames_sent: u64,
    pub bytes_sent: u64,
    pub write_errors: u64,
    pub tracks_started: u64,
    pub tracks_completed: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_frame(&self, bytes: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_sent += 1;
            metrics.bytes_sent += bytes as u64;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.write_errors += 1;
        }
    }

    pub fn record_track_started(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.tracks_started += 1;
        }
    }

    pub fn record_track_completed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.tracks_completed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
