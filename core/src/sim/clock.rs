use crate::prelude::{Clock, ClockError, Wake};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Cloneable cancellation flag. Sleepers waiting on it wake as soon as it
/// is triggered.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        let (lock, condvar) = &*self.inner;
        if let Ok(mut triggered) = lock.lock() {
            *triggered = true;
        }
        condvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.0.lock().map(|flag| *flag).unwrap_or(true)
    }

    /// Blocks for `timeout` or until triggered, whichever comes first.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Wake, ClockError> {
        let (lock, condvar) = &*self.inner;
        let guard = lock
            .lock()
            .map_err(|_| ClockError::Unavailable("shutdown lock poisoned".into()))?;
        let (guard, _) = condvar
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .map_err(|_| ClockError::Unavailable("shutdown lock poisoned".into()))?;
        if *guard {
            Ok(Wake::Cancelled)
        } else {
            Ok(Wake::Elapsed)
        }
    }
}

/// Wall-clock sleeper that honours a [`ShutdownSignal`].
pub struct SystemClock {
    shutdown: ShutdownSignal,
}

impl SystemClock {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self { shutdown }
    }
}

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) -> Result<Wake, ClockError> {
        let started = Instant::now();
        let wake = self.shutdown.wait_timeout(duration)?;
        if wake == Wake::Elapsed && started.elapsed() < duration {
            return Err(ClockError::EarlyWake(duration));
        }
        Ok(wake)
    }
}

/// Clock that never blocks; it records each requested sleep and can fire a
/// shutdown after a fixed number of sleeps.
#[derive(Default)]
pub struct ManualClock {
    sleeps: Vec<Duration>,
    cancel_after: Option<(usize, ShutdownSignal)>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers `shutdown` during the `count`-th sleep (1-based).
    pub fn cancel_after(count: usize, shutdown: ShutdownSignal) -> Self {
        Self {
            sleeps: Vec::new(),
            cancel_after: Some((count, shutdown)),
        }
    }

    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    pub fn elapsed(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Clock for ManualClock {
    fn sleep(&mut self, duration: Duration) -> Result<Wake, ClockError> {
        self.sleeps.push(duration);
        if let Some((count, shutdown)) = &self.cancel_after {
            if self.sleeps.len() >= *count {
                shutdown.trigger();
                return Ok(Wake::Cancelled);
            }
        }
        Ok(Wake::Elapsed)
    }
}
