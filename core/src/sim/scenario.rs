use crate::math::kinematics::KinematicsHelper;
use crate::math::random::RandomSource;
use crate::prelude::{ByteSink, Clock, EmulatorError, EmulatorResult, Wake};
use crate::protocol::frame::Frame;
use crate::protocol::target::{encode_target, TargetRecord};
use crate::sim::clock::ShutdownSignal;
use crate::sim::config::{seconds, ScenarioConfig};
use crate::sim::target::TargetState;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};

/// Where the driver is in the idle/track cycle. The target only exists
/// while tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Tracking(TargetState),
}

/// What a caller wants done with a frame the sink refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Surface the error and leave the driver untouched.
    #[default]
    Fail,
    /// Count the failure, skip the frame and keep the track moving.
    DropAndContinue,
}

/// Result of a single [`ScenarioDriver::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    TargetAppeared(TargetState),
    /// A frame went out; `target` is the state it encoded.
    FrameSent {
        record: TargetRecord,
        target: TargetState,
    },
    FrameDropped {
        target: TargetState,
    },
    /// Final frame of a track went out and the driver is idle again.
    TargetPassed {
        record: Option<TargetRecord>,
    },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    TrackLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub stop: StopReason,
    pub tracks_completed: u64,
    pub metrics: MetricsSnapshot,
}

/// Closed-form number of ticks a track lasts, or `None` if it never ends.
pub fn ticks_to_pass(state: &TargetState, config: &ScenarioConfig) -> Option<u64> {
    KinematicsHelper::ticks_to_reach(
        state.distance_m,
        config.pass_threshold_m,
        state.speed_kmh,
        config.tick_s,
    )
}

/// Drives the idle/track cycle and pushes one frame per tick into a sink.
pub struct ScenarioDriver<R: RandomSource> {
    config: ScenarioConfig,
    phase: Phase,
    rng: R,
    write_policy: WritePolicy,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl<R: RandomSource> ScenarioDriver<R> {
    pub fn new(config: ScenarioConfig, rng: R) -> EmulatorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
            rng,
            write_policy: WritePolicy::default(),
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn set_write_policy(&mut self, policy: WritePolicy) {
        self.write_policy = policy;
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Option<&TargetState> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Tracking(target) => Some(target),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Executes one transition of the state machine.
    ///
    /// From idle this waits out the idle period and spawns a target. While
    /// tracking it emits one frame, advances the target and either returns
    /// to idle or sleeps for one tick. A sink failure under
    /// [`WritePolicy::Fail`] returns before the target or phase change.
    pub fn step<C, S>(&mut self, clock: &mut C, sink: &mut S) -> EmulatorResult<StepOutcome>
    where
        C: Clock + ?Sized,
        S: ByteSink + ?Sized,
    {
        match self.phase {
            Phase::Idle => self.step_idle(clock),
            Phase::Tracking(target) => self.step_tracking(target, clock, sink),
        }
    }

    fn step_idle<C: Clock + ?Sized>(&mut self, clock: &mut C) -> EmulatorResult<StepOutcome> {
        self.logger.road_clear();
        let idle = self
            .rng
            .uniform(self.config.idle_min_s, self.config.idle_max_s);
        if clock.sleep(seconds(idle))? == Wake::Cancelled {
            return Ok(StepOutcome::Cancelled);
        }

        let target = TargetState::spawn(&self.config, &mut self.rng);
        self.logger.target_appearing(&target);
        self.metrics.record_track_started();
        self.phase = Phase::Tracking(target);
        Ok(StepOutcome::TargetAppeared(target))
    }

    fn step_tracking<C, S>(
        &mut self,
        mut target: TargetState,
        clock: &mut C,
        sink: &mut S,
    ) -> EmulatorResult<StepOutcome>
    where
        C: Clock + ?Sized,
        S: ByteSink + ?Sized,
    {
        let record = encode_target(&target, &mut self.rng);
        let bytes = Frame::single(record).to_bytes();

        let sent = match sink.write_frame(&bytes) {
            Ok(()) => {
                self.metrics.record_frame(bytes.len());
                self.logger.frame_sent(&target, bytes.len());
                Some(record)
            }
            Err(err) => {
                self.metrics.record_error();
                match self.write_policy {
                    WritePolicy::Fail => return Err(EmulatorError::SinkWrite(err)),
                    WritePolicy::DropAndContinue => {
                        self.logger.frame_dropped(&err);
                        None
                    }
                }
            }
        };
        let encoded = target;

        target.advance(self.config.tick_s);
        if target.has_passed(self.config.pass_threshold_m) {
            self.logger.target_passed();
            self.metrics.record_track_completed();
            self.phase = Phase::Idle;
            return Ok(StepOutcome::TargetPassed { record: sent });
        }
        self.phase = Phase::Tracking(target);

        if clock.sleep(self.config.tick())? == Wake::Cancelled {
            return Ok(StepOutcome::Cancelled);
        }
        Ok(match sent {
            Some(record) => StepOutcome::FrameSent {
                record,
                target: encoded,
            },
            None => StepOutcome::FrameDropped { target: encoded },
        })
    }

    /// Runs until `shutdown` fires.
    pub fn run<C, S>(
        &mut self,
        clock: &mut C,
        sink: &mut S,
        shutdown: &ShutdownSignal,
    ) -> EmulatorResult<RunSummary>
    where
        C: Clock + ?Sized,
        S: ByteSink + ?Sized,
    {
        self.run_tracks(clock, sink, shutdown, None)
    }

    /// Runs until `shutdown` fires or `max_tracks` tracks have passed.
    pub fn run_tracks<C, S>(
        &mut self,
        clock: &mut C,
        sink: &mut S,
        shutdown: &ShutdownSignal,
        max_tracks: Option<u64>,
    ) -> EmulatorResult<RunSummary>
    where
        C: Clock + ?Sized,
        S: ByteSink + ?Sized,
    {
        let mut completed = 0;
        let stop = loop {
            if shutdown.is_triggered() {
                break StopReason::Shutdown;
            }
            if max_tracks.is_some_and(|max| completed >= max) {
                break StopReason::TrackLimit;
            }
            match self.step(clock, sink)? {
                StepOutcome::Cancelled => break StopReason::Shutdown,
                StepOutcome::TargetPassed { .. } => completed += 1,
                _ => {}
            }
        };

        Ok(RunSummary {
            stop,
            tracks_completed: completed,
            metrics: self.metrics.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::ScriptedRandom;
    use crate::prelude::ClockError;
    use crate::protocol::frame::SINGLE_TARGET_FRAME_LEN;
    use crate::sim::clock::ManualClock;
    use std::io;
    use std::time::Duration;

    struct BrokenSink;

    impl io::Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::NotConnected, "port closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Lets `healthy` sleeps through, then reports a dead timer.
    struct FailingClock {
        healthy: usize,
    }

    impl Clock for FailingClock {
        fn sleep(&mut self, _duration: Duration) -> Result<Wake, ClockError> {
            if self.healthy == 0 {
                return Err(ClockError::Unavailable("timer stopped".into()));
            }
            self.healthy -= 1;
            Ok(Wake::Elapsed)
        }
    }

    fn driver(uniforms: Vec<f32>, bytes: Vec<u8>) -> ScenarioDriver<ScriptedRandom> {
        ScenarioDriver::new(ScenarioConfig::default(), ScriptedRandom::new(uniforms, bytes))
            .unwrap()
    }

    #[test]
    fn idle_step_waits_then_spawns() {
        let mut driver = driver(vec![4.0, 42.0, 55.0, 3.0], vec![]);
        let mut clock = ManualClock::new();
        let mut sink: Vec<u8> = Vec::new();

        let outcome = driver.step(&mut clock, &mut sink).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::TargetAppeared(TargetState::new(42.0, 55.0, 3.0, true))
        );
        assert_eq!(clock.sleeps(), &[Duration::from_secs(4)]);
        assert!(sink.is_empty());
        assert!(driver.target().is_some());
    }

    #[test]
    fn tracking_step_emits_reference_frame() {
        let mut driver = driver(vec![3.0, 42.0, 55.0, 3.0], vec![201]);
        let mut clock = ManualClock::new();
        let mut sink: Vec<u8> = Vec::new();
        driver.step(&mut clock, &mut sink).unwrap();

        let outcome = driver.step(&mut clock, &mut sink).unwrap();
        assert!(matches!(outcome, StepOutcome::FrameSent { .. }));
        assert_eq!(
            sink,
            vec![
                0xF4, 0xF3, 0xF2, 0xF1, 0x07, 0x00, 0x01, 0x01, 131, 42, 1, 55, 201, 0xF8, 0xF7,
                0xF6, 0xF5
            ]
        );
        assert_eq!(clock.sleeps()[1], Duration::from_millis(100));

        let remaining = driver.target().unwrap().distance_m;
        assert!((remaining - (42.0 - 55.0 / 3.6 * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn failed_write_keeps_state() {
        let mut driver = driver(vec![3.0, 42.0, 55.0, 3.0], vec![]);
        let mut clock = ManualClock::new();
        driver.step(&mut clock, &mut Vec::<u8>::new()).unwrap();
        let before = driver.phase();

        let err = driver.step(&mut clock, &mut BrokenSink).unwrap_err();
        assert!(matches!(err, EmulatorError::SinkWrite(_)));
        assert_eq!(driver.phase(), before);
        assert_eq!(clock.sleeps().len(), 1);
        assert_eq!(driver.metrics().write_errors, 1);
    }

    #[test]
    fn drop_policy_keeps_track_moving() {
        let mut driver = driver(vec![3.0, 42.0, 55.0, 3.0], vec![]);
        driver.set_write_policy(WritePolicy::DropAndContinue);
        let mut clock = ManualClock::new();
        driver.step(&mut clock, &mut Vec::<u8>::new()).unwrap();

        let outcome = driver.step(&mut clock, &mut BrokenSink).unwrap();
        assert!(matches!(outcome, StepOutcome::FrameDropped { .. }));
        assert!(driver.target().unwrap().distance_m < 42.0);
        assert_eq!(driver.metrics().frames_sent, 0);
    }

    #[test]
    fn track_ends_back_in_idle() {
        // 36 km/h closes 1 m per tick: 12 m reaches 2 m on the tenth frame.
        let mut driver = driver(vec![3.0, 12.0, 36.0, 0.0], vec![]);
        let mut clock = ManualClock::new();
        let mut sink: Vec<u8> = Vec::new();
        driver.step(&mut clock, &mut sink).unwrap();

        let mut frames = 0;
        loop {
            frames += 1;
            match driver.step(&mut clock, &mut sink).unwrap() {
                StepOutcome::FrameSent { .. } => assert!(frames < 20),
                StepOutcome::TargetPassed { record } => {
                    assert!(record.is_some());
                    break;
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        assert!((9..=11).contains(&frames));
        assert_eq!(driver.phase(), Phase::Idle);
        assert_eq!(sink.len(), frames * SINGLE_TARGET_FRAME_LEN);
        // Passing goes straight to idle without an extra tick sleep.
        assert_eq!(clock.sleeps().len(), frames);
    }

    #[test]
    fn target_landing_on_threshold_passes_on_that_frame() {
        // 7.2 km/h over a 0.25 s tick is exactly 0.5 m: 4.0 -> 3.5 -> 3.0 -> 2.5 -> 2.0.
        let config = ScenarioConfig {
            distance_min_m: 3.0,
            speed_min_kmh: 5.0,
            tick_s: 0.25,
            ..Default::default()
        };
        let rng = ScriptedRandom::new(vec![3.0, 4.0, 7.2, 0.0], vec![]);
        let mut driver = ScenarioDriver::new(config, rng).unwrap();
        let mut clock = ManualClock::new();
        let mut sink: Vec<u8> = Vec::new();
        driver.step(&mut clock, &mut sink).unwrap();

        for _ in 0..3 {
            assert!(matches!(
                driver.step(&mut clock, &mut sink).unwrap(),
                StepOutcome::FrameSent { .. }
            ));
        }
        assert_eq!(driver.target().unwrap().distance_m, 2.5);

        let outcome = driver.step(&mut clock, &mut sink).unwrap();
        assert!(matches!(outcome, StepOutcome::TargetPassed { record: Some(_) }));
        assert_eq!(driver.phase(), Phase::Idle);
        assert_eq!(sink.len(), 4 * SINGLE_TARGET_FRAME_LEN);
        assert_eq!(clock.sleeps().len(), 4);
    }

    #[test]
    fn idle_clock_failure_is_fatal() {
        let mut driver = driver(vec![3.0, 42.0, 55.0, 3.0], vec![]);
        let mut clock = FailingClock { healthy: 0 };
        let err = driver
            .step(&mut clock, &mut Vec::<u8>::new())
            .unwrap_err();
        assert!(matches!(err, EmulatorError::Clock(ClockError::Unavailable(_))));
        assert_eq!(driver.phase(), Phase::Idle);
    }

    #[test]
    fn tick_clock_failure_reaches_run_caller() {
        let mut driver = driver(vec![3.0, 42.0, 55.0, 3.0], vec![]);
        let mut clock = FailingClock { healthy: 1 };
        let mut sink: Vec<u8> = Vec::new();
        let err = driver
            .run(&mut clock, &mut sink, &ShutdownSignal::new())
            .unwrap_err();
        assert!(matches!(err, EmulatorError::Clock(_)));
        // The frame of that tick was already out when the sleep failed.
        assert_eq!(sink.len(), SINGLE_TARGET_FRAME_LEN);
    }

    #[test]
    fn huge_bearing_encodes_without_panicking() {
        let config = ScenarioConfig {
            bearing_min_deg: 1.0e20,
            bearing_max_deg: 1.0e20,
            ..Default::default()
        };
        let rng = ScriptedRandom::new(vec![3.0, 42.0, 55.0, 1.0e20], vec![]);
        let mut driver = ScenarioDriver::new(config, rng).unwrap();
        let mut clock = ManualClock::new();
        let mut sink: Vec<u8> = Vec::new();
        driver.step(&mut clock, &mut sink).unwrap();
        driver.step(&mut clock, &mut sink).unwrap();
        assert_eq!(sink[8], 128);
    }

    #[test]
    fn cancelled_idle_wait_spawns_nothing() {
        let shutdown = ShutdownSignal::new();
        let mut clock = ManualClock::cancel_after(1, shutdown.clone());
        let mut driver = driver(vec![5.0, 42.0, 55.0, 3.0], vec![]);
        let mut sink: Vec<u8> = Vec::new();

        let summary = driver.run(&mut clock, &mut sink, &shutdown).unwrap();
        assert_eq!(summary.stop, StopReason::Shutdown);
        assert_eq!(driver.phase(), Phase::Idle);
        assert_eq!(summary.metrics.tracks_started, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn run_honours_pre_triggered_shutdown() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();
        let mut driver = driver(vec![], vec![]);
        let mut clock = ManualClock::new();
        let summary = driver.run(&mut clock, &mut Vec::<u8>::new(), &shutdown).unwrap();
        assert_eq!(summary.stop, StopReason::Shutdown);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn ticks_to_pass_matches_closed_form() {
        let config = ScenarioConfig::default();
        let target = TargetState::new(12.0, 36.0, 0.0, true);
        assert_eq!(ticks_to_pass(&target, &config), Some(10));
    }
}
