use crate::workflow::config::EmulatorConfig;
use anyhow::Context;
use ld2451core::math::SeededRandom;
use ld2451core::sim::scenario::RunSummary;
use ld2451core::sim::{ShutdownSignal, SystemClock};
use ld2451core::{ByteSink, ScenarioDriver};
use log::info;

#[derive(Clone)]
pub struct Runner {
    config: EmulatorConfig,
}

impl Runner {
    pub fn new(config: EmulatorConfig) -> Self {
        Self { config }
    }

    /// Drives the scenario against `sink` on the wall clock until shutdown
    /// or the configured track limit.
    pub fn execute<S: ByteSink + ?Sized>(
        &self,
        sink: &mut S,
        shutdown: &ShutdownSignal,
    ) -> anyhow::Result<RunSummary> {
        let rng = SeededRandom::new(self.config.seed);
        let mut driver = ScenarioDriver::new(self.config.scenario.clone(), rng)
            .context("validating scenario")?;
        let mut clock = SystemClock::new(shutdown.clone());

        info!(
            "Emulating LD2451 traffic at {} Hz{}",
            (1.0 / self.config.scenario.tick_s).round(),
            self.config
                .seed
                .map(|seed| format!(", seed {}", seed))
                .unwrap_or_default()
        );

        driver
            .run_tracks(&mut clock, sink, shutdown, self.config.max_tracks)
            .context("running scenario")
    }
}
