use anyhow::Context;
use ld2451core::ScenarioConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_PORT: &str = "/tmp/radar_sim";
pub const DEFAULT_BAUD: u32 = 115_200;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmulatorConfig {
    pub port: String,
    pub baud: u32,
    pub seed: Option<u64>,
    pub max_tracks: Option<u64>,
    pub scenario: ScenarioConfig,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud: DEFAULT_BAUD,
            seed: None,
            max_tracks: None,
            scenario: ScenarioConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub seed: Option<u64>,
    pub max_tracks: Option<u64>,
}

impl EmulatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading emulator config {}", path_ref.display()))?;
        let config: EmulatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing emulator config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(baud) = overrides.baud {
            self.baud = baud;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.max_tracks.is_some() {
            self.max_tracks = overrides.max_tracks;
        }
        self
    }
}
