//! Persisted REPL settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CliError;

const APP_NAME: &str = "skirmish";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overrides the encounter file's scheduler seed
    pub seed: Option<u64>,
    /// Default step for `tick` and `run`
    pub tick_ms: u64,
    /// How long requested movements take to complete
    pub travel_ms: u64,
    /// Encounter tuning loaded at startup
    pub encounter_file: Option<PathBuf>,
    /// Keep melee swings in the log instead of only counting them
    pub log_melee: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: 100,
            travel_ms: 2_000,
            encounter_file: None,
            log_melee: false,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        confy::load(APP_NAME, None).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load settings; using defaults");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), CliError> {
        confy::store(APP_NAME, None, self).map_err(CliError::SaveSettings)
    }
}
