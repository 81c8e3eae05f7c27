use std::time::Duration;

use skirmish_core::config::load_encounter_config;
use skirmish_core::{Arena, EntityId, scripts};
use skirmish_types::EncounterConfig;
use tracing::{info, warn};

use crate::error::CliError;
use crate::settings::Settings;

/// Holds all state for one REPL session.
pub struct CliContext {
    pub settings: Settings,
    /// Encounter tuning with the settings' seed override applied
    pub config: EncounterConfig,
    pub arena: Arena,
}

impl CliContext {
    /// Build a session from persisted settings. An unreadable encounter file
    /// falls back to default tuning.
    pub fn new(settings: Settings) -> Self {
        let config = match &settings.encounter_file {
            Some(path) => load_encounter_config(path).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "using default encounter tuning");
                EncounterConfig::default()
            }),
            None => EncounterConfig::default(),
        };
        let mut ctx = Self {
            arena: Arena::new(),
            config,
            settings,
        };
        ctx.apply_seed();
        ctx.rebuild();
        ctx
    }

    pub fn step(&self) -> Duration {
        Duration::from_millis(self.settings.tick_ms.max(1))
    }

    /// Replace the arena with an empty one built from the current settings.
    pub fn rebuild(&mut self) {
        let mut arena = Arena::with_travel_time(Duration::from_millis(self.settings.travel_ms));
        arena.set_melee_logging(self.settings.log_melee);
        scripts::install_summons(&mut arena, &self.config);
        self.arena = arena;
        info!("arena rebuilt");
    }

    /// Load encounter tuning from `path` and remember it for later sessions.
    pub fn load_encounter(&mut self, path: std::path::PathBuf) -> Result<(), CliError> {
        self.config = load_encounter_config(&path)?;
        self.settings.encounter_file = Some(path);
        self.apply_seed();
        self.rebuild();
        self.settings.save()
    }

    /// Override the scheduler seed. `None` returns to OS-seeded jitter.
    pub fn set_seed(&mut self, seed: Option<u64>) -> Result<(), CliError> {
        self.settings.seed = seed;
        self.config.scheduler.seed = seed;
        self.rebuild();
        self.settings.save()
    }

    fn apply_seed(&mut self) {
        if let Some(seed) = self.settings.seed {
            self.config.scheduler.seed = Some(seed);
        }
    }

    pub fn require_actor(&self, id: u64) -> Result<EntityId, CliError> {
        let id = EntityId(id);
        if self.arena.contains(id) {
            Ok(id)
        } else {
            Err(CliError::NoActor(id))
        }
    }

    pub fn require_subject(&self, id: u64) -> Result<EntityId, CliError> {
        let id = EntityId(id);
        if self.arena.is_subject(id) || self.arena.contains(id) {
            Ok(id)
        } else {
            Err(CliError::NoSubject(id))
        }
    }
}
