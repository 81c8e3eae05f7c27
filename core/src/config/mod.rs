//! Encounter configuration loading and saving
//!
//! Encounter tuning lives in TOML files shaped like [`EncounterConfig`]. Every
//! section and field is optional, so a file only needs the timings it changes:
//!
//! ```toml
//! [scheduler]
//! purge_policy = "retain"
//! seed = 7
//!
//! [corrupted]
//! yell_below_pct = 20.0
//! cleave = { first = 8000, every = { min_ms = 9000, max_ms = 11000 } }
//! ```
//!
//! Loaded files are validated before they are returned.

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};

use skirmish_types::{DelayRange, EncounterConfig, Recurring};
use tracing::{debug, warn};

/// An encounter file found by [`load_encounter_dir`]
#[derive(Debug, Clone)]
pub struct LoadedEncounter {
    /// File stem, used as the encounter's name
    pub name: String,
    pub path: PathBuf,
    pub config: EncounterConfig,
}

/// Load and validate a single encounter file.
pub fn load_encounter_config(path: &Path) -> Result<EncounterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let config: EncounterConfig =
        toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;

    validate(&config, path)?;
    debug!(path = %path.display(), "loaded encounter config");
    Ok(config)
}

/// Load every `*.toml` encounter under `dir` (recursive), sorted by path.
/// A missing directory yields an empty list.
pub fn load_encounter_dir(dir: &Path) -> Result<Vec<LoadedEncounter>, ConfigError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut loaded = Vec::new();
    load_recursive(dir, &mut loaded)?;
    loaded.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(loaded)
}

fn load_recursive(dir: &Path, loaded: &mut Vec<LoadedEncounter>) -> Result<(), ConfigError> {
    let entries = fs::read_dir(dir).map_err(|source| ConfigError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            load_recursive(&path, loaded)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            let config = load_encounter_config(&path)?;
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            loaded.push(LoadedEncounter { name, path, config });
        } else {
            debug!(path = %path.display(), "skipping non-toml file");
        }
    }

    Ok(())
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save_encounter_config(config: &EncounterConfig, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

// ─── Validation ─────────────────────────────────────────────────────────────

/// Reject inverted delay ranges and out-of-range percentages. `path` only
/// labels the error.
pub fn validate(config: &EncounterConfig, path: &Path) -> Result<(), ConfigError> {
    for (field, delay) in named_delays(config) {
        if !delay.is_valid() {
            return Err(ConfigError::InvalidDelay {
                path: path.to_path_buf(),
                field,
            });
        }
    }

    let corrupted = &config.corrupted;
    let invalid = |field: &'static str, reason: String| ConfigError::InvalidValue {
        path: path.to_path_buf(),
        field,
        reason,
    };

    if !(corrupted.engage_health_pct > 0.0 && corrupted.engage_health_pct <= 100.0) {
        return Err(invalid(
            "corrupted.engage_health_pct",
            format!("{} is not in (0, 100]", corrupted.engage_health_pct),
        ));
    }
    if !(0.0..=100.0).contains(&corrupted.yell_below_pct) {
        return Err(invalid(
            "corrupted.yell_below_pct",
            format!("{} is not in [0, 100]", corrupted.yell_below_pct),
        ));
    }
    if corrupted.kill_taunt_one_in == 0 {
        return Err(invalid(
            "corrupted.kill_taunt_one_in",
            "must be at least 1".to_string(),
        ));
    }
    if corrupted.yell_below_pct >= corrupted.engage_health_pct {
        warn!(
            path = %path.display(),
            yell = corrupted.yell_below_pct,
            engage = corrupted.engage_health_pct,
            "low health yell threshold is not below the engage health"
        );
    }

    Ok(())
}

/// Every delay in the config, labelled with its dotted field path
fn named_delays(config: &EncounterConfig) -> Vec<(String, DelayRange)> {
    let mut out = Vec::new();
    let mut one = |name: &str, delay: DelayRange| out.push((name.to_string(), delay));

    let p = &config.plunderer;
    one("plunderer.smash_cast", p.smash_cast);
    one("plunderer.summon_banshee", p.summon_banshee);
    one("plunderer.just_transformed", p.just_transformed);
    one("plunderer.dark_smash_cast", p.dark_smash_cast);
    one("plunderer.shadow_axe_lifetime", p.shadow_axe_lifetime);

    one("caller.resurrect_heal", config.caller.resurrect_heal);
    one("caller.resurrect_finish", config.caller.resurrect_finish);

    for (i, delay) in config.corrupted.speech.iter().enumerate() {
        out.push((format!("corrupted.speech[{i}]"), *delay));
    }

    let c = &config.corrupted;
    let recurring: [(&str, &Recurring); 14] = [
        ("plunderer.cleave", &p.cleave),
        ("plunderer.staggering_roar", &p.staggering_roar),
        ("plunderer.enrage", &p.enrage),
        ("plunderer.smash", &p.smash),
        ("plunderer.dark_smash", &p.dark_smash),
        ("plunderer.dreadful_roar", &p.dreadful_roar),
        ("plunderer.woe_strike", &p.woe_strike),
        ("plunderer.shadow_axe", &p.shadow_axe),
        ("corrupted.cleave", &c.cleave),
        ("corrupted.flame_breath", &c.flame_breath),
        ("corrupted.fire_nova", &c.fire_nova),
        ("corrupted.tail_swipe", &c.tail_swipe),
        ("corrupted.adrenaline_caster", &c.adrenaline_caster),
        ("corrupted.adrenaline_tank", &c.adrenaline_tank),
    ];
    for (name, timer) in recurring {
        out.push((format!("{name}.first"), timer.first));
        out.push((format!("{name}.every"), timer.every));
    }

    out
}
