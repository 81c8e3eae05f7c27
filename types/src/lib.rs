//! Shared configuration types for skirmish
//!
//! This crate contains serializable configuration types that are shared between
//! the simulation core (skirmish-core) and the command-line harness (skirmish-cli).
//! Every default matches the timings the encounter scripts were tuned with.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Delays
// ─────────────────────────────────────────────────────────────────────────────

/// Delay before a scheduled action fires.
///
/// Deserializes from either a bare millisecond count (`1500`) or an inclusive
/// range table (`{ min_ms = 6000, max_ms = 12000 }`). Ranged delays are drawn
/// uniformly at schedule time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DelayRange {
    /// Fixed delay in milliseconds
    Fixed(u64),
    /// Inclusive `[min_ms, max_ms]` range
    Range { min_ms: u64, max_ms: u64 },
}

impl DelayRange {
    pub const ZERO: Self = Self::Fixed(0);

    pub const fn millis(ms: u64) -> Self {
        Self::Fixed(ms)
    }

    pub const fn secs(secs: u64) -> Self {
        Self::Fixed(secs * 1000)
    }

    pub const fn millis_between(min_ms: u64, max_ms: u64) -> Self {
        Self::Range { min_ms, max_ms }
    }

    pub const fn secs_between(min: u64, max: u64) -> Self {
        Self::Range {
            min_ms: min * 1000,
            max_ms: max * 1000,
        }
    }

    pub fn fixed(delay: Duration) -> Self {
        Self::Fixed(delay.as_millis() as u64)
    }

    pub fn between(min: Duration, max: Duration) -> Self {
        Self::Range {
            min_ms: min.as_millis() as u64,
            max_ms: max.as_millis() as u64,
        }
    }

    /// Lower bound (equal to the upper bound for fixed delays)
    pub fn min(&self) -> Duration {
        match *self {
            Self::Fixed(ms) => Duration::from_millis(ms),
            Self::Range { min_ms, .. } => Duration::from_millis(min_ms),
        }
    }

    /// Upper bound (equal to the lower bound for fixed delays)
    pub fn max(&self) -> Duration {
        match *self {
            Self::Fixed(ms) => Duration::from_millis(ms),
            Self::Range { max_ms, .. } => Duration::from_millis(max_ms),
        }
    }

    /// Returns true if the range could produce more than one value
    pub fn is_jittered(&self) -> bool {
        self.min() != self.max()
    }

    /// Returns false for inverted ranges (`min_ms > max_ms`)
    pub fn is_valid(&self) -> bool {
        self.min() <= self.max()
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Duration> for DelayRange {
    fn from(delay: Duration) -> Self {
        Self::fixed(delay)
    }
}

/// Delay pair for self-rescheduling abilities.
///
/// `first` is used when the ability is scheduled on phase entry, `every` when
/// the handler re-arms itself after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurring {
    pub first: DelayRange,
    pub every: DelayRange,
}

impl Recurring {
    pub const fn new(first: DelayRange, every: DelayRange) -> Self {
        Self { first, every }
    }

    /// Same delay for the first occurrence and every repeat
    pub const fn uniform(delay: DelayRange) -> Self {
        Self {
            first: delay,
            every: delay,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.first.is_valid() && self.every.is_valid()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// What happens to phase-scoped entries when the active phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgePolicy {
    /// Drop every entry whose mask excludes the new phase
    #[default]
    PurgeExcluded,
    /// Keep excluded entries dormant; they fire again if their phase returns
    Retain,
    /// Keep excluded entries, but discard them once they come due while excluded
    DropWhenDue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub purge_policy: PurgePolicy,

    /// Seed for delay jitter. `None` seeds from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Script Tuning
// ─────────────────────────────────────────────────────────────────────────────

/// Timings for the two-form plunderer boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlundererTuning {
    // ─── First form ─────────────────────────────────────────────────────────
    pub cleave: Recurring,
    pub staggering_roar: Recurring,
    pub enrage: Recurring,
    pub smash: Recurring,
    pub smash_cast: DelayRange,

    // ─── Transition ─────────────────────────────────────────────────────────
    /// Delay between the scripted defeat and the banshee summon
    pub summon_banshee: DelayRange,
    /// Delay between the transform cast and re-entering combat
    pub just_transformed: DelayRange,

    // ─── Second form ────────────────────────────────────────────────────────
    pub dark_smash: Recurring,
    pub dark_smash_cast: DelayRange,
    pub dreadful_roar: Recurring,
    pub woe_strike: Recurring,
    pub shadow_axe: Recurring,
    /// How long a thrown axe lingers after landing
    pub shadow_axe_lifetime: DelayRange,
}

impl Default for PlundererTuning {
    fn default() -> Self {
        Self {
            cleave: Recurring::uniform(DelayRange::secs_between(6, 12)),
            staggering_roar: Recurring::new(
                DelayRange::secs_between(18, 21),
                DelayRange::secs_between(18, 22),
            ),
            enrage: Recurring::uniform(DelayRange::secs_between(7, 14)),
            smash: Recurring::new(
                DelayRange::secs_between(12, 17),
                DelayRange::secs_between(12, 16),
            ),
            smash_cast: DelayRange::secs(3),
            summon_banshee: DelayRange::secs(3),
            just_transformed: DelayRange::millis(500),
            dark_smash: Recurring::new(
                DelayRange::secs_between(14, 18),
                DelayRange::secs_between(12, 16),
            ),
            dark_smash_cast: DelayRange::secs(3),
            dreadful_roar: Recurring::new(DelayRange::ZERO, DelayRange::secs_between(18, 22)),
            woe_strike: Recurring::uniform(DelayRange::secs_between(10, 14)),
            shadow_axe: Recurring::uniform(DelayRange::secs(30)),
            shadow_axe_lifetime: DelayRange::secs(10),
        }
    }
}

/// Timings for the resurrection partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallerTuning {
    /// From arriving over the fallen boss to stripping the feign death
    pub resurrect_heal: DelayRange,
    /// From the heal to starting the second form
    pub resurrect_finish: DelayRange,
}

impl Default for CallerTuning {
    fn default() -> Self {
        Self {
            resurrect_heal: DelayRange::secs(8),
            resurrect_finish: DelayRange::secs(3),
        }
    }
}

/// Timings for the corrupted dragon and its pre-fight speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptedTuning {
    /// Delays before each of the four speech steps
    pub speech: [DelayRange; 4],
    /// Health the dragon is set to on engagement (percent of max)
    pub engage_health_pct: f32,
    /// Health below which the dragon yells once (percent of max)
    pub yell_below_pct: f32,
    /// One kill taunt in this many kills
    pub kill_taunt_one_in: u32,

    pub cleave: Recurring,
    pub flame_breath: Recurring,
    pub fire_nova: Recurring,
    pub tail_swipe: Recurring,
    pub adrenaline_caster: Recurring,
    pub adrenaline_tank: Recurring,
}

impl Default for CorruptedTuning {
    fn default() -> Self {
        Self {
            speech: [
                DelayRange::secs(1),
                DelayRange::secs(12),
                DelayRange::secs(12),
                DelayRange::secs(16),
            ],
            engage_health_pct: 30.0,
            yell_below_pct: 15.0,
            kill_taunt_one_in: 5,
            cleave: Recurring::new(DelayRange::secs(10), DelayRange::secs(15)),
            flame_breath: Recurring::new(DelayRange::secs(15), DelayRange::secs_between(8, 14)),
            fire_nova: Recurring::new(DelayRange::secs(20), DelayRange::secs(15)),
            tail_swipe: Recurring::new(DelayRange::secs(11), DelayRange::secs(15)),
            adrenaline_caster: Recurring::uniform(DelayRange::secs(15)),
            adrenaline_tank: Recurring::uniform(DelayRange::secs(45)),
        }
    }
}

/// Top-level encounter tuning file.
///
/// Every section is optional; omitted sections keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    pub scheduler: SchedulerConfig,
    pub plunderer: PlundererTuning,
    pub caller: CallerTuning,
    pub corrupted: CorruptedTuning,
}
