//! Bundled encounter scripts
//!
//! - [`plunderer`]: two-form boss with a scripted defeat and transformation
//! - [`caller`]: the plunderer's resurrection partner, summoned on demand
//! - [`shadow_axe`]: the axe the undead plunderer throws
//! - [`corrupted`]: dragon with an interaction speech and a low-health yell

pub mod caller;
pub mod corrupted;
pub mod plunderer;
pub mod shadow_axe;

#[cfg(test)]
mod encounter_tests;

pub use caller::Caller;
pub use corrupted::Corrupted;
pub use plunderer::Plunderer;
pub use shadow_axe::ShadowAxe;

use skirmish_types::{EncounterConfig, SchedulerConfig};

use crate::actor::{ActorHandle, ActorMachine};
use crate::arena::Arena;
use crate::ids::EntityId;

pub const DEFAULT_MAX_HEALTH: u64 = 100_000;

/// Scripts a host can spawn directly. The caller and the axe only appear via
/// summon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Plunderer,
    Corrupted,
}

impl ScriptKind {
    pub const ALL: [ScriptKind; 2] = [ScriptKind::Plunderer, ScriptKind::Corrupted];

    pub fn name(self) -> &'static str {
        match self {
            ScriptKind::Plunderer => "plunderer",
            ScriptKind::Corrupted => "corrupted",
        }
    }

    pub fn build(self, id: EntityId, config: &EncounterConfig) -> Box<dyn ActorHandle> {
        let scheduler = scheduler_for(&config.scheduler, id);
        match self {
            ScriptKind::Plunderer => Box::new(ActorMachine::new(
                id,
                DEFAULT_MAX_HEALTH,
                Plunderer::new(config.plunderer.clone()),
                &scheduler,
            )),
            ScriptKind::Corrupted => Box::new(ActorMachine::new(
                id,
                DEFAULT_MAX_HEALTH,
                Corrupted::new(config.corrupted.clone()),
                &scheduler,
            )),
        }
    }
}

/// Per-actor scheduler settings. A configured seed is offset by the entity id
/// so actors in one encounter draw independent but replayable streams.
fn scheduler_for(base: &SchedulerConfig, id: EntityId) -> SchedulerConfig {
    SchedulerConfig {
        purge_policy: base.purge_policy,
        seed: base.seed.map(|seed| seed.wrapping_add(id.0)),
    }
}

/// Spawn a bundled script into `arena`.
pub fn spawn(arena: &mut Arena, kind: ScriptKind, config: &EncounterConfig) -> EntityId {
    let id = arena.allocate_id();
    arena.spawn(kind.build(id, config))
}

/// Register the summon rules the bundled scripts rely on.
pub fn install_summons(arena: &mut Arena, config: &EncounterConfig) {
    let tuning = config.caller.clone();
    let scheduler = config.scheduler.clone();
    arena.on_effect(
        plunderer::effects::SUMMON_BANSHEE,
        Box::new(move |id, summoner| {
            let actor: Box<dyn ActorHandle> = Box::new(ActorMachine::new(
                id,
                DEFAULT_MAX_HEALTH,
                Caller::new(tuning.clone(), summoner),
                &scheduler_for(&scheduler, id),
            ));
            actor
        }),
    );

    let lifetime = config.plunderer.shadow_axe_lifetime;
    let scheduler = config.scheduler.clone();
    arena.on_effect(
        plunderer::effects::SHADOW_AXE_SUMMON,
        Box::new(move |id, _thrower| {
            let actor: Box<dyn ActorHandle> = Box::new(ActorMachine::new(
                id,
                DEFAULT_MAX_HEALTH,
                ShadowAxe::new(Some(shadow_axe::THROW_TARGET), lifetime),
                &scheduler_for(&scheduler, id),
            ));
            actor
        }),
    );
}
