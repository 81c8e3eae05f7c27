//! Engine-facing collaborator hooks
//!
//! Everything an actor does to the outside world goes through [`EngineHooks`]:
//! casting effects, narration, aura removal, movement and melee. Calls are
//! synchronous and fire-and-forget; the scheduler never consumes a result.
//! Within one dispatch, hook calls reach the engine in exactly the order the
//! script made them.

use crate::ids::{EffectId, EntityId, LineId, PointId};

/// Who an effect is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The acting entity itself
    Itself,
    /// The acting entity's current victim
    Victim,
    /// Everything around the acting entity
    Area,
    /// A random hostile other than the current victim, chosen by the engine
    RandomOther,
    /// A specific entity
    Entity(EntityId),
}

/// Services the core consumes from the host engine.
pub trait EngineHooks {
    /// Run an opaque effect (spell, emote, flag change) originating from `source`.
    fn perform_effect(&mut self, source: EntityId, effect: EffectId, target: Option<Target>);

    /// Say a narration line, optionally addressed to `subject`.
    fn announce(&mut self, source: EntityId, line: LineId, subject: Option<EntityId>);

    /// Strip a lingering effect from `holder`.
    fn remove_effect(&mut self, holder: EntityId, effect: EffectId);

    /// Ask the motion layer to move `source` to `point`. Arrival is reported
    /// back through `ActorHandle::movement_arrived`.
    fn request_movement(&mut self, _source: EntityId, _point: PointId) {}

    /// Auto-attack the victim if the swing timer allows it.
    fn melee(&mut self, _source: EntityId, _victim: EntityId) {}
}

/// Hooks that discard everything. Useful for hosts that only care about state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl EngineHooks for NoopHooks {
    fn perform_effect(&mut self, _source: EntityId, _effect: EffectId, _target: Option<Target>) {}
    fn announce(&mut self, _source: EntityId, _line: LineId, _subject: Option<EntityId>) {}
    fn remove_effect(&mut self, _holder: EntityId, _effect: EffectId) {}
}
