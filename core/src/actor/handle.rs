use std::time::Duration;

use super::state::Lifecycle;
use crate::choreo::Ctx;
use crate::ids::{EffectId, EntityId, PointId};

/// Command one actor sends to another during a choreographed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorCommand {
    /// Strip an effect from the receiver
    RemoveEffect(EffectId),
    /// Receiver casts an effect on itself
    SelfCast(EffectId),
    /// Receiver returns to full health
    RestoreHealth,
    /// Script-level command, interpreted by the receiver's script
    Action(u32),
}

/// Snapshot for status displays
#[derive(Debug, Clone, PartialEq)]
pub struct ActorStatus {
    pub id: EntityId,
    pub name: &'static str,
    pub lifecycle: Lifecycle,
    pub phase: String,
    pub health_pct: f32,
    pub suspended: bool,
    pub interactable: bool,
    pub target: Option<EntityId>,
    /// Pending actions in firing order with their remaining time
    pub pending: Vec<(String, Duration)>,
}

/// Object-safe view of a scripted actor, used by hosts and partners that
/// don't know the concrete script type.
pub trait ActorHandle {
    fn id(&self) -> EntityId;

    fn status(&self) -> ActorStatus;

    fn is_despawned(&self) -> bool;

    fn tick(&mut self, elapsed: Duration, ctx: &mut Ctx<'_>);

    /// Returns false when the engagement was ignored.
    fn engage(&mut self, subject: EntityId, ctx: &mut Ctx<'_>) -> bool;

    /// Returns true when the interaction started a sequence.
    fn interact(&mut self, subject: EntityId, option: u32, ctx: &mut Ctx<'_>) -> bool;

    /// Returns the damage actually applied.
    fn apply_damage(&mut self, amount: u64, ctx: &mut Ctx<'_>) -> u64;

    fn health_changed(&mut self, fraction: f32, ctx: &mut Ctx<'_>);

    fn die(&mut self, ctx: &mut Ctx<'_>);

    fn killed_unit(&mut self, victim: EntityId, is_player: bool, ctx: &mut Ctx<'_>);

    fn movement_arrived(&mut self, point: PointId, ctx: &mut Ctx<'_>);

    /// The engine finished or interrupted the current cast.
    fn cast_finished(&mut self);

    fn receive(&mut self, command: ActorCommand, ctx: &mut Ctx<'_>);

    fn reset(&mut self, ctx: &mut Ctx<'_>);
}
