//! Script trait
//!
//! A script supplies the encounter-specific parts of an actor: which actions
//! exist, what they do, and which hooks react to engagement, damage, death and
//! choreography commands. The [`ActorMachine`](super::ActorMachine) owns the
//! tick algorithm and calls into the script.

use std::fmt;

use super::state::ActorState;
use super::triggers::{DefeatOverride, HealthTrigger, TriggerId};
use crate::choreo::Ctx;
use crate::ids::{EntityId, PointId};
use crate::scheduler::PhaseSet;

/// State handed to every script callback
pub type StateOf<S> = ActorState<<S as ActorScript>::Action, <S as ActorScript>::Phase>;

/// Result of a combat action handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep draining due actions
    Continue,
    /// End this tick now: no further actions, triggers or melee
    Yield,
}

pub trait ActorScript: Sized {
    type Action: Copy + Eq + fmt::Debug;
    type Phase: PhaseSet;

    /// Display name for logs and status output
    fn name(&self) -> &'static str;

    /// Phases in which the actor ticks without being engaged and never melees.
    fn scripted_phases(&self) -> Self::Phase {
        Self::Phase::empty()
    }

    /// Phase set on first engagement. Engagement is ignored while any other
    /// non-empty phase is active.
    fn initial_phase(&self) -> Self::Phase {
        Self::Phase::empty()
    }

    fn health_triggers(&self) -> &[HealthTrigger] {
        &[]
    }

    fn defeat_override(&self) -> Option<DefeatOverride<Self::Phase>> {
        None
    }

    /// Whether the actor ever fights. Non-combat actors ignore engagement.
    fn can_engage(&self) -> bool {
        true
    }

    fn on_reset(&mut self, _actor: &mut StateOf<Self>, _ctx: &mut Ctx<'_>) {}

    fn on_engage(&mut self, actor: &mut StateOf<Self>, subject: EntityId, ctx: &mut Ctx<'_>);

    /// Dispatch one due action while engaged or in a scripted phase.
    fn on_action(
        &mut self,
        action: Self::Action,
        actor: &mut StateOf<Self>,
        ctx: &mut Ctx<'_>,
    ) -> Flow;

    /// Dispatch one due action of the pre-engagement sequence.
    fn on_sequence_action(
        &mut self,
        _action: Self::Action,
        _actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) {
    }

    /// Returns true to start the pre-engagement sequence.
    fn on_interact(
        &mut self,
        _subject: EntityId,
        _option: u32,
        _actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) -> bool {
        false
    }

    fn on_health_trigger(
        &mut self,
        _trigger: TriggerId,
        _actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) {
    }

    /// Called once the defeat phase has been entered.
    fn on_scripted_defeat(&mut self, _actor: &mut StateOf<Self>, _ctx: &mut Ctx<'_>) {}

    fn on_death(&mut self, _actor: &mut StateOf<Self>, _ctx: &mut Ctx<'_>) {}

    fn on_killed_unit(
        &mut self,
        _victim: EntityId,
        _is_player: bool,
        _actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) {
    }

    fn on_movement_arrived(
        &mut self,
        _point: PointId,
        _actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) {
    }

    /// Script-level command sent by a partner actor.
    fn on_command(&mut self, _command: u32, _actor: &mut StateOf<Self>, _ctx: &mut Ctx<'_>) {}

    /// Default combat behavior when no action interrupted the tick.
    fn idle(&mut self, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        if let Some(victim) = actor.victim() {
            ctx.hooks.melee(actor.id(), victim);
        }
    }
}

