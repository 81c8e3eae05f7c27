//! Actor state machine
//!
//! Owns the per-tick algorithm shared by every scripted actor:
//!
//! 1. Dead or despawned actors do nothing
//! 2. A running pre-engagement sequence advances and dispatches on its own
//! 3. Otherwise an actor that is neither engaged nor in a scripted phase stays
//!    frozen (its queue does not advance)
//! 4. Time advances; a suspended actor stops here
//! 5. Due actions drain one at a time, re-checking suspension, death and
//!    yield after every dispatch
//! 6. Health one-shots are evaluated, then idle melee runs when nothing
//!    interrupted the tick

use std::time::Duration;

use skirmish_types::SchedulerConfig;
use tracing::{debug, info, trace};

use super::handle::{ActorCommand, ActorHandle, ActorStatus};
use super::script::{ActorScript, Flow, StateOf};
use super::state::{ActorState, Lifecycle};
use super::triggers::consume_crossed;
use crate::choreo::Ctx;
use crate::hooks::Target;
use crate::ids::{EntityId, PointId};
use crate::scheduler::{EventQueue, PhaseSet};

pub struct ActorMachine<S: ActorScript> {
    state: StateOf<S>,
    script: S,
}

impl<S: ActorScript> ActorMachine<S> {
    pub fn new(id: EntityId, max_health: u64, script: S, config: &SchedulerConfig) -> Self {
        Self::with_queue(id, max_health, script, EventQueue::from_config(config))
    }

    pub fn with_queue(
        id: EntityId,
        max_health: u64,
        script: S,
        queue: EventQueue<S::Action, S::Phase>,
    ) -> Self {
        Self {
            state: ActorState::new(id, max_health, queue),
            script,
        }
    }

    pub fn state(&self) -> &StateOf<S> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateOf<S> {
        &mut self.state
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    fn in_scripted_phase(&self) -> bool {
        self.state.is_in_phase(self.script.scripted_phases())
    }

    // ─── Tick ───────────────────────────────────────────────────────────────

    pub fn on_tick(&mut self, elapsed: Duration, ctx: &mut Ctx<'_>) {
        match self.state.lifecycle() {
            Lifecycle::Dead | Lifecycle::Despawned => return,
            Lifecycle::Sequence => {
                self.run_sequence(elapsed, ctx);
                return;
            }
            Lifecycle::Idle | Lifecycle::Engaged => {}
        }

        if !self.state.is_engaged() && !self.in_scripted_phase() {
            return;
        }

        self.state.advance(elapsed);
        if self.state.is_suspended() {
            return;
        }

        if self.drain(ctx) == Flow::Yield || self.state.is_gone() {
            return;
        }

        self.check_health_triggers(ctx);

        if self.state.is_engaged()
            && !self.state.is_suspended()
            && !self.state.is_gone()
            && !self.in_scripted_phase()
        {
            self.script.idle(&mut self.state, ctx);
        }
    }

    fn drain(&mut self, ctx: &mut Ctx<'_>) -> Flow {
        let mut flow = Flow::Continue;
        self.state.queue_mut().begin_pass();
        while let Some(action) = self.state.queue_mut().pop_due() {
            trace!(actor = %self.state.id(), ?action, "dispatching");
            flow = self.script.on_action(action, &mut self.state, ctx);
            if flow == Flow::Yield || self.state.is_suspended() || self.state.is_gone() {
                break;
            }
        }
        self.state.queue_mut().end_pass();
        flow
    }

    fn run_sequence(&mut self, elapsed: Duration, ctx: &mut Ctx<'_>) {
        self.state.advance(elapsed);
        self.state.queue_mut().begin_pass();
        let mut engage = None;
        while let Some(action) = self.state.queue_mut().pop_due() {
            trace!(actor = %self.state.id(), ?action, "sequence step");
            self.script.on_sequence_action(action, &mut self.state, ctx);
            engage = self.state.take_pending_engage();
            if engage.is_some() || self.state.lifecycle() != Lifecycle::Sequence {
                break;
            }
        }
        self.state.queue_mut().end_pass();

        let Some(subject) = engage else { return };
        if ctx.directory.contains(subject) {
            if !self.on_engage(subject, ctx) {
                debug!(actor = %self.state.id(), %subject, "sequence engagement refused");
                self.state.end_sequence();
            }
        } else {
            debug!(actor = %self.state.id(), %subject, "sequence subject gone; not engaging");
            self.state.end_sequence();
        }
    }

    fn check_health_triggers(&mut self, ctx: &mut Ctx<'_>) {
        let pct = self.state.health().pct();
        let crossed = consume_crossed(
            self.script.health_triggers(),
            pct,
            self.state.one_shots_mut(),
        );
        for trigger in crossed {
            info!(actor = %self.state.id(), trigger, pct, "health trigger");
            self.script.on_health_trigger(trigger, &mut self.state, ctx);
        }
    }

    // ─── Engine events ──────────────────────────────────────────────────────

    /// First genuine engagement sets the initial phase and runs the script's
    /// engage hook. Repeated calls are ignored.
    pub fn on_engage(&mut self, subject: EntityId, ctx: &mut Ctx<'_>) -> bool {
        let initial = self.script.initial_phase();
        let phase = self.state.phase();
        let foreign_phase = !phase.is_empty() && !phase.intersects(&initial);

        if !self.script.can_engage()
            || self.state.is_engaged()
            || self.state.is_gone()
            || foreign_phase
        {
            trace!(actor = %self.state.id(), %subject, "engagement ignored");
            return false;
        }

        info!(actor = %self.state.id(), name = self.script.name(), %subject, "engaged");
        self.state.engage(subject);
        if !initial.is_empty() {
            self.state.set_phase(initial);
        }
        self.script.on_engage(&mut self.state, subject, ctx);
        true
    }

    pub fn on_interact(&mut self, subject: EntityId, option: u32, ctx: &mut Ctx<'_>) -> bool {
        if !self.state.is_interactable() || self.state.lifecycle() != Lifecycle::Idle {
            trace!(actor = %self.state.id(), %subject, option, "interaction ignored");
            return false;
        }
        if !self.script.on_interact(subject, option, &mut self.state, ctx) {
            return false;
        }

        info!(actor = %self.state.id(), %subject, option, "sequence started");
        self.state.set_interactable(false);
        self.state.set_target(Some(subject));
        self.state.begin_sequence();
        true
    }

    /// Apply incoming damage through the defeat override. Returns the damage
    /// actually taken.
    pub fn apply_damage(&mut self, amount: u64, ctx: &mut Ctx<'_>) -> u64 {
        if self.state.is_gone() {
            return 0;
        }

        let lethal = amount >= self.state.health().current;
        let amount = if amount > 0 && self.defeat_blocks_loss(lethal, ctx) {
            0
        } else {
            amount
        };

        let applied = self.state.take_damage(amount);
        if self.state.health().is_zero() {
            self.on_death(ctx);
        } else if applied > 0 {
            self.check_health_triggers(ctx);
        }
        applied
    }

    /// Engine-reported health change (heals, percentage damage). Drops go
    /// through the defeat override like [`apply_damage`](Self::apply_damage).
    pub fn on_health_changed(&mut self, fraction: f32, ctx: &mut Ctx<'_>) {
        if self.state.is_gone() {
            return;
        }

        let target = self.state.health().at_fraction(fraction);
        if target < self.state.health().current && self.defeat_blocks_loss(target == 0, ctx) {
            return;
        }

        self.state.set_health_fraction(fraction);
        if self.state.health().is_zero() {
            self.on_death(ctx);
        } else {
            self.check_health_triggers(ctx);
        }
    }

    /// Run the defeat override for an incoming health loss. A lethal loss in
    /// the guard phase becomes the scripted defeat. Returns true when the loss
    /// must be ignored because the actor is in the defeat phase.
    fn defeat_blocks_loss(&mut self, lethal: bool, ctx: &mut Ctx<'_>) -> bool {
        let Some(over) = self.script.defeat_override() else {
            return false;
        };
        if lethal && self.state.is_in_phase(over.guard) {
            info!(actor = %self.state.id(), "lethal damage intercepted; scripted defeat");
            self.state.set_phase(over.defeat);
            self.script.on_scripted_defeat(&mut self.state, ctx);
        }
        self.state.is_in_phase(over.defeat)
    }

    pub fn on_death(&mut self, ctx: &mut Ctx<'_>) {
        if self.state.is_gone() {
            return;
        }
        info!(actor = %self.state.id(), name = self.script.name(), "died");
        self.state.die();
        self.script.on_death(&mut self.state, ctx);
    }

    pub fn on_killed_unit(&mut self, victim: EntityId, is_player: bool, ctx: &mut Ctx<'_>) {
        if self.state.is_gone() {
            return;
        }
        self.script
            .on_killed_unit(victim, is_player, &mut self.state, ctx);
    }

    pub fn on_movement_arrived(&mut self, point: PointId, ctx: &mut Ctx<'_>) {
        if self.state.is_gone() {
            return;
        }
        debug!(actor = %self.state.id(), ?point, "arrived");
        self.script.on_movement_arrived(point, &mut self.state, ctx);
    }

    pub fn on_command(&mut self, command: ActorCommand, ctx: &mut Ctx<'_>) {
        if self.state.is_gone() {
            debug!(actor = %self.state.id(), ?command, "command to inactive actor dropped");
            return;
        }
        debug!(actor = %self.state.id(), ?command, "command received");
        let id = self.state.id();
        match command {
            ActorCommand::RemoveEffect(effect) => ctx.hooks.remove_effect(id, effect),
            ActorCommand::SelfCast(effect) => {
                ctx.hooks.perform_effect(id, effect, Some(Target::Itself))
            }
            ActorCommand::RestoreHealth => self.state.restore_health(),
            ActorCommand::Action(action) => self.script.on_command(action, &mut self.state, ctx),
        }
    }

    pub fn reset(&mut self, ctx: &mut Ctx<'_>) {
        debug!(actor = %self.state.id(), name = self.script.name(), "reset");
        self.state.reset();
        self.script.on_reset(&mut self.state, ctx);
    }

    pub fn status(&self) -> ActorStatus {
        ActorStatus {
            id: self.state.id(),
            name: self.script.name(),
            lifecycle: self.state.lifecycle(),
            phase: format!("{:?}", self.state.phase()),
            health_pct: self.state.health().pct(),
            suspended: self.state.is_suspended(),
            interactable: self.state.is_interactable(),
            target: self.state.target(),
            pending: self
                .state
                .queue()
                .iter()
                .map(|pending| (format!("{:?}", pending.action), pending.remaining))
                .collect(),
        }
    }
}

impl<S: ActorScript> ActorHandle for ActorMachine<S> {
    fn id(&self) -> EntityId {
        self.state.id()
    }

    fn status(&self) -> ActorStatus {
        ActorMachine::status(self)
    }

    fn is_despawned(&self) -> bool {
        self.state.lifecycle() == Lifecycle::Despawned
    }

    fn tick(&mut self, elapsed: Duration, ctx: &mut Ctx<'_>) {
        self.on_tick(elapsed, ctx);
    }

    fn engage(&mut self, subject: EntityId, ctx: &mut Ctx<'_>) -> bool {
        self.on_engage(subject, ctx)
    }

    fn interact(&mut self, subject: EntityId, option: u32, ctx: &mut Ctx<'_>) -> bool {
        self.on_interact(subject, option, ctx)
    }

    fn apply_damage(&mut self, amount: u64, ctx: &mut Ctx<'_>) -> u64 {
        ActorMachine::apply_damage(self, amount, ctx)
    }

    fn health_changed(&mut self, fraction: f32, ctx: &mut Ctx<'_>) {
        self.on_health_changed(fraction, ctx);
    }

    fn die(&mut self, ctx: &mut Ctx<'_>) {
        self.on_death(ctx);
    }

    fn killed_unit(&mut self, victim: EntityId, is_player: bool, ctx: &mut Ctx<'_>) {
        self.on_killed_unit(victim, is_player, ctx);
    }

    fn movement_arrived(&mut self, point: PointId, ctx: &mut Ctx<'_>) {
        self.on_movement_arrived(point, ctx);
    }

    fn cast_finished(&mut self) {
        self.state.resume();
    }

    fn receive(&mut self, command: ActorCommand, ctx: &mut Ctx<'_>) {
        self.on_command(command, ctx);
    }

    fn reset(&mut self, ctx: &mut Ctx<'_>) {
        ActorMachine::reset(self, ctx);
    }
}
