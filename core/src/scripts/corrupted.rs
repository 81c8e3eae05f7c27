//! The Corrupted dragon
//!
//! Starts friendly and lying down. Talking to him (option 0) starts a four-step
//! speech; the last step turns him hostile and engages whoever started it.
//! In combat he sits at reduced health with a steady ability rotation and
//! yells once when he drops low.

use std::time::Duration;

use skirmish_types::CorruptedTuning;

use crate::actor::{ActorScript, Flow, HealthTrigger, StateOf, TriggerId};
use crate::choreo::Ctx;
use crate::hooks::Target;
use crate::ids::{EffectId, EntityId, LineId};
use crate::scheduler::PhaseMask;

pub const ESSENCE_OF_THE_RED: EffectId = EffectId(23513);
pub const FLAME_BREATH: EffectId = EffectId(23461);
pub const FIRE_NOVA: EffectId = EffectId(23462);
pub const BURNING_ADRENALINE: EffectId = EffectId(18173);
pub const CLEAVE: EffectId = EffectId(19983);

// Engine-side state changes
pub const LIE_DOWN: EffectId = EffectId(1);
pub const STAND_UP: EffectId = EffectId(2);
pub const TALK_EMOTE: EffectId = EffectId(3);
pub const TURN_HOSTILE: EffectId = EffectId(4);
pub const TURN_FRIENDLY: EffectId = EffectId(5);

pub const LINE_1: LineId = LineId(0);
pub const LINE_2: LineId = LineId(1);
pub const LINE_3: LineId = LineId(2);
pub const LOW_HEALTH_YELL: LineId = LineId(3);
pub const KILL_TAUNT: LineId = LineId(4);

const LOW_HEALTH: TriggerId = "low_health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Speech1,
    Speech2,
    Speech3,
    Speech4,
    Cleave,
    FlameBreath,
    FireNova,
    TailSwipe,
    AdrenalineCaster,
    AdrenalineTank,
}

#[derive(Debug, Clone)]
pub struct Corrupted {
    tuning: CorruptedTuning,
    triggers: [HealthTrigger; 1],
}

impl Corrupted {
    pub fn new(tuning: CorruptedTuning) -> Self {
        let triggers = [HealthTrigger::below(LOW_HEALTH, tuning.yell_below_pct)];
        Self { tuning, triggers }
    }
}

impl ActorScript for Corrupted {
    type Action = Action;
    type Phase = PhaseMask;

    fn name(&self) -> &'static str {
        "corrupted"
    }

    fn health_triggers(&self) -> &[HealthTrigger] {
        &self.triggers
    }

    fn on_reset(&mut self, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        let id = actor.id();
        actor.set_interactable(true);
        ctx.hooks.perform_effect(id, TURN_FRIENDLY, Some(Target::Itself));
        ctx.hooks.perform_effect(id, LIE_DOWN, Some(Target::Itself));
    }

    fn on_interact(
        &mut self,
        _subject: EntityId,
        option: u32,
        actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) -> bool {
        if option != 0 {
            return false;
        }
        actor.schedule(Action::Speech1, self.tuning.speech[0]);
        true
    }

    fn on_sequence_action(&mut self, action: Action, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        let id = actor.id();
        let speech = self.tuning.speech;
        match action {
            Action::Speech1 => {
                actor.announce(ctx.hooks, LINE_1);
                ctx.hooks.perform_effect(id, STAND_UP, Some(Target::Itself));
                ctx.hooks.perform_effect(id, TALK_EMOTE, Some(Target::Itself));
                actor.schedule(Action::Speech2, speech[1]);
            }
            Action::Speech2 => {
                actor.announce(ctx.hooks, LINE_2);
                ctx.hooks.perform_effect(id, TALK_EMOTE, Some(Target::Itself));
                actor.schedule(Action::Speech3, speech[2]);
            }
            Action::Speech3 => {
                actor.announce(ctx.hooks, LINE_3);
                ctx.hooks.perform_effect(id, TALK_EMOTE, Some(Target::Itself));
                actor.schedule(Action::Speech4, speech[3]);
            }
            Action::Speech4 => {
                ctx.hooks.perform_effect(id, TURN_HOSTILE, Some(Target::Itself));
                match actor.target() {
                    Some(subject) => actor.request_engage(subject),
                    None => actor.end_sequence(),
                }
            }
            _ => {}
        }
    }

    fn on_engage(&mut self, actor: &mut StateOf<Self>, _subject: EntityId, ctx: &mut Ctx<'_>) {
        let t = &self.tuning;
        actor.cast(ctx.hooks, ESSENCE_OF_THE_RED, Target::Itself, Duration::ZERO);
        actor.set_health_pct(t.engage_health_pct);

        actor.schedule(Action::Cleave, t.cleave.first);
        actor.schedule(Action::FlameBreath, t.flame_breath.first);
        actor.schedule(Action::FireNova, t.fire_nova.first);
        actor.schedule(Action::TailSwipe, t.tail_swipe.first);
        actor.schedule(Action::AdrenalineCaster, t.adrenaline_caster.first);
        actor.schedule(Action::AdrenalineTank, t.adrenaline_tank.first);
    }

    fn on_action(&mut self, action: Action, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) -> Flow {
        let t = &self.tuning;
        let instant = Duration::ZERO;
        match action {
            Action::Cleave => {
                actor.schedule(Action::Cleave, t.cleave.every);
                actor.cast(ctx.hooks, CLEAVE, Target::Victim, instant);
            }
            Action::FlameBreath => {
                actor.cast(ctx.hooks, FLAME_BREATH, Target::Victim, instant);
                actor.schedule(Action::FlameBreath, t.flame_breath.every);
            }
            Action::FireNova => {
                actor.cast(ctx.hooks, FIRE_NOVA, Target::Victim, instant);
                actor.schedule(Action::FireNova, t.fire_nova.every);
            }
            // Positional; only the timer is kept until the engine can report facing.
            Action::TailSwipe => {
                actor.schedule(Action::TailSwipe, t.tail_swipe.every);
            }
            Action::AdrenalineCaster => {
                actor.cast(ctx.hooks, BURNING_ADRENALINE, Target::RandomOther, instant);
                actor.schedule(Action::AdrenalineCaster, t.adrenaline_caster.every);
            }
            Action::AdrenalineTank => {
                actor.cast(ctx.hooks, BURNING_ADRENALINE, Target::Victim, instant);
                actor.schedule(Action::AdrenalineTank, t.adrenaline_tank.every);
            }
            Action::Speech1 | Action::Speech2 | Action::Speech3 | Action::Speech4 => {}
        }
        Flow::Continue
    }

    fn on_health_trigger(
        &mut self,
        trigger: TriggerId,
        actor: &mut StateOf<Self>,
        ctx: &mut Ctx<'_>,
    ) {
        if trigger == LOW_HEALTH {
            actor.announce(ctx.hooks, LOW_HEALTH_YELL);
        }
    }

    fn on_killed_unit(
        &mut self,
        victim: EntityId,
        _is_player: bool,
        actor: &mut StateOf<Self>,
        ctx: &mut Ctx<'_>,
    ) {
        if actor.one_in(self.tuning.kill_taunt_one_in) {
            actor.announce_to(ctx.hooks, KILL_TAUNT, victim);
        }
    }
}
