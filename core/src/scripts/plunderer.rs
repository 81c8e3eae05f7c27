//! The Plunderer
//!
//! Two-form boss. Lethal damage in human form is intercepted: he feigns death
//! and summons a banshee partner (see [`caller`](super::caller)), who raises
//! him into his undead form.
//!
//! Phases:
//! - `HUMAN`: opening form
//! - `EVENT`: scripted defeat and transformation; ticks without engagement
//! - `UNDEAD`: second form after the partner's `START_PHASE_2` command

use skirmish_types::PlundererTuning;

use crate::actor::{ActorScript, DefeatOverride, Flow, StateOf};
use crate::choreo::Ctx;
use crate::hooks::Target;
use crate::ids::EntityId;
use crate::scheduler::PhaseMask;

pub const HUMAN: PhaseMask = PhaseMask::bit(1);
pub const UNDEAD: PhaseMask = PhaseMask::bit(2);
pub const EVENT: PhaseMask = PhaseMask::bit(3);

/// Partner command that starts the undead form
pub const START_PHASE_2: u32 = 1;

pub mod effects {
    use crate::ids::EffectId;

    pub const CLEAVE: EffectId = EffectId(42724);
    pub const SMASH: EffectId = EffectId(42669);
    pub const STAGGERING_ROAR: EffectId = EffectId(42708);
    pub const ENRAGE: EffectId = EffectId(42705);
    pub const FEIGN_DEATH: EffectId = EffectId(42795);
    pub const SUMMON_BANSHEE: EffectId = EffectId(42912);
    pub const DARK_SMASH: EffectId = EffectId(42723);
    pub const DREADFUL_ROAR: EffectId = EffectId(42729);
    pub const WOE_STRIKE: EffectId = EffectId(42730);
    pub const SHADOW_AXE_SUMMON: EffectId = EffectId(42748);
    pub const TRANSFORM: EffectId = EffectId(42796);

    // Engine-side state changes without a spell of their own
    pub const CLEAR_AURAS: EffectId = EffectId(1);
    pub const BECOME_UNATTACKABLE: EffectId = EffectId(2);
    pub const BECOME_ATTACKABLE: EffectId = EffectId(3);
}

pub mod lines {
    use crate::ids::LineId;

    pub const AGGRO: LineId = LineId(0);
    pub const SLAY: LineId = LineId(1);
    pub const DEATH: LineId = LineId(2);
}

use effects::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Cleave,
    StaggeringRoar,
    Enrage,
    Smash,
    SummonBanshee,
    JustTransformed,
    DarkSmash,
    DreadfulRoar,
    WoeStrike,
    ShadowAxe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Human,
    /// Feigning death and unattackable, waiting for the partner
    Fallen,
    /// Transformed but not yet attackable again
    Rising,
    Undead,
}

#[derive(Debug, Clone)]
pub struct Plunderer {
    tuning: PlundererTuning,
    form: Form,
}

impl Plunderer {
    pub fn new(tuning: PlundererTuning) -> Self {
        Self {
            tuning,
            form: Form::Human,
        }
    }

    pub fn is_undead(&self) -> bool {
        matches!(self.form, Form::Rising | Form::Undead)
    }

    fn schedule_second_phase(&self, actor: &mut StateOf<Self>) {
        let t = &self.tuning;
        actor.set_phase(UNDEAD);
        actor.schedule_in_phase(Action::DarkSmash, t.dark_smash.first, UNDEAD);
        actor.schedule_in_phase(Action::DreadfulRoar, t.dreadful_roar.first, UNDEAD);
        actor.schedule_in_phase(Action::WoeStrike, t.woe_strike.first, UNDEAD);
        actor.schedule_in_phase(Action::ShadowAxe, t.shadow_axe.first, UNDEAD);
    }
}

impl ActorScript for Plunderer {
    type Action = Action;
    type Phase = PhaseMask;

    fn name(&self) -> &'static str {
        "plunderer"
    }

    fn scripted_phases(&self) -> PhaseMask {
        EVENT
    }

    fn initial_phase(&self) -> PhaseMask {
        HUMAN
    }

    fn defeat_override(&self) -> Option<DefeatOverride<PhaseMask>> {
        Some(DefeatOverride {
            guard: HUMAN,
            defeat: EVENT,
        })
    }

    /// Undo what the scripted defeat left behind on the engine side.
    fn on_reset(&mut self, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        let id = actor.id();
        let form = std::mem::replace(&mut self.form, Form::Human);
        if form == Form::Fallen {
            ctx.hooks.remove_effect(id, FEIGN_DEATH);
        }
        if matches!(form, Form::Rising | Form::Undead) {
            ctx.hooks.remove_effect(id, TRANSFORM);
        }
        if matches!(form, Form::Fallen | Form::Rising) {
            ctx.hooks.perform_effect(id, BECOME_ATTACKABLE, Some(Target::Itself));
        }
    }

    fn on_engage(&mut self, actor: &mut StateOf<Self>, _subject: EntityId, ctx: &mut Ctx<'_>) {
        let t = &self.tuning;
        actor.announce(ctx.hooks, lines::AGGRO);
        actor.schedule_in_phase(Action::Cleave, t.cleave.first, HUMAN);
        actor.schedule_in_phase(Action::StaggeringRoar, t.staggering_roar.first, HUMAN);
        actor.schedule_in_phase(Action::Enrage, t.enrage.first, HUMAN);
        actor.schedule_in_phase(Action::Smash, t.smash.first, HUMAN);
    }

    fn on_action(&mut self, action: Action, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) -> Flow {
        let t = &self.tuning;
        let instant = std::time::Duration::ZERO;
        match action {
            // Human form
            Action::Cleave => {
                actor.cast(ctx.hooks, CLEAVE, Target::Victim, instant);
                actor.schedule_in_phase(Action::Cleave, t.cleave.every, HUMAN);
            }
            Action::StaggeringRoar => {
                actor.cast(ctx.hooks, STAGGERING_ROAR, Target::Itself, instant);
                actor.schedule_in_phase(Action::StaggeringRoar, t.staggering_roar.every, HUMAN);
            }
            Action::Enrage => {
                actor.cast(ctx.hooks, ENRAGE, Target::Itself, instant);
                actor.schedule_in_phase(Action::Enrage, t.enrage.every, HUMAN);
            }
            Action::Smash => {
                let cast_time = actor.sample(t.smash_cast);
                actor.cast(ctx.hooks, SMASH, Target::Area, cast_time);
                actor.schedule_in_phase(Action::Smash, t.smash.every, HUMAN);
            }

            // Transformation
            Action::JustTransformed => {
                let id = actor.id();
                ctx.hooks.perform_effect(id, BECOME_ATTACKABLE, Some(Target::Itself));
                self.form = Form::Undead;
                self.schedule_second_phase(actor);
                actor.announce(ctx.hooks, lines::AGGRO);
                actor.enter_combat();
                return Flow::Yield;
            }
            Action::SummonBanshee => {
                actor.cast(ctx.hooks, SUMMON_BANSHEE, Target::Itself, instant);
                return Flow::Yield;
            }

            // Undead form
            Action::DarkSmash => {
                let cast_time = actor.sample(t.dark_smash_cast);
                actor.cast(ctx.hooks, DARK_SMASH, Target::Victim, cast_time);
                actor.schedule_in_phase(Action::DarkSmash, t.dark_smash.every, UNDEAD);
            }
            Action::DreadfulRoar => {
                actor.cast(ctx.hooks, DREADFUL_ROAR, Target::Itself, instant);
                actor.schedule_in_phase(Action::DreadfulRoar, t.dreadful_roar.every, UNDEAD);
            }
            Action::WoeStrike => {
                actor.cast(ctx.hooks, WOE_STRIKE, Target::Victim, instant);
                actor.schedule_in_phase(Action::WoeStrike, t.woe_strike.every, UNDEAD);
            }
            Action::ShadowAxe => {
                actor.cast(ctx.hooks, SHADOW_AXE_SUMMON, Target::RandomOther, instant);
                actor.schedule_in_phase(Action::ShadowAxe, t.shadow_axe.every, UNDEAD);
            }
        }
        Flow::Continue
    }

    fn on_scripted_defeat(&mut self, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        let id = actor.id();
        self.form = Form::Fallen;
        actor.schedule_in_phase(Action::SummonBanshee, self.tuning.summon_banshee, EVENT);
        ctx.hooks.perform_effect(id, CLEAR_AURAS, Some(Target::Itself));
        ctx.hooks.perform_effect(id, FEIGN_DEATH, Some(Target::Itself));
        ctx.hooks.perform_effect(id, BECOME_UNATTACKABLE, Some(Target::Itself));
        actor.announce(ctx.hooks, lines::DEATH);
    }

    fn on_command(&mut self, command: u32, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        if command != START_PHASE_2 || self.is_undead() {
            return;
        }
        let id = actor.id();
        ctx.hooks.remove_effect(id, FEIGN_DEATH);
        ctx.hooks.perform_effect(id, TRANSFORM, Some(Target::Itself));
        self.form = Form::Rising;
        actor.schedule_in_phase(Action::JustTransformed, self.tuning.just_transformed, EVENT);
    }

    fn on_death(&mut self, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        actor.announce(ctx.hooks, lines::DEATH);
    }

    fn on_killed_unit(
        &mut self,
        _victim: EntityId,
        is_player: bool,
        actor: &mut StateOf<Self>,
        ctx: &mut Ctx<'_>,
    ) {
        if is_player {
            actor.announce(ctx.hooks, lines::SLAY);
        }
    }
}
