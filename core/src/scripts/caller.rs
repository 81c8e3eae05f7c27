//! The Caller
//!
//! Banshee summoned by the plunderer's scripted defeat. She descends, raises
//! her partner over two timed steps, then ascends and leaves. She never
//! fights. Every step tolerates the partner having vanished.

use skirmish_types::CallerTuning;

use super::plunderer::{self, START_PHASE_2};
use crate::actor::{ActorCommand, ActorScript, Flow, StateOf};
use crate::choreo::Ctx;
use crate::hooks::Target;
use crate::ids::{EffectId, EntityId, LineId, PointId};
use crate::scheduler::PhaseMask;

pub const RESURRECTION_HEAL: EffectId = EffectId(42704);
pub const RESURRECTION_BEAM: EffectId = EffectId(42857);
pub const RESURRECTION_DUMMY: EffectId = EffectId(42862);

pub const YELL_RESURRECT: LineId = LineId(0);

/// Above the partner
pub const DESCEND: PointId = PointId(1);
/// Back up and out of the fight
pub const ASCEND: PointId = PointId(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Resurrect1,
    Resurrect2,
}

#[derive(Debug, Clone)]
pub struct Caller {
    tuning: CallerTuning,
    partner: EntityId,
}

impl Caller {
    pub fn new(tuning: CallerTuning, partner: EntityId) -> Self {
        Self { tuning, partner }
    }

    pub fn partner(&self) -> EntityId {
        self.partner
    }
}

impl ActorScript for Caller {
    type Action = Action;
    type Phase = PhaseMask;

    fn name(&self) -> &'static str {
        "caller"
    }

    fn can_engage(&self) -> bool {
        false
    }

    fn on_reset(&mut self, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        actor.set_target(Some(self.partner));
        actor.move_to(ctx.hooks, DESCEND);
    }

    fn on_engage(&mut self, _actor: &mut StateOf<Self>, _subject: EntityId, _ctx: &mut Ctx<'_>) {}

    fn on_action(
        &mut self,
        _action: Action,
        _actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) -> Flow {
        Flow::Continue
    }

    fn on_movement_arrived(
        &mut self,
        point: PointId,
        actor: &mut StateOf<Self>,
        ctx: &mut Ctx<'_>,
    ) {
        match point {
            DESCEND => {
                let me = actor.id();
                actor.announce(ctx.hooks, YELL_RESURRECT);
                let delivery = ctx.choreographer(me).send_all(
                    self.partner,
                    &[
                        ActorCommand::RemoveEffect(plunderer::effects::SUMMON_BANSHEE),
                        ActorCommand::SelfCast(RESURRECTION_DUMMY),
                    ],
                );
                if delivery.is_delivered() {
                    ctx.hooks
                        .perform_effect(me, RESURRECTION_BEAM, Some(Target::Entity(self.partner)));
                }
                actor.schedule(Action::Resurrect1, self.tuning.resurrect_heal);
                actor.begin_sequence();
            }
            ASCEND => actor.despawn(),
            _ => {}
        }
    }

    fn on_sequence_action(&mut self, action: Action, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        let me = actor.id();
        match action {
            Action::Resurrect1 => {
                ctx.choreographer(me).send_all(
                    self.partner,
                    &[
                        ActorCommand::RemoveEffect(plunderer::effects::FEIGN_DEATH),
                        ActorCommand::SelfCast(RESURRECTION_HEAL),
                        ActorCommand::RestoreHealth,
                    ],
                );
                actor.schedule(Action::Resurrect2, self.tuning.resurrect_finish);
            }
            Action::Resurrect2 => {
                ctx.choreographer(me).send_all(
                    self.partner,
                    &[
                        ActorCommand::RemoveEffect(RESURRECTION_DUMMY),
                        ActorCommand::Action(START_PHASE_2),
                    ],
                );
                actor.move_to(ctx.hooks, ASCEND);
            }
        }
    }
}
