//! The Shadow Axe
//!
//! Thrown by the undead plunderer. The axe charges the throw target it was
//! aimed at, damages everything around its landing spot for a while and then
//! disappears. With nothing to aim at it vanishes straight away.

use std::time::Duration;

use skirmish_types::DelayRange;

use crate::actor::{ActorScript, Flow, StateOf};
use crate::choreo::Ctx;
use crate::hooks::Target;
use crate::ids::{EffectId, EntityId, PointId};
use crate::scheduler::PhaseMask;

pub const SHADOW_AXE_PERIODIC_DAMAGE: EffectId = EffectId(42750);

/// Where the plunderer's throw lands
pub const THROW_TARGET: PointId = PointId(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Vanish,
}

#[derive(Debug, Clone)]
pub struct ShadowAxe {
    aim: Option<PointId>,
    lifetime: DelayRange,
}

impl ShadowAxe {
    pub fn new(aim: Option<PointId>, lifetime: DelayRange) -> Self {
        Self { aim, lifetime }
    }
}

impl ActorScript for ShadowAxe {
    type Action = Action;
    type Phase = PhaseMask;

    fn name(&self) -> &'static str {
        "shadow_axe"
    }

    fn can_engage(&self) -> bool {
        false
    }

    fn on_reset(&mut self, actor: &mut StateOf<Self>, ctx: &mut Ctx<'_>) {
        match self.aim {
            Some(point) => actor.move_to(ctx.hooks, point),
            None => actor.despawn(),
        }
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
        if Some(point) != self.aim {
            return;
        }
        actor.cast(ctx.hooks, SHADOW_AXE_PERIODIC_DAMAGE, Target::Itself, Duration::ZERO);
        actor.schedule(Action::Vanish, self.lifetime);
        actor.begin_sequence();
    }

    fn on_sequence_action(
        &mut self,
        action: Action,
        actor: &mut StateOf<Self>,
        _ctx: &mut Ctx<'_>,
    ) {
        match action {
            Action::Vanish => actor.despawn(),
        }
    }
}
