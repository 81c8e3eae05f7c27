//! Tests for partner resolution and command delivery

use std::time::Duration;

use hashbrown::HashMap;

use super::{Ctx, Delivery, Directory};
use crate::actor::{ActorCommand, ActorHandle, ActorStatus, Lifecycle};
use crate::hooks::{EngineHooks, NoopHooks};
use crate::ids::{EffectId, EntityId, PointId};

/// Minimal handle that records what it receives and whether it could reach
/// other actors while receiving.
#[derive(Debug, Default)]
struct Receiver {
    id: u64,
    received: Vec<ActorCommand>,
    saw_partner: Option<bool>,
}

impl ActorHandle for Receiver {
    fn id(&self) -> EntityId {
        EntityId(self.id)
    }

    fn status(&self) -> ActorStatus {
        ActorStatus {
            id: EntityId(self.id),
            name: "receiver",
            lifecycle: Lifecycle::Idle,
            phase: String::new(),
            health_pct: 100.0,
            suspended: false,
            interactable: false,
            target: None,
            pending: Vec::new(),
        }
    }

    fn is_despawned(&self) -> bool {
        false
    }

    fn tick(&mut self, _elapsed: Duration, _ctx: &mut Ctx<'_>) {}

    fn engage(&mut self, _subject: EntityId, _ctx: &mut Ctx<'_>) -> bool {
        false
    }

    fn interact(&mut self, _subject: EntityId, _option: u32, _ctx: &mut Ctx<'_>) -> bool {
        false
    }

    fn apply_damage(&mut self, _amount: u64, _ctx: &mut Ctx<'_>) -> u64 {
        0
    }

    fn health_changed(&mut self, _fraction: f32, _ctx: &mut Ctx<'_>) {}

    fn die(&mut self, _ctx: &mut Ctx<'_>) {}

    fn killed_unit(&mut self, _victim: EntityId, _is_player: bool, _ctx: &mut Ctx<'_>) {}

    fn movement_arrived(&mut self, _point: PointId, _ctx: &mut Ctx<'_>) {}

    fn cast_finished(&mut self) {}

    fn receive(&mut self, command: ActorCommand, ctx: &mut Ctx<'_>) {
        self.saw_partner = Some(ctx.directory.resolve(EntityId(1)).is_some());
        self.received.push(command);
    }

    fn reset(&mut self, _ctx: &mut Ctx<'_>) {}
}

#[derive(Default)]
struct Receivers {
    actors: HashMap<EntityId, Receiver>,
}

impl Receivers {
    fn with(ids: &[u64]) -> Self {
        let actors = ids
            .iter()
            .map(|&id| {
                (
                    EntityId(id),
                    Receiver {
                        id,
                        ..Receiver::default()
                    },
                )
            })
            .collect();
        Self { actors }
    }
}

impl Directory for Receivers {
    fn contains(&self, id: EntityId) -> bool {
        self.actors.contains_key(&id)
    }

    fn resolve(&mut self, id: EntityId) -> Option<&mut dyn ActorHandle> {
        let actor: &mut dyn ActorHandle = self.actors.get_mut(&id)?;
        Some(actor)
    }
}

#[derive(Default)]
struct CountingHooks {
    removed: Vec<(EntityId, EffectId)>,
}

impl EngineHooks for CountingHooks {
    fn perform_effect(
        &mut self,
        _source: EntityId,
        _effect: EffectId,
        _target: Option<crate::hooks::Target>,
    ) {
    }

    fn announce(
        &mut self,
        _source: EntityId,
        _line: crate::ids::LineId,
        _subject: Option<EntityId>,
    ) {
    }

    fn remove_effect(&mut self, holder: EntityId, effect: EffectId) {
        self.removed.push((holder, effect));
    }
}

#[test]
fn test_send_all_delivers_in_order() {
    let mut directory = Receivers::with(&[1, 2]);
    let mut hooks = NoopHooks;
    let mut ctx = Ctx::new(&mut hooks, &mut directory);

    let commands = [
        ActorCommand::RemoveEffect(EffectId(10)),
        ActorCommand::SelfCast(EffectId(11)),
        ActorCommand::RestoreHealth,
    ];
    let delivery = ctx.choreographer(EntityId(1)).send_all(EntityId(2), &commands);

    assert_eq!(delivery, Delivery::Delivered);
    assert_eq!(directory.actors[&EntityId(2)].received, commands.to_vec());
}

#[test]
fn test_missing_partner_is_skipped() {
    let mut directory = Receivers::with(&[1]);
    let mut hooks = NoopHooks;
    let mut ctx = Ctx::new(&mut hooks, &mut directory);

    let mut choreo = ctx.choreographer(EntityId(1));
    assert!(!choreo.contains(EntityId(2)));
    assert_eq!(choreo.send(EntityId(2), ActorCommand::Action(1)), Delivery::Missing);
    assert_eq!(choreo.with_actor(EntityId(2), |_, _| 42), None);
}

#[test]
fn test_partner_destroyed_between_steps() {
    let mut directory = Receivers::with(&[1, 2]);
    let mut hooks = NoopHooks;

    {
        let mut ctx = Ctx::new(&mut hooks, &mut directory);
        let delivery = ctx
            .choreographer(EntityId(1))
            .send(EntityId(2), ActorCommand::RestoreHealth);
        assert!(delivery.is_delivered());
    }

    directory.actors.remove(&EntityId(2));

    let mut ctx = Ctx::new(&mut hooks, &mut directory);
    let delivery = ctx
        .choreographer(EntityId(1))
        .send(EntityId(2), ActorCommand::Action(7));
    assert_eq!(delivery, Delivery::Missing);
}

#[test]
fn test_receiver_is_detached() {
    let mut directory = Receivers::with(&[1, 2]);
    let mut hooks = NoopHooks;
    let mut ctx = Ctx::new(&mut hooks, &mut directory);

    ctx.choreographer(EntityId(1))
        .send(EntityId(2), ActorCommand::RestoreHealth);

    assert_eq!(directory.actors[&EntityId(2)].saw_partner, Some(false));
}

#[test]
fn test_hooks_reach_engine_through_receiver() {
    let mut directory = Receivers::with(&[1, 2]);
    let mut hooks = CountingHooks::default();
    let mut ctx = Ctx::new(&mut hooks, &mut directory);

    let result = ctx.choreographer(EntityId(1)).with_actor(EntityId(2), |actor, ctx| {
        ctx.hooks.remove_effect(actor.id(), EffectId(3));
        actor.id()
    });

    assert_eq!(result, Some(EntityId(2)));
    assert_eq!(hooks.removed, vec![(EntityId(2), EffectId(3))]);
}
