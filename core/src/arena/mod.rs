//! Single-threaded simulation host
//!
//! [`Arena`] owns every live actor and drives them in insertion order. To run
//! an actor it takes it out of the map, hands the rest of the world over as
//! the [`Directory`], and puts it back afterwards. Despawned actors are
//! dropped once the dispatch that despawned them returns.
//!
//! The arena also plays the engine side of the hooks it records:
//! - **Summons**: performing a registered effect spawns a new actor whose
//!   partner is the performer
//! - **Movement**: requested moves complete after a fixed travel time

mod log;


pub use log::{HookEvent, HookLog, LoggedHook};

use std::time::Duration;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::actor::{ActorCommand, ActorHandle, ActorStatus};
use crate::choreo::{Ctx, Directory};
use crate::ids::{EffectId, EntityId, PointId};

/// Builds the actor summoned by an effect: `(new_id, summoner) -> actor`
pub type SummonFactory = Box<dyn Fn(EntityId, EntityId) -> Box<dyn ActorHandle>>;

pub const DEFAULT_TRAVEL_TIME: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
struct PendingMove {
    actor: EntityId,
    point: PointId,
    remaining: Duration,
}

/// The world as seen by the actor currently being dispatched
struct WorldView<'w> {
    actors: &'w mut HashMap<EntityId, Box<dyn ActorHandle>>,
    subjects: &'w HashSet<EntityId>,
}

impl Directory for WorldView<'_> {
    fn contains(&self, id: EntityId) -> bool {
        self.subjects.contains(&id)
            || self
                .actors
                .get(&id)
                .is_some_and(|actor| !actor.is_despawned())
    }

    fn resolve(&mut self, id: EntityId) -> Option<&mut dyn ActorHandle> {
        let actor = self.actors.get_mut(&id)?;
        if actor.is_despawned() {
            return None;
        }
        let actor: &mut dyn ActorHandle = actor.as_mut();
        Some(actor)
    }
}

pub struct Arena {
    actors: HashMap<EntityId, Box<dyn ActorHandle>>,
    /// Tick order
    order: Vec<EntityId>,
    /// Non-scripted entities (players) that actors may engage
    subjects: HashSet<EntityId>,
    log: HookLog,
    /// Log entries already acted on
    cursor: usize,
    summons: HashMap<EffectId, SummonFactory>,
    moves: Vec<PendingMove>,
    travel_time: Duration,
    clock: Duration,
    next_id: u64,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    pub fn new() -> Self {
        Self::with_travel_time(DEFAULT_TRAVEL_TIME)
    }

    pub fn with_travel_time(travel_time: Duration) -> Self {
        Self {
            actors: HashMap::new(),
            order: Vec::new(),
            subjects: HashSet::new(),
            log: HookLog::new(),
            cursor: 0,
            summons: HashMap::new(),
            moves: Vec::new(),
            travel_time,
            clock: Duration::ZERO,
            next_id: 1,
        }
    }

    // ─── Population ─────────────────────────────────────────────────────────

    /// Reserve a fresh entity id.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a scripted actor and run its reset hook. The actor's id should come
    /// from [`Arena::allocate_id`].
    pub fn spawn(&mut self, actor: Box<dyn ActorHandle>) -> EntityId {
        let id = self.insert(actor);
        self.settle();
        id
    }

    fn insert(&mut self, actor: Box<dyn ActorHandle>) -> EntityId {
        let id = actor.id();
        self.next_id = self.next_id.max(id.0 + 1);
        if self.actors.insert(id, actor).is_none() {
            self.order.push(id);
        }
        info!(actor = %id, "spawned");
        self.dispatch(id, |actor, ctx| actor.reset(ctx));
        id
    }

    /// Register a non-scripted subject (a player) and return its id.
    pub fn add_subject(&mut self) -> EntityId {
        let id = self.allocate_id();
        self.subjects.insert(id);
        id
    }

    pub fn remove_subject(&mut self, id: EntityId) -> bool {
        self.subjects.remove(&id)
    }

    /// Destroy an actor without running any of its hooks.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let removed = self.actors.remove(&id).is_some();
        if removed {
            self.order.retain(|&other| other != id);
            self.moves.retain(|m| m.actor != id);
        }
        removed
    }

    /// Spawn `factory`'s actor whenever any actor performs `effect`.
    pub fn on_effect(&mut self, effect: EffectId, factory: SummonFactory) {
        self.summons.insert(effect, factory);
    }

    // ─── Driving ────────────────────────────────────────────────────────────

    /// Advance the world by `elapsed`: tick every actor in spawn order, then
    /// deliver movements that completed during this interval. Moves requested
    /// during the interval start counting on the next one.
    pub fn tick(&mut self, elapsed: Duration) {
        self.clock += elapsed;
        self.log.set_time(self.clock);

        let arrived = self.advance_moves(elapsed);

        for id in self.order.clone() {
            self.dispatch(id, |actor, ctx| actor.tick(elapsed, ctx));
            self.settle();
        }

        for (id, point) in arrived {
            self.dispatch(id, |actor, ctx| actor.movement_arrived(point, ctx));
            self.settle();
        }
    }

    /// Tick in `step` increments until `total` has elapsed.
    pub fn run(&mut self, total: Duration, step: Duration) {
        if step.is_zero() {
            return;
        }
        let end = self.clock + total;
        while self.clock < end {
            self.tick(step.min(end - self.clock));
        }
    }

    fn advance_moves(&mut self, elapsed: Duration) -> Vec<(EntityId, PointId)> {
        let mut arrived = Vec::new();
        self.moves.retain_mut(|pending| {
            pending.remaining = pending.remaining.saturating_sub(elapsed);
            if pending.remaining.is_zero() {
                arrived.push((pending.actor, pending.point));
                false
            } else {
                true
            }
        });
        arrived
    }

    // ─── Engine events ──────────────────────────────────────────────────────

    pub fn engage(&mut self, id: EntityId, subject: EntityId) -> Option<bool> {
        self.call(id, |actor, ctx| actor.engage(subject, ctx))
    }

    pub fn damage(&mut self, id: EntityId, amount: u64) -> Option<u64> {
        self.call(id, |actor, ctx| actor.apply_damage(amount, ctx))
    }

    pub fn interact(&mut self, id: EntityId, subject: EntityId, option: u32) -> Option<bool> {
        self.call(id, |actor, ctx| actor.interact(subject, option, ctx))
    }

    pub fn kill(&mut self, id: EntityId) -> Option<()> {
        self.call(id, |actor, ctx| actor.die(ctx))
    }

    pub fn killed_unit(&mut self, id: EntityId, victim: EntityId, is_player: bool) -> Option<()> {
        self.call(id, |actor, ctx| actor.killed_unit(victim, is_player, ctx))
    }

    pub fn command(&mut self, id: EntityId, command: ActorCommand) -> Option<()> {
        self.call(id, |actor, ctx| actor.receive(command, ctx))
    }

    pub fn reset(&mut self, id: EntityId) -> Option<()> {
        self.moves.retain(|m| m.actor != id);
        self.call(id, |actor, ctx| actor.reset(ctx))
    }

    fn call<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut dyn ActorHandle, &mut Ctx<'_>) -> R,
    ) -> Option<R> {
        let result = self.dispatch(id, f);
        if result.is_none() {
            debug!(actor = %id, "no such actor");
        }
        self.settle();
        result
    }

    /// Run `f` against one actor with the rest of the world as its directory.
    fn dispatch<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut dyn ActorHandle, &mut Ctx<'_>) -> R,
    ) -> Option<R> {
        let mut actor = self.actors.remove(&id)?;
        let result = {
            let mut world = WorldView {
                actors: &mut self.actors,
                subjects: &self.subjects,
            };
            let mut ctx = Ctx::new(&mut self.log, &mut world);
            f(actor.as_mut(), &mut ctx)
        };
        self.actors.insert(id, actor);
        Some(result)
    }

    /// Act on new hook records (summons, movement) and drop despawned actors.
    fn settle(&mut self) {
        while self.cursor < self.log.len() {
            let entry = self.log.entries()[self.cursor];
            self.cursor += 1;
            match entry.event {
                HookEvent::Effect { source, effect, .. } => self.summon(effect, source),
                HookEvent::Move { source, point } => {
                    self.moves.retain(|m| m.actor != source);
                    self.moves.push(PendingMove {
                        actor: source,
                        point,
                        remaining: self.travel_time,
                    });
                }
                _ => {}
            }
        }

        let despawned: Vec<EntityId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.actors.get(id).is_some_and(|a| a.is_despawned()))
            .collect();
        for id in despawned {
            debug!(actor = %id, "dropping despawned actor");
            self.remove(id);
        }
    }

    fn summon(&mut self, effect: EffectId, summoner: EntityId) {
        if !self.summons.contains_key(&effect) {
            return;
        }
        let id = self.allocate_id();
        let Some(factory) = self.summons.get(&effect) else {
            return;
        };
        let actor = factory(id, summoner);
        info!(summoner = %summoner, actor = %id, ?effect, "summoned");
        self.insert(actor);
    }

    // ─── Inspection ─────────────────────────────────────────────────────────

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn log(&self) -> &HookLog {
        &self.log
    }

    /// Store melee swings in the log, or only count them.
    pub fn set_melee_logging(&mut self, enabled: bool) {
        self.log.set_store_melee(enabled);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn is_subject(&self, id: EntityId) -> bool {
        self.subjects.contains(&id)
    }

    /// Actor ids in tick order
    pub fn actor_ids(&self) -> &[EntityId] {
        &self.order
    }

    pub fn status(&self, id: EntityId) -> Option<ActorStatus> {
        self.actors.get(&id).map(|actor| actor.status())
    }

    pub fn statuses(&self) -> Vec<ActorStatus> {
        self.order.iter().filter_map(|&id| self.status(id)).collect()
    }

    /// Forget everything: actors, subjects, log and pending movement.
    /// Summon rules stay registered.
    pub fn clear(&mut self) {
        self.actors.clear();
        self.order.clear();
        self.subjects.clear();
        self.log.clear();
        self.cursor = 0;
        self.moves.clear();
        self.clock = Duration::ZERO;
        self.log.set_time(Duration::ZERO);
    }
}
