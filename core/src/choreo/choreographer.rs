//! Cross-actor messaging
//!
//! A choreographed step resolves its partner once, then delivers commands in
//! order. A partner that no longer resolves skips the step with a debug log;
//! it is never an error and never aborts the caller's handler.

use tracing::debug;

use super::context::Ctx;
use super::directory::{Detached, Directory};
use crate::actor::{ActorCommand, ActorHandle};
use crate::hooks::EngineHooks;
use crate::ids::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Receiver did not resolve; nothing happened
    Missing,
}

impl Delivery {
    pub fn is_delivered(self) -> bool {
        self == Delivery::Delivered
    }
}

pub struct Choreographer<'c> {
    source: EntityId,
    hooks: &'c mut dyn EngineHooks,
    directory: &'c mut dyn Directory,
}

impl<'c> Choreographer<'c> {
    pub fn new(
        source: EntityId,
        hooks: &'c mut dyn EngineHooks,
        directory: &'c mut dyn Directory,
    ) -> Self {
        Self {
            source,
            hooks,
            directory,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.directory.contains(id)
    }

    /// Run `f` against the resolved partner. Returns `None` when the partner is
    /// gone.
    ///
    /// The partner sees a [`Detached`] directory, so anything it does in
    /// response stays local to it.
    pub fn with_actor<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut dyn ActorHandle, &mut Ctx<'_>) -> R,
    ) -> Option<R> {
        let Some(actor) = self.directory.resolve(id) else {
            debug!(source = %self.source, target = %id, "partner not found; skipping step");
            return None;
        };
        let mut detached = Detached;
        let mut ctx = Ctx::new(&mut *self.hooks, &mut detached);
        Some(f(actor, &mut ctx))
    }

    pub fn send(&mut self, to: EntityId, command: ActorCommand) -> Delivery {
        self.send_all(to, &[command])
    }

    /// Deliver `commands` in order with a single lookup.
    pub fn send_all(&mut self, to: EntityId, commands: &[ActorCommand]) -> Delivery {
        let delivered = self.with_actor(to, |actor, ctx| {
            for command in commands {
                actor.receive(*command, ctx);
            }
        });
        match delivered {
            Some(()) => Delivery::Delivered,
            None => Delivery::Missing,
        }
    }
}
