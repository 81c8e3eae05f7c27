use crate::actor::ActorHandle;
use crate::ids::EntityId;

/// Resolves weak entity references to live actors.
///
/// Lookups may fail at any time: partners die, despawn or are never spawned.
/// The actor currently being dispatched is not resolvable through the
/// directory it was handed.
pub trait Directory {
    /// Whether `id` names anything that currently exists, scripted or not.
    fn contains(&self, id: EntityId) -> bool;

    /// Mutable access to a live scripted actor.
    fn resolve(&mut self, id: EntityId) -> Option<&mut dyn ActorHandle>;
}

/// A directory that resolves nothing.
///
/// Handed to actors receiving a choreography command, so a command can never
/// fan out into further cross-actor calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl Directory for Detached {
    fn contains(&self, _id: EntityId) -> bool {
        false
    }

    fn resolve(&mut self, _id: EntityId) -> Option<&mut dyn ActorHandle> {
        None
    }
}
