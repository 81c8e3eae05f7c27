//! Multi-actor choreography
//!
//! Actors reference each other by [`EntityId`](crate::ids::EntityId) only and
//! reach partners through a [`Directory`] for the duration of one dispatch.
//! [`Choreographer`] wraps the resolve-then-command pattern so a partner that
//! disappeared between steps is skipped instead of failing the sequence.

mod choreographer;
mod context;
mod directory;

#[cfg(test)]
mod choreographer_tests;

pub use choreographer::{Choreographer, Delivery};
pub use context::Ctx;
pub use directory::{Detached, Directory};
