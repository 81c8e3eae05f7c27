//! Scripted actors
//!
//! This module provides:
//! - **State**: per-actor runtime state (lifecycle, queue, health, suspension)
//! - **Scripts**: the [`ActorScript`] trait encounter scripts implement
//! - **Machine**: [`ActorMachine`], the tick algorithm shared by every script
//! - **Handle**: [`ActorHandle`], the object-safe surface hosts and partners use
//! - **Triggers**: one-shot health thresholds and the phase-gated defeat override

mod handle;
mod machine;
mod script;
mod state;
mod triggers;


pub use handle::{ActorCommand, ActorHandle, ActorStatus};
pub use machine::ActorMachine;
pub use script::{ActorScript, Flow, StateOf};
pub use state::{ActorState, Health, Lifecycle};
pub use triggers::{DefeatOverride, HealthTrigger, OneShots, TriggerId, consume_crossed};
