//! Timed event scheduling
//!
//! This module provides:
//! - **Queue**: phase-scoped, insertion-stable timer queue driven by elapsed time
//! - **Delays**: fixed or ranged delays drawn from a pluggable random source
//! - **Phases**: host-defined phase sets that gate which entries may fire
//!
//! # Lifecycle of an entry
//!
//! 1. `schedule*` samples the delay and inserts the entry
//! 2. `advance` moves the clock; the entry's remaining time shrinks
//! 3. `pop_due` hands it out once due and its phase is active
//! 4. Bulk removal (`cancel_*`, `set_phase` purge, `reset`) drops it unfired

mod delay;
mod phase;
mod queue;

#[cfg(test)]
mod queue_tests;

pub use delay::{DelayRange, Earliest, Latest, RandomSource, SeededRandom};
pub use phase::{PhaseMask, PhaseSet};
pub use queue::{EventQueue, GroupId, PendingAction};
