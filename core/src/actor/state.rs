//! Runtime actor state
//!
//! Tracks the mutable state of one scripted actor during an encounter:
//! - Lifecycle (idle, pre-engagement sequence, engaged, dead, despawned)
//! - Event queue and active phase
//! - Cast suspension
//! - Health and consumed one-shot triggers
//! - Weak references to the remembered subject and current victim

use std::time::Duration;

use tracing::{debug, info};

use super::triggers::OneShots;
use crate::hooks::{EngineHooks, Target};
use crate::ids::{EffectId, EntityId, LineId, PointId};
use crate::scheduler::{DelayRange, EventQueue, PhaseMask, PhaseSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Spawned, not fighting, no sequence running
    #[default]
    Idle,
    /// Pre-engagement sequence running; combat actions never fire
    Sequence,
    /// In combat
    Engaged,
    /// Terminal until reset
    Dead,
    /// Removed from the world; the host drops the actor
    Despawned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: u64,
    pub max: u64,
}

impl Health {
    pub fn full(max: u64) -> Self {
        Self { current: max, max }
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0 {
            self.current as f32 / self.max as f32
        } else {
            0.0
        }
    }

    pub fn pct(&self) -> f32 {
        self.fraction() * 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.current == 0
    }

    /// Absolute health at `fraction` of max, clamped to `[0, max]`
    pub fn at_fraction(&self, fraction: f32) -> u64 {
        (self.max as f32 * fraction.clamp(0.0, 1.0)).round() as u64
    }
}

/// Runtime state for a scripted actor
#[derive(Debug)]
pub struct ActorState<A, P = PhaseMask> {
    id: EntityId,
    queue: EventQueue<A, P>,
    lifecycle: Lifecycle,
    suspended: bool,
    /// Time left on a timed cast; clears `suspended` when it runs out
    cast_remaining: Option<Duration>,
    health: Health,
    one_shots: OneShots,
    /// Remembered subject or choreography partner
    target: Option<EntityId>,
    /// Current combat victim
    victim: Option<EntityId>,
    interactable: bool,
    pending_engage: Option<EntityId>,
}

impl<A: std::fmt::Debug, P: PhaseSet> ActorState<A, P> {
    pub fn new(id: EntityId, max_health: u64, queue: EventQueue<A, P>) -> Self {
        Self {
            id,
            queue,
            lifecycle: Lifecycle::Idle,
            suspended: false,
            cast_remaining: None,
            health: Health::full(max_health),
            one_shots: OneShots::default(),
            target: None,
            victim: None,
            interactable: false,
            pending_engage: None,
        }
    }

    /// Back to a freshly spawned actor (wipe or respawn).
    pub fn reset(&mut self) {
        self.queue.reset();
        self.lifecycle = Lifecycle::Idle;
        self.suspended = false;
        self.cast_remaining = None;
        self.health.current = self.health.max;
        self.one_shots.clear();
        self.target = None;
        self.victim = None;
        self.interactable = false;
        self.pending_engage = None;
    }

    // ─── Identity & Lifecycle ───────────────────────────────────────────────

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_engaged(&self) -> bool {
        self.lifecycle == Lifecycle::Engaged
    }

    /// Dead or despawned
    pub fn is_gone(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Dead | Lifecycle::Despawned)
    }

    /// Mark the pre-engagement sequence as running. Only valid while idle.
    pub fn begin_sequence(&mut self) {
        if self.lifecycle == Lifecycle::Idle {
            self.lifecycle = Lifecycle::Sequence;
        }
    }

    pub fn end_sequence(&mut self) {
        if self.lifecycle == Lifecycle::Sequence {
            self.lifecycle = Lifecycle::Idle;
        }
    }

    /// Enter combat without running the script's engage hook (zone-wide
    /// re-engagement after a scripted transition).
    pub fn enter_combat(&mut self) {
        if !self.is_gone() {
            self.lifecycle = Lifecycle::Engaged;
        }
    }

    pub(crate) fn engage(&mut self, subject: EntityId) {
        self.lifecycle = Lifecycle::Engaged;
        self.victim = Some(subject);
        if self.target.is_none() {
            self.target = Some(subject);
        }
    }

    pub(crate) fn die(&mut self) {
        self.queue.reset();
        self.lifecycle = Lifecycle::Dead;
        self.suspended = false;
        self.cast_remaining = None;
        self.health.current = 0;
        self.victim = None;
        self.pending_engage = None;
    }

    /// Leave the world. The host drops the actor after the current dispatch.
    pub fn despawn(&mut self) {
        info!(actor = %self.id, "despawning");
        self.queue.reset();
        self.lifecycle = Lifecycle::Despawned;
    }

    /// Ask the machine to engage `subject` once the current dispatch returns.
    /// Dropped if the subject no longer resolves.
    pub fn request_engage(&mut self, subject: EntityId) {
        self.pending_engage = Some(subject);
    }

    pub(crate) fn take_pending_engage(&mut self) -> Option<EntityId> {
        self.pending_engage.take()
    }

    // ─── Queue & Phase ──────────────────────────────────────────────────────

    pub fn queue(&self) -> &EventQueue<A, P> {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut EventQueue<A, P> {
        &mut self.queue
    }

    pub fn schedule(&mut self, action: A, delay: DelayRange) -> Duration {
        self.queue.schedule(action, delay)
    }

    pub fn schedule_in_phase(&mut self, action: A, delay: DelayRange, phase: P) -> Duration {
        self.queue.schedule_in_phase(action, delay, phase)
    }

    pub fn phase(&self) -> P {
        self.queue.phase()
    }

    pub fn is_in_phase(&self, phase: P) -> bool {
        self.queue.is_in_phase(phase)
    }

    /// Switch phase under the queue's purge policy.
    pub fn set_phase(&mut self, phase: P) {
        let old = self.queue.phase();
        let purged = self.queue.set_phase(phase);
        debug!(actor = %self.id, ?old, new = ?phase, purged, "phase changed");
    }

    pub(crate) fn advance(&mut self, elapsed: Duration) {
        self.queue.advance(elapsed);
        if let Some(left) = self.cast_remaining {
            let left = left.saturating_sub(elapsed);
            if left.is_zero() {
                self.cast_remaining = None;
                self.suspended = false;
            } else {
                self.cast_remaining = Some(left);
            }
        }
    }

    /// Draw a duration (cast time, travel) from the queue's random source.
    pub fn sample(&mut self, range: DelayRange) -> Duration {
        self.queue.random().sample_delay(range)
    }

    /// Returns true with probability `1 / n`, drawn from the queue's source.
    pub fn one_in(&mut self, n: u32) -> bool {
        self.queue.random().one_in(n)
    }

    // ─── Suspension ─────────────────────────────────────────────────────────

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Block draining until [`ActorState::resume`].
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Block draining for `duration` of elapsed tick time.
    pub fn suspend_for(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        self.suspended = true;
        self.cast_remaining = Some(duration);
    }

    pub fn resume(&mut self) {
        self.suspended = false;
        self.cast_remaining = None;
    }

    /// Run an effect through the engine and stay suspended for its cast time.
    /// Instant casts (`cast_time == 0`) do not suspend.
    pub fn cast(
        &mut self,
        hooks: &mut dyn EngineHooks,
        effect: EffectId,
        target: Target,
        cast_time: Duration,
    ) {
        hooks.perform_effect(self.id, effect, Some(target));
        self.suspend_for(cast_time);
    }

    // ─── Hook shorthands ────────────────────────────────────────────────────

    pub fn announce(&self, hooks: &mut dyn EngineHooks, line: LineId) {
        hooks.announce(self.id, line, None);
    }

    pub fn announce_to(&self, hooks: &mut dyn EngineHooks, line: LineId, subject: EntityId) {
        hooks.announce(self.id, line, Some(subject));
    }

    pub fn move_to(&self, hooks: &mut dyn EngineHooks, point: PointId) {
        hooks.request_movement(self.id, point);
    }

    // ─── Health ─────────────────────────────────────────────────────────────

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn set_health_pct(&mut self, pct: f32) {
        self.set_health_fraction(pct / 100.0);
    }

    pub fn set_health_fraction(&mut self, fraction: f32) {
        self.health.current = self.health.at_fraction(fraction);
    }

    pub fn restore_health(&mut self) {
        self.health.current = self.health.max;
    }

    /// Subtract `amount`, saturating at zero. Returns the damage actually taken.
    pub(crate) fn take_damage(&mut self, amount: u64) -> u64 {
        let applied = amount.min(self.health.current);
        self.health.current -= applied;
        applied
    }

    pub fn one_shots(&self) -> &OneShots {
        &self.one_shots
    }

    pub(crate) fn one_shots_mut(&mut self) -> &mut OneShots {
        &mut self.one_shots
    }

    // ─── References ─────────────────────────────────────────────────────────

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    pub fn victim(&self) -> Option<EntityId> {
        self.victim
    }

    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    pub fn set_interactable(&mut self, interactable: bool) {
        self.interactable = interactable;
    }
}
