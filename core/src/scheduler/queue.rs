//! Phase-scoped timed event queue
//!
//! Entries are keyed by `(due_at, seq)` on the queue's own monotonic clock, so
//! iteration order is "earliest due first, then first scheduled first".
//! Time only moves in [`EventQueue::advance`]; firing is a separate pull via
//! [`EventQueue::pop_due`], which lets callers re-check their own guards
//! between every single firing.
//!
//! # Drain passes
//!
//! A caller draining inside a tick brackets the loop with
//! [`EventQueue::begin_pass`] / [`EventQueue::end_pass`]. Entries scheduled
//! after the pass began are held back until the next pass, even with zero
//! delay, so a handler that re-arms itself immediately cannot spin forever.

use std::collections::BTreeMap;
use std::time::Duration;

use skirmish_types::{DelayRange, PurgePolicy, SchedulerConfig};

use super::delay::{RandomSource, SeededRandom};
use super::phase::{PhaseMask, PhaseSet};

/// Secondary tag for targeted cancellation, independent of phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u32);

#[derive(Debug, Clone)]
struct Entry<A, P> {
    action: A,
    phase_mask: P,
    group: Option<GroupId>,
}

/// Read-only view of a pending entry
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction<'a, A, P> {
    pub action: &'a A,
    pub remaining: Duration,
    pub phase_mask: P,
    pub group: Option<GroupId>,
}

#[derive(Debug)]
pub struct EventQueue<A, P = PhaseMask> {
    entries: BTreeMap<(Duration, u64), Entry<A, P>>,
    now: Duration,
    next_seq: u64,
    phase: P,
    policy: PurgePolicy,
    /// Entries with `seq >= horizon` are invisible to the running drain pass
    pass_horizon: Option<u64>,
    random: Box<dyn RandomSource>,
}

impl<A, P: PhaseSet> EventQueue<A, P> {
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self::with_policy(random, PurgePolicy::default())
    }

    pub fn with_policy(random: Box<dyn RandomSource>, policy: PurgePolicy) -> Self {
        Self {
            entries: BTreeMap::new(),
            now: Duration::ZERO,
            next_seq: 0,
            phase: P::empty(),
            policy,
            pass_horizon: None,
            random,
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::with_policy(
            Box::new(SeededRandom::from_seed_option(config.seed)),
            config.purge_policy,
        )
    }

    // ─── Scheduling ─────────────────────────────────────────────────────────

    /// Schedule a phase-agnostic action. Returns the sampled delay.
    pub fn schedule(&mut self, action: A, delay: DelayRange) -> Duration {
        self.schedule_with(action, delay, P::empty(), None)
    }

    /// Schedule an action that may only fire while `mask` is active.
    pub fn schedule_in_phase(&mut self, action: A, delay: DelayRange, mask: P) -> Duration {
        self.schedule_with(action, delay, mask, None)
    }

    pub fn schedule_with(
        &mut self,
        action: A,
        delay: DelayRange,
        mask: P,
        group: Option<GroupId>,
    ) -> Duration {
        let delay = self.random.sample_delay(delay);
        self.insert(action, delay, mask, group);
        delay
    }

    fn insert(&mut self, action: A, delay: Duration, phase_mask: P, group: Option<GroupId>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            (self.now + delay, seq),
            Entry {
                action,
                phase_mask,
                group,
            },
        );
    }

    // ─── Time & Firing ──────────────────────────────────────────────────────

    /// Move the clock forward. Never fires anything.
    pub fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;
    }

    /// Hold back everything scheduled from now on until the next pass.
    pub fn begin_pass(&mut self) {
        self.pass_horizon = Some(self.next_seq);
    }

    pub fn end_pass(&mut self) {
        self.pass_horizon = None;
    }

    /// Remove and return the earliest eligible due action, or `None` once
    /// nothing eligible is due.
    ///
    /// Under [`PurgePolicy::DropWhenDue`], due entries whose phase is not
    /// active are discarded on the way.
    pub fn pop_due(&mut self) -> Option<A> {
        let mut found = None;
        let mut stale = Vec::new();

        for (key, entry) in self.entries.range(..=(self.now, u64::MAX)) {
            if self.pass_horizon.is_some_and(|horizon| key.1 >= horizon) {
                continue;
            }
            if self.is_eligible(&entry.phase_mask) {
                found = Some(*key);
                break;
            }
            if self.policy == PurgePolicy::DropWhenDue {
                stale.push(*key);
            }
        }

        for key in stale {
            self.entries.remove(&key);
        }

        self.entries.remove(&found?).map(|entry| entry.action)
    }

    fn is_eligible(&self, mask: &P) -> bool {
        mask.is_empty() || mask.intersects(&self.phase)
    }

    // ─── Cancellation ───────────────────────────────────────────────────────

    /// Drop every entry in `group`. Returns how many were removed.
    pub fn cancel_group(&mut self, group: GroupId) -> usize {
        self.remove_where(|entry| entry.group == Some(group))
    }

    /// Drop every entry whose mask intersects `mask`. Phase-agnostic entries
    /// are never matched.
    pub fn cancel_phase(&mut self, mask: P) -> usize {
        self.remove_where(|entry| entry.phase_mask.intersects(&mask))
    }

    /// Drop every pending entry, reset the clock and leave all phases.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.now = Duration::ZERO;
        self.phase = P::empty();
        self.pass_horizon = None;
    }

    fn remove_where(&mut self, mut matches: impl FnMut(&Entry<A, P>) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !matches(entry));
        before - self.entries.len()
    }

    // ─── Phase ──────────────────────────────────────────────────────────────

    /// Switch the active phase using the queue's purge policy. Returns the
    /// number of purged entries.
    pub fn set_phase(&mut self, phase: P) -> usize {
        self.set_phase_with(phase, self.policy)
    }

    pub fn set_phase_with(&mut self, phase: P, policy: PurgePolicy) -> usize {
        self.phase = phase;
        match policy {
            PurgePolicy::PurgeExcluded => self.remove_where(|entry| {
                !entry.phase_mask.is_empty() && !entry.phase_mask.intersects(&phase)
            }),
            PurgePolicy::Retain | PurgePolicy::DropWhenDue => 0,
        }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    pub fn is_in_phase(&self, mask: P) -> bool {
        self.phase.intersects(&mask)
    }

    pub fn policy(&self) -> PurgePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: PurgePolicy) {
        self.policy = policy;
    }

    // ─── Inspection ─────────────────────────────────────────────────────────

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending entries in firing order
    pub fn iter(&self) -> impl Iterator<Item = PendingAction<'_, A, P>> {
        self.entries.iter().map(|(&(due_at, _), entry)| PendingAction {
            action: &entry.action,
            remaining: due_at.saturating_sub(self.now),
            phase_mask: entry.phase_mask,
            group: entry.group,
        })
    }

    pub fn random(&mut self) -> &mut dyn RandomSource {
        self.random.as_mut()
    }
}

impl<A: PartialEq, P: PhaseSet> EventQueue<A, P> {
    /// Drop every pending entry for `action`.
    pub fn cancel_action(&mut self, action: &A) -> usize {
        self.remove_where(|entry| entry.action == *action)
    }

    /// Time until the next pending entry for `action` would fire.
    pub fn remaining(&self, action: &A) -> Option<Duration> {
        self.iter()
            .find(|pending| pending.action == action)
            .map(|pending| pending.remaining)
    }

    pub fn contains(&self, action: &A) -> bool {
        self.entries.values().any(|entry| entry.action == *action)
    }
}
