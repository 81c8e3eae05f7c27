//! Recording engine hooks
//!
//! [`HookLog`] stands in for a real engine: every hook call is traced and
//! appended, stamped with the arena clock. Melee swings can be counted
//! instead of stored.

use std::time::Duration;

use tracing::{debug, trace};

use crate::hooks::{EngineHooks, Target};
use crate::ids::{EffectId, EntityId, LineId, PointId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    Effect {
        source: EntityId,
        effect: EffectId,
        target: Option<Target>,
    },
    Announce {
        source: EntityId,
        line: LineId,
        subject: Option<EntityId>,
    },
    RemoveEffect {
        holder: EntityId,
        effect: EffectId,
    },
    Move {
        source: EntityId,
        point: PointId,
    },
    Melee {
        source: EntityId,
        victim: EntityId,
    },
}

impl HookEvent {
    pub fn is_melee(&self) -> bool {
        matches!(self, HookEvent::Melee { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedHook {
    pub at: Duration,
    pub event: HookEvent,
}

#[derive(Debug)]
pub struct HookLog {
    entries: Vec<LoggedHook>,
    now: Duration,
    store_melee: bool,
    melee_swings: u64,
}

impl Default for HookLog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            now: Duration::ZERO,
            store_melee: true,
            melee_swings: 0,
        }
    }
}

impl HookLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether melee swings are appended to the entries. They are counted
    /// either way.
    pub fn set_store_melee(&mut self, store: bool) {
        self.store_melee = store;
    }

    pub fn stores_melee(&self) -> bool {
        self.store_melee
    }

    /// Every swing since the last [`clear`](Self::clear), stored or not
    pub fn melee_swings(&self) -> u64 {
        self.melee_swings
    }

    /// Timestamp applied to everything recorded from now on.
    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    pub fn entries(&self) -> &[LoggedHook] {
        &self.entries
    }

    /// Entries recorded at or after index `cursor`
    pub fn since(&self, cursor: usize) -> &[LoggedHook] {
        self.entries.get(cursor..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.melee_swings = 0;
    }

    /// When each `effect` was performed, in order
    pub fn effect_times(&self, effect: EffectId) -> Vec<Duration> {
        self.entries
            .iter()
            .filter(|entry| {
                matches!(entry.event, HookEvent::Effect { effect: e, .. } if e == effect)
            })
            .map(|entry| entry.at)
            .collect()
    }

    pub fn announcements(&self, line: LineId) -> usize {
        self.entries
            .iter()
            .filter(|entry| {
                matches!(entry.event, HookEvent::Announce { line: l, .. } if l == line)
            })
            .count()
    }

    /// Everything except auto-attacks, in order
    pub fn notable(&self) -> impl Iterator<Item = &LoggedHook> {
        self.entries.iter().filter(|entry| !entry.event.is_melee())
    }

    fn record(&mut self, event: HookEvent) {
        self.entries.push(LoggedHook {
            at: self.now,
            event,
        });
    }
}

impl EngineHooks for HookLog {
    fn perform_effect(&mut self, source: EntityId, effect: EffectId, target: Option<Target>) {
        debug!(at = ?self.now, %source, ?effect, ?target, "effect");
        self.record(HookEvent::Effect {
            source,
            effect,
            target,
        });
    }

    fn announce(&mut self, source: EntityId, line: LineId, subject: Option<EntityId>) {
        debug!(at = ?self.now, %source, ?line, ?subject, "announce");
        self.record(HookEvent::Announce {
            source,
            line,
            subject,
        });
    }

    fn remove_effect(&mut self, holder: EntityId, effect: EffectId) {
        debug!(at = ?self.now, %holder, ?effect, "remove effect");
        self.record(HookEvent::RemoveEffect { holder, effect });
    }

    fn request_movement(&mut self, source: EntityId, point: PointId) {
        debug!(at = ?self.now, %source, ?point, "movement requested");
        self.record(HookEvent::Move { source, point });
    }

    fn melee(&mut self, source: EntityId, victim: EntityId) {
        trace!(at = ?self.now, %source, %victim, "melee");
        self.melee_swings += 1;
        if self.store_melee {
            self.record(HookEvent::Melee { source, victim });
        }
    }
}
