//! One-shot triggers
//!
//! Health thresholds fire at most once per actor lifecycle. Consumption is
//! tracked centrally in [`OneShots`] rather than as scattered booleans.

use hashbrown::HashSet;

/// Identifier of a one-shot trigger, unique within one script
pub type TriggerId = &'static str;

/// Fires once when health drops below `below_pct` percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthTrigger {
    pub id: TriggerId,
    pub below_pct: f32,
}

impl HealthTrigger {
    pub const fn below(id: TriggerId, below_pct: f32) -> Self {
        Self { id, below_pct }
    }
}

/// Phase-gated death override.
///
/// Damage that would kill the actor while `guard` is active moves it into
/// `defeat` instead. While `defeat` is active all damage is clamped to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefeatOverride<P> {
    pub guard: P,
    pub defeat: P,
}

/// Consumed trigger markers. Cleared only on full actor reset.
#[derive(Debug, Clone, Default)]
pub struct OneShots {
    consumed: HashSet<TriggerId>,
}

impl OneShots {
    /// Mark `id` consumed. Returns true only the first time.
    pub fn consume(&mut self, id: TriggerId) -> bool {
        self.consumed.insert(id)
    }

    pub fn is_consumed(&self, id: TriggerId) -> bool {
        self.consumed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }

    pub fn clear(&mut self) {
        self.consumed.clear();
    }
}

/// Consume and return every trigger that `pct` is below and that has not
/// fired yet, in declaration order.
pub fn consume_crossed(
    triggers: &[HealthTrigger],
    pct: f32,
    one_shots: &mut OneShots,
) -> Vec<TriggerId> {
    triggers
        .iter()
        .filter(|trigger| pct < trigger.below_pct)
        .filter(|trigger| one_shots.consume(trigger.id))
        .map(|trigger| trigger.id)
        .collect()
}
