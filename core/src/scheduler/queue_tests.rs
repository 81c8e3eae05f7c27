//! Tests for EventQueue ordering, phase filtering and cancellation

use std::time::Duration;

use proptest::prelude::*;
use skirmish_types::PurgePolicy;

use super::{DelayRange, Earliest, EventQueue, GroupId, PhaseMask, SeededRandom};

const P1: PhaseMask = PhaseMask::bit(1);
const P2: PhaseMask = PhaseMask::bit(2);

fn queue() -> EventQueue<&'static str> {
    EventQueue::new(Box::new(Earliest))
}

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn drain(queue: &mut EventQueue<&'static str>) -> Vec<&'static str> {
    std::iter::from_fn(|| queue.pop_due()).collect()
}

#[test]
fn test_nothing_fires_before_delay() {
    let mut q = queue();
    q.schedule("cleave", DelayRange::secs(10));

    q.advance(ms(9_999));
    assert_eq!(q.pop_due(), None);
    assert_eq!(q.remaining(&"cleave"), Some(ms(1)));

    q.advance(ms(1));
    assert_eq!(q.pop_due(), Some("cleave"));
    assert_eq!(q.pop_due(), None);
    assert!(q.is_empty());
}

#[test]
fn test_most_overdue_fires_first() {
    let mut q = queue();
    q.schedule("late", DelayRange::secs(5));
    q.schedule("early", DelayRange::secs(2));

    q.advance(ms(10_000));
    assert_eq!(drain(&mut q), vec!["early", "late"]);
}

#[test]
fn test_ties_break_by_schedule_order() {
    let mut q = queue();
    q.schedule("first", DelayRange::ZERO);
    q.schedule("second", DelayRange::ZERO);
    q.schedule("third", DelayRange::ZERO);

    assert_eq!(drain(&mut q), vec!["first", "second", "third"]);
}

#[test]
fn test_duplicates_coexist() {
    let mut q = queue();
    q.schedule("nova", DelayRange::secs(1));
    q.schedule("nova", DelayRange::secs(1));
    assert_eq!(q.len(), 2);

    q.advance(ms(1_000));
    assert_eq!(drain(&mut q), vec!["nova", "nova"]);
}

#[test]
fn test_pass_holds_back_entries_scheduled_mid_pass() {
    let mut q = queue();
    q.schedule("roar", DelayRange::ZERO);

    q.begin_pass();
    assert_eq!(q.pop_due(), Some("roar"));
    // Handler re-arms itself with zero delay
    q.schedule("roar", DelayRange::ZERO);
    assert_eq!(q.pop_due(), None, "re-armed entry must wait for the next pass");
    q.end_pass();

    q.begin_pass();
    assert_eq!(q.pop_due(), Some("roar"));
    q.end_pass();
}

#[test]
fn test_phase_mask_gates_firing() {
    let mut q = queue();
    q.set_phase(P1);
    q.schedule_in_phase("p1", DelayRange::ZERO, P1);
    q.schedule_in_phase("p2", DelayRange::ZERO, P2);
    q.schedule("any", DelayRange::ZERO);

    assert_eq!(drain(&mut q), vec!["p1", "any"]);
}

#[test]
fn test_empty_phase_only_runs_agnostic_entries() {
    let mut q = queue();
    q.schedule_in_phase("scoped", DelayRange::ZERO, P1);
    q.schedule("any", DelayRange::ZERO);

    assert_eq!(drain(&mut q), vec!["any"]);
    assert_eq!(q.len(), 1);
}

#[test]
fn test_purge_excluded_drops_other_phases() {
    let mut q = queue();
    q.set_phase(P1);
    q.schedule_in_phase("p1", DelayRange::secs(1), P1);
    q.schedule_in_phase("both", DelayRange::secs(1), P1 | P2);
    q.schedule("any", DelayRange::secs(1));

    let purged = q.set_phase(P2);
    assert_eq!(purged, 1);

    q.advance(ms(1_000));
    assert_eq!(drain(&mut q), vec!["both", "any"]);
}

#[test]
fn test_retain_keeps_entries_dormant() {
    let mut q: EventQueue<&'static str> =
        EventQueue::with_policy(Box::new(Earliest), PurgePolicy::Retain);
    q.set_phase(P1);
    q.schedule_in_phase("p1", DelayRange::secs(1), P1);

    assert_eq!(q.set_phase(P2), 0);
    q.advance(ms(5_000));
    assert_eq!(q.pop_due(), None);
    assert_eq!(q.len(), 1);

    q.set_phase(P1);
    assert_eq!(q.pop_due(), Some("p1"));
}

#[test]
fn test_pop_due_passes_over_dormant_entries() {
    let mut q: EventQueue<&'static str> =
        EventQueue::with_policy(Box::new(Earliest), PurgePolicy::Retain);
    q.set_phase(P1);
    q.schedule_in_phase("p1", DelayRange::secs(1), P1);
    q.schedule_in_phase("p2", DelayRange::secs(2), P2);
    q.set_phase(P2);

    q.advance(ms(2_000));
    assert_eq!(q.pop_due(), Some("p2"));
    assert_eq!(q.pop_due(), None);
    assert_eq!(q.len(), 1, "the dormant entry is still queued");
}

#[test]
fn test_drop_when_due_discards_excluded_entries() {
    let mut q: EventQueue<&'static str> =
        EventQueue::with_policy(Box::new(Earliest), PurgePolicy::DropWhenDue);
    q.set_phase(P1);
    q.schedule_in_phase("p1", DelayRange::secs(1), P1);
    q.schedule_in_phase("p1_later", DelayRange::secs(10), P1);

    q.set_phase(P2);
    assert_eq!(q.len(), 2, "nothing is purged on the phase change itself");

    q.advance(ms(1_000));
    assert_eq!(q.pop_due(), None);
    assert_eq!(q.len(), 1, "the due entry was discarded");

    q.set_phase(P1);
    q.advance(ms(9_000));
    assert_eq!(q.pop_due(), Some("p1_later"));
}

#[test]
fn test_set_phase_with_overrides_policy() {
    let mut q = queue();
    q.set_phase(P1);
    q.schedule_in_phase("p1", DelayRange::secs(1), P1);

    assert_eq!(q.set_phase_with(P2, PurgePolicy::Retain), 0);
    assert_eq!(q.policy(), PurgePolicy::PurgeExcluded);
    assert_eq!(q.len(), 1);
}

#[test]
fn test_cancel_group_and_phase() {
    let mut q = queue();
    let adds = GroupId(7);
    q.schedule_with("add_1", DelayRange::secs(1), PhaseMask::NONE, Some(adds));
    q.schedule_with("add_2", DelayRange::secs(2), P1, Some(adds));
    q.schedule_in_phase("p1", DelayRange::secs(3), P1);
    q.schedule("any", DelayRange::secs(4));

    assert_eq!(q.cancel_group(adds), 2);
    assert_eq!(q.cancel_phase(P1), 1);
    assert_eq!(q.len(), 1);
    assert!(q.contains(&"any"));
}

#[test]
fn test_cancel_action_removes_all_copies() {
    let mut q = queue();
    q.schedule("cleave", DelayRange::secs(1));
    q.schedule("cleave", DelayRange::secs(2));
    q.schedule("smash", DelayRange::secs(3));

    assert_eq!(q.cancel_action(&"cleave"), 2);
    assert!(!q.contains(&"cleave"));
}

#[test]
fn test_reset_clears_everything() {
    let mut q = queue();
    q.set_phase(P1);
    q.schedule("any", DelayRange::secs(1));
    q.advance(ms(500));

    q.reset();
    assert!(q.is_empty());
    assert_eq!(q.phase(), PhaseMask::NONE);
    assert_eq!(q.now(), Duration::ZERO);
}

#[test]
fn test_ranged_delay_sampled_at_schedule_time() {
    let mut q: EventQueue<&'static str> = EventQueue::new(Box::new(SeededRandom::new(3)));
    let drawn = q.schedule("breath", DelayRange::secs_between(8, 14));
    assert!(drawn >= ms(8_000) && drawn <= ms(14_000));
    assert_eq!(q.remaining(&"breath"), Some(drawn));
}

#[test]
fn test_iter_reports_remaining_in_firing_order() {
    let mut q = queue();
    q.schedule("b", DelayRange::secs(5));
    q.schedule("a", DelayRange::secs(2));
    q.advance(ms(1_000));

    let pending: Vec<_> = q.iter().map(|p| (*p.action, p.remaining)).collect();
    assert_eq!(pending, vec![("a", ms(1_000)), ("b", ms(4_000))]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_fixed_delay_fires_once_at_first_covering_pop(
        delay_ms in 0u64..20_000,
        steps in prop::collection::vec(1u64..3_000, 1..40),
    ) {
        let mut q: EventQueue<u8> = EventQueue::new(Box::new(Earliest));
        q.schedule(1, DelayRange::millis(delay_ms));

        let mut fired_at = Vec::new();
        let mut checkpoints = vec![0u64];
        let mut elapsed = 0u64;
        if q.pop_due().is_some() {
            fired_at.push(elapsed);
        }
        for step in steps {
            elapsed += step;
            checkpoints.push(elapsed);
            q.advance(Duration::from_millis(step));
            while q.pop_due().is_some() {
                fired_at.push(elapsed);
            }
        }

        let expected: Vec<u64> = checkpoints
            .into_iter()
            .find(|&at| at >= delay_ms)
            .into_iter()
            .collect();
        prop_assert_eq!(fired_at, expected);
    }

    #[test]
    fn prop_purged_phase_never_fires(
        entries in prop::collection::vec((0u32..16, 0u64..10_000), 1..50),
        new_phase in 1u32..16,
    ) {
        let mut q: EventQueue<u32> = EventQueue::new(Box::new(Earliest));
        q.set_phase(PhaseMask::from_bits(0b1111));
        for (mask, delay) in &entries {
            q.schedule_in_phase(*mask, DelayRange::millis(*delay), PhaseMask::from_bits(*mask));
        }

        let active = PhaseMask::from_bits(new_phase);
        q.set_phase(active);
        q.advance(Duration::from_secs(60));

        while let Some(mask) = q.pop_due() {
            prop_assert!(mask == 0 || mask & new_phase != 0);
        }
    }
}
