//! End-to-end encounters through the arena

use std::time::Duration;

use skirmish_types::{DelayRange, EncounterConfig, Recurring, SchedulerConfig};

use super::caller::{self, DESCEND};
use super::corrupted;
use super::plunderer::{self, START_PHASE_2, effects};
use super::shadow_axe::{self, ShadowAxe};
use super::{ScriptKind, install_summons, spawn};
use crate::actor::{ActorCommand, ActorMachine, Lifecycle};
use crate::arena::{Arena, HookEvent, HookLog};
use crate::hooks::Target;
use crate::ids::{EffectId, EntityId, LineId};

const STEP: Duration = Duration::from_millis(100);

fn seeded() -> EncounterConfig {
    let mut config = EncounterConfig::default();
    config.scheduler.seed = Some(17);
    config
}

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

fn announced_by(log: &HookLog, source: EntityId, line: LineId) -> usize {
    log.entries()
        .iter()
        .filter(|e| match e.event {
            HookEvent::Announce { source: s, line: l, .. } => s == source && l == line,
            _ => false,
        })
        .count()
}

fn removed_from(log: &HookLog, holder: EntityId, effect: EffectId) -> bool {
    log.entries()
        .iter()
        .any(|e| e.event == HookEvent::RemoveEffect { holder, effect })
}

fn health_pct(arena: &Arena, id: EntityId) -> f32 {
    arena.status(id).map_or(0.0, |status| status.health_pct)
}

struct PlundererFight {
    arena: Arena,
    boss: EntityId,
    player: EntityId,
}

/// Boss engaged, knocked to 40%, then hit with a lethal blow at t=0.
fn defeated_plunderer() -> PlundererFight {
    defeated_plunderer_with(&seeded())
}

fn defeated_plunderer_with(config: &EncounterConfig) -> PlundererFight {
    let mut arena = Arena::new();
    install_summons(&mut arena, config);
    let player = arena.add_subject();
    let boss = spawn(&mut arena, ScriptKind::Plunderer, config);

    assert_eq!(arena.engage(boss, player), Some(true));
    assert_eq!(arena.damage(boss, 60_000), Some(60_000));
    assert_eq!(arena.damage(boss, 1_000_000), Some(0));

    PlundererFight {
        arena,
        boss,
        player,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Plunderer + Caller
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_plunderer_rises_with_caller() {
    let PlundererFight {
        mut arena, boss, ..
    } = defeated_plunderer();

    let status = arena.status(boss).expect("boss");
    assert_eq!(status.phase, format!("{:?}", plunderer::EVENT));
    assert_eq!(status.lifecycle, Lifecycle::Engaged);
    assert_eq!(announced_by(arena.log(), boss, plunderer::lines::DEATH), 1);

    // Banshee summoned three seconds after the scripted defeat
    arena.run(ms(2_900), STEP);
    assert_eq!(arena.actor_ids().len(), 1);
    arena.tick(STEP);
    assert_eq!(arena.log().effect_times(effects::SUMMON_BANSHEE), vec![secs(3)]);
    assert_eq!(arena.actor_ids().len(), 2);
    let banshee = arena.actor_ids()[1];
    assert_eq!(arena.status(banshee).map(|s| s.target), Some(Some(boss)));

    // She arrives two seconds later and starts the ritual
    arena.run(secs(2), STEP);
    assert_eq!(announced_by(arena.log(), banshee, caller::YELL_RESURRECT), 1);
    assert!(removed_from(arena.log(), boss, effects::SUMMON_BANSHEE));
    assert!(arena.log().entries().iter().any(|e| e.event
        == HookEvent::Effect {
            source: banshee,
            effect: caller::RESURRECTION_BEAM,
            target: Some(Target::Entity(boss)),
        }));
    assert_eq!(
        arena.status(banshee).map(|s| s.lifecycle),
        Some(Lifecycle::Sequence)
    );

    // Heal after eight seconds
    arena.run(ms(7_900), STEP);
    assert!((health_pct(&arena, boss) - 40.0).abs() < 0.01);
    arena.tick(STEP);
    assert!((health_pct(&arena, boss) - 100.0).abs() < 0.01);
    assert!(removed_from(arena.log(), boss, effects::FEIGN_DEATH));

    // Transformation command three seconds later
    arena.run(secs(3), STEP);
    assert_eq!(arena.log().effect_times(effects::TRANSFORM), vec![secs(16)]);
    assert!(removed_from(arena.log(), boss, caller::RESURRECTION_DUMMY));

    // Undead form half a second after the transform
    arena.run(ms(400), STEP);
    assert_eq!(
        arena.status(boss).map(|s| s.phase),
        Some(format!("{:?}", plunderer::EVENT))
    );
    arena.tick(STEP);
    let status = arena.status(boss).expect("boss");
    assert_eq!(status.phase, format!("{:?}", plunderer::UNDEAD));
    assert_eq!(status.lifecycle, Lifecycle::Engaged);
    assert_eq!(announced_by(arena.log(), boss, plunderer::lines::AGGRO), 2);

    // Dreadful roar opens the second form on the next tick
    arena.tick(STEP);
    assert_eq!(
        arena.log().effect_times(effects::DREADFUL_ROAR),
        vec![ms(16_600)]
    );

    // The banshee flies off and is gone two seconds after the command
    arena.run(ms(1_300), STEP);
    assert!(arena.contains(banshee));
    arena.tick(STEP);
    assert!(!arena.contains(banshee));
    assert_eq!(arena.clock(), secs(18));
}

#[test]
fn test_no_melee_during_scripted_defeat() {
    let PlundererFight {
        mut arena,
        boss,
        player,
    } = defeated_plunderer();

    arena.run(secs(2), STEP);

    let swung = arena.log().entries().iter().any(|e| {
        e.event
            == HookEvent::Melee {
                source: boss,
                victim: player,
            }
    });
    assert!(!swung);
}

#[test]
fn test_caller_tolerates_partner_destroyed_mid_ritual() {
    let PlundererFight {
        mut arena, boss, ..
    } = defeated_plunderer();
    arena.run(secs(5), STEP);
    let banshee = arena.actor_ids()[1];

    assert!(arena.remove(boss));
    arena.run(secs(13), STEP);

    assert!(!removed_from(arena.log(), boss, effects::FEIGN_DEATH));
    assert!(arena.log().effect_times(effects::TRANSFORM).is_empty());
    assert!(!arena.contains(banshee), "the banshee still leaves");
}

#[test]
fn test_caller_skips_beam_when_partner_gone_before_arrival() {
    let PlundererFight {
        mut arena, boss, ..
    } = defeated_plunderer();
    arena.run(secs(4), STEP);
    let banshee = arena.actor_ids()[1];

    arena.remove(boss);
    arena.run(secs(1), STEP);

    assert_eq!(announced_by(arena.log(), banshee, caller::YELL_RESURRECT), 1);
    assert!(
        arena
            .log()
            .effect_times(caller::RESURRECTION_BEAM)
            .is_empty()
    );
    assert_eq!(
        arena.status(banshee).map(|s| s.lifecycle),
        Some(Lifecycle::Sequence)
    );
    assert!(
        arena
            .log()
            .entries()
            .iter()
            .any(|e| e.event == HookEvent::Move { source: banshee, point: DESCEND })
    );
}

#[test]
fn test_undead_plunderer_dies_for_real() {
    let PlundererFight {
        mut arena, boss, ..
    } = defeated_plunderer();

    arena.command(boss, ActorCommand::Action(START_PHASE_2));
    arena.run(ms(500), STEP);
    assert_eq!(
        arena.status(boss).map(|s| s.phase),
        Some(format!("{:?}", plunderer::UNDEAD))
    );

    assert_eq!(arena.damage(boss, 1_000_000), Some(40_000));
    assert_eq!(
        arena.status(boss).map(|s| s.lifecycle),
        Some(Lifecycle::Dead)
    );
    assert_eq!(announced_by(arena.log(), boss, plunderer::lines::DEATH), 2);
}

#[test]
fn test_reset_mid_event_restores_attackable_human() {
    let PlundererFight {
        mut arena,
        boss,
        player,
    } = defeated_plunderer();
    arena.run(secs(1), STEP);
    let cursor = arena.log().len();

    arena.reset(boss);

    let undone: Vec<HookEvent> = arena.log().since(cursor).iter().map(|e| e.event).collect();
    assert_eq!(
        undone,
        vec![
            HookEvent::RemoveEffect {
                holder: boss,
                effect: effects::FEIGN_DEATH,
            },
            HookEvent::Effect {
                source: boss,
                effect: effects::BECOME_ATTACKABLE,
                target: Some(Target::Itself),
            },
        ]
    );
    let status = arena.status(boss).expect("boss");
    assert_eq!(status.lifecycle, Lifecycle::Idle);
    assert!(status.pending.is_empty());

    // The scripted defeat is available again
    assert_eq!(arena.engage(boss, player), Some(true));
    assert_eq!(arena.damage(boss, 1_000_000), Some(0));
    assert_eq!(announced_by(arena.log(), boss, plunderer::lines::DEATH), 2);
}

#[test]
fn test_reset_reverts_transform() {
    let PlundererFight {
        mut arena, boss, ..
    } = defeated_plunderer();
    arena.command(boss, ActorCommand::Action(START_PHASE_2));
    arena.run(ms(200), STEP);
    let cursor = arena.log().len();

    arena.reset(boss);

    let undone: Vec<HookEvent> = arena.log().since(cursor).iter().map(|e| e.event).collect();
    assert_eq!(
        undone,
        vec![
            HookEvent::RemoveEffect {
                holder: boss,
                effect: effects::TRANSFORM,
            },
            HookEvent::Effect {
                source: boss,
                effect: effects::BECOME_ATTACKABLE,
                target: Some(Target::Itself),
            },
        ]
    );
}

#[test]
fn test_fresh_plunderer_reset_is_silent() {
    let config = seeded();
    let mut arena = Arena::new();
    let boss = spawn(&mut arena, ScriptKind::Plunderer, &config);
    arena.reset(boss);

    assert!(arena.log().is_empty());
}

#[test]
fn test_shadow_axe_lands_then_vanishes() {
    let mut config = seeded();
    // Keep the boss free of long casts so the throw is on time
    config.plunderer.dark_smash = Recurring::uniform(DelayRange::secs(120));
    let PlundererFight {
        mut arena, boss, ..
    } = defeated_plunderer_with(&config);
    arena.command(boss, ActorCommand::Action(START_PHASE_2));

    // Thrown thirty seconds into the second form
    arena.run(ms(30_500), STEP);
    assert_eq!(
        arena.log().effect_times(effects::SHADOW_AXE_SUMMON),
        vec![ms(30_500)]
    );
    assert_eq!(arena.actor_ids().len(), 2);
    let axe = arena.actor_ids()[1];
    assert_eq!(arena.status(axe).map(|s| s.name), Some("shadow_axe"));
    assert!(arena.log().entries().iter().any(|e| e.event
        == HookEvent::Move {
            source: axe,
            point: shadow_axe::THROW_TARGET,
        }));

    // Lands after the travel time and starts damaging
    arena.run(secs(2), STEP);
    assert_eq!(
        arena.log().effect_times(shadow_axe::SHADOW_AXE_PERIODIC_DAMAGE),
        vec![ms(32_500)]
    );
    assert!(arena.log().entries().iter().any(|e| e.event
        == HookEvent::Effect {
            source: axe,
            effect: shadow_axe::SHADOW_AXE_PERIODIC_DAMAGE,
            target: Some(Target::Itself),
        }));

    // Gone ten seconds after landing
    arena.run(ms(9_900), STEP);
    assert!(arena.contains(axe));
    arena.tick(STEP);
    assert!(!arena.contains(axe));
}

#[test]
fn test_shadow_axe_without_aim_vanishes() {
    let mut arena = Arena::new();
    let id = arena.allocate_id();
    let axe = ShadowAxe::new(None, DelayRange::secs(10));
    arena.spawn(Box::new(ActorMachine::new(id, 1, axe, &SchedulerConfig::default())));

    assert!(!arena.contains(id));
    assert!(arena.log().is_empty());
}

#[test]
fn test_plunderer_taunts_only_player_kills() {
    let config = seeded();
    let mut arena = Arena::new();
    let player = arena.add_subject();
    let boss = spawn(&mut arena, ScriptKind::Plunderer, &config);
    arena.engage(boss, player);

    arena.killed_unit(boss, EntityId(999), false);
    assert_eq!(announced_by(arena.log(), boss, plunderer::lines::SLAY), 0);
    arena.killed_unit(boss, player, true);
    assert_eq!(announced_by(arena.log(), boss, plunderer::lines::SLAY), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Corrupted
// ═══════════════════════════════════════════════════════════════════════════

fn corrupted_arena(config: &EncounterConfig) -> (Arena, EntityId, EntityId) {
    let mut arena = Arena::new();
    let player = arena.add_subject();
    let dragon = spawn(&mut arena, ScriptKind::Corrupted, config);
    (arena, dragon, player)
}

#[test]
fn test_corrupted_speech_then_fight() {
    let (mut arena, dragon, player) = corrupted_arena(&seeded());
    assert_eq!(arena.status(dragon).map(|s| s.interactable), Some(true));

    assert_eq!(arena.interact(dragon, player, 1), Some(false));
    assert_eq!(arena.interact(dragon, player, 0), Some(true));
    assert_eq!(arena.interact(dragon, player, 0), Some(false));

    arena.run(ms(40_900), STEP);
    assert_eq!(
        arena.status(dragon).map(|s| s.lifecycle),
        Some(Lifecycle::Sequence)
    );
    assert_eq!(announced_by(arena.log(), dragon, corrupted::LINE_3), 1);
    assert!(arena.log().effect_times(corrupted::ESSENCE_OF_THE_RED).is_empty());

    arena.tick(STEP);
    let status = arena.status(dragon).expect("dragon");
    assert_eq!(status.lifecycle, Lifecycle::Engaged);
    assert!((status.health_pct - 30.0).abs() < 0.01);
    assert_eq!(
        arena.log().effect_times(corrupted::ESSENCE_OF_THE_RED),
        vec![secs(41)]
    );
    assert_eq!(
        arena.log().effect_times(corrupted::TURN_HOSTILE),
        vec![secs(41)]
    );

    arena.run(secs(15), STEP);
    assert_eq!(arena.log().effect_times(corrupted::CLEAVE), vec![secs(51)]);
    assert_eq!(
        arena.log().effect_times(corrupted::FLAME_BREATH),
        vec![secs(56)]
    );

    arena.run(secs(20), STEP);
    let breaths = arena.log().effect_times(corrupted::FLAME_BREATH);
    assert!(breaths.len() >= 2);
    for pair in breaths.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= secs(8) && gap <= secs(14), "gap {gap:?}");
    }
}

#[test]
fn test_corrupted_yells_once_below_threshold() {
    let (mut arena, dragon, player) = corrupted_arena(&seeded());
    arena.engage(dragon, player);

    arena.damage(dragon, 10_000);
    assert_eq!(announced_by(arena.log(), dragon, corrupted::LOW_HEALTH_YELL), 0);

    arena.damage(dragon, 10_000);
    assert_eq!(announced_by(arena.log(), dragon, corrupted::LOW_HEALTH_YELL), 1);

    arena.damage(dragon, 1_000);
    arena.run(secs(2), STEP);
    assert_eq!(announced_by(arena.log(), dragon, corrupted::LOW_HEALTH_YELL), 1);
}

#[test]
fn test_melee_counted_when_not_logged() {
    let (mut arena, dragon, player) = corrupted_arena(&seeded());
    arena.set_melee_logging(false);
    arena.engage(dragon, player);

    arena.run(secs(2), STEP);

    assert!(!arena.log().entries().iter().any(|e| e.event.is_melee()));
    assert_eq!(arena.log().melee_swings(), 20);
}

#[test]
fn test_corrupted_kill_taunt_addresses_victim() {
    let mut config = seeded();
    config.corrupted.kill_taunt_one_in = 1;
    let (mut arena, dragon, player) = corrupted_arena(&config);
    arena.engage(dragon, player);

    arena.killed_unit(dragon, player, true);

    assert!(arena.log().entries().iter().any(|e| e.event
        == HookEvent::Announce {
            source: dragon,
            line: corrupted::KILL_TAUNT,
            subject: Some(player),
        }));
}

#[test]
fn test_corrupted_reset_allows_another_conversation() {
    let (mut arena, dragon, player) = corrupted_arena(&seeded());
    arena.interact(dragon, player, 0);
    arena.run(secs(45), STEP);
    arena.kill(dragon);
    assert_eq!(
        arena.status(dragon).map(|s| s.lifecycle),
        Some(Lifecycle::Dead)
    );

    arena.reset(dragon);

    assert_eq!(
        arena.log().effect_times(corrupted::TURN_FRIENDLY),
        vec![Duration::ZERO, secs(45)]
    );
    let status = arena.status(dragon).expect("dragon");
    assert_eq!(status.lifecycle, Lifecycle::Idle);
    assert!(status.interactable);
    assert!(status.pending.is_empty());
    assert_eq!(arena.interact(dragon, player, 0), Some(true));
}

#[test]
fn test_every_kind_builds() {
    let config = EncounterConfig::default();
    let mut arena = Arena::new();
    for kind in ScriptKind::ALL {
        let id = spawn(&mut arena, kind, &config);
        assert_eq!(arena.status(id).map(|s| s.name), Some(kind.name()));
    }
}
