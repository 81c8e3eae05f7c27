use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use phf::phf_map;
use skirmish_core::arena::LoggedHook;
use skirmish_core::{ActorStatus, HookEvent, ScriptKind, scripts};

use crate::context::CliContext;
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawnable {
    Script(ScriptKind),
    /// A non-scripted subject that scripts can engage and target
    Subject,
}

pub static SPAWNABLE: phf::Map<&'static str, Spawnable> = phf_map! {
    "plunderer" => Spawnable::Script(ScriptKind::Plunderer),
    "corrupted" => Spawnable::Script(ScriptKind::Corrupted),
    "player" => Spawnable::Subject,
};

fn known_names() -> String {
    let mut names: Vec<&str> = SPAWNABLE.keys().copied().collect();
    names.sort_unstable();
    names.join(", ")
}

pub fn spawn(name: &str, ctx: &mut CliContext) -> Result<(), CliError> {
    let Some(&kind) = SPAWNABLE.get(name) else {
        return Err(CliError::UnknownScript {
            name: name.to_string(),
            known: known_names(),
        });
    };

    let id = match kind {
        Spawnable::Script(kind) => scripts::spawn(&mut ctx.arena, kind, &ctx.config),
        Spawnable::Subject => ctx.arena.add_subject(),
    };
    println!("spawned {name} as {id}");
    Ok(())
}

pub fn engage(actor: u64, subject: u64, ctx: &mut CliContext) -> Result<(), CliError> {
    let actor = ctx.require_actor(actor)?;
    let subject = ctx.require_subject(subject)?;
    match ctx.arena.engage(actor, subject) {
        Some(true) => println!("{actor} engaged {subject}"),
        _ => println!("{actor} ignored the engagement"),
    }
    Ok(())
}

pub fn damage(actor: u64, amount: u64, ctx: &mut CliContext) -> Result<(), CliError> {
    let actor = ctx.require_actor(actor)?;
    let applied = ctx.arena.damage(actor, amount).unwrap_or(0);
    println!("{actor} took {applied} of {amount}");
    print_status(ctx, actor.0)
}

pub fn interact(
    actor: u64,
    subject: u64,
    option: u32,
    ctx: &mut CliContext,
) -> Result<(), CliError> {
    let actor = ctx.require_actor(actor)?;
    let subject = ctx.require_subject(subject)?;
    match ctx.arena.interact(actor, subject, option) {
        Some(true) => println!("{subject} started a sequence with {actor}"),
        _ => println!("{actor} has nothing to say"),
    }
    Ok(())
}

/// Advance by one step, or by `ms` if given.
pub fn tick(ms: Option<u64>, ctx: &mut CliContext) -> Result<(), CliError> {
    let elapsed = ms.map_or_else(|| ctx.step(), Duration::from_millis);
    let before = ctx.arena.log().len();
    ctx.arena.tick(elapsed);
    print_new_events(ctx, before);
    Ok(())
}

/// Advance by `ms` in settings-sized steps.
pub fn run(ms: u64, ctx: &mut CliContext) -> Result<(), CliError> {
    let step = ctx.step();
    let before = ctx.arena.log().len();
    ctx.arena.run(Duration::from_millis(ms), step);
    print_new_events(ctx, before);
    println!("clock {}", format_time(ctx.arena.clock()));
    Ok(())
}

pub fn kill(actor: u64, ctx: &mut CliContext) -> Result<(), CliError> {
    let actor = ctx.require_actor(actor)?;
    ctx.arena.kill(actor);
    print_status(ctx, actor.0)
}

/// Reset one actor, or rebuild the whole arena.
pub fn reset(actor: Option<u64>, ctx: &mut CliContext) -> Result<(), CliError> {
    match actor {
        Some(actor) => {
            let actor = ctx.require_actor(actor)?;
            ctx.arena.reset(actor);
            print_status(ctx, actor.0)
        }
        None => {
            ctx.rebuild();
            println!("arena cleared");
            Ok(())
        }
    }
}

pub fn status(actor: Option<u64>, ctx: &CliContext) -> Result<(), CliError> {
    match actor {
        Some(actor) => print_status(ctx, actor),
        None => {
            let statuses = ctx.arena.statuses();
            if statuses.is_empty() {
                println!("no actors");
            }
            for status in statuses {
                println!("{}", format_status(&status));
            }
            println!("clock {}", format_time(ctx.arena.clock()));
            Ok(())
        }
    }
}

fn print_status(ctx: &CliContext, actor: u64) -> Result<(), CliError> {
    let id = ctx.require_actor(actor)?;
    if let Some(status) = ctx.arena.status(id) {
        println!("{}", format_status(&status));
    }
    Ok(())
}

/// Print the last `last` log entries. Melee swings are hidden unless asked for.
pub fn show_log(last: usize, melee: bool, ctx: &CliContext) -> Result<(), CliError> {
    let log = ctx.arena.log();
    let entries: Vec<&LoggedHook> = log
        .entries()
        .iter()
        .filter(|entry| melee || !entry.event.is_melee())
        .collect();
    let skip = entries.len().saturating_sub(last);
    for entry in &entries[skip..] {
        println!("{}", format_event(entry));
    }
    if melee && !log.stores_melee() {
        println!("{} melee swings (not stored)", log.melee_swings());
    }
    Ok(())
}

pub fn show_config(ctx: &CliContext) -> Result<(), CliError> {
    let s = &ctx.settings;
    println!("seed:           {}", display_opt(s.seed));
    println!("tick_ms:        {}", s.tick_ms);
    println!("travel_ms:      {}", s.travel_ms);
    println!(
        "encounter_file: {}",
        s.encounter_file
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string())
    );
    println!("log_melee:      {}", s.log_melee);
    println!("purge_policy:   {:?}", ctx.config.scheduler.purge_policy);
    Ok(())
}

pub fn load_config(path: PathBuf, ctx: &mut CliContext) -> Result<(), CliError> {
    ctx.load_encounter(path)?;
    println!("encounter loaded; arena cleared");
    Ok(())
}

pub fn set_seed(seed: Option<u64>, ctx: &mut CliContext) -> Result<(), CliError> {
    ctx.set_seed(seed)?;
    println!("seed {}; arena cleared", display_opt(seed));
    Ok(())
}

pub fn set_tick(ms: u64, ctx: &mut CliContext) -> Result<(), CliError> {
    ctx.settings.tick_ms = ms.max(1);
    ctx.settings.save()
}

pub fn set_travel(ms: u64, ctx: &mut CliContext) -> Result<(), CliError> {
    ctx.settings.travel_ms = ms;
    ctx.rebuild();
    println!("arena cleared");
    ctx.settings.save()
}

pub fn set_melee_logging(enabled: bool, ctx: &mut CliContext) -> Result<(), CliError> {
    ctx.settings.log_melee = enabled;
    ctx.arena.set_melee_logging(enabled);
    ctx.settings.save()
}

pub fn exit() {
    let mut stdout = std::io::stdout();
    write!(stdout, "quitting...").ok();
    stdout.flush().ok();
}

// ─── Formatting ─────────────────────────────────────────────────────────────

fn display_opt(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn format_time(at: Duration) -> String {
    format!("{:.3}s", at.as_secs_f64())
}

fn print_new_events(ctx: &CliContext, since: usize) {
    for entry in ctx.arena.log().since(since) {
        if !entry.event.is_melee() {
            println!("{}", format_event(entry));
        }
    }
}

pub fn format_status(status: &ActorStatus) -> String {
    let mut out = format!(
        "{} {:<10} {:<9} hp {:>5.1}%  phase {}",
        status.id,
        status.name,
        format!("{:?}", status.lifecycle),
        status.health_pct,
        status.phase
    );
    if status.suspended {
        out.push_str("  casting");
    }
    if status.interactable {
        out.push_str("  interactable");
    }
    if let Some(target) = status.target {
        out.push_str(&format!("  target {target}"));
    }
    for (action, remaining) in &status.pending {
        out.push_str(&format!("\n    {action:<18} in {}", format_time(*remaining)));
    }
    out
}

pub fn format_event(entry: &LoggedHook) -> String {
    let what = match entry.event {
        HookEvent::Effect {
            source,
            effect,
            target,
        } => match target {
            Some(target) => format!("{source} effect {} on {target:?}", effect.0),
            None => format!("{source} effect {}", effect.0),
        },
        HookEvent::Announce {
            source,
            line,
            subject,
        } => match subject {
            Some(subject) => format!("{source} says line {} to {subject}", line.0),
            None => format!("{source} says line {}", line.0),
        },
        HookEvent::RemoveEffect { holder, effect } => {
            format!("{holder} loses effect {}", effect.0)
        }
        HookEvent::Move { source, point } => format!("{source} moves to point {}", point.0),
        HookEvent::Melee { source, victim } => format!("{source} swings at {victim}"),
    };
    format!("[{:>9}] {what}", format_time(entry.at))
}
