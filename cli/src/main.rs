use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skirmish_cli::{CliContext, CliError, Settings, commands, logging, readline};

fn main() -> Result<(), CliError> {
    logging::init();
    let mut ctx = CliContext::new(Settings::load());

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "scripted encounter simulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn a script (plunderer, corrupted) or a player
    Spawn { name: String },
    Engage { actor: u64, subject: u64 },
    Damage { actor: u64, amount: u64 },
    Interact {
        actor: u64,
        subject: u64,
        #[arg(default_value_t = 0)]
        option: u32,
    },
    /// Advance one step, or by the given milliseconds
    Tick { ms: Option<u64> },
    /// Advance by the given milliseconds in steps
    Run { ms: u64 },
    Kill { actor: u64 },
    /// Reset one actor, or clear the arena
    Reset { actor: Option<u64> },
    Status { actor: Option<u64> },
    Log {
        #[arg(short = 'n', long, default_value_t = 20)]
        last: usize,
        /// Include melee swings
        #[arg(short, long)]
        melee: bool,
    },
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    Exit,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load encounter tuning from a TOML file
    Load { path: PathBuf },
    /// Set the scheduler seed; omit to seed from the OS
    Seed { seed: Option<u64> },
    /// Step length for tick and run
    Tick { ms: u64 },
    /// Movement travel time
    Travel { ms: u64 },
    /// Keep melee swings in the log
    Melee {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, CliError> {
    let mut args = shlex::split(line).ok_or(CliError::Quoting)?;
    args.insert(0, "skirmish".to_string());
    let cli = Cli::try_parse_from(args)?;

    match cli.command {
        Some(Commands::Spawn { name }) => commands::spawn(&name, ctx)?,
        Some(Commands::Engage { actor, subject }) => commands::engage(actor, subject, ctx)?,
        Some(Commands::Damage { actor, amount }) => commands::damage(actor, amount, ctx)?,
        Some(Commands::Interact {
            actor,
            subject,
            option,
        }) => commands::interact(actor, subject, option, ctx)?,
        Some(Commands::Tick { ms }) => commands::tick(ms, ctx)?,
        Some(Commands::Run { ms }) => commands::run(ms, ctx)?,
        Some(Commands::Kill { actor }) => commands::kill(actor, ctx)?,
        Some(Commands::Reset { actor }) => commands::reset(actor, ctx)?,
        Some(Commands::Status { actor }) => commands::status(actor, ctx)?,
        Some(Commands::Log { last, melee }) => commands::show_log(last, melee, ctx)?,
        Some(Commands::Config { action }) => match action {
            None => commands::show_config(ctx)?,
            Some(ConfigAction::Load { path }) => commands::load_config(path, ctx)?,
            Some(ConfigAction::Seed { seed }) => commands::set_seed(seed, ctx)?,
            Some(ConfigAction::Tick { ms }) => commands::set_tick(ms, ctx)?,
            Some(ConfigAction::Travel { ms }) => commands::set_travel(ms, ctx)?,
            Some(ConfigAction::Melee { enabled }) => commands::set_melee_logging(enabled, ctx)?,
        },
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
