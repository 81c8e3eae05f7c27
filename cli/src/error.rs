//! Error types for the simulation REPL

use skirmish_core::EntityId;
use skirmish_core::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid quoting")]
    Quoting,

    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("unknown script '{name}' (try: {known})")]
    UnknownScript { name: String, known: String },

    #[error("no actor {0}")]
    NoActor(EntityId),

    #[error("{0} is not a registered subject")]
    NoSubject(EntityId),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to save settings")]
    SaveSettings(#[source] confy::ConfyError),

    #[error("failed to read input")]
    Input(#[source] std::io::Error),
}
