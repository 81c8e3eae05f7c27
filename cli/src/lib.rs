pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod repl;
pub mod settings;

pub use context::CliContext;
pub use error::CliError;
pub use repl::readline;
pub use settings::Settings;
