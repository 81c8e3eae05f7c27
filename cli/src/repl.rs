use std::io::{BufRead, Write};

use crate::error::CliError;

/// Prompt and read one line. `None` at end of input.
pub fn readline() -> Result<Option<String>, CliError> {
    let mut stdout = std::io::stdout();
    write!(stdout, "skirmish> ").map_err(CliError::Input)?;
    stdout.flush().map_err(CliError::Input)?;

    let mut buffer = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut buffer)
        .map_err(CliError::Input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buffer))
}
