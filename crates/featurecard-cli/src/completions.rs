use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

const BIN_NAME: &str = "featurecard";

/// Prints the completion script for `shell` to stdout.
pub fn print(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_script(shell, &mut stdout)?;
    Ok(())
}

fn write_script(shell: Shell, out: &mut dyn Write) -> io::Result<()> {
    let mut cmd = crate::Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    out.flush()
}
