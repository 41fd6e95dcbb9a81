mod completions;
mod convert;
mod error;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::convert::{ConvertArgs, Reporting};
use crate::error::{exit_code_for, report_error};

#[derive(Debug, Parser)]
#[command(
    name = "featurecard",
    version,
    about = "Convert a vCard contact list into a vCard 2.1 file for feature phones, one number per contact"
)]
struct Cli {
    /// Suppress progress output
    #[arg(long, short)]
    quiet: bool,
    #[arg(long, short)]
    verbose: bool,
    /// Print a JSON report instead of progress output
    #[arg(long)]
    json: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL", exclusive = true)]
    completions: Option<clap_complete::Shell>,
    #[command(flatten)]
    convert: ConvertArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        quiet,
        verbose: _,
        json,
        config,
        completions,
        convert: args,
    } = cli;

    if let Some(shell) = completions {
        return completions::print(shell);
    }

    let reporting = if json {
        Reporting::Json
    } else if quiet {
        Reporting::Quiet
    } else {
        Reporting::Progress
    };
    convert::convert(args, config, reporting)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
