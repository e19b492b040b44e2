use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod workflows;

use workflows::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => workflows::build(&cli.common, cli.build),
        Some(Command::Build(args)) => workflows::build(&cli.common, args),
        Some(Command::Verify(args)) => workflows::verify(&cli.common, args),
        Some(Command::Clean) => workflows::clean(&cli.common),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .without_time()
        .init();
}
