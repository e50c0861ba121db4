//! colcon-quick CLI - run `colcon build` for whatever is under your feet

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use colcon_quick::util::diagnostic;
use colcon_quick::WorkspaceError;

mod cli;
mod commands;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        report(&e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("colcon_quick=debug")
    } else {
        EnvFilter::new("colcon_quick=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    commands::build::execute(cli)
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<WorkspaceError>() {
        Some(ws_err) => diagnostic::emit(&ws_err.to_diagnostic(), std::io::stderr().is_terminal()),
        None => eprintln!("error: {:#}", err),
    }
}
