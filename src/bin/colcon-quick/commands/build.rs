//! The build command

use std::io::IsTerminal;

use anyhow::Result;

use crate::cli::Cli;
use colcon_quick::ops::colcon_build::{plan, run, BuildOptions, Outcome};
use colcon_quick::util::diagnostic;
use colcon_quick::GlobalContext;

pub fn execute(cli: Cli) -> Result<()> {
    let ctx = GlobalContext::new(cli.config.as_deref())?;

    let opts = BuildOptions {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        packages: cli.packages,
    };

    let plan = plan(&ctx, &opts)?;

    let color = std::io::stderr().is_terminal();
    for warning in &plan.warnings {
        diagnostic::emit(warning, color);
    }

    match run(&plan, &opts)? {
        Outcome::DryRun { line } => println!("{}", line),
        Outcome::Spawned { pid } => {
            tracing::debug!("started `{}` (pid {})", plan.command.display(), pid);
        }
    }

    Ok(())
}
