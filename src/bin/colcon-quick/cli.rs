//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use colcon_quick::PackageName;

/// colcon-quick - build the colcon packages in the current directory
///
/// Finds the workspace root from the nearest `log/` directory, builds the
/// package in the current directory (or every package below it), and uses
/// `--packages-select` when the last build already covered them.
#[derive(Parser)]
#[command(name = "colcon-quick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Stream build output to the console
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the command instead of running it
    #[arg(short, long, alias = "dry_run")]
    pub dry_run: bool,

    /// Read configuration from this file
    #[arg(long, env = "COLCON_QUICK_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Packages to build (defaults to the packages found here)
    #[arg(trailing_var_arg = true, value_name = "PACKAGE")]
    pub packages: Vec<PackageName>,
}
