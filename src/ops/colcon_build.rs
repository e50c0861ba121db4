//! Implementation of the build command.
//!
//! Planning is split from dispatch so the decision can be inspected (or
//! just printed) without running colcon.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::package::PackageName;
use crate::core::workspace::Workspace;
use crate::ops::discover::{discover_packages, DiscoverOptions};
use crate::ops::scope::{decide_scope, read_history, BuildScope, ScopeDecision};
use crate::util::config::{BuildConfig, Config};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::GlobalContext;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Stream build output to the console
    pub verbose: bool,

    /// Print the command instead of running it
    pub dry_run: bool,

    /// Packages to build (empty = discover from the current directory)
    pub packages: Vec<PackageName>,
}

/// A fully assembled build tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl BuildCommand {
    /// Assemble `<tool> <subcommand> [verbose args] [extra args] <scope flag> <packages...>`.
    pub fn assemble(
        build: &BuildConfig,
        verbose: bool,
        scope: BuildScope,
        packages: &[PackageName],
        cwd: &Path,
    ) -> Self {
        let mut args = vec![build.subcommand.clone()];
        if verbose {
            args.extend(build.verbose_args.iter().cloned());
        }
        args.extend(build.extra_args.iter().cloned());
        args.push(scope.flag().to_string());
        args.extend(packages.iter().map(|p| p.to_string()));

        BuildCommand {
            program: build.tool.clone(),
            args,
            cwd: cwd.to_path_buf(),
        }
    }

    /// The build tool.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the tool.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Directory the tool runs in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The command as a single space-joined line.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }

    /// Convert to a process builder running `program` in the workspace root.
    pub fn to_process(&self, program: impl AsRef<Path>) -> ProcessBuilder {
        ProcessBuilder::new(program)
            .args(&self.args)
            .cwd(&self.cwd)
    }
}

/// Everything decided before anything is run.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// The located workspace
    pub workspace: Workspace,

    /// Packages to build, in discovery order
    pub packages: Vec<PackageName>,

    /// First line of the last build's log, if there was a last build
    pub history: Option<String>,

    /// Chosen scope and why
    pub decision: ScopeDecision,

    /// The command to run
    pub command: BuildCommand,

    /// Non-fatal problems worth telling the user about
    pub warnings: Vec<Diagnostic>,
}

/// Result of carrying out a plan.
#[derive(Debug)]
pub enum Outcome {
    /// Dry run: the line to show the user.
    DryRun { line: String },
    /// The build tool was started and left running.
    Spawned { pid: u32 },
}

/// Work out what to build and how.
pub fn plan(ctx: &GlobalContext, opts: &BuildOptions) -> Result<BuildPlan> {
    let bootstrap = ctx.bootstrap_config();
    let workspace = Workspace::locate(ctx.cwd(), &bootstrap.workspace.log_dir)?;
    let config = ctx.workspace_config(workspace.root());
    plan_in(ctx.cwd(), workspace, &config, opts)
}

/// Plan a build for a workspace that has already been located.
pub fn plan_in(
    cwd: &Path,
    workspace: Workspace,
    config: &Config,
    opts: &BuildOptions,
) -> Result<BuildPlan> {
    tracing::debug!("workspace root: {}", workspace.root().display());

    let mut warnings = Vec::new();

    let packages = if opts.packages.is_empty() {
        let discover = DiscoverOptions {
            descriptor: config.workspace.descriptor.clone(),
            respect_ignore_markers: config.discovery.respect_ignore_markers,
        };
        let found = discover_packages(cwd, &discover)?;
        if found.is_empty() {
            warnings.push(
                Diagnostic::warning(format!(
                    "no `{}` found under `{}`",
                    config.workspace.descriptor,
                    cwd.display()
                ))
                .with_suggestion("pass package names explicitly"),
            );
        }
        found
    } else {
        opts.packages.clone()
    };

    let latest = workspace.latest_log();
    let history = read_history(&latest)
        .with_context(|| format!("failed to read last build log {}", latest.display()))?;

    let decision = decide_scope(&packages, history.as_deref());
    if let (Some(missing), Some(record)) = (&decision.missing, &history) {
        tracing::info!("package `{}` not in last build command: {}", missing, record);
    }
    tracing::debug!("using {}", decision.scope);

    let command = BuildCommand::assemble(
        &config.build,
        opts.verbose,
        decision.scope,
        &packages,
        workspace.root(),
    );

    Ok(BuildPlan {
        workspace,
        packages,
        history,
        decision,
        command,
        warnings,
    })
}

/// The line printed for a dry run.
pub fn dry_run_line(plan: &BuildPlan) -> String {
    format!(
        "cwd={} cmd={}",
        plan.workspace.root().display(),
        plan.command.display()
    )
}

/// Carry out a plan: print it, or start the build tool without waiting.
pub fn run(plan: &BuildPlan, opts: &BuildOptions) -> Result<Outcome> {
    if opts.dry_run {
        return Ok(Outcome::DryRun {
            line: dry_run_line(plan),
        });
    }

    let program = plan.command.program();
    let Some(resolved) = find_executable(program) else {
        bail!("`{}` not found in PATH\nhelp: {}", program, suggestions::TOOL_MISSING);
    };

    tracing::debug!("running `{}` in {}", plan.command.display(), plan.command.cwd().display());
    let child = plan.command.to_process(&resolved).spawn()?;
    Ok(Outcome::Spawned { pid: child.id() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::WorkspaceFixture;
    use crate::util::config::{ConfigLayer, ConfigSources};

    fn pkgs(names: &[&str]) -> Vec<PackageName> {
        names.iter().map(|n| PackageName::new(*n).unwrap()).collect()
    }

    fn plan_at(cwd: &Path, opts: &BuildOptions) -> BuildPlan {
        plan(&GlobalContext::with_cwd(cwd), opts).unwrap()
    }

    #[test]
    fn test_assemble_select() {
        let cmd = BuildCommand::assemble(
            &BuildConfig::default(),
            false,
            BuildScope::Select,
            &pkgs(&["pkg1"]),
            Path::new("/ws"),
        );
        assert_eq!(cmd.display(), "colcon build --packages-select pkg1");
        assert_eq!(cmd.cwd(), Path::new("/ws"));
    }

    #[test]
    fn test_assemble_verbose() {
        let cmd = BuildCommand::assemble(
            &BuildConfig::default(),
            true,
            BuildScope::UpTo,
            &pkgs(&["a", "b"]),
            Path::new("/ws"),
        );
        assert_eq!(cmd.program(), "colcon");
        assert_eq!(
            cmd.args(),
            [
                "build",
                "--event-handlers",
                "console_direct+",
                "--packages-up-to",
                "a",
                "b"
            ]
        );
    }

    #[test]
    fn test_assemble_extra_args_before_scope() {
        let build = BuildConfig {
            extra_args: vec!["--symlink-install".to_string()],
            ..BuildConfig::default()
        };
        let cmd = BuildCommand::assemble(&build, false, BuildScope::Select, &pkgs(&["a"]), Path::new("/ws"));
        assert_eq!(cmd.display(), "colcon build --symlink-install --packages-select a");
    }

    #[test]
    fn test_to_process() {
        let cmd = BuildCommand::assemble(
            &BuildConfig::default(),
            false,
            BuildScope::Select,
            &pkgs(&["a"]),
            Path::new("/ws"),
        );
        let pb = cmd.to_process("/usr/bin/colcon");
        assert_eq!(pb.get_program(), Path::new("/usr/bin/colcon"));
        assert_eq!(pb.get_args(), ["build", "--packages-select", "a"]);
        assert_eq!(pb.get_cwd(), Some(Path::new("/ws")));
    }

    #[test]
    fn test_dry_run_select_for_previously_built_package() {
        let ws = WorkspaceFixture::new();
        let pkg = ws.package("src/pkg1", "pkg1");
        ws.last_build("colcon build --packages-up-to pkg1");

        let opts = BuildOptions {
            dry_run: true,
            ..BuildOptions::default()
        };
        let plan = plan_at(&pkg, &opts);
        assert_eq!(plan.decision.scope, BuildScope::Select);

        match run(&plan, &opts).unwrap() {
            Outcome::DryRun { line } => assert_eq!(
                line,
                format!(
                    "cwd={} cmd=colcon build --packages-select pkg1",
                    ws.root().display()
                )
            ),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_end_to_end_discovery_without_history() {
        let ws = WorkspaceFixture::new();
        ws.package("a", "a");
        ws.package("b", "b");

        let plan = plan_at(ws.root(), &BuildOptions::default());
        assert_eq!(plan.packages, pkgs(&["a", "b"]));
        assert_eq!(plan.history, None);
        assert_eq!(plan.decision.scope, BuildScope::UpTo);
        assert_eq!(plan.command.display(), "colcon build --packages-up-to a b");
        assert_eq!(plan.command.cwd(), ws.root());
    }

    #[test]
    fn test_partial_history_goes_up_to() {
        let ws = WorkspaceFixture::new();
        ws.package("src/alpha", "alpha");
        ws.package("src/beta", "beta");
        ws.last_build("colcon build --packages-select alpha");

        let plan = plan_at(&ws.path("src"), &BuildOptions::default());
        assert_eq!(plan.decision.scope, BuildScope::UpTo);
        assert_eq!(plan.decision.missing, PackageName::new("beta"));
        assert_eq!(
            plan.command.display(),
            "colcon build --packages-up-to alpha beta"
        );
    }

    #[test]
    fn test_explicit_packages_skip_discovery() {
        let ws = WorkspaceFixture::new();
        // Would fail discovery if it were scanned.
        ws.file("src/broken/package.xml", "<package/>");
        ws.last_build("colcon build --packages-select x y");

        let opts = BuildOptions {
            packages: pkgs(&["y", "x"]),
            ..BuildOptions::default()
        };
        let plan = plan_at(&ws.path("src"), &opts);
        assert_eq!(plan.command.display(), "colcon build --packages-select y x");
    }

    #[test]
    fn test_invalid_descriptor_fails_plan() {
        let ws = WorkspaceFixture::new();
        let pkg = ws.dir("src/broken");
        ws.file("src/broken/package.xml", "<package><name></name></package>");

        let err = plan(&GlobalContext::with_cwd(&pkg), &BuildOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::core::errors::WorkspaceError>(),
            Some(crate::core::errors::WorkspaceError::InvalidPackageXml { .. })
        ));
    }

    #[test]
    fn test_empty_discovery_warns() {
        let ws = WorkspaceFixture::new();
        let empty = ws.dir("src");

        let plan = plan_at(&empty, &BuildOptions::default());
        assert!(plan.packages.is_empty());
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.command.display(), "colcon build --packages-up-to");
    }

    #[test]
    fn test_project_config_changes_tool() {
        let ws = WorkspaceFixture::new();
        let pkg = ws.package("src/a", "a");
        ws.file(".colcon-quick.toml", "[build]\ntool = \"colcon-wrapper\"\n");

        let plan = plan_at(&pkg, &BuildOptions::default());
        assert_eq!(plan.command.program(), "colcon-wrapper");
    }

    #[test]
    fn test_run_without_dry_run_dispatches() {
        let ws = WorkspaceFixture::new();
        ws.file(
            ".colcon-quick.toml",
            "[build]\ntool = \"colcon-quick-no-such-tool\"\n",
        );
        let opts = BuildOptions {
            packages: pkgs(&["a"]),
            ..BuildOptions::default()
        };
        let plan = plan_at(ws.root(), &opts);

        // Not a dry run, so the tool lookup happens and fails.
        let err = run(&plan, &opts).unwrap_err();
        assert!(err.to_string().contains("not found in PATH"));

        let dry = BuildOptions {
            dry_run: true,
            ..opts
        };
        assert!(matches!(run(&plan, &dry).unwrap(), Outcome::DryRun { .. }));
    }

    #[test]
    fn test_explicit_config_changes_log_dir() {
        let ws = WorkspaceFixture::bare();
        ws.dir("build_logs");
        let pkg = ws.package("src/a", "a");

        let mut sources = ConfigSources::default();
        sources.explicit = ConfigLayer::parse("[workspace]\nlog_dir = \"build_logs\"\n").unwrap();
        let ctx = GlobalContext::with_cwd(&pkg).with_config(sources);

        let plan = plan(&ctx, &BuildOptions::default()).unwrap();
        assert_eq!(plan.workspace.root(), ws.root());
        assert_eq!(plan.workspace.log_dir(), ws.path("build_logs"));
    }
}
