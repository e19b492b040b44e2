use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use webui_builder::{BuildLayout, MissingArtifactPolicy};

/// Build, deploy and verify the WebUI static assets.
///
/// Running without a subcommand performs `build`.
#[derive(Parser, Debug)]
#[command(
    name = "webui-builder",
    version,
    about = "Build, deploy and verify the WebUI static assets",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    #[command(flatten)]
    pub(crate) common: CommonArgs,

    #[command(flatten)]
    pub(crate) build: BuildArgs,

    /// Log debug output (file listings, subprocess stderr)
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Clean, bundle, deploy and verify (default)
    Build(BuildArgs),
    /// Verify an existing deployment directory without building
    Verify(TargetArgs),
    /// Remove the bundler cache and staging directory
    Clean,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct CommonArgs {
    /// WebUI source directory (defaults to the current directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub(crate) webui_dir: Option<PathBuf>,

    /// Build config file (defaults to <webui-dir>/webui-build.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct TargetArgs {
    /// Deployment directory consumed by the module
    #[arg(long, value_name = "DIR")]
    pub(crate) target_dir: Option<PathBuf>,

    /// Reaction to missing artifact categories
    #[arg(long, value_enum, value_name = "POLICY")]
    pub(crate) on_missing: Option<MissingArtifactPolicy>,

    /// Write a JSON build report to this path
    #[arg(long, value_name = "FILE")]
    pub(crate) report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub(crate) target: TargetArgs,

    /// Where the bundler writes its output
    #[arg(long, value_enum)]
    pub(crate) layout: Option<BuildLayout>,

    /// Do not run the dependency install step
    #[arg(long)]
    pub(crate) skip_install: bool,

    /// Keep the staging directory after deployment
    #[arg(long)]
    pub(crate) keep_dist: bool,
}
