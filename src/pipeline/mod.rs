//! The linear build pipeline: clean, bundle, copy, verify.
//!
//! Each stage runs to completion before the next begins and any failure
//! aborts the run. Two layouts are supported:
//!
//! ```text
//! staged:  clear target -> recreate dist -> install -> build
//!          -> copy assets into dist -> copy dist into target
//!          -> verify target -> remove dist
//!
//! direct:  remove cache -> clear target -> [install] -> build
//!          -> verify target
//! ```

use anyhow::{bail, Context, Result};

use crate::artifact::filesystem::{copy_assets, copy_dir_contents};
use crate::artifact::verify::{verify_tree, Checklist, MissingArtifactPolicy, VerifyReport};
use crate::clean::{clear_dir_preserving, recreate_dir, remove_dir_if_exists};
use crate::config::{BuildConfig, BuildLayout, BuildPaths};
use crate::preflight::check_bundler_tools;
use crate::process::Bundler;

/// Knobs that shape a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub layout: BuildLayout,
    pub on_missing: MissingArtifactPolicy,
    pub preserve: Vec<String>,
    pub checklist: Checklist,
    pub skip_install: bool,
    pub keep_dist: bool,
}

impl PipelineOptions {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            layout: config.layout,
            on_missing: config.on_missing,
            preserve: config.preserve.clone(),
            checklist: config.checklist.clone(),
            skip_install: false,
            keep_dist: config.keep_dist,
        }
    }
}

pub struct Pipeline {
    paths: BuildPaths,
    bundler: Bundler,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(paths: BuildPaths, bundler: Bundler, options: PipelineOptions) -> Self {
        Self {
            paths,
            bundler,
            options,
        }
    }

    pub fn from_config(config: &BuildConfig, paths: BuildPaths) -> Result<Self> {
        Ok(Self::new(
            paths,
            config.bundler()?,
            PipelineOptions::from_config(config),
        ))
    }

    pub fn paths(&self) -> &BuildPaths {
        &self.paths
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut PipelineOptions {
        &mut self.options
    }

    /// Run every stage and return the verification of the target.
    ///
    /// Under [`MissingArtifactPolicy::Fail`] an incomplete target is an
    /// error; under `Warn` the report is returned with its issues.
    pub fn run(&self) -> Result<VerifyReport> {
        let report = self.build()?;
        report.enforce(self.options.on_missing)?;
        tracing::info!("build complete");
        Ok(report)
    }

    /// Run every stage without applying the missing-artifact policy.
    pub fn build(&self) -> Result<VerifyReport> {
        tracing::info!(
            "building WebUI in '{}' ({} layout) -> '{}'",
            self.paths.webui_dir.display(),
            self.options.layout,
            self.paths.target_dir.display()
        );
        check_bundler_tools(&self.bundler).context("bundler preflight failed")?;

        let report = match self.options.layout {
            BuildLayout::Staged => self.run_staged()?,
            BuildLayout::Direct => self.run_direct()?,
        };

        report.log_summary();
        Ok(report)
    }

    fn run_staged(&self) -> Result<VerifyReport> {
        let paths = &self.paths;

        clear_dir_preserving(&paths.target_dir, &self.options.preserve)
            .context("clearing target directory")?;
        recreate_dir(&paths.dist_dir).context("clearing staging directory")?;

        self.install()?;
        self.bundler.build(&paths.webui_dir)?;

        if !paths.dist_dir.is_dir() {
            bail!(
                "bundler output directory does not exist: '{}'",
                paths.dist_dir.display()
            );
        }

        let assets = copy_assets(&paths.assets_dir, &paths.dist_dir)
            .context("copying static assets into staging directory")?;
        tracing::info!("copied {assets} static asset entries");

        tracing::info!(
            "copying build output from '{}' to '{}'",
            paths.dist_dir.display(),
            paths.target_dir.display()
        );
        let copied = copy_dir_contents(&paths.dist_dir, &paths.target_dir)
            .context("copying build output into target directory")?;
        tracing::info!("copied {copied} top-level entries");

        let report = verify_tree(&paths.target_dir, &self.options.checklist);

        if self.options.keep_dist {
            tracing::info!("keeping staging directory '{}'", paths.dist_dir.display());
        } else if remove_dir_if_exists(&paths.dist_dir)? {
            tracing::info!("removed staging directory '{}'", paths.dist_dir.display());
        }

        report
    }

    fn run_direct(&self) -> Result<VerifyReport> {
        let paths = &self.paths;

        if remove_dir_if_exists(&paths.cache_dir).context("clearing bundler cache")? {
            tracing::info!("removed bundler cache '{}'", paths.cache_dir.display());
        }
        clear_dir_preserving(&paths.target_dir, &self.options.preserve)
            .context("clearing target directory")?;

        self.install()?;
        tracing::info!(
            "bundler writes directly into '{}'",
            paths.target_dir.display()
        );
        self.bundler.build(&paths.webui_dir)?;

        verify_tree(&paths.target_dir, &self.options.checklist)
    }

    fn install(&self) -> Result<()> {
        if self.options.skip_install {
            tracing::info!("skipping dependency install");
            return Ok(());
        }
        self.bundler.install(&self.paths.webui_dir)?;
        Ok(())
    }

    /// Verify the target without building.
    pub fn verify(&self) -> Result<VerifyReport> {
        let report = self.inspect()?;
        report.enforce(self.options.on_missing)?;
        Ok(report)
    }

    /// Walk and summarize the target without applying the policy.
    pub fn inspect(&self) -> Result<VerifyReport> {
        let report = verify_tree(&self.paths.target_dir, &self.options.checklist)?;
        report.log_summary();
        Ok(report)
    }

    /// Remove the bundler cache and staging directory. The target is kept.
    pub fn clean(&self) -> Result<()> {
        for (label, dir) in [
            ("bundler cache", &self.paths.cache_dir),
            ("staging directory", &self.paths.dist_dir),
        ] {
            if remove_dir_if_exists(dir)? {
                tracing::info!("removed {label} '{}'", dir.display());
            } else {
                tracing::debug!("no {label} at '{}'", dir.display());
            }
        }
        Ok(())
    }
}
