use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use webui_builder::{BuildConfig, BuildReport, Pipeline, VerifyReport};

use super::args::{BuildArgs, CommonArgs, TargetArgs};

pub(crate) fn build(common: &CommonArgs, args: BuildArgs) -> Result<()> {
    let (webui_dir, mut config) = load_config(common)?;
    apply_target_overrides(&mut config, &args.target);
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    if args.keep_dist {
        config.keep_dist = true;
    }

    let paths = config.resolve(&webui_dir)?;
    let mut pipeline = Pipeline::from_config(&config, paths)?;
    pipeline.options_mut().skip_install = args.skip_install;

    let report = pipeline.build()?;
    finish(&pipeline, &config, &report, args.target.report.as_deref())?;
    tracing::info!("build complete");
    Ok(())
}

pub(crate) fn verify(common: &CommonArgs, args: TargetArgs) -> Result<()> {
    let (webui_dir, mut config) = load_config(common)?;
    apply_target_overrides(&mut config, &args);

    let paths = config.resolve(&webui_dir)?;
    let pipeline = Pipeline::from_config(&config, paths)?;
    let report = pipeline.inspect()?;
    finish(&pipeline, &config, &report, args.report.as_deref())
}

pub(crate) fn clean(common: &CommonArgs) -> Result<()> {
    let (webui_dir, config) = load_config(common)?;
    let paths = config.resolve(&webui_dir)?;
    Pipeline::from_config(&config, paths)?.clean()
}

fn load_config(common: &CommonArgs) -> Result<(PathBuf, BuildConfig)> {
    let webui_dir = match &common.webui_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("resolving current directory")?,
    };
    let webui_dir = webui_dir
        .canonicalize()
        .with_context(|| format!("resolving WebUI directory '{}'", webui_dir.display()))?;
    let config = BuildConfig::load(&webui_dir, common.config.as_deref())?;
    Ok((webui_dir, config))
}

fn apply_target_overrides(config: &mut BuildConfig, args: &TargetArgs) {
    if let Some(target_dir) = &args.target_dir {
        config.target_dir = absolutize(target_dir);
    }
    if let Some(policy) = args.on_missing {
        config.on_missing = policy;
    }
}

/// Flags are relative to the invocation directory, not the WebUI directory.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn finish(
    pipeline: &Pipeline,
    config: &BuildConfig,
    report: &VerifyReport,
    report_path: Option<&Path>,
) -> Result<()> {
    if let Some(path) = report_path {
        BuildReport::from_verify(report, config.layout)?
            .write(&absolutize(path))
            .with_context(|| format!("writing build report '{}'", path.display()))?;
    }
    report.enforce(pipeline.options().on_missing)
}
