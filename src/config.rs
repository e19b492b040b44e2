//! Build layout configuration.
//!
//! Settings come from an optional `webui-build.toml` in the WebUI directory.
//! Every field has a default matching the stock project layout, so a missing
//! file is not an error. Relative paths resolve against the WebUI directory.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::verify::{Checklist, MissingArtifactPolicy};
use crate::process::{Bundler, CommandSpec};

/// File name looked up in the WebUI directory when no `--config` is given.
pub const CONFIG_FILENAME: &str = "webui-build.toml";

/// Where the bundler writes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BuildLayout {
    /// Bundle into a staging directory, then copy into the target.
    Staged,
    /// The bundler writes straight into the target.
    Direct,
}

impl fmt::Display for BuildLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildLayout::Staged => write!(f, "staged"),
            BuildLayout::Direct => write!(f, "direct"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BuildConfig {
    pub layout: BuildLayout,
    pub target_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub preserve: Vec<String>,
    pub on_missing: MissingArtifactPolicy,
    pub keep_dist: bool,
    pub bundler: BundlerConfig,
    pub checklist: Checklist,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BundlerConfig {
    /// Dependency install step. An empty list skips it; when unset the
    /// staged layout runs `npm install` and the direct layout installs nothing.
    pub install: Option<Vec<String>>,
    pub build: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            layout: BuildLayout::Staged,
            target_dir: PathBuf::from("../module/webroot"),
            dist_dir: PathBuf::from("dist"),
            cache_dir: PathBuf::from(".parcel-cache"),
            assets_dir: PathBuf::from("src/assets"),
            preserve: vec![".gitkeep".to_string()],
            on_missing: MissingArtifactPolicy::Fail,
            keep_dist: false,
            bundler: BundlerConfig::default(),
            checklist: Checklist::default(),
        }
    }
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            install: None,
            build: vec!["npm".to_string(), "run".to_string(), "build".to_string()],
        }
    }
}

/// Absolute paths for one build, derived from a [`BuildConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    pub webui_dir: PathBuf,
    pub target_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl BuildConfig {
    /// Load the config for `webui_dir`.
    ///
    /// An explicit path must exist. Without one, `webui-build.toml` in the
    /// WebUI directory is used when present, otherwise defaults apply.
    pub fn load(webui_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file not found: '{}'", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let candidate = webui_dir.join(CONFIG_FILENAME);
                if !candidate.is_file() {
                    tracing::debug!(
                        "no {} under '{}'; using defaults",
                        CONFIG_FILENAME,
                        webui_dir.display()
                    );
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("reading build config '{}'", config_path.display()))?;
        let parsed = Self::from_toml(&raw)
            .with_context(|| format!("parsing build config '{}'", config_path.display()))?;
        tracing::debug!("loaded build config from '{}'", config_path.display());
        Ok(parsed)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let parsed: Self = toml::from_str(raw)?;
        Ok(parsed)
    }

    /// Resolve every configured path against `webui_dir`.
    ///
    /// Paths are normalized and, where they already exist, canonicalized, so
    /// `..` segments and symlinks cannot smuggle the WebUI directory (or one
    /// of its ancestors) in as the target that gets cleared.
    pub fn resolve(&self, webui_dir: &Path) -> Result<BuildPaths> {
        let webui_dir = canonical_or_normalized(webui_dir)?;
        let paths = BuildPaths {
            target_dir: canonical_or_normalized(&resolve_path(&webui_dir, &self.target_dir))?,
            dist_dir: canonical_or_normalized(&resolve_path(&webui_dir, &self.dist_dir))?,
            cache_dir: resolve_path(&webui_dir, &self.cache_dir),
            assets_dir: resolve_path(&webui_dir, &self.assets_dir),
            webui_dir,
        };

        if paths.webui_dir.starts_with(&paths.target_dir) {
            bail!(
                "target directory '{}' must not be the WebUI directory '{}' or one of its parents",
                paths.target_dir.display(),
                paths.webui_dir.display()
            );
        }
        if self.layout == BuildLayout::Staged && paths.target_dir == paths.dist_dir {
            bail!(
                "target directory '{}' must differ from the staging directory in the staged layout",
                paths.target_dir.display()
            );
        }

        Ok(paths)
    }

    pub fn bundler(&self) -> Result<Bundler> {
        let install = match (&self.bundler.install, self.layout) {
            (Some(argv), _) if argv.is_empty() => None,
            (Some(argv), _) => Some(CommandSpec::from_argv(argv).context("bundler.install")?),
            (None, BuildLayout::Staged) => Some(CommandSpec::new("npm", &["install"])),
            (None, BuildLayout::Direct) => None,
        };
        let build = CommandSpec::from_argv(&self.bundler.build).context("bundler.build")?;
        Ok(Bundler { install, build })
    }
}

/// Resolve `path` against `base` unless it is already absolute.
///
/// The result is always lexically normalized.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Canonicalize `path` if it exists, otherwise fall back to its lexical form.
fn canonical_or_normalized(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return fs::canonicalize(path)
            .with_context(|| format!("canonicalizing '{}'", path.display()));
    }
    Ok(normalize(path))
}

/// Lexically fold `.` and `..` components so `../module/webroot` compares
/// equal to its canonical sibling path without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
