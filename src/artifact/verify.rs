//! Post-build verification of the deployment directory.
//!
//! The directory tree is walked once and every file is bucketed into an
//! [`ArtifactKind`]. A build is complete when the entry page, at least one
//! script, one stylesheet and one icon font are all present.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Category of a deployed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    HtmlEntry,
    Script,
    Stylesheet,
    Font,
    Other,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::HtmlEntry,
        ArtifactKind::Script,
        ArtifactKind::Stylesheet,
        ArtifactKind::Font,
        ArtifactKind::Other,
    ];
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::HtmlEntry => "html-entry",
            ArtifactKind::Script => "script",
            ArtifactKind::Stylesheet => "stylesheet",
            ArtifactKind::Font => "font",
            ArtifactKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// What a finished build must contain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Checklist {
    /// Entry page, relative to the deployment root.
    pub entry: String,
    /// Substring identifying icon font files.
    pub font_marker: String,
    /// Accepted font extensions, without the dot. Empty accepts any.
    pub font_extensions: Vec<String>,
}

impl Default for Checklist {
    fn default() -> Self {
        Self {
            entry: "index.html".to_string(),
            font_marker: "MaterialIcons".to_string(),
            font_extensions: ["ttf", "otf", "woff", "woff2"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// How a build reacts to missing artifact categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MissingArtifactPolicy {
    /// Missing categories fail the build.
    Fail,
    /// Missing categories are logged and the build still succeeds.
    Warn,
}

/// A required category with no matching files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingCategory {
    EntryPage(String),
    Scripts,
    Stylesheets,
    Fonts(String),
}

impl fmt::Display for MissingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingCategory::EntryPage(entry) => write!(f, "missing file: {entry}"),
            MissingCategory::Scripts => write!(f, "missing JavaScript files"),
            MissingCategory::Stylesheets => write!(f, "missing CSS files"),
            MissingCategory::Fonts(marker) => write!(f, "missing {marker} font files"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    pub rel_path: PathBuf,
    pub kind: ArtifactKind,
}

/// Outcome of one verification walk.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub root: PathBuf,
    pub files: Vec<ClassifiedFile>,
    pub dir_count: usize,
    missing: Vec<MissingCategory>,
}

/// Bucket a path relative to the deployment root.
pub fn classify(rel_path: &Path, checklist: &Checklist) -> ArtifactKind {
    if rel_path == Path::new(&checklist.entry) {
        return ArtifactKind::HtmlEntry;
    }

    let Some(name) = rel_path.file_name().and_then(|n| n.to_str()) else {
        return ArtifactKind::Other;
    };

    if name.ends_with(".js") {
        ArtifactKind::Script
    } else if name.ends_with(".css") {
        ArtifactKind::Stylesheet
    } else if is_font(name, checklist) {
        ArtifactKind::Font
    } else {
        ArtifactKind::Other
    }
}

fn is_font(name: &str, checklist: &Checklist) -> bool {
    if !name.contains(&checklist.font_marker) {
        return false;
    }
    if checklist.font_extensions.is_empty() {
        return true;
    }
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            checklist
                .font_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// Walk `root` and check it against `checklist`.
///
/// Symlinks are not followed. A link to a directory counts as a directory;
/// any other link, including a dangling one, is classified like a file.
///
/// # Arguments
///
/// * `root` - Deployment directory to inspect; must exist
/// * `checklist` - Entry page name and icon font rules
///
/// # Example
///
/// ```rust,ignore
/// use webui_builder::artifact::verify::{verify_tree, Checklist};
/// use std::path::Path;
///
/// let report = verify_tree(Path::new("module/webroot"), &Checklist::default())?;
/// for issue in report.missing() {
///     println!("{issue}");
/// }
/// ```
pub fn verify_tree(root: &Path, checklist: &Checklist) -> Result<VerifyReport> {
    if !root.is_dir() {
        bail!("deployment directory does not exist: '{}'", root.display());
    }
    tracing::info!("verifying build output in '{}'", root.display());

    let mut files = Vec::new();
    let mut dir_count = 0;
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("walking deployment directory '{}'", root.display()))?;
        // A symlink to a directory is listed as a directory but not descended.
        let is_dir = entry.file_type().is_dir()
            || (entry.path_is_symlink() && entry.path().is_dir());
        if is_dir {
            dir_count += 1;
            continue;
        }
        let rel_path = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("relativizing '{}'", entry.path().display()))?
            .to_path_buf();
        let kind = classify(&rel_path, checklist);
        files.push(ClassifiedFile { rel_path, kind });
    }

    let missing = missing_categories(&files, checklist);
    Ok(VerifyReport {
        root: root.to_path_buf(),
        files,
        dir_count,
        missing,
    })
}

fn missing_categories(files: &[ClassifiedFile], checklist: &Checklist) -> Vec<MissingCategory> {
    let has = |kind: ArtifactKind| files.iter().any(|f| f.kind == kind);

    let mut missing = Vec::new();
    if !has(ArtifactKind::HtmlEntry) {
        missing.push(MissingCategory::EntryPage(checklist.entry.clone()));
    }
    if !has(ArtifactKind::Script) {
        missing.push(MissingCategory::Scripts);
    }
    if !has(ArtifactKind::Stylesheet) {
        missing.push(MissingCategory::Stylesheets);
    }
    if !has(ArtifactKind::Font) {
        missing.push(MissingCategory::Fonts(checklist.font_marker.clone()));
    }
    missing
}

impl VerifyReport {
    pub fn missing(&self) -> &[MissingCategory] {
        &self.missing
    }

    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn files_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &ClassifiedFile> {
        self.files.iter().filter(move |f| f.kind == kind)
    }

    pub fn counts(&self) -> BTreeMap<ArtifactKind, usize> {
        let mut counts: BTreeMap<ArtifactKind, usize> =
            ArtifactKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        for file in &self.files {
            *counts.entry(file.kind).or_default() += 1;
        }
        counts
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "found {} files and {} directories",
            self.files.len(),
            self.dir_count
        );
        for (kind, count) in self.counts() {
            tracing::info!("  {kind}: {count}");
            for file in self.files_of(kind) {
                tracing::debug!("    {}", file.rel_path.display());
            }
        }
    }

    /// Apply `policy` to the missing categories.
    pub fn enforce(&self, policy: MissingArtifactPolicy) -> Result<()> {
        if self.passed() {
            tracing::info!("all required artifacts present");
            return Ok(());
        }

        let issues = self
            .missing
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        match policy {
            MissingArtifactPolicy::Warn => {
                tracing::warn!("incomplete build output in '{}': {issues}", self.root.display());
                Ok(())
            }
            MissingArtifactPolicy::Fail => bail!(
                "build verification failed for '{}': {issues}",
                self.root.display()
            ),
        }
    }
}
