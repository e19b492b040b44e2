//! Machine-readable summary of a build, written as JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::BuildLayout;

use super::verify::{ArtifactKind, VerifyReport};

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub generated_at_utc: String,
    pub layout: BuildLayout,
    pub target_dir: PathBuf,
    pub passed: bool,
    pub total_files: usize,
    pub total_dirs: usize,
    pub counts: BTreeMap<ArtifactKind, usize>,
    pub issues: Vec<String>,
    pub artifacts: Vec<ArtifactRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub size_bytes: u64,
    /// Absent for dangling symlinks.
    pub sha256: Option<String>,
}

impl BuildReport {
    /// Summarize `report`, hashing every deployed file.
    pub fn from_verify(report: &VerifyReport, layout: BuildLayout) -> Result<Self> {
        let mut artifacts = Vec::with_capacity(report.files.len());
        for file in &report.files {
            let path = report.root.join(&file.rel_path);
            let (sha256, size_bytes) = if path.is_file() {
                let (sha256, size_bytes) = sha256_file(&path)?;
                (Some(sha256), size_bytes)
            } else {
                (None, 0)
            };
            artifacts.push(ArtifactRecord {
                path: file.rel_path.clone(),
                kind: file.kind,
                size_bytes,
                sha256,
            });
        }

        Ok(Self {
            generated_at_utc: now_utc_rfc3339()?,
            layout,
            target_dir: report.root.clone(),
            passed: report.passed(),
            total_files: report.files.len(),
            total_dirs: report.dir_count,
            counts: report.counts(),
            issues: report.missing().iter().map(ToString::to_string).collect(),
            artifacts,
        })
    }

    /// Write pretty JSON to `path` through a temporary sibling file.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory '{}'", parent.display()))?;
        }

        let bytes = serde_json::to_vec_pretty(self).context("serializing build report")?;
        let tmp = tmp_sibling(path);
        fs::write(&tmp, bytes)
            .with_context(|| format!("writing build report '{}'", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| {
            format!(
                "moving build report '{}' -> '{}'",
                tmp.display(),
                path.display()
            )
        })?;
        tracing::info!("wrote build report to '{}'", path.display());
        Ok(())
    }
}

fn sha256_file(path: &Path) -> Result<(String, u64)> {
    let f = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut r = BufReader::new(f);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    let mut size = 0u64;
    loop {
        let n = r
            .read(&mut buf)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }
    Ok((format!("{:x}", hasher.finalize()), size))
}

fn now_utc_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("formatting report timestamp")
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let n = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report.json");
    path.with_file_name(format!(".{name}.tmp-{n}"))
}
