//! Filesystem utilities for moving bundler output into place.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Recursively copy a directory, preserving symlinks.
///
/// Existing destination directories are merged and existing files are
/// overwritten, so repeated copies into the same target are safe.
///
/// # Example
///
/// ```rust,ignore
/// use webui_builder::artifact::filesystem::copy_dir_recursive;
/// use std::path::Path;
///
/// copy_dir_recursive(Path::new("webui/dist"), Path::new("module/webroot"))?;
/// ```
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    if !dst.exists() {
        fs::create_dir_all(dst)
            .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
    }

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        copy_entry(&entry.path(), &dst.join(entry.file_name()), entry.file_type()?)?;
    }

    Ok(())
}

fn copy_entry(src_path: &Path, dst_path: &Path, file_type: fs::FileType) -> Result<()> {
    if file_type.is_symlink() {
        let target = fs::read_link(src_path)?;
        if dst_path.exists() || dst_path.is_symlink() {
            fs::remove_file(dst_path)?;
        }
        std::os::unix::fs::symlink(&target, dst_path)
            .with_context(|| format!("Failed to create symlink: {}", dst_path.display()))?;
    } else if file_type.is_dir() {
        copy_dir_recursive(src_path, dst_path)?;
    } else {
        fs::copy(src_path, dst_path).with_context(|| {
            format!(
                "Failed to copy file: {} -> {}",
                src_path.display(),
                dst_path.display()
            )
        })?;
    }
    Ok(())
}

/// Copy the children of `src` into `dst`, logging each top-level item.
///
/// Returns the number of top-level entries copied.
pub fn copy_dir_contents(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory: {}", dst.display()))?;

    let mut copied = 0;
    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        copy_entry(&src_path, &dst_path, entry.file_type()?)?;
        tracing::debug!("copied {} -> {}", src_path.display(), dst_path.display());
        copied += 1;
    }

    Ok(copied)
}

/// Copy the static assets folder into `<dist>/assets`.
///
/// `<dist>/assets` is always created; a missing source folder copies
/// nothing.
///
/// # Arguments
///
/// * `assets_src` - Static assets folder in the WebUI sources
/// * `dist` - Bundler output directory
///
/// # Returns
///
/// The number of top-level entries copied.
pub fn copy_assets(assets_src: &Path, dist: &Path) -> Result<usize> {
    let dest = dist.join("assets");
    fs::create_dir_all(&dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    if !assets_src.is_dir() {
        tracing::debug!("no static assets at '{}'", assets_src.display());
        return Ok(0);
    }
    copy_dir_contents(assets_src, &dest)
}
