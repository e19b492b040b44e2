//! Removal of stale caches and output directories before a build.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Delete `path` and everything below it if it exists.
///
/// Returns whether anything was removed.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(path)
        .with_context(|| format!("removing directory '{}'", path.display()))?;
    Ok(true)
}

/// Replace `path` with a fresh empty directory.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if remove_dir_if_exists(path)? {
        tracing::info!("cleared '{}'", path.display());
    }
    fs::create_dir_all(path)
        .with_context(|| format!("creating directory '{}'", path.display()))?;
    Ok(())
}

/// Empty `path` while keeping top-level entries named in `preserve`.
///
/// Creates the directory when it does not exist. Returns the number of
/// top-level entries removed.
pub fn clear_dir_preserving(path: &Path, preserve: &[String]) -> Result<usize> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("creating directory '{}'", path.display()))?;
        tracing::info!("created '{}'", path.display());
        return Ok(0);
    }

    let mut removed = 0;
    for entry in
        fs::read_dir(path).with_context(|| format!("reading directory '{}'", path.display()))?
    {
        let entry =
            entry.with_context(|| format!("reading entry under '{}'", path.display()))?;
        let name = entry.file_name();
        if preserve.iter().any(|keep| name.to_str() == Some(keep.as_str())) {
            continue;
        }

        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading file type for '{}'", entry_path.display()))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&entry_path)
                .with_context(|| format!("removing directory '{}'", entry_path.display()))?;
        } else {
            fs::remove_file(&entry_path)
                .with_context(|| format!("removing file '{}'", entry_path.display()))?;
        }
        removed += 1;
    }

    tracing::info!("cleared {removed} entries from '{}'", path.display());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn remove_missing_dir_is_noop() {
        let temp = TempDir::new().unwrap();
        assert!(!remove_dir_if_exists(&temp.path().join("cache")).unwrap());
    }

    #[test]
    fn remove_existing_dir() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join(".parcel-cache");
        fs::create_dir_all(cache.join("nested")).unwrap();
        fs::write(cache.join("nested/blob"), "x").unwrap();

        assert!(remove_dir_if_exists(&cache).unwrap());
        assert!(!cache.exists());
    }

    #[test]
    fn recreate_dir_leaves_it_empty() {
        let temp = TempDir::new().unwrap();
        let dist = temp.path().join("dist");
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("old.js"), "stale").unwrap();

        recreate_dir(&dist).unwrap();

        assert!(dist.is_dir());
        assert_eq!(fs::read_dir(&dist).unwrap().count(), 0);
    }

    #[test]
    fn clear_keeps_preserved_entries() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("webroot");
        fs::create_dir_all(target.join("assets")).unwrap();
        fs::write(target.join(".gitkeep"), "").unwrap();
        fs::write(target.join("index.html"), "<html>").unwrap();
        fs::write(target.join("assets/app.js"), "").unwrap();
        std::os::unix::fs::symlink("index.html", target.join("link")).unwrap();

        let removed = clear_dir_preserving(&target, &[".gitkeep".to_string()]).unwrap();

        assert_eq!(removed, 3);
        assert!(target.join(".gitkeep").exists());
        assert!(!target.join("index.html").exists());
        assert!(!target.join("assets").exists());
        assert!(!target.join("link").is_symlink());
    }

    #[test]
    fn clear_creates_missing_dir() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("module/webroot");

        let removed = clear_dir_preserving(&target, &[]).unwrap();

        assert_eq!(removed, 0);
        assert!(target.is_dir());
    }
}
