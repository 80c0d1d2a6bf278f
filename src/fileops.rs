use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::descriptor::TypeDescriptor;

/// File operations on the source file a descriptor was resolved from.
///
/// The descriptor keeps its original path after a rename or removal; resolve
/// again to observe the new layout.
impl TypeDescriptor {
    /// Copies the source file to `target`, creating parent directories.
    ///
    /// An existing target is only replaced when it is older than the source,
    /// unless `overwrite_newer` is set.
    pub fn copy_to(&self, target: impl AsRef<Path>, overwrite_newer: bool) -> Result<()> {
        let origin = self.source_file();
        let target = target.as_ref();

        if !overwrite_newer && target.exists() && !is_newer(origin, target)? {
            return Ok(());
        }

        create_parent(target)?;
        fs::copy(origin, target).with_context(|| {
            format!(
                "Failed to copy source file: {} -> {}",
                origin.display(),
                target.display()
            )
        })?;
        Ok(())
    }

    /// Moves the source file to `target`. Fails when `target` exists and
    /// `overwrite` is false.
    pub fn rename_to(&self, target: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        let origin = self.source_file();
        let target = target.as_ref();

        if !overwrite && target.exists() {
            bail!("Target already exists: {}", target.display());
        }

        create_parent(target)?;
        fs::rename(origin, target).with_context(|| {
            format!(
                "Failed to rename source file: {} -> {}",
                origin.display(),
                target.display()
            )
        })
    }

    /// Deletes the source file. A file that is already gone is not an error.
    pub fn remove_source(&self) -> Result<()> {
        let path = self.source_file();
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove source file: {}", path.display()))
    }
}

fn is_newer(origin: &Path, target: &Path) -> Result<bool> {
    let origin_mtime = fs::metadata(origin)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to read mtime: {}", origin.display()))?;
    let target_mtime = fs::metadata(target)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to read mtime: {}", target.display()))?;
    Ok(origin_mtime > target_mtime)
}

fn create_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}
