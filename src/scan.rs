use anyhow::{Result, bail};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "php";

/// Controls which files a directory scan yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Source-file extension without the leading dot.
    pub extension: String,
    pub include_hidden: bool,
    pub respect_ignore_files: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            include_hidden: false,
            respect_ignore_files: false,
        }
    }
}

impl ScanOptions {
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn with_ignore_files(mut self, respect_ignore_files: bool) -> Self {
        self.respect_ignore_files = respect_ignore_files;
        self
    }
}

pub fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_string()
}

/// Recursively lists source files under `base_path` in traversal order.
///
/// The order follows the filesystem walk and is not sorted.
pub fn scan_sources(base_path: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !base_path.is_dir() {
        bail!("Not a directory: {}", base_path.display());
    }

    let walker = WalkBuilder::new(base_path)
        .hidden(!options.include_hidden)
        .ignore(options.respect_ignore_files)
        .git_ignore(options.respect_ignore_files)
        .git_global(options.respect_ignore_files)
        .git_exclude(options.respect_ignore_files)
        .parents(options.respect_ignore_files)
        .require_git(false)
        .build();

    let extension = options.extension.as_str();
    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|e| e == extension) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
