use std::env;

use crate::cli::Cli;
use crate::scan::{DEFAULT_EXTENSION, ScanOptions, normalize_extension};

pub const EXTENSION_ENV: &str = "PHP_CLASS_FINDER_EXTENSION";

/// Scan options for the binary: CLI flags, then the environment, then defaults.
pub fn resolve_scan_options(cli: &Cli) -> ScanOptions {
    scan_options_from(
        cli.extension.as_deref(),
        env::var(EXTENSION_ENV).ok().as_deref(),
        cli.hidden,
        cli.respect_gitignore,
    )
}

fn scan_options_from(
    flag: Option<&str>,
    env_value: Option<&str>,
    include_hidden: bool,
    respect_ignore_files: bool,
) -> ScanOptions {
    let extension = flag
        .or(env_value)
        .map(normalize_extension)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    ScanOptions {
        extension,
        include_hidden,
        respect_ignore_files,
    }
}
