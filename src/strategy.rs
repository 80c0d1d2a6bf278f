use std::fmt;
use std::path::{Path, PathBuf};

use crate::collection::DescriptorCollection;
use crate::error::ResolutionError;
use crate::parse::{candidate_identifier, extract_namespace};
use crate::resolve::{LoadedSource, TypeIndex, load_sources};
use crate::scan::{ScanOptions, scan_sources};

/// Turns a directory into descriptors.
///
/// Implementations must not fail: files that cannot be resolved are skipped.
pub trait LoadingStrategy: Send + Sync + fmt::Debug {
    fn resolve(&self, directory: &Path) -> DescriptorCollection;
}

/// Sources under a directory plus the index used to resolve them.
struct LoadedDirectory {
    sources: Vec<Result<LoadedSource, ResolutionError>>,
    index: TypeIndex,
}

fn load_directory(
    directory: &Path,
    options: &ScanOptions,
    search_roots: &[PathBuf],
) -> Option<LoadedDirectory> {
    let files = match scan_sources(directory, options) {
        Ok(files) => files,
        Err(err) => {
            tracing::warn!(directory = %directory.display(), error = %err, "cannot scan directory");
            return None;
        }
    };

    let sources = load_sources(&files);
    let mut index = TypeIndex::from_sources(sources.iter().filter_map(|s| s.as_ref().ok()));

    for root in search_roots {
        let extra = match scan_sources(root, options) {
            Ok(extra) => extra,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "cannot scan search root");
                continue;
            }
        };
        for source in load_sources(&extra).iter().filter_map(|s| s.as_ref().ok()) {
            index.insert(source);
        }
    }

    Some(LoadedDirectory { sources, index })
}

/// Namespace the PSR-4 candidate is built from. The keyword scan can be fooled
/// by `namespace X;` inside a comment, so a result the parser did not see
/// yields to the first parsed namespace.
fn file_namespace(source: &LoadedSource) -> String {
    match extract_namespace(&source.contents) {
        Some(ns) if ns.is_empty() || source.unit.namespaces.contains(&ns) => ns,
        _ => source.unit.namespaces.first().cloned().unwrap_or_default(),
    }
}

fn skip(err: &ResolutionError) {
    tracing::debug!(error = %err, "skipping unresolvable source");
}

/// Expects one class per file, named after the file, in the namespace the
/// file declares (PSR-4 layout).
#[derive(Debug, Clone, Default)]
pub struct Psr4LoadingStrategy {
    options: ScanOptions,
    search_roots: Vec<PathBuf>,
}

impl Psr4LoadingStrategy {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            search_roots: Vec::new(),
        }
    }

    /// Indexes `root` for resolving parents, interfaces and traits without
    /// returning classes from it.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }
}

impl LoadingStrategy for Psr4LoadingStrategy {
    fn resolve(&self, directory: &Path) -> DescriptorCollection {
        let mut collection = DescriptorCollection::new();
        let Some(loaded) = load_directory(directory, &self.options, &self.search_roots) else {
            return collection;
        };

        let mut skipped = 0usize;
        for source in &loaded.sources {
            let source = match source {
                Ok(source) => source,
                Err(err) => {
                    skip(err);
                    skipped += 1;
                    continue;
                }
            };

            let namespace = file_namespace(source);
            let Some(identifier) = candidate_identifier(&namespace, &source.path) else {
                skipped += 1;
                continue;
            };

            match loaded.index.resolve(&identifier) {
                Ok(descriptor) => collection.push(descriptor),
                Err(err) => {
                    skip(&err);
                    skipped += 1;
                }
            }
        }

        tracing::debug!(
            directory = %directory.display(),
            resolved = collection.len(),
            skipped,
            "psr-4 strategy finished"
        );
        collection
    }
}

/// Resolves every class declared in each file, whatever the file is called.
#[derive(Debug, Clone, Default)]
pub struct ClassmapLoadingStrategy {
    options: ScanOptions,
    search_roots: Vec<PathBuf>,
}

impl ClassmapLoadingStrategy {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            search_roots: Vec::new(),
        }
    }

    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }
}

impl LoadingStrategy for ClassmapLoadingStrategy {
    fn resolve(&self, directory: &Path) -> DescriptorCollection {
        let mut collection = DescriptorCollection::new();
        let Some(loaded) = load_directory(directory, &self.options, &self.search_roots) else {
            return collection;
        };

        for source in &loaded.sources {
            let source = match source {
                Ok(source) => source,
                Err(err) => {
                    skip(err);
                    continue;
                }
            };

            for decl in source.unit.declarations.iter().filter(|d| d.kind.is_class_like()) {
                match loaded.index.resolve(&decl.name) {
                    // Another file declared the name first.
                    Ok(descriptor) if descriptor.source_file() != source.path => {}
                    Ok(descriptor) => collection.push(descriptor),
                    Err(err) => skip(&err),
                }
            }
        }

        tracing::debug!(
            directory = %directory.display(),
            resolved = collection.len(),
            "classmap strategy finished"
        );
        collection
    }
}
