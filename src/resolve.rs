use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::descriptor::{ResolvedFacts, TypeDescriptor};
use crate::error::ResolutionError;
use crate::structure::{Declaration, DeclarationKind, SourceUnit, parse_source};

/// A source file that was read and parsed successfully.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub contents: String,
    pub unit: SourceUnit,
}

impl LoadedSource {
    pub fn load(path: &Path) -> Result<Self, ResolutionError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ResolutionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path.to_path_buf(), contents)
    }

    pub fn parse(path: PathBuf, contents: String) -> Result<Self, ResolutionError> {
        match parse_source(&contents) {
            Some(unit) => Ok(Self {
                path,
                contents,
                unit,
            }),
            None => Err(ResolutionError::Parse { path }),
        }
    }
}

/// Reads and parses `paths` on the rayon pool. Results keep the input order.
pub fn load_sources(paths: &[PathBuf]) -> Vec<Result<LoadedSource, ResolutionError>> {
    paths.par_iter().map(|p| LoadedSource::load(p)).collect()
}

#[derive(Debug, Clone)]
struct IndexedType {
    declaration: Declaration,
    source_file: PathBuf,
}

/// Declarations keyed by case-insensitive fully-qualified name.
///
/// This is the resolution facility: it turns a type identifier into a
/// [`TypeDescriptor`] using only what was parsed, without loading or running
/// any PHP.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    types: HashMap<String, IndexedType>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a LoadedSource>) -> Self {
        let mut index = Self::new();
        for source in sources {
            index.insert(source);
        }
        index
    }

    /// Adds every declaration in `source`. An already indexed name keeps its
    /// first declaration.
    pub fn insert(&mut self, source: &LoadedSource) {
        for decl in &source.unit.declarations {
            self.types
                .entry(index_key(&decl.name))
                .or_insert_with(|| IndexedType {
                    declaration: decl.clone(),
                    source_file: source.path.clone(),
                });
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn declaration(&self, identifier: &str) -> Option<&Declaration> {
        self.lookup(identifier).map(|t| &t.declaration)
    }

    pub fn resolve(&self, identifier: &str) -> Result<TypeDescriptor, ResolutionError> {
        let entry = self
            .lookup(identifier)
            .ok_or_else(|| ResolutionError::not_found(identifier))?;
        let decl = &entry.declaration;
        if !decl.kind.is_class_like() {
            return Err(ResolutionError::NotAClass {
                identifier: decl.name.clone(),
                kind: decl.kind,
            });
        }

        let mut facts = ResolvedFacts {
            parent_name: decl.parent.as_deref().map(|p| self.canonical_name(p)),
            trait_names: decl.traits.iter().map(|t| self.canonical_name(t)).collect(),
            ..Default::default()
        };
        let mut visited = HashSet::new();
        self.absorb(decl, &mut facts, &mut visited);
        add_implicit_members(decl, &mut facts);

        Ok(TypeDescriptor::new(decl, facts, entry.source_file.clone()))
    }

    fn lookup(&self, identifier: &str) -> Option<&IndexedType> {
        self.types.get(&index_key(identifier))
    }

    fn canonical_name(&self, name: &str) -> String {
        match self.lookup(name) {
            Some(t) => t.declaration.name.clone(),
            None => name.trim_start_matches('\\').to_string(),
        }
    }

    /// Folds `decl` and everything it inherits into `facts`. Types missing from
    /// the index stop the walk on that branch.
    fn absorb(&self, decl: &Declaration, facts: &mut ResolvedFacts, visited: &mut HashSet<String>) {
        if !visited.insert(index_key(&decl.name)) {
            return;
        }

        facts.constant_names.extend(decl.constants.iter().cloned());
        facts.property_names.extend(decl.properties.iter().cloned());
        facts.method_names.extend(decl.methods.iter().cloned());

        for name in &decl.traits {
            if let Some(used) = self.lookup(name) {
                self.absorb(&used.declaration, facts, visited);
            }
        }

        for name in &decl.interfaces {
            facts.interface_names.insert(self.canonical_name(name));
            if let Some(iface) = self.lookup(name) {
                self.absorb(&iface.declaration, facts, visited);
            }
        }

        if let Some(parent) = &decl.parent
            && let Some(parent) = self.lookup(parent)
        {
            self.absorb(&parent.declaration, facts, visited);
        }
    }
}

/// Interfaces and methods PHP attaches without an explicit declaration.
fn add_implicit_members(decl: &Declaration, facts: &mut ResolvedFacts) {
    if decl.kind == DeclarationKind::Enum {
        facts.interface_names.insert("UnitEnum".to_string());
        facts.method_names.insert("cases".to_string());
        if decl.is_backed {
            facts.interface_names.insert("BackedEnum".to_string());
            facts.method_names.insert("from".to_string());
            facts.method_names.insert("tryFrom".to_string());
        }
    }

    if facts
        .method_names
        .iter()
        .any(|m| m.eq_ignore_ascii_case("__toString"))
    {
        facts.interface_names.insert("Stringable".to_string());
    }
}

fn index_key(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}
