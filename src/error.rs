use std::path::PathBuf;
use thiserror::Error;

use crate::structure::DeclarationKind;

/// Why a type identifier or source file could not be turned into a descriptor.
///
/// Loading strategies recover from every variant locally: the offending file is
/// skipped and the search continues.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Failed to read source file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse source file: {path}")]
    Parse { path: PathBuf },

    #[error("No type declaration found for {identifier}")]
    NotFound { identifier: String },

    #[error("{identifier} is declared as {kind}, not a class")]
    NotAClass {
        identifier: String,
        kind: DeclarationKind,
    },
}

impl ResolutionError {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }
}
