//! # php-class-finder
//!
//! Discovers PHP classes under a directory tree and filters them by namespace,
//! name, parent class, implemented interfaces, used traits and declared members.
//!
//! ## Architecture
//!
//! - **scan**: recursive source-file enumeration
//! - **parse**: namespace extraction heuristic and candidate identifiers
//! - **structure**: PHP declaration extraction using tree-sitter AST parsing
//! - **resolve**: type index that resolves identifiers into descriptors
//! - **descriptor**: immutable class descriptors
//! - **collection**: ordered descriptor collections
//! - **strategy**: pluggable loading strategies (PSR-4, classmap)
//! - **criteria** / **finder**: immutable search builder and filter pipeline
//! - **fileops**: copy/rename/remove of a descriptor's source file

pub mod cli;
pub mod collection;
pub mod config;
pub mod criteria;
pub mod descriptor;
pub mod error;
pub mod fileops;
pub mod finder;
pub mod logging;
pub mod parse;
pub mod resolve;
pub mod scan;
pub mod strategy;
pub mod structure;

pub use collection::DescriptorCollection;
pub use descriptor::TypeDescriptor;
pub use error::ResolutionError;
pub use finder::Finder;
pub use strategy::{ClassmapLoadingStrategy, LoadingStrategy, Psr4LoadingStrategy};
