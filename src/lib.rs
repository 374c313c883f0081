//! Shalias - manage a shell alias file with chain-aware de-duplication.
//!
//! This library provides the core functionality for shalias, including:
//! - Alias file parsing with quote-aware comment handling
//! - Chain resolution and expansion of composite command lines
//! - Collapsing raw commands back to their shortest alias form
//! - Renaming aliases and consolidating duplicated definitions
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```no_run
//! use shalias_cli::engine::{ExpansionMap, Resolver, collapse};
//! use shalias_cli::store::load_store;
//! use std::path::Path;
//!
//! let store = load_store(Path::new("/home/me/.bash_aliases")).unwrap();
//! let aliases = store.alias_map();
//! let resolver = Resolver::new(&aliases);
//!
//! println!("{}", resolver.expand("gco main && g push"));
//!
//! let expansions = ExpansionMap::build(&resolver);
//! println!("{}", collapse("docker compose up -d", &expansions, resolver.max_rounds()));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod listing;
pub mod prompt;
pub mod store;

pub use error::{Result, ShaliasError};
