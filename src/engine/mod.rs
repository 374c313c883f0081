//! Alias chain resolution and refactoring for shalias.
//!
//! This module handles:
//! - Resolving leading alias tokens to their full expansions
//! - Splitting composite command lines on shell control operators
//! - Collapsing raw commands back to their shortest alias form
//! - Renaming aliases and rewriting references to them
//! - Consolidating duplicate and repeated commands across a whole file

pub mod collapse;
pub mod consolidate;
pub mod rename;
pub mod resolver;
pub mod splitter;

pub use collapse::{ExpansionMap, collapse, is_prefix_of};
pub use consolidate::{AutoAlias, ConsolidationReport, DuplicateGroup, consolidate};
pub use rename::{RenameOutcome, rename_alias, replace_word_unquoted, validate_new_name};
pub use resolver::{DEFAULT_MAX_ROUNDS, Resolver, split_first_word};
pub use splitter::{Operator, Segment, normalize_whitespace, split_segments};
