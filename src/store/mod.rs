//! Alias file reading and writing for shalias.
//!
//! This module handles:
//! - Line classification with quote-aware comment splitting
//! - Building the ordered alias map from a file
//! - Whole-file writes and appending new definitions

pub mod io;
pub mod lexer;
pub mod types;

pub use io::{
	append_definition, check_single_line, format_definition, load_store, save_store, write_alias_file,
};
pub use lexer::{
	AliasLine, LineKind, classify_line, has_control_chars, is_name_char, is_valid_name,
};
pub use types::{AliasEntry, AliasMap, AliasStore, StoreLine};
