//! Configuration loading and parsing for shalias.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Merging the cascade into effective settings

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, default_alias_file, discover_configs, is_env_truthy, load_settings,
	merge_configs, resolve_config_path, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, MAX_ROUNDS_LIMIT, Settings};
