use crate::engine::DEFAULT_MAX_ROUNDS;
use crate::error::ShaliasError;
use serde::Deserialize;
use std::path::PathBuf;

/// Largest accepted `max-rounds` value.
pub const MAX_ROUNDS_LIMIT: usize = 1000;

/// Top-level configuration from a `.shalias.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	/// If true, stop the directory cascade here and continue with ~/.shalias.toml.
	#[serde(default)]
	pub root: bool,

	/// Alias file used when none is given on the command line.
	/// Relative paths are resolved against the directory of this config file.
	#[serde(default)]
	pub alias_file: Option<PathBuf>,

	/// Bound on alias substitutions per resolution.
	#[serde(default)]
	pub max_rounds: Option<usize>,

	/// Stop resolving when an alias repeats instead of running to the round bound.
	#[serde(default)]
	pub stop_on_repeat: Option<bool>,

	/// Whether new names are checked against existing commands.
	#[serde(default)]
	pub check_reserved: Option<bool>,

	/// Environment variable name that, if truthy, skips ~/.shalias.toml lookup.
	#[serde(default)]
	pub user_config_disable_env_var: Option<String>,
}

impl Config {
	/// Validate value ranges.
	pub fn validate(&self) -> Result<(), ShaliasError> {
		if let Some(rounds) = self.max_rounds
			&& !(1..=MAX_ROUNDS_LIMIT).contains(&rounds)
		{
			return Err(ShaliasError::InvalidConfigValue {
				key: "max-rounds".to_string(),
				message: format!("must be between 1 and {MAX_ROUNDS_LIMIT}, got {rounds}"),
			});
		}
		Ok(())
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Effective settings after merging the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	/// Alias file from configuration, already resolved to a usable path.
	pub alias_file: Option<PathBuf>,

	pub max_rounds: usize,

	pub stop_on_repeat: bool,

	pub check_reserved: bool,

	/// Config files that contributed, most specific first.
	pub sources: Vec<PathBuf>,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			alias_file: None,
			max_rounds: DEFAULT_MAX_ROUNDS,
			stop_on_repeat: false,
			check_reserved: true,
			sources: Vec::new(),
		}
	}
}
