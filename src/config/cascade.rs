use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, Settings};
use crate::error::{Result, ShaliasError};
use log::debug;
use std::path::{Path, PathBuf};

/// File name looked up in each directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".shalias.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.shalias.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.shalias.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = discover_directory_configs(start_dir)?;

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Walk up from `start_dir` collecting `.shalias.toml` files until a root config.
pub fn discover_directory_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			debug!("Loading config {}", config_path.display());
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		match current_dir.parent() {
			Some(parent) => current_dir = parent.to_path_buf(),
			None => break,
		}
	}

	Ok(configs)
}

/// Load the user's ~/.shalias.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.user_config_disable_env_var
			&& is_env_truthy(env_var)
		{
			debug!("User config disabled by {env_var}");
			return Ok(None);
		}
	}

	let user_config_path = user_config_path()?;

	// Already part of the directory walk when running under $HOME.
	if existing_configs.iter().any(|c| c.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
pub fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into the effective settings.
///
/// For every key the first config (most specific) that sets it wins.
pub fn merge_configs(configs: &[LoadedConfig]) -> Settings {
	let mut settings = Settings::default();
	let mut alias_file = None;
	let mut max_rounds = None;
	let mut stop_on_repeat = None;
	let mut check_reserved = None;

	for loaded in configs {
		let config = &loaded.config;

		if alias_file.is_none()
			&& let Some(ref path) = config.alias_file
		{
			let base = loaded.path.parent().unwrap_or(Path::new("."));
			alias_file = Some(resolve_config_path(path, base));
		}
		max_rounds = max_rounds.or(config.max_rounds);
		stop_on_repeat = stop_on_repeat.or(config.stop_on_repeat);
		check_reserved = check_reserved.or(config.check_reserved);

		settings.sources.push(loaded.path.clone());
	}

	settings.alias_file = alias_file;
	if let Some(rounds) = max_rounds {
		settings.max_rounds = rounds;
	}
	if let Some(stop) = stop_on_repeat {
		settings.stop_on_repeat = stop;
	}
	if let Some(check) = check_reserved {
		settings.check_reserved = check;
	}

	settings
}

/// Expand a leading `~/` and anchor relative paths at `base`.
pub fn resolve_config_path(path: &Path, base: &Path) -> PathBuf {
	if let Ok(rest) = path.strip_prefix("~")
		&& let Some(home) = dirs::home_dir()
	{
		return home.join(rest);
	}
	if path.is_absolute() {
		path.to_path_buf()
	} else {
		base.join(path)
	}
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_settings(start_dir: &Path) -> Result<Settings> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ShaliasError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

/// Alias file used when neither the command line nor config names one.
pub fn default_alias_file() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ShaliasError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(".bash_aliases"))
}

impl Settings {
	/// The configured alias file, or `~/.bash_aliases`.
	pub fn alias_file_or_default(&self) -> Result<PathBuf> {
		match self.alias_file {
			Some(ref path) => Ok(path.clone()),
			None => default_alias_file(),
		}
	}
}
