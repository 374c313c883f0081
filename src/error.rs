use std::path::PathBuf;

/// Library-level structured errors for shalias.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ShaliasError {
	#[error("Alias file not found: {path}")]
	AliasFileNotFound { path: PathBuf },

	#[error("Failed to read alias file: {path}")]
	AliasFileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write alias file: {path}")]
	AliasFileWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid config value for {key}: {message}")]
	InvalidConfigValue { key: String, message: String },

	#[error("Alias not defined: {name}")]
	AliasNotFound { name: String },

	#[error("Invalid alias name: {name:?} (allowed characters: A-Z a-z 0-9 . _ -)")]
	InvalidName { name: String },

	#[error("Alias already exists: {name}")]
	NameCollision { name: String },

	#[error("Name is reserved: {name} (currently resolves to {resolves_to})")]
	ReservedName { name: String, resolves_to: String },

	#[error("Failed to read or write interactive prompt")]
	Prompt {
		#[source]
		source: std::io::Error,
	},

	#[error("Missing required input: {what}")]
	MissingInput { what: String },

	#[error("Invalid {what}: must be a single line without control characters")]
	ControlCharacters { what: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

impl ShaliasError {
	/// Process exit code for this error.
	///
	/// Usage, validation and not-found errors exit with 2, everything else with 1.
	pub fn exit_code(&self) -> u8 {
		match self {
			ShaliasError::AliasFileNotFound { .. }
			| ShaliasError::AliasNotFound { .. }
			| ShaliasError::InvalidName { .. }
			| ShaliasError::NameCollision { .. }
			| ShaliasError::ReservedName { .. }
			| ShaliasError::MissingInput { .. }
			| ShaliasError::ControlCharacters { .. } => 2,
			_ => 1,
		}
	}
}

/// Result type alias using ShaliasError.
pub type Result<T> = std::result::Result<T, ShaliasError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validation_errors_exit_with_two() {
		let errors = [
			ShaliasError::AliasFileNotFound {
				path: PathBuf::from("/nope"),
			},
			ShaliasError::AliasNotFound {
				name: "gco".to_string(),
			},
			ShaliasError::InvalidName {
				name: "a b".to_string(),
			},
			ShaliasError::NameCollision {
				name: "ll".to_string(),
			},
			ShaliasError::ReservedName {
				name: "ls".to_string(),
				resolves_to: "/bin/ls".to_string(),
			},
			ShaliasError::MissingInput {
				what: "command".to_string(),
			},
			ShaliasError::ControlCharacters {
				what: "comment".to_string(),
			},
		];
		for err in &errors {
			assert_eq!(err.exit_code(), 2, "{err}");
		}
	}

	#[test]
	fn test_runtime_errors_exit_with_one() {
		let err = ShaliasError::AliasFileWrite {
			path: PathBuf::from("/readonly"),
			source: std::io::Error::other("denied"),
		};
		assert_eq!(err.exit_code(), 1);
		assert_eq!(ShaliasError::HomeDirectoryNotFound.exit_code(), 1);
	}

	#[test]
	fn test_reserved_name_message_includes_hint() {
		let err = ShaliasError::ReservedName {
			name: "ls".to_string(),
			resolves_to: "/bin/ls".to_string(),
		};
		assert!(err.to_string().contains("/bin/ls"));
	}
}
