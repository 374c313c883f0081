//! Reserved-name checks for shalias.
//!
//! This module handles:
//! - Asking the hosting shell whether a name already resolves to a command
//! - Falling back to a `PATH` search when no shell can be spawned

use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Answers whether a name can already be executed as-is.
pub trait CommandLookup {
	/// Returns what `name` currently resolves to, or `None` if it is free.
	fn lookup(&self, name: &str) -> Option<String>;
}

/// Lookup backed by `sh -c 'command -v "$1"'`.
///
/// Covers shell builtins, keywords and executables on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLookup;

impl CommandLookup for ShellLookup {
	fn lookup(&self, name: &str) -> Option<String> {
		// `command -v` would read a leading dash as an option.
		if name.starts_with('-') {
			return resolve_command(name).map(|p| p.display().to_string());
		}

		let output = Command::new("sh")
			.args(["-c", r#"command -v "$1""#, "sh", name])
			.stdin(Stdio::null())
			.stderr(Stdio::null())
			.output();

		match output {
			Ok(output) if output.status.success() => {
				let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
				(!found.is_empty()).then_some(found)
			}
			Ok(_) => None,
			Err(e) => {
				debug!("Could not spawn sh for reserved-name check: {e}");
				resolve_command(name).map(|p| p.display().to_string())
			}
		}
	}
}

/// Lookup that treats every name as free.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl CommandLookup for NoLookup {
	fn lookup(&self, _name: &str) -> Option<String> {
		None
	}
}

/// Resolve a command name to its full path.
///
/// If the command is already an absolute path, returns it as-is.
/// Otherwise, searches PATH for the command.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	if path.is_absolute() {
		return path.exists().then(|| path.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var)
		.map(|dir| dir.join(command))
		.find(|full_path| full_path.is_file())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve_command_absolute_path() {
		#[cfg(unix)]
		{
			let result = resolve_command("/bin/sh");
			assert_eq!(result.as_deref(), Some(Path::new("/bin/sh")));
		}
	}

	#[test]
	fn test_resolve_command_not_found() {
		assert!(resolve_command("/nonexistent/path/to/binary").is_none());
		assert!(resolve_command("shalias_no_such_command_12345").is_none());
	}

	#[test]
	fn test_resolve_command_from_path() {
		#[cfg(unix)]
		assert!(resolve_command("sh").is_some());
	}

	#[cfg(unix)]
	#[test]
	fn test_shell_lookup_finds_builtins_and_binaries() {
		assert_eq!(ShellLookup.lookup("cd").as_deref(), Some("cd"));
		assert!(ShellLookup.lookup("sh").is_some());
		assert!(ShellLookup.lookup("shalias_no_such_command_12345").is_none());
	}

	#[test]
	fn test_no_lookup_is_always_free() {
		assert!(NoLookup.lookup("sh").is_none());
	}
}
