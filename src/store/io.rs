use crate::error::{Result, ShaliasError};
use crate::store::lexer::{has_control_chars, quote_command};
use crate::store::types::AliasStore;
use log::{debug, info};
use std::path::Path;

/// Read the raw contents of an alias file.
pub fn read_alias_file(path: &Path) -> Result<String> {
	if !path.exists() {
		return Err(ShaliasError::AliasFileNotFound {
			path: path.to_path_buf(),
		});
	}

	std::fs::read_to_string(path).map_err(|source| ShaliasError::AliasFileRead {
		path: path.to_path_buf(),
		source,
	})
}

/// Read and classify an alias file.
pub fn load_store(path: &Path) -> Result<AliasStore> {
	let content = read_alias_file(path)?;
	let store = AliasStore::parse(&content);
	debug!(
		"Loaded {} lines ({} aliases) from {}",
		store.lines.len(),
		store.alias_lines().count(),
		path.display()
	);
	Ok(store)
}

/// Replace the alias file with `store`'s rendering.
pub fn save_store(path: &Path, store: &AliasStore) -> Result<()> {
	write_alias_file(path, &store.render())
}

/// Replace the alias file contents.
pub fn write_alias_file(path: &Path, content: &str) -> Result<()> {
	std::fs::write(path, content).map_err(|source| ShaliasError::AliasFileWrite {
		path: path.to_path_buf(),
		source,
	})?;
	info!("Wrote {}", path.display());
	Ok(())
}

/// Format an alias definition line.
pub fn format_definition(name: &str, command: &str, comment: Option<&str>) -> String {
	let mut line = format!("alias {name}={}", quote_command(command));
	if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
		line.push_str(" # ");
		line.push_str(comment);
	}
	line
}

/// Reject text that would break out of a single definition line.
pub fn check_single_line(what: &str, text: &str) -> Result<()> {
	if has_control_chars(text) {
		return Err(ShaliasError::ControlCharacters {
			what: what.to_string(),
		});
	}
	Ok(())
}

/// Append an alias definition to the file, adding a newline first if the
/// existing content does not end with one.
pub fn append_definition(
	path: &Path,
	name: &str,
	command: &str,
	comment: Option<&str>,
) -> Result<String> {
	check_single_line("command", command)?;
	if let Some(comment) = comment {
		check_single_line("comment", comment)?;
	}

	let mut content = read_alias_file(path)?;
	if !content.is_empty() && !content.ends_with('\n') {
		content.push('\n');
	}

	let line = format_definition(name, command, comment);
	content.push_str(&line);
	content.push('\n');

	write_alias_file(path, &content)?;
	Ok(line)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_load_missing_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let result = load_store(&temp_dir.path().join("missing"));
		match result.unwrap_err() {
			ShaliasError::AliasFileNotFound { path } => {
				assert!(path.ends_with("missing"));
			}
			other => panic!("Expected AliasFileNotFound, got {other:?}"),
		}
	}

	#[test]
	fn test_format_definition() {
		assert_eq!(format_definition("ll", "ls -la", None), "alias ll='ls -la'");
		assert_eq!(
			format_definition("ll", "ls -la", Some("  long  ")),
			"alias ll='ls -la' # long"
		);
		assert_eq!(format_definition("ll", "ls -la", Some("")), "alias ll='ls -la'");
	}

	#[test]
	fn test_append_adds_missing_newline() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("aliases");
		fs::write(&path, "alias g='git'").unwrap();

		let line = append_definition(&path, "gs", "g status", Some("status")).unwrap();
		assert_eq!(line, "alias gs='g status' # status");
		assert_eq!(
			fs::read_to_string(&path).unwrap(),
			"alias g='git'\nalias gs='g status' # status\n"
		);
	}

	#[test]
	fn test_append_rejects_multi_line_values() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("aliases");
		fs::write(&path, "alias g='git'\n").unwrap();

		let result = append_definition(&path, "x", "echo x", Some("x\nalias ls=rm"));
		match result.unwrap_err() {
			ShaliasError::ControlCharacters { what } => assert_eq!(what, "comment"),
			other => panic!("Expected ControlCharacters, got {other:?}"),
		}
		assert!(append_definition(&path, "x", "echo x\rrm -rf", None).is_err());
		assert_eq!(fs::read_to_string(&path).unwrap(), "alias g='git'\n");
	}

	#[test]
	fn test_append_to_empty_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("aliases");
		fs::write(&path, "").unwrap();

		append_definition(&path, "g", "git", None).unwrap();
		assert_eq!(fs::read_to_string(&path).unwrap(), "alias g='git'\n");
	}

	#[test]
	fn test_save_store_round_trips() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("aliases");
		fs::write(&path, "# top\nalias g='git'").unwrap();

		let store = load_store(&path).unwrap();
		save_store(&path, &store).unwrap();
		assert_eq!(fs::read_to_string(&path).unwrap(), "# top\nalias g='git'\n");
	}
}
