use crate::store::lexer::{AliasLine, LineKind, classify_line};
use std::collections::HashMap;

/// A single alias definition read from the alias file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
	/// The alias name.
	pub name: String,

	/// The quote-stripped, trimmed command.
	pub command: String,

	/// Trailing comment text, without `#`.
	pub comment: Option<String>,

	/// The original line as written.
	pub line: String,

	/// 1-based line number in the file.
	pub line_number: usize,
}

/// Ordered mapping of alias name to command.
///
/// Iteration follows file order. Inserting a name that already exists
/// replaces its command but keeps its original position, so lookups see the
/// last definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
	entries: Vec<(String, String)>,
	index: HashMap<String, usize>,
}

impl AliasMap {
	/// Create an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace the command for `name`.
	pub fn insert(&mut self, name: impl Into<String>, command: impl Into<String>) {
		let name = name.into();
		let command = command.into();
		match self.index.get(&name) {
			Some(&i) => self.entries[i].1 = command,
			None => {
				self.index.insert(name.clone(), self.entries.len());
				self.entries.push((name, command));
			}
		}
	}

	/// Look up the command for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.index
			.get(name)
			.map(|&i| self.entries[i].1.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.index.contains_key(name)
	}

	/// Iterate `(name, command)` pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(name, command)| (name.as_str(), command.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for AliasMap {
	fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
		let mut map = AliasMap::new();
		for (name, command) in iter {
			map.insert(name, command);
		}
		map
	}
}

/// One line of the alias file with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLine {
	/// The line text without its line terminator.
	pub text: String,

	/// 1-based line number.
	pub number: usize,

	pub kind: LineKind,
}

/// The whole alias file, line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasStore {
	pub lines: Vec<StoreLine>,
}

impl AliasStore {
	/// Classify every line of `content`.
	pub fn parse(content: &str) -> Self {
		let lines = content
			.lines()
			.enumerate()
			.map(|(i, text)| StoreLine {
				text: text.to_string(),
				number: i + 1,
				kind: classify_line(text),
			})
			.collect();
		AliasStore { lines }
	}

	/// Iterate over the alias definition lines.
	pub fn alias_lines(&self) -> impl Iterator<Item = (&StoreLine, &AliasLine)> {
		self.lines.iter().filter_map(|line| match &line.kind {
			LineKind::Alias(alias) => Some((line, alias)),
			_ => None,
		})
	}

	/// All alias definitions in file order.
	pub fn entries(&self) -> Vec<AliasEntry> {
		self.alias_lines()
			.map(|(line, alias)| AliasEntry {
				name: alias.name.clone(),
				command: alias.command(),
				comment: alias.comment_text().map(str::to_string),
				line: line.text.clone(),
				line_number: line.number,
			})
			.collect()
	}

	/// Build the name -> command map for this store.
	pub fn alias_map(&self) -> AliasMap {
		self.alias_lines()
			.map(|(_, alias)| (alias.name.clone(), alias.command()))
			.collect()
	}

	/// Returns true if an alias named `name` is defined.
	pub fn contains(&self, name: &str) -> bool {
		self.alias_lines().any(|(_, alias)| alias.name == name)
	}

	/// Render the store back to text, one line per entry, with a trailing newline.
	pub fn render(&self) -> String {
		let mut out = String::new();
		for line in &self.lines {
			out.push_str(&line.text);
			out.push('\n');
		}
		out
	}
}
