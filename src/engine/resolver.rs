use crate::engine::splitter::{normalize_whitespace, split_segments};
use crate::store::AliasMap;
use log::debug;

/// Default bound on alias substitutions per resolution.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Split off the first whitespace-delimited word.
///
/// Returns the word and the remainder with leading whitespace removed.
pub fn split_first_word(s: &str) -> (&str, &str) {
	let s = s.trim_start();
	match s.find(char::is_whitespace) {
		Some(i) => (&s[..i], s[i..].trim_start()),
		None => (s, ""),
	}
}

/// Resolves leading alias tokens to their expansions.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
	aliases: &'a AliasMap,
	max_rounds: usize,
	stop_on_repeat: bool,
}

impl<'a> Resolver<'a> {
	/// Create a resolver with the default round bound.
	pub fn new(aliases: &'a AliasMap) -> Self {
		Resolver {
			aliases,
			max_rounds: DEFAULT_MAX_ROUNDS,
			stop_on_repeat: false,
		}
	}

	/// Use a different round bound.
	pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
		self.max_rounds = max_rounds;
		self
	}

	/// Stop as soon as the leading token names an alias that was already
	/// substituted, the way shells treat an alias inside its own expansion.
	///
	/// Off by default: only the round bound ends a cycle.
	pub fn with_stop_on_repeat(mut self, stop_on_repeat: bool) -> Self {
		self.stop_on_repeat = stop_on_repeat;
		self
	}

	pub fn aliases(&self) -> &'a AliasMap {
		self.aliases
	}

	pub fn max_rounds(&self) -> usize {
		self.max_rounds
	}

	pub fn stop_on_repeat(&self) -> bool {
		self.stop_on_repeat
	}

	/// Expand the leading token of `command` while it names an alias.
	///
	/// Stops after `max_rounds` substitutions or when the leading token is not
	/// an alias.
	pub fn resolve(&self, command: &str) -> String {
		self.walk(command, &[]).0
	}

	/// Alias names substituted, in order, while resolving `command`.
	pub fn substitutions(&self, command: &str) -> Vec<String> {
		self.walk(command, &[]).1
	}

	fn walk(&self, command: &str, exclude: &[&str]) -> (String, Vec<String>) {
		let mut current = command.to_string();
		let mut substituted: Vec<String> = Vec::new();

		for _ in 0..self.max_rounds {
			let (token, rest) = split_first_word(&current);
			let Some(replacement) = self.aliases.get(token) else {
				break;
			};
			if self.stop_on_repeat
				&& (exclude.iter().any(|name| *name == token)
					|| substituted.iter().any(|name| name == token))
			{
				debug!("Alias {token} already expanded, stopping");
				break;
			}

			let next = if rest.is_empty() {
				replacement.to_string()
			} else {
				format!("{replacement} {rest}").trim_end().to_string()
			};
			substituted.push(token.to_string());
			current = next;
		}

		(current, substituted)
	}

	/// Resolve every operator-separated segment of a command line.
	///
	/// Whitespace in the result is normalized to single spaces.
	pub fn expand(&self, line: &str) -> String {
		self.expand_excluding(line, &[])
	}

	/// Fully expand the command behind alias `name`.
	///
	/// With [`Resolver::with_stop_on_repeat`], `name` is not re-expanded inside
	/// its own body, so `alias ls='ls --color'` expands to `ls --color`.
	pub fn expand_alias(&self, name: &str) -> Option<String> {
		let command = self.aliases.get(name)?;
		Some(self.expand_excluding(command, &[name]))
	}

	fn expand_excluding(&self, line: &str, exclude: &[&str]) -> String {
		let mut parts = Vec::new();
		for segment in split_segments(line) {
			parts.push(self.walk(segment.text, exclude).0);
			if let Some(op) = segment.operator {
				parts.push(op.as_str().to_string());
			}
		}
		normalize_whitespace(&parts.join(" "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn map(pairs: &[(&str, &str)]) -> AliasMap {
		pairs.iter().copied().collect()
	}

	#[test]
	fn test_split_first_word() {
		assert_eq!(split_first_word("  git  status -s"), ("git", "status -s"));
		assert_eq!(split_first_word("ls"), ("ls", ""));
		assert_eq!(split_first_word("   "), ("", ""));
	}

	#[test]
	fn test_resolve_chain() {
		let aliases = map(&[("g", "git"), ("gco", "g checkout"), ("gcm", "gco main")]);
		let resolver = Resolver::new(&aliases);
		assert_eq!(resolver.resolve("gcm"), "git checkout main");
		assert_eq!(resolver.resolve("gcm --force"), "git checkout main --force");
	}

	#[test]
	fn test_resolve_non_alias_is_unchanged() {
		let aliases = map(&[("g", "git")]);
		let resolver = Resolver::new(&aliases);
		assert_eq!(resolver.resolve("ls -la"), "ls -la");
		assert_eq!(resolver.resolve(""), "");
	}

	#[test]
	fn test_resolve_only_looks_at_leading_token() {
		let aliases = map(&[("g", "git")]);
		let resolver = Resolver::new(&aliases);
		assert_eq!(resolver.resolve("echo g"), "echo g");
	}

	#[test]
	fn test_resolve_self_reference_stops_at_bound() {
		let aliases = map(&[("ls", "ls --color")]);
		let resolver = Resolver::new(&aliases).with_max_rounds(3);
		assert_eq!(resolver.resolve("ls -la"), "ls --color --color --color -la");
		assert_eq!(resolver.substitutions("ls -la"), ["ls", "ls", "ls"]);
	}

	#[test]
	fn test_resolve_mutual_reference_runs_every_round() {
		let aliases = map(&[("a", "b one"), ("b", "a two")]);
		let resolver = Resolver::new(&aliases);
		let resolved = resolver.resolve("a");
		assert_eq!(resolver.substitutions("a").len(), DEFAULT_MAX_ROUNDS);
		assert_eq!(resolved, "a two one two one two one two one two one");

		let resolver = resolver.with_max_rounds(50);
		assert_eq!(resolver.substitutions("a").len(), 50);
	}

	#[test]
	fn test_stop_on_repeat_ends_cycles_early() {
		let aliases = map(&[("a", "b one"), ("b", "a two"), ("ls", "ls --color")]);
		let resolver = Resolver::new(&aliases)
			.with_max_rounds(50)
			.with_stop_on_repeat(true);
		assert_eq!(resolver.resolve("a"), "a two one");
		assert_eq!(resolver.substitutions("a"), ["a", "b"]);
		assert_eq!(resolver.resolve("ls -la"), "ls --color -la");
	}

	#[test]
	fn test_round_bound_limits_depth() {
		let aliases = map(&[("a", "b"), ("b", "c"), ("c", "d")]);
		let resolver = Resolver::new(&aliases).with_max_rounds(2);
		assert_eq!(resolver.resolve("a"), "c");
		assert_eq!(resolver.max_rounds(), 2);
	}

	#[test]
	fn test_expand_composite() {
		let aliases = map(&[("gco", "git checkout"), ("g", "git")]);
		let resolver = Resolver::new(&aliases);
		assert_eq!(
			resolver.expand("gco main && g push"),
			"git checkout main && git push"
		);
	}

	#[test]
	fn test_expand_every_operator() {
		let aliases = map(&[("l", "ls -la"), ("g", "grep -i")]);
		let resolver = Resolver::new(&aliases);
		assert_eq!(
			resolver.expand("l|g foo;l  ||  true"),
			"ls -la | grep -i foo ; ls -la || true"
		);
	}

	#[test]
	fn test_expand_without_aliases_normalizes_whitespace() {
		let aliases = AliasMap::new();
		let resolver = Resolver::new(&aliases);
		let line = "  cd  /tmp &&   make\tall ";
		assert_eq!(resolver.expand(line), normalize_whitespace(line));
	}

	#[test]
	fn test_expand_alias_self_reference() {
		let aliases = map(&[("ls", "ls --color"), ("g", "git")]);
		let resolver = Resolver::new(&aliases).with_max_rounds(2);
		assert_eq!(
			resolver.expand_alias("ls").as_deref(),
			Some("ls --color --color --color")
		);
		let resolver = resolver.with_stop_on_repeat(true);
		assert_eq!(resolver.expand_alias("ls").as_deref(), Some("ls --color"));
		assert_eq!(resolver.expand_alias("missing"), None);
	}

	#[test]
	fn test_expand_alias_composite_body() {
		let aliases = map(&[("g", "git"), ("sync", "g fetch && g rebase origin/main")]);
		let resolver = Resolver::new(&aliases);
		assert_eq!(
			resolver.expand_alias("sync").as_deref(),
			Some("git fetch && git rebase origin/main")
		);
	}
}
