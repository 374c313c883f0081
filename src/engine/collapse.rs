use crate::engine::resolver::Resolver;
use log::debug;

/// Returns true if `expansion` is a whole-word prefix of `command`: either
/// equal to it or followed by a space.
pub fn is_prefix_of(expansion: &str, command: &str) -> bool {
	!expansion.is_empty()
		&& command
			.strip_prefix(expansion)
			.is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

/// Ordered mapping of alias name to its fully resolved expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionMap {
	entries: Vec<(String, String)>,
}

impl ExpansionMap {
	/// Resolve every alias known to `resolver`, in definition order.
	pub fn build(resolver: &Resolver<'_>) -> Self {
		let entries = resolver
			.aliases()
			.iter()
			.map(|(name, _)| (name.to_string(), resolver.resolve(name)))
			.collect();
		ExpansionMap { entries }
	}

	/// Full expansion of `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, expansion)| expansion.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(name, expansion)| (name.as_str(), expansion.as_str()))
	}

	/// Find the alias with the longest expansion that prefixes `command`.
	///
	/// On equal lengths the alias defined first wins.
	pub fn longest_prefix(&self, command: &str) -> Option<(&str, &str)> {
		let mut best: Option<(&str, &str)> = None;
		for (name, expansion) in self.iter() {
			if !is_prefix_of(expansion, command) {
				continue;
			}
			if best.is_none_or(|(_, current)| expansion.len() > current.len()) {
				best = Some((name, expansion));
			}
		}
		best
	}
}

/// Collapse a raw command to its shortest alias form.
///
/// Each round replaces the longest known expansion prefixing the command with
/// the alias that produces it, until nothing matches, a round changes
/// nothing, or `max_rounds` is reached.
pub fn collapse(command: &str, expansions: &ExpansionMap, max_rounds: usize) -> String {
	let mut current = command.trim().to_string();

	for _ in 0..max_rounds {
		let Some((name, expansion)) = expansions.longest_prefix(&current) else {
			break;
		};

		let rest = current[expansion.len()..].trim_start();
		let next = if rest.is_empty() {
			name.to_string()
		} else {
			format!("{name} {rest}")
		};
		if next == current {
			break;
		}

		debug!("Collapsed {expansion:?} into {name}");
		current = next;
	}

	current
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::resolver::DEFAULT_MAX_ROUNDS;
	use crate::store::AliasMap;

	fn expansions(pairs: &[(&str, &str)]) -> ExpansionMap {
		let aliases: AliasMap = pairs.iter().copied().collect();
		ExpansionMap::build(&Resolver::new(&aliases))
	}

	fn run(command: &str, map: &ExpansionMap) -> String {
		collapse(command, map, DEFAULT_MAX_ROUNDS)
	}

	#[test]
	fn test_is_prefix_of() {
		assert!(is_prefix_of("git", "git"));
		assert!(is_prefix_of("git", "git status"));
		assert!(!is_prefix_of("git", "gitk"));
		assert!(!is_prefix_of("", "git"));
	}

	#[test]
	fn test_expansion_map_resolves_chains() {
		let map = expansions(&[("g", "git"), ("gs", "g status")]);
		assert_eq!(map.get("gs"), Some("git status"));
		assert_eq!(map.get("nope"), None);
	}

	#[test]
	fn test_longest_prefix_preferred() {
		let map = expansions(&[("dc", "docker compose"), ("dcu", "docker compose up")]);
		assert_eq!(run("docker compose up -d", &map), "dcu -d");
		assert_eq!(run("docker compose down", &map), "dc down");
	}

	#[test]
	fn test_longest_prefix_through_chain() {
		let map = expansions(&[("dc", "docker compose"), ("dcu", "dc up")]);
		assert_eq!(run("docker compose up -d", &map), "dcu -d");
	}

	#[test]
	fn test_existing_alias_proposal() {
		let map = expansions(&[("ll", "ls -la")]);
		assert_eq!(run("ls -la /tmp", &map), "ll /tmp");
	}

	#[test]
	fn test_tie_break_first_defined_wins() {
		let map = expansions(&[("st", "git status"), ("gs", "git status")]);
		assert_eq!(map.longest_prefix("git status -s"), Some(("st", "git status")));
		assert_eq!(run("git status -s", &map), "st -s");
	}

	#[test]
	fn test_round_trip_expansion_to_name() {
		let map = expansions(&[("g", "git"), ("gp", "g push"), ("ll", "ls -la")]);
		for (name, expansion) in map.iter() {
			assert_eq!(run(expansion, &map), name);
		}
	}

	#[test]
	fn test_idempotent() {
		let map = expansions(&[
			("g", "git"),
			("gco", "g checkout"),
			("lc", "ls --color"),
			("ll", "ls -la"),
		]);
		for input in [
			"git checkout main",
			"git",
			"ls --color -la /tmp",
			"ls --color",
			"cargo build",
			"  git   log ",
		] {
			let once = run(input, &map);
			assert_eq!(run(&once, &map), once, "input: {input:?}");
		}
	}

	#[test]
	fn test_no_match_returns_trimmed_input() {
		let map = expansions(&[("g", "git")]);
		assert_eq!(run("  cargo test  ", &map), "cargo test");
		assert_eq!(run("gitk --all", &map), "gitk --all");
	}

	#[test]
	fn test_zero_rounds_is_identity() {
		let map = expansions(&[("g", "git")]);
		assert_eq!(collapse("git log", &map, 0), "git log");
	}
}
