//! Whole-file consolidation.
//!
//! Two passes over an alias file:
//! 1. Usages of aliases that share one full expansion are rewritten to the
//!    canonical alias of the group (shortest name, then lexicographic).
//! 2. Plain command segments repeated across definitions with no alias of
//!    their own are extracted into generated `auto_*` aliases.

use crate::engine::collapse::{ExpansionMap, is_prefix_of};
use crate::engine::resolver::Resolver;
use crate::engine::splitter::split_segments;
use crate::store::{AliasLine, AliasStore, LineKind, StoreLine, classify_line, format_definition};
use log::{debug, info};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Header written above generated aliases.
pub const AUTO_HEADER: &str = "# --- auto-generated aliases (shalias) ---";

const AUTO_PREFIX: &str = "auto_";
const AUTO_NAME_MAX_LEN: usize = 48;
const SHELL_KEYWORDS: [&str; 10] = [
	"if", "then", "fi", "for", "do", "done", "while", "case", "esac", "function",
];

static UNSAFE_RUN_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").expect("unsafe-run pattern is valid"));
static UNDERSCORES_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"_+").expect("underscore pattern is valid"));

/// Aliases sharing one full expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
	pub expansion: String,
	pub canonical: String,
	pub duplicates: Vec<String>,
}

/// A generated alias for a repeated segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAlias {
	pub name: String,
	pub command: String,
	pub occurrences: usize,
}

/// What a consolidation run found and changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidationReport {
	pub duplicates: Vec<DuplicateGroup>,
	pub auto_aliases: Vec<AutoAlias>,
	pub changed: bool,
}

/// Pick the canonical alias among names sharing an expansion.
pub fn choose_canonical<'a>(names: &[&'a str]) -> Option<&'a str> {
	names
		.iter()
		.copied()
		.min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
}

/// Derive an `auto_*` alias name from a command segment.
pub fn sanitize_auto_name(segment: &str) -> String {
	let lower = segment.trim().to_lowercase();
	let safe = UNSAFE_RUN_RE.replace_all(&lower, "_");
	let collapsed = UNDERSCORES_RE.replace_all(&safe, "_");
	let mut name = collapsed.trim_matches('_').to_string();

	if name.is_empty() {
		name = "cmd".to_string();
	}
	if name.len() > AUTO_NAME_MAX_LEN {
		name.truncate(AUTO_NAME_MAX_LEN);
		name = name.trim_end_matches('_').to_string();
	}

	format!("{AUTO_PREFIX}{name}")
}

/// Returns true for segments simple enough to extract into an alias.
pub fn is_plain_segment(segment: &str) -> bool {
	if segment.len() < 2 || segment.contains(['{', '}', '(', ')']) {
		return false;
	}

	let Some(first) = segment.split_whitespace().next() else {
		return false;
	};
	if SHELL_KEYWORDS.contains(&first) {
		return false;
	}

	first
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-'))
}

/// Rewrite the decoded inner command of every alias line with `rewrite`.
///
/// Returns true if any line changed.
fn rewrite_alias_bodies<F>(store: &mut AliasStore, mut rewrite: F) -> bool
where
	F: FnMut(&AliasLine, &str) -> String,
{
	let mut changed = false;
	for line in &mut store.lines {
		let LineKind::Alias(alias) = &mut line.kind else {
			continue;
		};

		let new_value = {
			let value = alias.quoted_value();
			let inner = value.decoded_inner();
			let rewritten = rewrite(alias, &inner);
			(rewritten != inner).then(|| value.rewrap_decoded(&rewritten))
		};
		if let Some(value) = new_value {
			alias.value = value;
			line.text = alias.render();
			debug!("Consolidated line {}: {}", line.number, line.text);
			changed = true;
		}
	}
	changed
}

/// Indentation of a segment and its text without it.
fn split_indent(segment: &str) -> (&str, &str) {
	let stripped = segment.trim_start();
	(&segment[..segment.len() - stripped.len()], stripped)
}

/// Canonical alias per full expansion, longest expansion first.
fn canonical_prefixes(expansions: &ExpansionMap) -> (Vec<(String, String)>, Vec<DuplicateGroup>) {
	let mut order: Vec<&str> = Vec::new();
	let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();
	for (name, expansion) in expansions.iter() {
		let names = groups.entry(expansion).or_insert_with(|| {
			order.push(expansion);
			Vec::new()
		});
		names.push(name);
	}

	let mut prefixes = Vec::new();
	let mut duplicates = Vec::new();
	for expansion in order {
		let names = &groups[expansion];
		let Some(canonical) = choose_canonical(names) else {
			continue;
		};
		if names.len() > 1 {
			duplicates.push(DuplicateGroup {
				expansion: expansion.to_string(),
				canonical: canonical.to_string(),
				duplicates: names
					.iter()
					.filter(|n| **n != canonical)
					.map(|n| n.to_string())
					.collect(),
			});
		}
		prefixes.push((expansion.to_string(), canonical.to_string()));
	}

	prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
	(prefixes, duplicates)
}

/// Rewrite one segment to use the canonical alias of its longest prefix.
fn canonicalize_segment(
	segment: &str,
	alias_name: &str,
	resolver: &Resolver<'_>,
	expansions: &ExpansionMap,
	prefixes: &[(String, String)],
) -> String {
	let (indent, stripped) = split_indent(segment);
	if stripped.is_empty() {
		return segment.to_string();
	}

	let full = resolver.resolve(stripped);
	let Some((prefix, canonical)) = prefixes.iter().find(|(p, _)| is_prefix_of(p, &full)) else {
		return segment.to_string();
	};

	// Never turn a definition into a reference to itself.
	if canonical == alias_name && expansions.get(alias_name) == Some(prefix.as_str()) {
		return segment.to_string();
	}

	// Nor into a reference to an alias whose definition leads back here.
	if resolver
		.substitutions(canonical)
		.iter()
		.any(|name| name == alias_name)
	{
		debug!("Keeping {alias_name}: {canonical} is defined through it");
		return segment.to_string();
	}

	let rest = full[prefix.len()..].trim();
	if rest.is_empty() {
		format!("{indent}{canonical}")
	} else {
		format!("{indent}{canonical} {rest}")
	}
}

fn canonicalize_usages(store: &mut AliasStore, max_rounds: usize) -> (bool, Vec<DuplicateGroup>) {
	let aliases = store.alias_map();
	let resolver = Resolver::new(&aliases).with_max_rounds(max_rounds);
	let expansions = ExpansionMap::build(&resolver);
	let (prefixes, duplicates) = canonical_prefixes(&expansions);

	let changed = rewrite_alias_bodies(store, |alias, inner| {
		split_segments(inner)
			.iter()
			.map(|segment| {
				let text =
					canonicalize_segment(segment.text, &alias.name, &resolver, &expansions, &prefixes);
				format!("{text}{}", segment.separator)
			})
			.collect()
	});

	(changed, duplicates)
}

fn extract_repeated_segments(store: &mut AliasStore, max_rounds: usize) -> Vec<AutoAlias> {
	let aliases = store.alias_map();
	let resolver = Resolver::new(&aliases).with_max_rounds(max_rounds);
	let covered: HashSet<String> = ExpansionMap::build(&resolver)
		.iter()
		.map(|(_, expansion)| expansion.to_string())
		.collect();

	// Plain segments that do not already start with an alias.
	let candidate = |segment: &str| -> Option<String> {
		let (_, stripped) = split_indent(segment);
		(is_plain_segment(stripped) && resolver.resolve(stripped) == stripped)
			.then(|| stripped.to_string())
	};

	let mut order: Vec<String> = Vec::new();
	let mut counts: HashMap<String, usize> = HashMap::new();
	for (_, alias) in store.alias_lines() {
		let inner = alias.quoted_value().decoded_inner();
		for segment in split_segments(&inner) {
			if let Some(command) = candidate(segment.text) {
				let count = counts.entry(command.clone()).or_insert(0);
				if *count == 0 {
					order.push(command);
				}
				*count += 1;
			}
		}
	}

	let mut targets: Vec<(String, usize)> = order
		.into_iter()
		.filter(|command| !covered.contains(command))
		.map(|command| {
			let count = counts[&command];
			(command, count)
		})
		.filter(|(_, count)| *count >= 2)
		.collect();
	targets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

	let mut taken: HashSet<String> = aliases.iter().map(|(name, _)| name.to_string()).collect();
	let mut generated = Vec::new();
	for (command, occurrences) in targets {
		let base = sanitize_auto_name(&command);
		let mut name = base.clone();
		let mut suffix = 2;
		while taken.contains(&name) {
			name = format!("{base}_{suffix}");
			suffix += 1;
		}
		taken.insert(name.clone());
		generated.push(AutoAlias {
			name,
			command,
			occurrences,
		});
	}

	if generated.is_empty() {
		return generated;
	}

	let by_command: HashMap<&str, &str> = generated
		.iter()
		.map(|auto| (auto.command.as_str(), auto.name.as_str()))
		.collect();
	rewrite_alias_bodies(store, |_, inner| {
		split_segments(inner)
			.iter()
			.map(|segment| {
				let (indent, _) = split_indent(segment.text);
				let text = match candidate(segment.text)
					.and_then(|command| by_command.get(command.as_str()).copied())
				{
					Some(name) => format!("{indent}{name}"),
					None => segment.text.to_string(),
				};
				format!("{text}{}", segment.separator)
			})
			.collect()
	});

	generated.sort_by(|a, b| a.name.cmp(&b.name));
	generated
}

fn push_line(store: &mut AliasStore, text: String) {
	let number = store.lines.len() + 1;
	let kind = classify_line(&text);
	store.lines.push(StoreLine { text, number, kind });
}

/// Consolidate duplicate aliases and extract repeated segments.
///
/// Returns the rewritten store and a report. The input store is not modified.
pub fn consolidate(store: &AliasStore, max_rounds: usize) -> (AliasStore, ConsolidationReport) {
	let mut store = store.clone();

	let (canonicalized, duplicates) = canonicalize_usages(&mut store, max_rounds);
	let auto_aliases = extract_repeated_segments(&mut store, max_rounds);

	if !auto_aliases.is_empty() {
		push_line(&mut store, String::new());
		push_line(&mut store, AUTO_HEADER.to_string());
		for auto in &auto_aliases {
			push_line(
				&mut store,
				format_definition(&auto.name, &auto.command, Some("auto-generated")),
			);
		}
	}

	let changed = canonicalized || !auto_aliases.is_empty();
	info!(
		"Consolidation: {} duplicate group(s), {} generated alias(es)",
		duplicates.len(),
		auto_aliases.len()
	);

	(
		store,
		ConsolidationReport {
			duplicates,
			auto_aliases,
			changed,
		},
	)
}
