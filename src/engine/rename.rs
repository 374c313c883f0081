use crate::error::{Result, ShaliasError};
use crate::exec::CommandLookup;
use crate::store::{AliasStore, LineKind, is_name_char, is_valid_name};
use log::{debug, info};

/// Summary of a rename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOutcome {
	/// Whether any line changed.
	pub changed: bool,

	/// Number of definitions renamed.
	pub definitions: usize,

	/// Number of references rewritten inside alias commands.
	pub references: usize,
}

/// Check that `name` can be used for a new alias.
///
/// The name must use the alias name alphabet, must not already be defined in
/// `store`, and must not resolve to an existing command.
pub fn validate_new_name(store: &AliasStore, name: &str, lookup: &dyn CommandLookup) -> Result<()> {
	if !is_valid_name(name) {
		return Err(ShaliasError::InvalidName {
			name: name.to_string(),
		});
	}

	if store.contains(name) {
		return Err(ShaliasError::NameCollision {
			name: name.to_string(),
		});
	}

	if let Some(resolves_to) = lookup.lookup(name) {
		return Err(ShaliasError::ReservedName {
			name: name.to_string(),
			resolves_to,
		});
	}

	Ok(())
}

/// Replace whole-word occurrences of `old` with `new` outside quoted strings.
///
/// An occurrence counts only if the characters on both sides are not alias
/// name characters. Returns the rewritten text and the number of replacements.
pub fn replace_word_unquoted(text: &str, old: &str, new: &str) -> (String, usize) {
	let mut out = String::with_capacity(text.len());
	let mut count = 0;
	let mut in_single = false;
	let mut in_double = false;
	let mut i = 0;

	while let Some(c) = text[i..].chars().next() {
		if !in_single && !in_double && text[i..].starts_with(old) {
			let before = text[..i].chars().next_back();
			let after = text[i + old.len()..].chars().next();
			if !before.is_some_and(is_name_char) && !after.is_some_and(is_name_char) {
				out.push_str(new);
				count += 1;
				i += old.len();
				continue;
			}
		}

		match c {
			'\'' if !in_double => in_single = !in_single,
			'"' if !in_single => in_double = !in_double,
			_ => {}
		}
		out.push(c);
		i += c.len_utf8();
	}

	(out, count)
}

/// Rename alias `old` to `new` and rewrite every reference to it.
///
/// Only changed lines are re-rendered; other lines keep their exact text.
pub fn rename_alias(
	store: &mut AliasStore,
	old: &str,
	new: &str,
	lookup: &dyn CommandLookup,
) -> Result<RenameOutcome> {
	if !store.contains(old) {
		return Err(ShaliasError::AliasNotFound {
			name: old.to_string(),
		});
	}
	validate_new_name(store, new, lookup)?;

	let mut outcome = RenameOutcome::default();

	for line in &mut store.lines {
		let LineKind::Alias(alias) = &mut line.kind else {
			continue;
		};

		let mut line_changed = false;
		if alias.name == old {
			alias.name = new.to_string();
			outcome.definitions += 1;
			line_changed = true;
		}

		let rewritten = {
			let value = alias.quoted_value();
			let (inner, count) = replace_word_unquoted(&value.decoded_inner(), old, new);
			(count > 0).then(|| (value.rewrap_decoded(&inner), count))
		};
		if let Some((value, count)) = rewritten {
			alias.value = value;
			outcome.references += count;
			line_changed = true;
		}

		if line_changed {
			line.text = alias.render();
			debug!("Rewrote line {}: {}", line.number, line.text);
		}
	}

	outcome.changed = outcome.definitions > 0 || outcome.references > 0;
	info!(
		"Renamed {old} to {new}: {} definition(s), {} reference(s)",
		outcome.definitions, outcome.references
	);
	Ok(outcome)
}
