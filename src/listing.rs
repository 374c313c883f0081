//! Tabular listing and search of aliases.

use crate::engine::Resolver;
use crate::store::AliasEntry;

const HEADERS: [&str; 4] = ["NAME", "COMMAND", "EXPANDED", "COMMENT"];

/// One row of the alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRow {
	pub name: String,
	pub command: String,
	pub expanded: String,
	pub comment: String,
	pub line: String,
}

impl AliasRow {
	fn columns(&self) -> [&str; 4] {
		[&self.name, &self.command, &self.expanded, &self.comment]
	}

	/// Case-insensitive substring match over every field and the original line.
	pub fn matches(&self, query: &str) -> bool {
		let query = query.to_lowercase();
		self.columns()
			.into_iter()
			.chain([self.line.as_str()])
			.any(|field| field.to_lowercase().contains(&query))
	}
}

/// Build table rows for `entries`, expanding each command.
pub fn build_rows(entries: &[AliasEntry], resolver: &Resolver<'_>) -> Vec<AliasRow> {
	entries
		.iter()
		.map(|entry| AliasRow {
			name: entry.name.clone(),
			command: entry.command.clone(),
			expanded: resolver
				.expand_alias(&entry.name)
				.unwrap_or_else(|| resolver.expand(&entry.command)),
			comment: entry.comment.clone().unwrap_or_default(),
			line: entry.line.clone(),
		})
		.collect()
}

/// Rows matching `query`.
pub fn search_rows<'a>(rows: &'a [AliasRow], query: &str) -> Vec<&'a AliasRow> {
	rows.iter().filter(|row| row.matches(query)).collect()
}

/// Render rows as an aligned table with a header.
pub fn render_table(rows: &[&AliasRow]) -> String {
	if rows.is_empty() {
		return "No aliases found.\n".to_string();
	}

	let mut widths = HEADERS.map(|h| h.chars().count());
	for row in rows {
		for (width, column) in widths.iter_mut().zip(row.columns()) {
			*width = (*width).max(column.chars().count());
		}
	}

	let mut out = String::new();
	push_row(&mut out, HEADERS, &widths);
	push_row(&mut out, widths.map(|_| ""), &widths);
	for row in rows {
		push_row(&mut out, row.columns(), &widths);
	}
	out
}

fn push_row(out: &mut String, columns: [&str; 4], widths: &[usize; 4]) {
	let is_rule = columns.iter().all(|c| c.is_empty());
	let mut line = String::new();
	for (i, (column, width)) in columns.iter().zip(widths).enumerate() {
		if i > 0 {
			line.push_str("  ");
		}
		if is_rule {
			line.push_str(&"-".repeat(*width));
		} else {
			line.push_str(column);
			line.push_str(&" ".repeat(width - column.chars().count()));
		}
	}
	out.push_str(line.trim_end());
	out.push('\n');
}
