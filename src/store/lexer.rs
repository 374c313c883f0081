use regex::Regex;
use std::sync::LazyLock;

/// Matches an alias definition once the trailing comment is removed.
static DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(\s*alias\s+)([^=]+)=(.*)$").expect("definition pattern is valid")
});

/// Single-quote escape sequences the shell uses inside `'...'` values.
const SINGLE_QUOTE_ESCAPES: [&str; 2] = ["'\"'\"'", "'\\''"];

/// Returns true for characters allowed in an alias name (`[A-Za-z0-9._-]`).
pub fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Returns true if `name` is a syntactically valid alias name.
pub fn is_valid_name(name: &str) -> bool {
	!name.is_empty() && name.chars().all(is_name_char)
}

/// Returns true if `text` contains a line break or another control character.
///
/// Tabs are allowed.
pub fn has_control_chars(text: &str) -> bool {
	text.chars().any(|c| c.is_control() && c != '\t')
}

/// A line split at its first unquoted `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSplit<'a> {
	/// Code before the comment, without the whitespace that precedes `#`.
	pub code: &'a str,

	/// Exact whitespace between the code and `#`.
	pub ws_before: &'a str,

	/// The comment including its `#`, or empty.
	pub comment: &'a str,
}

/// Split a line into code and comment, treating `#` as a comment start only
/// outside single and double quotes.
pub fn split_comment(line: &str) -> CommentSplit<'_> {
	let mut in_single = false;
	let mut in_double = false;

	for (i, c) in line.char_indices() {
		match c {
			'\'' if !in_double => in_single = !in_single,
			'"' if !in_single => in_double = !in_double,
			'#' if !in_single && !in_double => {
				let code = &line[..i];
				let trimmed = code.trim_end();
				return CommentSplit {
					code: trimmed,
					ws_before: &code[trimmed.len()..],
					comment: &line[i..],
				};
			}
			_ => {}
		}
	}

	CommentSplit {
		code: line,
		ws_before: "",
		comment: "",
	}
}

/// An alias value split into its surrounding whitespace, optional wrapping
/// quote, and inner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedValue<'a> {
	pub leading_ws: &'a str,
	pub quote: Option<char>,
	pub inner: &'a str,
	pub trailing_ws: &'a str,
}

impl<'a> QuotedValue<'a> {
	/// Unwrap one layer of matching single or double quotes, if present.
	pub fn parse(raw: &'a str) -> Self {
		let body = raw.trim();
		let start = raw.len() - raw.trim_start().len();
		let leading_ws = &raw[..start];
		let trailing_ws = &raw[start + body.len()..];

		let quote = body.chars().next().filter(|q| *q == '\'' || *q == '"');
		match quote {
			Some(q) if body.len() >= 2 && body.ends_with(q) => QuotedValue {
				leading_ws,
				quote: Some(q),
				inner: &body[1..body.len() - 1],
				trailing_ws,
			},
			_ => QuotedValue {
				leading_ws,
				quote: None,
				inner: body,
				trailing_ws,
			},
		}
	}

	/// The command this value stands for: unquoted, unescaped, trimmed.
	pub fn command(&self) -> String {
		self.decoded_inner().trim().to_string()
	}

	/// The inner text with single-quote escapes decoded.
	pub fn decoded_inner(&self) -> String {
		if self.quote == Some('\'') {
			unescape_single_quoted(self.inner)
		} else {
			self.inner.to_string()
		}
	}

	/// Rebuild the value with a replacement inner text, keeping quotes and
	/// surrounding whitespace.
	pub fn rewrap(&self, inner: &str) -> String {
		match self.quote {
			Some(q) => format!("{}{q}{inner}{q}{}", self.leading_ws, self.trailing_ws),
			None => format!("{}{inner}{}", self.leading_ws, self.trailing_ws),
		}
	}

	/// Like [`QuotedValue::rewrap`], re-escaping single quotes when the value
	/// is single-quoted.
	pub fn rewrap_decoded(&self, decoded: &str) -> String {
		if self.quote == Some('\'') {
			self.rewrap(&decoded.replace('\'', SINGLE_QUOTE_ESCAPES[0]))
		} else {
			self.rewrap(decoded)
		}
	}
}

fn unescape_single_quoted(inner: &str) -> String {
	SINGLE_QUOTE_ESCAPES
		.iter()
		.fold(inner.to_string(), |acc, esc| acc.replace(esc, "'"))
}

/// Quote a command for use as an alias value, escaping embedded single quotes.
pub fn quote_command(command: &str) -> String {
	format!("'{}'", command.replace('\'', SINGLE_QUOTE_ESCAPES[0]))
}

/// A parsed `alias NAME=VALUE [# comment]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasLine {
	/// Indentation, `alias` keyword and following whitespace.
	pub prefix: String,

	/// The alias name.
	pub name: String,

	/// Everything after `=` up to the comment, as written.
	pub value: String,

	/// Exact whitespace before `#`.
	pub ws_before_comment: String,

	/// The comment including `#`, or empty.
	pub comment: String,
}

impl AliasLine {
	/// The value with quotes removed.
	pub fn quoted_value(&self) -> QuotedValue<'_> {
		QuotedValue::parse(&self.value)
	}

	/// The unquoted, trimmed command.
	pub fn command(&self) -> String {
		self.quoted_value().command()
	}

	/// Comment text without the leading `#`, if non-empty.
	pub fn comment_text(&self) -> Option<&str> {
		let text = self.comment.strip_prefix('#')?.trim();
		(!text.is_empty()).then_some(text)
	}

	/// Rebuild the line from its parts.
	pub fn render(&self) -> String {
		let mut out = format!("{}{}={}", self.prefix, self.name, self.value);
		if !self.comment.is_empty() {
			out.push_str(&self.ws_before_comment);
			out.push_str(&self.comment);
		}
		out
	}
}

/// Classification of a single alias-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
	Blank,
	Comment,
	Alias(AliasLine),
	Other,
}

/// Classify a line of an alias file.
///
/// Alias definitions with an invalid name or an empty command are treated as
/// [`LineKind::Other`] so they never contribute to the alias map.
pub fn classify_line(line: &str) -> LineKind {
	let trimmed = line.trim();
	if trimmed.is_empty() {
		return LineKind::Blank;
	}
	if trimmed.starts_with('#') {
		return LineKind::Comment;
	}

	let split = split_comment(line);
	let Some(caps) = DEFINITION_RE.captures(split.code) else {
		return LineKind::Other;
	};

	let name = caps[2].trim();
	if !is_valid_name(name) {
		return LineKind::Other;
	}

	let alias = AliasLine {
		prefix: caps[1].to_string(),
		name: name.to_string(),
		value: caps[3].to_string(),
		ws_before_comment: split.ws_before.to_string(),
		comment: split.comment.to_string(),
	};
	if alias.command().is_empty() {
		return LineKind::Other;
	}

	LineKind::Alias(alias)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn alias(line: &str) -> AliasLine {
		match classify_line(line) {
			LineKind::Alias(alias) => alias,
			other => panic!("Expected alias line, got {other:?}"),
		}
	}

	#[test]
	fn test_name_alphabet() {
		assert!(is_valid_name("g.co-1_x"));
		assert!(!is_valid_name(""));
		assert!(!is_valid_name("a b"));
		assert!(!is_valid_name("a/b"));
	}

	#[test]
	fn test_has_control_chars() {
		assert!(!has_control_chars("make\tall # build"));
		assert!(has_control_chars("x\nalias ls=rm"));
		assert!(has_control_chars("x\r"));
		assert!(has_control_chars("\u{1b}[31m"));
	}

	#[test]
	fn test_split_comment_plain() {
		let split = split_comment("alias ll='ls -la'   # long list");
		assert_eq!(split.code, "alias ll='ls -la'");
		assert_eq!(split.ws_before, "   ");
		assert_eq!(split.comment, "# long list");
	}

	#[test]
	fn test_split_comment_ignores_quoted_hash() {
		let split = split_comment(r#"alias h='echo #tag' # real"#);
		assert_eq!(split.code, "alias h='echo #tag'");
		assert_eq!(split.comment, "# real");

		let split = split_comment(r#"alias h="echo '#'""#);
		assert_eq!(split.comment, "");
		assert_eq!(split.code, r#"alias h="echo '#'""#);
	}

	#[test]
	fn test_quoted_value_unwraps_one_layer() {
		let value = QuotedValue::parse(" 'git status' ");
		assert_eq!(value.quote, Some('\''));
		assert_eq!(value.inner, "git status");
		assert_eq!(value.leading_ws, " ");
		assert_eq!(value.trailing_ws, " ");
		assert_eq!(value.rewrap("gs"), " 'gs' ");

		let value = QuotedValue::parse("ls");
		assert_eq!(value.quote, None);
		assert_eq!(value.inner, "ls");

		let value = QuotedValue::parse("'unterminated");
		assert_eq!(value.quote, None);
	}

	#[test]
	fn test_single_quote_escapes_round_trip() {
		let quoted = quote_command("echo 'hi'");
		assert_eq!(quoted, r#"'echo '"'"'hi'"'"''"#);
		assert_eq!(QuotedValue::parse(&quoted).command(), "echo 'hi'");
		assert_eq!(QuotedValue::parse(r"'it'\''s'").command(), "it's");
	}

	#[test]
	fn test_rewrap_decoded_reescapes() {
		let value = QuotedValue::parse(r#"'echo '"'"'x'"'"''"#);
		assert_eq!(value.decoded_inner(), "echo 'x'");
		assert_eq!(value.rewrap_decoded("echo 'y'"), r#"'echo '"'"'y'"'"''"#);

		let value = QuotedValue::parse(r#""echo 'x'""#);
		assert_eq!(value.rewrap_decoded("echo 'y'"), r#""echo 'y'""#);
	}

	#[test]
	fn test_classify_lines() {
		assert_eq!(classify_line(""), LineKind::Blank);
		assert_eq!(classify_line("   \t"), LineKind::Blank);
		assert_eq!(classify_line("# heading"), LineKind::Comment);
		assert_eq!(classify_line("export PATH=$PATH:/bin"), LineKind::Other);
		assert_eq!(classify_line("alias broken"), LineKind::Other);
		assert_eq!(classify_line("alias =ls"), LineKind::Other);
		assert_eq!(classify_line("alias empty=''"), LineKind::Other);
		assert_eq!(classify_line("alias bad/name=ls"), LineKind::Other);
	}

	#[test]
	fn test_classify_alias_parts() {
		let line = "  alias gs='git status'  # status";
		let parsed = alias(line);
		assert_eq!(parsed.prefix, "  alias ");
		assert_eq!(parsed.name, "gs");
		assert_eq!(parsed.value, "'git status'");
		assert_eq!(parsed.command(), "git status");
		assert_eq!(parsed.comment_text(), Some("status"));
		assert_eq!(parsed.render(), line);
	}

	#[test]
	fn test_classify_double_quoted_and_bare() {
		assert_eq!(alias(r#"alias d="docker""#).command(), "docker");
		assert_eq!(alias("alias k=kubectl").command(), "kubectl");
		assert_eq!(alias("alias h='echo #x'").command(), "echo #x");
	}

	#[test]
	fn test_comment_text_empty_is_none() {
		assert_eq!(alias("alias a=b #").comment_text(), None);
		assert_eq!(alias("alias a=b").comment_text(), None);
	}
}
