use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Shell control operators, with any surrounding whitespace.
static OPERATOR_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s*(&&|\|\||\||;)\s*").expect("operator pattern is valid"));

/// A shell control operator that separates command segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	And,
	Or,
	Pipe,
	Sequence,
}

impl Operator {
	/// Parse an operator token.
	pub fn from_token(token: &str) -> Option<Self> {
		match token {
			"&&" => Some(Operator::And),
			"||" => Some(Operator::Or),
			"|" => Some(Operator::Pipe),
			";" => Some(Operator::Sequence),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Operator::And => "&&",
			Operator::Or => "||",
			Operator::Pipe => "|",
			Operator::Sequence => ";",
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One operator-delimited piece of a composite command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
	/// The command text of this segment.
	pub text: &'a str,

	/// The operator that followed this segment, `None` for the last one.
	pub operator: Option<Operator>,

	/// The exact separator text (whitespace and operator) that followed.
	pub separator: &'a str,
}

/// Split a command line on `&&`, `||`, `|` and `;`.
///
/// Always returns at least one segment. Joining every `text` and `separator`
/// in order reproduces the input exactly.
pub fn split_segments(line: &str) -> Vec<Segment<'_>> {
	let mut segments = Vec::new();
	let mut start = 0;

	for m in OPERATOR_RE.find_iter(line) {
		segments.push(Segment {
			text: &line[start..m.start()],
			operator: Operator::from_token(m.as_str().trim()),
			separator: m.as_str(),
		});
		start = m.end();
	}

	segments.push(Segment {
		text: &line[start..],
		operator: None,
		separator: "",
	});

	segments
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
	s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn texts<'a>(segments: &[Segment<'a>]) -> Vec<&'a str> {
		segments.iter().map(|s| s.text).collect()
	}

	#[test]
	fn test_single_segment() {
		let segments = split_segments("git status");
		assert_eq!(segments.len(), 1);
		assert_eq!(segments[0].text, "git status");
		assert_eq!(segments[0].operator, None);
		assert_eq!(segments[0].separator, "");
	}

	#[test]
	fn test_all_operators() {
		let segments = split_segments("a && b || c | d ; e");
		assert_eq!(texts(&segments), vec!["a", "b", "c", "d", "e"]);
		let ops: Vec<_> = segments.iter().map(|s| s.operator).collect();
		assert_eq!(
			ops,
			vec![
				Some(Operator::And),
				Some(Operator::Or),
				Some(Operator::Pipe),
				Some(Operator::Sequence),
				None
			]
		);
	}

	#[test]
	fn test_double_pipe_is_not_two_pipes() {
		let segments = split_segments("make||echo failed");
		assert_eq!(texts(&segments), vec!["make", "echo failed"]);
		assert_eq!(segments[0].operator, Some(Operator::Or));
	}

	#[test]
	fn test_separators_rebuild_input() {
		let line = "  cd src   &&make ;  ls";
		let rebuilt: String = split_segments(line)
			.iter()
			.map(|s| format!("{}{}", s.text, s.separator))
			.collect();
		assert_eq!(rebuilt, line);
	}

	#[test]
	fn test_empty_input() {
		let segments = split_segments("");
		assert_eq!(texts(&segments), vec![""]);
	}

	#[test]
	fn test_normalize_whitespace() {
		assert_eq!(normalize_whitespace("  a \t b\n c  "), "a b c");
		assert_eq!(normalize_whitespace(""), "");
	}

	#[test]
	fn test_operator_display() {
		assert_eq!(Operator::Pipe.to_string(), "|");
		assert_eq!(Operator::from_token("&&"), Some(Operator::And));
		assert_eq!(Operator::from_token("&"), None);
	}
}
