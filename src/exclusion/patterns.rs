//! Name-based exclusion using wildcard patterns

use super::ExclusionError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Compiled set of name patterns
///
/// Patterns are matched against a single path component (a base name), never
/// against a full path, with shell-style `fnmatch` semantics: `*`, `?` and
/// `[...]` classes are wildcards, while `\`, `{`, `}` and `,` are literal
/// characters. Matching is case-sensitive. Since a base name has no `/`, `**`
/// matches the same names as `*`.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
	set: GlobSet,
}

impl PatternMatcher {
	/// Compile a pattern list
	pub fn new(patterns: &[String]) -> Result<Self, ExclusionError> {
		Ok(Self { set: Self::build_glob_set(patterns)? })
	}

	fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ExclusionError> {
		let mut builder = GlobSetBuilder::new();

		for pattern in patterns {
			if pattern.is_empty() {
				return Err(ExclusionError::InvalidPattern("empty pattern".to_string()));
			}
			let glob = GlobBuilder::new(&literal_braces(pattern))
				.literal_separator(true)
				.backslash_escape(false)
				.case_insensitive(false)
				.build()
				.map_err(|e| ExclusionError::InvalidPattern(format!("{}: {}", pattern, e)))?;
			builder.add(glob);
		}

		builder.build().map_err(|e| {
			ExclusionError::InvalidPattern(format!("Failed to build pattern set: {}", e))
		})
	}

	/// Check a base name against every pattern
	pub fn is_match(&self, name: &str) -> bool {
		!name.is_empty() && self.set.is_match(name)
	}
}

/// Rewrite `{` and `}` outside character classes as one-character classes
///
/// globset always reads braces as alternation; `fnmatch` does not.
fn literal_braces(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len());
	let mut chars = pattern.chars().peekable();
	let mut in_class = false;

	while let Some(c) = chars.next() {
		if in_class {
			out.push(c);
			if c == ']' {
				in_class = false;
			}
			continue;
		}
		match c {
			'[' => {
				in_class = true;
				out.push(c);
				// A leading `!` or `]` belongs to the class body
				if let Some(&next) = chars.peek() {
					if next == '!' || next == '^' {
						out.push(next);
						chars.next();
					}
				}
				if let Some(&next) = chars.peek() {
					if next == ']' {
						out.push(next);
						chars.next();
					}
				}
			}
			'{' => out.push_str("[{]"),
			'}' => out.push_str("[}]"),
			_ => out.push(c),
		}
	}

	out
}


// vim: ts=4
