/// Locating the line span of a Fortran procedure by name.
use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::dialect::Dialect;
use crate::error::{ConvertError, Result};

/// Inclusive, 1-based line range of a procedure body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

fn start_pattern(name: &str, dialect: Dialect) -> String {
    let name = regex::escape(name);
    match dialect {
        // No comment or string opener before the keyword, and the keyword
        // must be its own token.
        Dialect::Strict => format!(r#"^[^!"']*(?:^|\s)(?:subroutine|function)\s+{name}\b"#),
        Dialect::Legacy => format!(r"^[^!]*(?:subroutine|function)\s+{name}\b"),
    }
}

fn end_pattern(dialect: Dialect) -> &'static str {
    if dialect.contains_ends_span() {
        r"^[^!]*(?:\bend\s*(?:subroutine|function)\b|\bcontains\b)"
    } else {
        r"^[^!]*\bend\s*(?:subroutine|function)\b"
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConvertError::Parse(format!("invalid pattern '{pattern}': {e}")))
}

/// Number of the first line at or after `from` matching `re`.
fn match_line_number(source: &str, re: &Regex, from: u32) -> Option<u32> {
    (1u32..)
        .zip(source.lines())
        .skip_while(|(lineno, _)| *lineno < from)
        .find(|(_, line)| re.is_match(line))
        .map(|(lineno, _)| lineno)
}

/// Find the span of procedure `name` in already-loaded `source`. `path` is
/// only used for error reporting.
pub fn find_span_in(source: &str, path: &Path, name: &str, dialect: Dialect) -> Result<Span> {
    let not_found = |pattern: &str| ConvertError::PatternNotFound {
        pattern: pattern.to_string(),
        path: path.to_path_buf(),
    };

    let pattern = start_pattern(name, dialect);
    let start = match_line_number(source, &compile(&pattern)?, 1).ok_or_else(|| not_found(&pattern))?;

    let pattern = end_pattern(dialect);
    let end =
        match_line_number(source, &compile(pattern)?, start + 1).ok_or_else(|| not_found(pattern))?;

    Ok(Span { start, end })
}

/// Read `path` and find the span of procedure `name` in it.
pub fn find_span(path: &Path, name: &str, dialect: Dialect) -> Result<Span> {
    let bytes = std::fs::read(path)?;
    find_span_in(&String::from_utf8_lossy(&bytes), path, name, dialect)
}
