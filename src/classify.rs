/// Lexical classification of Fortran source lines.
///
/// A line is "executable" when the compiler's instrumentation could attribute
/// a basic block to it. Only enough of the language is recognised to rule out
/// comments, declarations, block closers and continuation lines.
use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;

static CONTINUED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&\s*$").unwrap());
static STATEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*[a-z]").unwrap());
static USE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*use[\s,]").unwrap());
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^!]*::").unwrap());
static END_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*end\s*(do|if|select)\b").unwrap());
static END_PROCEDURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*end\s*(function|subroutine)\b").unwrap());
static IMPLICIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*implicit\b").unwrap());
static BARE_ELSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*else\s*(!.*)?$").unwrap());
static CONTAINS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*contains\b").unwrap());

/// Return true if `line` is a statement that can be covered.
///
/// `previous_line` is the line before it (empty for the first line of a
/// span); if it ends with `&`, `line` is a continuation and never counts.
pub fn is_executable(line: &str, previous_line: &str, dialect: Dialect) -> bool {
    if CONTINUED.is_match(previous_line) {
        return false;
    }
    if !STATEMENT.is_match(line) {
        return false;
    }
    if USE.is_match(line)
        || DECLARATION.is_match(line)
        || END_BLOCK.is_match(line)
        || IMPLICIT.is_match(line)
        || BARE_ELSE.is_match(line)
    {
        return false;
    }
    if dialect.excludes_procedure_end() && END_PROCEDURE.is_match(line) {
        return false;
    }
    if dialect.contains_ends_span() && CONTAINS.is_match(line) {
        return false;
    }
    true
}

/// Line numbers in `[start, end]` (1-based, inclusive) of `source` that are
/// executable.
pub fn executable_lines(source: &str, start: u32, end: u32, dialect: Dialect) -> Vec<u32> {
    let mut executable = Vec::new();
    let mut previous = "";
    for (lineno, line) in (1u32..).zip(source.lines()) {
        if lineno < start {
            continue;
        }
        if lineno > end {
            break;
        }
        if is_executable(line, previous, dialect) {
            executable.push(lineno);
        }
        previous = line;
    }
    executable
}
