//! Command handler for the covbridge CLI.
//!
//! `cmd_convert` returns its output as a `String`, making it easy to test
//! without capturing stdout.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::convert::{self, ConversionSummary};
use crate::symbols::SymbolDump;

pub fn cmd_convert(
    config: &Config,
    from_file: &Path,
    to_file: &Path,
    dump: &dyn SymbolDump,
    timestamp: i64,
    json: bool,
) -> Result<String> {
    let summary = convert::run(from_file, to_file, config, dump, timestamp)
        .with_context(|| format!("Failed to convert {}", from_file.display()))?;

    if json {
        let mut out = serde_json::to_string_pretty(&summary)?;
        out.push('\n');
        return Ok(out);
    }
    Ok(format_summary(&summary, from_file, to_file))
}

fn format_summary(summary: &ConversionSummary, from_file: &Path, to_file: &Path) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "Converted {} → {} (dialect: {})",
        from_file.display(),
        to_file.display(),
        summary.dialect
    )
    .unwrap();
    writeln!(
        out,
        "Classes:    {} ({} without coverage data)",
        summary.classes, summary.synthesized_classes
    )
    .unwrap();
    writeln!(out, "Uncalled:   {} methods added", summary.synthesized_methods).unwrap();
    writeln!(out, "Rate:       {:.1}%", summary.branch_rate * 100.0).unwrap();
    out
}
