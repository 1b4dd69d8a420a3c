//! The end-to-end conversion: vendor tree in, Cobertura tree out.

use std::path::Path;

use serde::Serialize;

use crate::augment::{add_missing_methods, missing_files};
use crate::build::{module_in_source, module_to_class};
use crate::config::Config;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::model::{CoverageReport, Package, VendorReport};
use crate::parsers::codecov::CodecovParser;
use crate::parsers::Parser;
use crate::report::{rewrite_filename, to_xml};
use crate::symbols::SymbolDump;

/// What a conversion produced, for the command-line summary.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub project: String,
    pub classes: usize,
    /// Classes added for source files the vendor report did not mention.
    pub synthesized_classes: usize,
    /// Methods added for functions that were never called.
    pub synthesized_methods: usize,
    pub branch_rate: f64,
    pub dialect: Dialect,
}

/// Build the Cobertura report for `vendor`.
///
/// The overall rate comes from the vendor data alone; classes and methods
/// added afterwards carry zero rates of their own but do not feed back into
/// it.
pub fn convert(
    vendor: &VendorReport,
    config: &Config,
    dump: &dyn SymbolDump,
    timestamp: i64,
) -> Result<(CoverageReport, ConversionSummary)> {
    let source_root = config.abs_source_path().to_string_lossy().into_owned();

    let mut classes = vendor
        .modules
        .iter()
        .filter(|m| module_in_source(m, &source_root))
        .map(|m| module_to_class(m, &config.project_root))
        .collect::<Result<Vec<_>>>()?;

    let missing = missing_files(&classes, config);
    let synthesized_classes = missing.len();
    classes.extend(missing);

    let mut synthesized_methods = 0;
    for class in &mut classes {
        synthesized_methods += add_missing_methods(class, config, dump)?;
        class.filename = rewrite_filename(&class.filename, config);
    }

    let summary = ConversionSummary {
        project: vendor.name.clone(),
        classes: classes.len(),
        synthesized_classes,
        synthesized_methods,
        branch_rate: vendor.tally.rate(),
        dialect: config.dialect,
    };
    let report = CoverageReport {
        tally: vendor.tally,
        timestamp,
        package: Package {
            name: vendor.name.clone(),
            classes,
        },
    };
    Ok((report, summary))
}

/// Convert `from_file` and write the result to `to_file`.
///
/// Nothing is written unless the whole report was built successfully.
pub fn run(
    from_file: &Path,
    to_file: &Path,
    config: &Config,
    dump: &dyn SymbolDump,
    timestamp: i64,
) -> Result<ConversionSummary> {
    let content = std::fs::read(from_file)?;
    let vendor = CodecovParser.parse(&content)?;
    let (report, summary) = convert(&vendor, config, dump, timestamp)?;
    let xml = to_xml(&report)?;
    std::fs::write(to_file, xml)?;
    Ok(summary)
}
