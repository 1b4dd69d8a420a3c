/// Filling in code the instrumentation never saw.
///
/// Two kinds of gap are repaired: source files with no MODULE record at all,
/// and functions present in a file's object but absent from its class
/// because they never ran.
use std::collections::HashSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::classify::executable_lines;
use crate::config::Config;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::model::{ClassEntry, MethodEntry};
use crate::span::find_span_in;
use crate::symbols::{defined_functions, locate_object, SymbolDump};

/// Source files under the configured source directory, relative to the
/// project root, in file-name order.
pub fn source_files(config: &Config) -> Vec<String> {
    let mut files = Vec::new();
    for entry in WalkDir::new(config.abs_source_path())
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skipping directory entry: {}", err);
                None
            }
        })
    {
        if !entry.file_type().is_file() || !config.is_source_file(entry.path()) {
            continue;
        }
        let rel = pathdiff::diff_paths(entry.path(), &config.project_root)
            .unwrap_or_else(|| entry.path().to_path_buf());
        files.push(rel.to_string_lossy().into_owned());
    }
    files
}

/// Empty classes for every source file not already covered by `existing`.
pub fn missing_files(existing: &[ClassEntry], config: &Config) -> Vec<ClassEntry> {
    let found: HashSet<&str> = existing.iter().map(|c| c.filename.as_str()).collect();
    source_files(config)
        .into_iter()
        .filter(|path| !found.contains(path.as_str()))
        .map(ClassEntry::empty)
        .collect()
}

/// A zero-hit method covering every executable line of procedure `name` in
/// `source_path`.
pub fn uncalled_method(name: &str, source_path: &Path, dialect: Dialect) -> Result<MethodEntry> {
    let bytes = std::fs::read(source_path)?;
    let source = String::from_utf8_lossy(&bytes);
    let span = find_span_in(&source, source_path, name, dialect)?;
    let lines = executable_lines(&source, span.start, span.end, dialect);
    Ok(MethodEntry::uncalled(name.to_string(), lines))
}

/// Add a zero-hit method to `class` for every function its object file
/// defines that the class does not already list. Returns how many were
/// added.
///
/// A missing object file is an error; a function whose source cannot be
/// located is logged and skipped.
pub fn add_missing_methods(
    class: &mut ClassEntry,
    config: &Config,
    dump: &dyn SymbolDump,
) -> Result<usize> {
    let object = locate_object(&class.filename, &config.abs_object_path(), config.dialect)?;
    log::debug!("{} → {}", class.filename, object.display());

    let found: HashSet<String> = class.methods.iter().map(|m| m.name.clone()).collect();
    let source_path = config.resolve(&class.filename);

    let mut added = 0;
    for name in defined_functions(dump, &object) {
        if found.contains(&name) {
            continue;
        }
        match uncalled_method(&name, &source_path, config.dialect) {
            Ok(method) => {
                log::debug!("{}: adding uncalled method {}", class.filename, name);
                class.methods.push(method);
                added += 1;
            }
            Err(e) => log::warn!("Skipping method {} in {}: {}", name, class.filename, e),
        }
    }
    Ok(added)
}
