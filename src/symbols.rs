/// Discovery of the functions an object file defines.
///
/// The symbol table itself comes from an external dump (`nm` by default);
/// this module only filters and normalizes its output.
use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use crate::dialect::Dialect;
use crate::error::{ConvertError, Result};

/// Source of raw symbol-table listings, one symbol per line in `nm` format
/// (`<value> <type> <name>`).
pub trait SymbolDump {
    fn dump(&self, object: &Path) -> Result<String>;
}

/// Runs `nm --defined-only -g` on the object file.
pub struct NmDump {
    pub program: String,
}

impl NmDump {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NmDump {
    fn default() -> Self {
        Self::new("nm")
    }
}

impl SymbolDump for NmDump {
    fn dump(&self, object: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .args(["--defined-only", "-g"])
            .arg(object)
            .output()
            .map_err(|e| ConvertError::SymbolDump {
                object: object.to_path_buf(),
                message: format!("failed to run {}: {}", self.program, e),
            })?;
        if !output.status.success() {
            return Err(ConvertError::SymbolDump {
                object: object.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Return true if the dump line describes a user-defined function.
///
/// Block-data initializers (names ending in `._`) are compiler-generated and
/// skipped; of the rest, only text-section (`T`) symbols are functions.
pub fn is_function_symbol(line: &str) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return false;
    }
    if parts[2].ends_with("._") {
        return false;
    }
    parts[parts.len() - 2] == "T"
}

/// Strip module (`_MOD_`) and module-procedure (`_mp_`) qualifiers and
/// leftover underscores from a mangled symbol name.
pub fn demangle(symbol: &str) -> &str {
    let name = symbol.rsplit("_MOD_").next().unwrap_or(symbol);
    let name = name.rsplit("_mp_").next().unwrap_or(name);
    name.trim_matches('_')
}

/// Parse a dump into normalized function names, in dump order, without
/// duplicates.
pub fn parse_dump(dump: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in dump.lines().filter(|l| is_function_symbol(l)) {
        let Some(symbol) = line.split_whitespace().last() else {
            continue;
        };
        let name = demangle(symbol);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Names of the functions defined in `object`. A failing dump is logged and
/// yields no names.
pub fn defined_functions(dump: &dyn SymbolDump, object: &Path) -> Vec<String> {
    match dump.dump(object) {
        Ok(text) => parse_dump(&text),
        Err(e) => {
            log::warn!("nm failed to find methods in {}: {}", object.display(), e);
            Vec::new()
        }
    }
}

/// Object file name for a source file: `src/sub/a.f90` → `a.o`.
pub fn object_name(source_filename: &str) -> String {
    let stem = Path::new(source_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_filename);
    format!("{stem}.o")
}

/// Locate the object file backing `source_filename` under `object_dir`.
///
/// With recursive search the first match in file-name order wins and a miss
/// is an error. Otherwise the name is joined directly onto `object_dir`
/// without checking that it exists.
pub fn locate_object(source_filename: &str, object_dir: &Path, dialect: Dialect) -> Result<PathBuf> {
    let name = object_name(source_filename);
    if !dialect.recursive_object_search() {
        return Ok(object_dir.join(name));
    }
    for entry in WalkDir::new(object_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name().to_str() == Some(name.as_str()) {
            return Ok(entry.into_path());
        }
    }
    Err(ConvertError::ObjectNotFound {
        name,
        dir: object_dir.to_path_buf(),
    })
}
