//! Mapping of the vendor tree onto Cobertura classes, methods and lines.

use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::model::*;

/// Whether a module belongs to the project's sources.
///
/// This is a plain substring test on the recorded path, not a path
/// containment check: `/proj/src` also admits `/proj/src2/x.f90`.
pub fn module_in_source(module: &VendorModule, source_root: &str) -> bool {
    module.name.contains(source_root)
}

/// Display a module path relative to the project root.
pub fn relative_name(module_path: &str, project_root: &Path) -> String {
    pathdiff::diff_paths(module_path, project_root)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| module_path.to_string())
}

/// Convert a MODULE into a class.
pub fn module_to_class(module: &VendorModule, project_root: &Path) -> Result<ClassEntry> {
    let name = relative_name(&module.name, project_root);
    let methods = module
        .functions
        .iter()
        .map(function_to_method)
        .collect::<Result<Vec<_>>>()?;
    Ok(ClassEntry {
        filename: name.clone(),
        name,
        tally: module.tally,
        methods,
    })
}

/// Strip the module-procedure qualifier and underscores from a vendor
/// function name: `geometry_mp_area_` → `area`.
pub fn method_name(full_name: &str) -> &str {
    full_name
        .rsplit("_mp_")
        .next()
        .unwrap_or(full_name)
        .trim_matches('_')
}

/// Convert a FUNCTION into a method.
pub fn function_to_method(function: &VendorFunction) -> Result<MethodEntry> {
    let tally = function.blocks.ok_or_else(|| {
        ConvertError::Parse(format!("FUNCTION '{}' has no BLOCKS summary", function.name))
    })?;
    if tally.total == 0 {
        return Err(ConvertError::DivisionByZero {
            function: function.name.clone(),
        });
    }
    Ok(MethodEntry {
        name: method_name(&function.name).to_string(),
        tally,
        lines: function
            .block_list
            .iter()
            .map(|b| block_to_line(b, &function.name))
            .collect(),
    })
}

/// Convert a BLOCK into a line carrying the highest instance frequency.
pub fn block_to_line(block: &VendorBlock, function: &str) -> LineEntry {
    let number = block.line.unwrap_or_else(|| {
        log::warn!("BLOCK in {function} has no line number; reporting it as line 0");
        0
    });
    LineEntry {
        number,
        hits: block.freqs.iter().copied().max().unwrap_or(0),
    }
}
