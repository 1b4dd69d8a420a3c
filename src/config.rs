//! Run configuration, assembled by the CLI.

use std::path::{Path, PathBuf};

use crate::dialect::Dialect;

/// Extensions treated as source when looking for files missing from the
/// vendor report.
pub const DEFAULT_EXTENSIONS: &[&str] = &["f", "f90"];

/// Make `root` absolute against `base` and drop `.` components, so that the
/// result can be compared against the absolute paths in vendor reports.
pub fn absolute_root(base: &Path, root: &Path) -> PathBuf {
    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        base.join(root)
    };
    joined.components().collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the vendor paths and output paths are made relative to.
    pub project_root: PathBuf,
    /// Source directory, relative to `project_root`.
    pub source_path: PathBuf,
    /// Object directory, relative to `project_root`.
    pub object_path: PathBuf,
    /// Directory reported in the output in place of `source_path`.
    pub out_src_path: PathBuf,
    pub dialect: Dialect,
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Program used to dump an object file's symbol table.
    pub nm_program: String,
}

impl Config {
    pub fn new(
        project_root: impl Into<PathBuf>,
        source_path: impl Into<PathBuf>,
        object_path: impl Into<PathBuf>,
    ) -> Self {
        let source_path = source_path.into();
        Self {
            project_root: project_root.into(),
            out_src_path: source_path.clone(),
            source_path,
            object_path: object_path.into(),
            dialect: Dialect::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            nm_program: "nm".to_string(),
        }
    }

    /// Replace the source extensions. Leading dots are stripped and case is
    /// ignored, so `.F90`, `F90` and `f90` are the same extension. An empty
    /// list keeps the current set.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    /// Absolute source directory; vendor module paths are matched against it.
    pub fn abs_source_path(&self) -> PathBuf {
        self.project_root.join(&self.source_path).components().collect()
    }

    pub fn abs_object_path(&self) -> PathBuf {
        self.project_root.join(&self.object_path).components().collect()
    }

    /// Resolve a class filename (relative to the project root) on disk.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        self.project_root.join(filename)
    }

    /// Whether `path` has one of the configured source extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}
