use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error at position {position}: {source}")]
    Xml {
        source: quick_xml::Error,
        position: usize,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    /// A FUNCTION reported `total="0"` blocks, so its rate is undefined.
    #[error("Function '{function}' reports zero total blocks")]
    DivisionByZero { function: String },

    #[error("Pattern not found: {pattern} in {}", path.display())]
    PatternNotFound { pattern: String, path: PathBuf },

    #[error("Object file {name} not found in {}", dir.display())]
    ObjectNotFound { name: String, dir: PathBuf },

    #[error("Symbol dump failed for {}: {message}", object.display())]
    SymbolDump { object: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
