/// Source-matching and path-rewriting behaviour.
///
/// `Strict` is the default. `Legacy` reproduces the looser rules of older
/// conversion scripts and is kept for reports that must stay comparable
/// with output produced that way.
use clap::ValueEnum;
use serde::Serialize;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `contains` ends a procedure span and is never executable; `end
    /// function`/`end subroutine` are not executable; object files are
    /// searched recursively; output paths keep their subdirectories.
    #[default]
    Strict,
    /// Spans end only at `end function`/`end subroutine`; object files are
    /// joined directly onto the object directory; output paths keep only the
    /// base filename.
    Legacy,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Strict => "strict",
            Dialect::Legacy => "legacy",
        }
    }

    /// Whether `contains` is treated as the end of a procedure body.
    pub fn contains_ends_span(&self) -> bool {
        matches!(self, Dialect::Strict)
    }

    /// Whether `end function`/`end subroutine` lines count as block closers.
    pub fn excludes_procedure_end(&self) -> bool {
        matches!(self, Dialect::Strict)
    }

    /// Whether object files may live in subdirectories of the object path.
    pub fn recursive_object_search(&self) -> bool {
        matches!(self, Dialect::Strict)
    }

    /// Whether rewritten filenames keep their position under the source path.
    pub fn keeps_relative_paths(&self) -> bool {
        matches!(self, Dialect::Strict)
    }
}

impl std::str::FromStr for Dialect {
    type Err = ConvertError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Dialect::Strict),
            "legacy" => Ok(Dialect::Legacy),
            _ => Err(ConvertError::Parse(format!(
                "Unknown dialect: '{}'. Supported: strict, legacy",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
