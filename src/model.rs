//! In-memory representation of both sides of the conversion: the vendor
//! codecov tree as read from disk, and the Cobertura tree that gets written.

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// Covered/total basic-block counts, as carried by a `BLOCKS` element.
///
/// Cobertura's `branch-rate` and `line-rate` are both derived from this ratio.
/// It is a block ratio, not a decision ratio; the attribute names are kept
/// because downstream consumers read them that way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockTally {
    pub covered: u64,
    pub total: u64,
}

impl BlockTally {
    pub fn new(covered: u64, total: u64) -> Self {
        Self { covered, total }
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        rate(self.covered, self.total)
    }

    /// Rate rendered the way the Cobertura output expects it: `"0"` when
    /// nothing was instrumented, otherwise a float literal (`"1.0"`, `"0.5"`).
    #[must_use]
    pub fn rate_attr(&self) -> String {
        if self.total == 0 {
            return "0".to_string();
        }
        let r = self.rate();
        if r.fract() == 0.0 {
            format!("{r:.1}")
        } else {
            format!("{r}")
        }
    }
}

impl std::ops::AddAssign for BlockTally {
    fn add_assign(&mut self, other: Self) {
        self.covered += other.covered;
        self.total += other.total;
    }
}

// ---------------------------------------------------------------------------
// Vendor side (Intel codecov XML)
// ---------------------------------------------------------------------------

/// One `BLOCK`: a basic block with its recorded execution instances.
#[derive(Debug, Clone, Default)]
pub struct VendorBlock {
    /// Source line; `None` when the vendor record omitted it.
    pub line: Option<u32>,
    /// `freq` of every `INSTANCE` child.
    pub freqs: Vec<u64>,
}

/// One `FUNCTION` element.
#[derive(Debug, Clone, Default)]
pub struct VendorFunction {
    pub name: String,
    /// The function's own `BLOCKS` summary, if present.
    pub blocks: Option<BlockTally>,
    pub block_list: Vec<VendorBlock>,
}

/// One `MODULE` element, i.e. one compiled source file.
#[derive(Debug, Clone, Default)]
pub struct VendorModule {
    /// Absolute path of the source file as recorded by the compiler.
    pub name: String,
    /// Sum of every `BLOCKS` element nested anywhere under the module.
    pub tally: BlockTally,
    pub functions: Vec<VendorFunction>,
}

/// The whole vendor document.
#[derive(Debug, Clone, Default)]
pub struct VendorReport {
    /// Project name from the root element.
    pub name: String,
    /// Sum of every `BLOCKS` element in the document, filtered or not.
    pub tally: BlockTally,
    pub modules: Vec<VendorModule>,
}

// ---------------------------------------------------------------------------
// Cobertura side
// ---------------------------------------------------------------------------

/// One coverable source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEntry {
    pub number: u32,
    pub hits: u64,
}

/// One function/subroutine.
#[derive(Debug, Clone, Default)]
pub struct MethodEntry {
    pub name: String,
    pub tally: BlockTally,
    pub lines: Vec<LineEntry>,
}

impl MethodEntry {
    /// A method that exists in the object file but never ran. Every line in
    /// `numbers` is reported with zero hits.
    pub fn uncalled(name: String, numbers: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name,
            tally: BlockTally::default(),
            lines: numbers
                .into_iter()
                .map(|number| LineEntry { number, hits: 0 })
                .collect(),
        }
    }
}

/// One source file.
#[derive(Debug, Clone, Default)]
pub struct ClassEntry {
    pub name: String,
    pub filename: String,
    pub tally: BlockTally,
    pub methods: Vec<MethodEntry>,
}

impl ClassEntry {
    /// A source file the vendor report never mentioned.
    pub fn empty(path: String) -> Self {
        Self {
            name: path.clone(),
            filename: path,
            ..Default::default()
        }
    }

    /// All method lines, concatenated in method order. Lines shared by two
    /// methods appear twice.
    pub fn lines(&self) -> impl Iterator<Item = &LineEntry> {
        self.methods.iter().flat_map(|m| m.lines.iter())
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Package {
    pub name: String,
    pub classes: Vec<ClassEntry>,
}

/// Root of the Cobertura output.
#[derive(Debug, Clone, Default)]
pub struct CoverageReport {
    /// Computed from the vendor data only, before augmentation.
    pub tally: BlockTally,
    /// Seconds since the Unix epoch (UTC).
    pub timestamp: i64,
    pub package: Package,
}
