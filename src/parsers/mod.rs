pub mod codecov;

use crate::error::Result;
use crate::model::VendorReport;

/// Every vendor format reader implements this trait.
pub trait Parser {
    /// Parse the input bytes into the vendor coverage tree.
    fn parse(&self, input: &[u8]) -> Result<VendorReport>;
}
