//! Price data access port trait.

use crate::domain::error::CycleError;
use crate::domain::price_series::PriceSeries;

pub trait PriceDataPort {
    /// Closing prices for `codes`, aligned and gap-filled. Codes the source
    /// does not carry are omitted from the result.
    fn fetch_closes(&self, codes: &[String]) -> Result<PriceSeries, CycleError>;
}
