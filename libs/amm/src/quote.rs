//! Quote type exchanged between reserves and the orchestrator.

use rust_decimal::Decimal;
use swapnet_types::Asset;

/// A reserve's offered conversion for one specific trade.
///
/// Valid only for the lifetime of the trade it was computed for; the
/// reserve keys stored quotes by trade id and consumes them at
/// settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    /// Conversion factor from source to destination whole units.
    pub rate: Decimal,
    /// Destination amount implied by the quoted rate and source amount.
    pub dest_amount: Asset,
}
