//! Durable reserve state.

use swapnet_types::{AccountId, Asset, Symbol};

/// Configuration and bookkeeping for one reserve instance.
///
/// `collected_fees` is denominated in the token and only ever grows
/// between explicit owner resets.
#[derive(Debug, Clone, PartialEq)]
pub struct ReserveConfig {
    pub owner: AccountId,
    pub network: AccountId,
    pub token_symbol: Symbol,
    pub token_issuer: AccountId,
    pub base_symbol: Symbol,
    pub base_issuer: AccountId,
    pub trade_enabled: bool,
    pub collected_fees: Asset,
}
