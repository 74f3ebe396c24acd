//! Reserve-side failures.
//!
//! Display strings for the settlement guards are wire-visible abort
//! reasons and keep the exact wording clients already match on.

use swapnet_types::AccountId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReserveError {
    #[error("init not called yet")]
    NotInitialized,

    #[error("init already called")]
    AlreadyInitialized,

    #[error("account {account} does not exist")]
    UnknownAccount { account: AccountId },

    #[error("trade disabled")]
    TradeDisabled,

    #[error("only network can perform a trade")]
    OnlyNetwork,

    #[error("must come from token issuer or base issuer")]
    UnexpectedIssuer { issuer: AccountId },

    #[error("invalid transfer")]
    InvalidTransfer,

    #[error("unrecognized transfer asset symbol")]
    UnrecognizedAsset,

    #[error("params were not set")]
    ParamsNotSet,

    #[error("receiver can not be current contract")]
    ReceiverIsReserve,

    #[error("no stored quote for this trade")]
    NoStoredQuote,

    #[error("conversion rate must be bigger than 0")]
    ZeroRate,

    #[error("calculated dest amount must be > 0")]
    NonPositiveDest,

    #[error("reserve actor unavailable")]
    ActorUnavailable,

    #[error(transparent)]
    Memo(#[from] swapnet_codec::MemoError),

    #[error(transparent)]
    Params(#[from] swapnet_amm::ParamsError),

    #[error(transparent)]
    Ledger(#[from] swapnet_ledger::LedgerError),

    #[error(transparent)]
    Auth(#[from] swapnet_ledger::AuthError),

    #[error(transparent)]
    Type(#[from] swapnet_types::TypeError),
}
