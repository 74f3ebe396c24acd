//! Network orchestrator errors.
//!
//! Every variant's display string is the reason surfaced to the trade
//! submitter; a few are byte-for-byte contracts with existing clients
//! that match on the text.

use rust_decimal::Decimal;
use swapnet_codec::MemoError;
use swapnet_ledger::{AuthError, LedgerError};
use swapnet_reserve::ReserveError;
use swapnet_types::{AccountId, Asset, TypeError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("init not called yet")]
    NotInitialized,

    #[error("init already called")]
    AlreadyInitialized,

    #[error("trade is disabled")]
    Disabled,

    #[error("invalid transfer")]
    InvalidTransfer,

    #[error("either src or dest must be the base asset")]
    NoBaseSide,

    #[error("src symbol can not equal dest symbol")]
    SameSymbol,

    #[error("unlisted token")]
    UnlistedToken,

    #[error("transfer issuer {issuer} does not match the registered issuer for {symbol}")]
    IssuerMismatch { issuer: AccountId, symbol: String },

    #[error("no reserve could quote this trade")]
    NoAvailableRate,

    #[error("rate smaller than min conversion rate")]
    RateBelowMinimum { best: Decimal, min: Decimal },

    #[error("trade amount not added to dest")]
    DestAmountMismatch { expected: Asset, observed: Asset },

    #[error("saga event does not match current phase")]
    PhaseOrder,

    #[error("unknown reserve {reserve}")]
    UnknownReserve { reserve: AccountId },

    #[error(transparent)]
    Memo(#[from] MemoError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Reserve(#[from] ReserveError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Reserve-registry administration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("can only add a non existing reserve or delete an existing one")]
    Membership,

    #[error("reserve does not exist")]
    NotRegistered,

    #[error("reached number of reserves limit for this token")]
    ReserveLimit,
}
