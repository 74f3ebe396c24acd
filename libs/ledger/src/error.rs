//! Ledger and authorization errors.

use swapnet_types::{AccountId, Asset};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account {account} does not exist")]
    UnknownAccount { account: AccountId },

    #[error("insufficient balance: {account} holds less than {required}")]
    InsufficientBalance { account: AccountId, required: Asset },

    #[error("invalid transfer: amount must be positive, got {asset}")]
    NonPositiveAmount { asset: Asset },

    #[error("transfer from an account to itself")]
    SelfTransfer { account: AccountId },

    #[error("a ledger transaction is already active")]
    TransactionActive,

    #[error("no active ledger transaction")]
    NoTransaction,

    #[error(transparent)]
    Type(#[from] swapnet_types::TypeError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("caller {caller} is not authorized to act as {identity}")]
    Unauthorized {
        caller: AccountId,
        identity: AccountId,
    },
}
