//! Collaborator interfaces the protocol consumes.

use crate::{AuthError, LedgerError};
use swapnet_types::{AccountId, Asset, Symbol};

/// The trusted external token ledger.
///
/// `transfer` debits the sender and credits the receiver atomically per
/// call and fails on insufficient balance; `balance_of` is a
/// point-in-time read. Balances are scoped by the issuing actor so two
/// issuers can each issue a `TOK`.
pub trait Ledger: Send + Sync {
    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        asset: &Asset,
        issuer: &AccountId,
        memo: &str,
    ) -> Result<(), LedgerError>;

    fn balance_of(&self, account: &AccountId, issuer: &AccountId, symbol: &Symbol) -> Asset;

    fn account_exists(&self, account: &AccountId) -> bool;
}

/// The external authorization collaborator: grants or fails a call made
/// on behalf of `identity`.
pub trait Authorizer: Send + Sync {
    fn require(&self, caller: &AccountId, identity: &AccountId) -> Result<(), AuthError>;
}

/// Authorizer where every account can act only as itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfAuthorizer;

impl Authorizer for SelfAuthorizer {
    fn require(&self, caller: &AccountId, identity: &AccountId) -> Result<(), AuthError> {
        if caller == identity {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                caller: caller.clone(),
                identity: identity.clone(),
            })
        }
    }
}
