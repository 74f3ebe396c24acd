//! Journaled in-memory ledger.

use crate::{Ledger, LedgerError};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use swapnet_types::{AccountId, Asset, Symbol};
use tracing::{debug, trace, warn};

/// Balance row key: one balance per (issuer, symbol code, holder).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BalanceKey {
    issuer: AccountId,
    symbol_code: String,
    holder: AccountId,
}

/// In-memory token ledger with an explicit undo journal.
///
/// While a transaction is open, every balance mutation records the prior
/// value; `rollback` replays the journal in reverse, restoring the
/// pre-transaction state exactly. Only one transaction can be open at a
/// time; the trade engine serializes trades by construction.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: HashSet<AccountId>,
    balances: HashMap<BalanceKey, i64>,
    journal: Option<Vec<(BalanceKey, i64)>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_account(&mut self, account: AccountId) {
        self.accounts.insert(account);
    }

    /// Mint new supply to an account. Setup-time only; not journaled.
    pub fn issue(
        &mut self,
        issuer: &AccountId,
        to: &AccountId,
        asset: &Asset,
    ) -> Result<(), LedgerError> {
        if !asset.is_positive() {
            return Err(LedgerError::NonPositiveAmount {
                asset: asset.clone(),
            });
        }
        if !self.accounts.contains(to) {
            return Err(LedgerError::UnknownAccount { account: to.clone() });
        }
        let key = BalanceKey {
            issuer: issuer.clone(),
            symbol_code: asset.symbol().code().to_string(),
            holder: to.clone(),
        };
        *self.balances.entry(key).or_insert(0) += asset.amount();
        debug!(issuer = %issuer, to = %to, asset = %asset, "issued supply");
        Ok(())
    }

    pub fn begin(&mut self) -> Result<(), LedgerError> {
        if self.journal.is_some() {
            return Err(LedgerError::TransactionActive);
        }
        self.journal = Some(Vec::new());
        trace!("ledger transaction opened");
        Ok(())
    }

    pub fn commit(&mut self) -> Result<(), LedgerError> {
        let journal = self.journal.take().ok_or(LedgerError::NoTransaction)?;
        trace!(entries = journal.len(), "ledger transaction committed");
        Ok(())
    }

    /// Restore every balance touched since `begin`, newest first.
    pub fn rollback(&mut self) -> Result<(), LedgerError> {
        let journal = self.journal.take().ok_or(LedgerError::NoTransaction)?;
        let entries = journal.len();
        for (key, previous) in journal.into_iter().rev() {
            self.balances.insert(key, previous);
        }
        warn!(entries, "ledger transaction rolled back");
        Ok(())
    }

    fn set_balance(&mut self, key: BalanceKey, amount: i64) {
        if let Some(journal) = self.journal.as_mut() {
            let previous = self.balances.get(&key).copied().unwrap_or(0);
            journal.push((key.clone(), previous));
        }
        self.balances.insert(key, amount);
    }

    fn balance(&self, key: &BalanceKey) -> i64 {
        self.balances.get(key).copied().unwrap_or(0)
    }

    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        asset: &Asset,
        issuer: &AccountId,
        memo: &str,
    ) -> Result<(), LedgerError> {
        if !asset.is_positive() {
            return Err(LedgerError::NonPositiveAmount {
                asset: asset.clone(),
            });
        }
        if from == to {
            return Err(LedgerError::SelfTransfer {
                account: from.clone(),
            });
        }
        for account in [from, to] {
            if !self.accounts.contains(account) {
                return Err(LedgerError::UnknownAccount {
                    account: account.clone(),
                });
            }
        }

        let from_key = BalanceKey {
            issuer: issuer.clone(),
            symbol_code: asset.symbol().code().to_string(),
            holder: from.clone(),
        };
        let to_key = BalanceKey {
            holder: to.clone(),
            ..from_key.clone()
        };

        let from_balance = self.balance(&from_key);
        if from_balance < asset.amount() {
            return Err(LedgerError::InsufficientBalance {
                account: from.clone(),
                required: asset.clone(),
            });
        }

        self.set_balance(from_key, from_balance - asset.amount());
        let to_balance = self.balance(&to_key);
        self.set_balance(to_key, to_balance + asset.amount());

        debug!(from = %from, to = %to, asset = %asset, issuer = %issuer, memo, "transfer");
        Ok(())
    }

    pub fn balance_of(&self, account: &AccountId, issuer: &AccountId, symbol: &Symbol) -> Asset {
        let key = BalanceKey {
            issuer: issuer.clone(),
            symbol_code: symbol.code().to_string(),
            holder: account.clone(),
        };
        Asset::new(self.balance(&key), symbol.clone())
    }

    pub fn account_exists(&self, account: &AccountId) -> bool {
        self.accounts.contains(account)
    }
}

/// Cloneable, lockable handle to a shared [`InMemoryLedger`].
///
/// Every actor in one deployment holds the same handle; the inner lock
/// scope is a single ledger call, never a whole trade.
#[derive(Debug, Clone, Default)]
pub struct LedgerHandle {
    inner: Arc<Mutex<InMemoryLedger>>,
}

impl LedgerHandle {
    pub fn new(ledger: InMemoryLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn create_account(&self, account: AccountId) {
        self.inner.lock().create_account(account);
    }

    pub fn issue(
        &self,
        issuer: &AccountId,
        to: &AccountId,
        asset: &Asset,
    ) -> Result<(), LedgerError> {
        self.inner.lock().issue(issuer, to, asset)
    }

    pub fn begin(&self) -> Result<(), LedgerError> {
        self.inner.lock().begin()
    }

    pub fn commit(&self) -> Result<(), LedgerError> {
        self.inner.lock().commit()
    }

    pub fn rollback(&self) -> Result<(), LedgerError> {
        self.inner.lock().rollback()
    }
}

impl Ledger for LedgerHandle {
    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        asset: &Asset,
        issuer: &AccountId,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.inner.lock().transfer(from, to, asset, issuer, memo)
    }

    fn balance_of(&self, account: &AccountId, issuer: &AccountId, symbol: &Symbol) -> Asset {
        self.inner.lock().balance_of(account, issuer, symbol)
    }

    fn account_exists(&self, account: &AccountId) -> bool {
        self.inner.lock().account_exists(account)
    }
}
