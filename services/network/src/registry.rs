//! Reserve registry and per-token bindings.
//!
//! A token is bound to at most [`MAX_RESERVES_PER_TOKEN`] reserves,
//! stored in a fixed slot array. Listing fills the first free slot;
//! delisting swap-removes with the last occupied slot, so slot order is
//! not preserved across removals. The binding row is deleted outright
//! when its last reserve is delisted.

use crate::RegistryError;
use std::collections::{HashMap, HashSet};
use swapnet_types::{AccountId, Symbol};

pub const MAX_RESERVES_PER_TOKEN: usize = 5;

/// One listed token and the reserves serving it.
#[derive(Debug, Clone)]
pub struct TokenBinding {
    pub symbol: Symbol,
    pub issuer: AccountId,
    slots: [Option<AccountId>; MAX_RESERVES_PER_TOKEN],
    count: usize,
}

impl TokenBinding {
    fn new(symbol: Symbol, issuer: AccountId) -> Self {
        Self {
            symbol,
            issuer,
            slots: Default::default(),
            count: 0,
        }
    }

    pub fn reserve_count(&self) -> usize {
        self.count
    }

    /// Bound reserves in slot order.
    pub fn reserves(&self) -> impl Iterator<Item = &AccountId> {
        self.slots[..self.count].iter().flatten()
    }

    fn position_of(&self, reserve: &AccountId) -> Option<usize> {
        self.slots[..self.count]
            .iter()
            .position(|slot| slot.as_ref() == Some(reserve))
    }
}

/// Registered reserves and the token pairs they are listed for.
#[derive(Debug, Clone, Default)]
pub struct ReserveRegistry {
    reserves: HashSet<AccountId>,
    bindings: HashMap<String, TokenBinding>,
}

impl ReserveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, reserve: &AccountId) -> bool {
        self.reserves.contains(reserve)
    }

    pub fn add_reserve(&mut self, reserve: AccountId) -> Result<(), RegistryError> {
        if !self.reserves.insert(reserve) {
            return Err(RegistryError::Membership);
        }
        Ok(())
    }

    pub fn remove_reserve(&mut self, reserve: &AccountId) -> Result<(), RegistryError> {
        if !self.reserves.remove(reserve) {
            return Err(RegistryError::Membership);
        }
        Ok(())
    }

    /// List `reserve` for `symbol`, creating the binding row on first
    /// listing. Listing an already-listed reserve is a no-op.
    pub fn list_pair(
        &mut self,
        reserve: &AccountId,
        symbol: Symbol,
        issuer: AccountId,
    ) -> Result<(), RegistryError> {
        if !self.reserves.contains(reserve) {
            return Err(RegistryError::NotRegistered);
        }
        let binding = self
            .bindings
            .entry(symbol.code().to_string())
            .or_insert_with(|| TokenBinding::new(symbol, issuer));
        if binding.position_of(reserve).is_some() {
            return Ok(());
        }
        if binding.count == MAX_RESERVES_PER_TOKEN {
            return Err(RegistryError::ReserveLimit);
        }
        binding.slots[binding.count] = Some(reserve.clone());
        binding.count += 1;
        Ok(())
    }

    /// Delist `reserve` from `code`. Delisting a reserve or token that is
    /// not listed is a no-op; delisting the last reserve drops the row.
    pub fn delist_pair(&mut self, reserve: &AccountId, code: &str) -> Result<(), RegistryError> {
        if !self.reserves.contains(reserve) {
            return Err(RegistryError::NotRegistered);
        }
        let Some(binding) = self.bindings.get_mut(code) else {
            return Ok(());
        };
        if let Some(index) = binding.position_of(reserve) {
            binding.slots.swap(index, binding.count - 1);
            binding.slots[binding.count - 1] = None;
            binding.count -= 1;
        }
        if binding.count == 0 {
            self.bindings.remove(code);
        }
        Ok(())
    }

    pub fn binding(&self, code: &str) -> Option<&TokenBinding> {
        self.bindings.get(code)
    }
}
