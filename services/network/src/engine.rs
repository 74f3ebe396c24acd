//! Network orchestrator engine.
//!
//! The engine owns the reserve registry, a handle to every reserve
//! actor, and the ledger. One call to [`NetworkEngine::submit_trade`]
//! runs one complete trade: intake checks, quote fan-out, saga phases,
//! and commit or rollback. The ledger journal is the undo log for every
//! balance the trade touches; reserve-local state (consumed quotes, fee
//! accrual) is compensated explicitly on abort.

use crate::saga::Effect;
use crate::{NetworkError, ReserveRegistry, TradeEvent, TradeIntent, TradeReceipt, TradeSaga};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use swapnet_amm::RateQuote;
use swapnet_codec::TradeMemo;
use swapnet_ledger::{Authorizer, Ledger, LedgerHandle};
use swapnet_reserve::{ReserveHandle, Settlement};
use swapnet_types::{AccountId, Asset, Symbol};
use tracing::{info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct NetworkState {
    owner: AccountId,
    base_issuer: AccountId,
    enabled: bool,
}

/// The orchestrating actor of the exchange.
pub struct NetworkEngine {
    id: AccountId,
    base_symbol: Symbol,
    state: Option<NetworkState>,
    registry: ReserveRegistry,
    handles: HashMap<AccountId, ReserveHandle>,
    ledger: LedgerHandle,
    auth: Arc<dyn Authorizer>,
}

impl NetworkEngine {
    pub fn new(
        id: AccountId,
        base_symbol: Symbol,
        ledger: LedgerHandle,
        auth: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            id,
            base_symbol,
            state: None,
            registry: ReserveRegistry::new(),
            handles: HashMap::new(),
            ledger,
            auth,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    fn state(&self) -> Result<&NetworkState, NetworkError> {
        self.state.as_ref().ok_or(NetworkError::NotInitialized)
    }

    fn require_owner(&self, caller: &AccountId) -> Result<(), NetworkError> {
        let owner = self.state()?.owner.clone();
        self.auth.require(caller, &owner)?;
        Ok(())
    }

    // --- administration -------------------------------------------------

    /// One-time setup, authorized as the network identity itself.
    pub fn init(
        &mut self,
        caller: &AccountId,
        owner: AccountId,
        base_issuer: AccountId,
        enable: bool,
    ) -> Result<(), NetworkError> {
        self.auth.require(caller, &self.id)?;
        if self.state.is_some() {
            return Err(NetworkError::AlreadyInitialized);
        }
        self.state = Some(NetworkState {
            owner,
            base_issuer,
            enabled: enable,
        });
        info!(network = %self.id, "network initialized");
        Ok(())
    }

    pub fn set_enabled(&mut self, caller: &AccountId, enable: bool) -> Result<(), NetworkError> {
        self.require_owner(caller)?;
        if let Some(state) = self.state.as_mut() {
            state.enabled = enable;
        }
        Ok(())
    }

    /// Register a reserve actor and keep its handle for quote fan-out.
    pub fn add_reserve(
        &mut self,
        caller: &AccountId,
        handle: ReserveHandle,
    ) -> Result<(), NetworkError> {
        self.require_owner(caller)?;
        self.registry.add_reserve(handle.id().clone())?;
        self.handles.insert(handle.id().clone(), handle);
        Ok(())
    }

    pub fn remove_reserve(
        &mut self,
        caller: &AccountId,
        reserve: &AccountId,
    ) -> Result<(), NetworkError> {
        self.require_owner(caller)?;
        self.registry.remove_reserve(reserve)?;
        self.handles.remove(reserve);
        Ok(())
    }

    pub fn list_pair(
        &mut self,
        caller: &AccountId,
        reserve: &AccountId,
        token_symbol: Symbol,
        token_issuer: AccountId,
    ) -> Result<(), NetworkError> {
        self.require_owner(caller)?;
        self.registry.list_pair(reserve, token_symbol, token_issuer)?;
        Ok(())
    }

    pub fn delist_pair(
        &mut self,
        caller: &AccountId,
        reserve: &AccountId,
        token_code: &str,
    ) -> Result<(), NetworkError> {
        self.require_owner(caller)?;
        self.registry.delist_pair(reserve, token_code)?;
        Ok(())
    }

    /// Owner deposit into the network's own balance, no trade attached.
    pub fn deposit(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        issuer: &AccountId,
    ) -> Result<(), NetworkError> {
        self.require_owner(caller)?;
        self.ledger.transfer(caller, &self.id, asset, issuer, "")?;
        Ok(())
    }

    /// Move network-owned funds out, owner-only.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        asset: &Asset,
        issuer: &AccountId,
    ) -> Result<(), NetworkError> {
        self.require_owner(caller)?;
        self.ledger.transfer(&self.id, to, asset, issuer, "")?;
        Ok(())
    }

    // --- trade path -----------------------------------------------------

    /// Run one full trade: debit the trader, fan out for quotes, settle
    /// at the best reserve, verify arrival. Commits the ledger journal on
    /// success; on any failure rolls it back, compensates the involved
    /// reserves, and returns the abort reason.
    #[instrument(skip_all, fields(network = %self.id, trader = %trader, src = %src))]
    pub async fn submit_trade(
        &mut self,
        trader: &AccountId,
        src: &Asset,
        issuer: &AccountId,
        memo: &str,
    ) -> Result<TradeReceipt, NetworkError> {
        let intent = self.intake(trader, src, issuer, memo)?;
        let trade_id = intent.trade_id;

        self.ledger.begin()?;
        let mut winner: Option<(AccountId, Settlement)> = None;
        let mut quoted: Vec<AccountId> = Vec::new();
        let outcome = self
            .run_saga(intent, &mut quoted, &mut winner)
            .await;

        match outcome {
            Ok(receipt) => {
                self.ledger.commit()?;
                info!(
                    %trade_id,
                    reserve = %receipt.reserve,
                    dest = %receipt.dest,
                    rate = %receipt.rate,
                    "trade settled"
                );
                Ok(receipt)
            }
            Err(error) => {
                warn!(%trade_id, %error, "trade aborted, rolling back");
                self.ledger.rollback()?;
                self.compensate(trade_id, &quoted, winner.as_ref()).await;
                Err(error)
            }
        }
    }

    /// Intake checks: memo, pair shape, binding, issuer. No side effects.
    fn intake(
        &self,
        trader: &AccountId,
        src: &Asset,
        issuer: &AccountId,
        memo: &str,
    ) -> Result<TradeIntent, NetworkError> {
        let state = self.state()?;
        if !state.enabled {
            return Err(NetworkError::Disabled);
        }
        if !src.is_positive() {
            return Err(NetworkError::InvalidTransfer);
        }

        let memo = TradeMemo::parse(memo)?;
        let buy = src.symbol() == &self.base_symbol;
        if !buy && memo.dest_symbol != self.base_symbol {
            return Err(NetworkError::NoBaseSide);
        }
        if src.symbol() == &memo.dest_symbol {
            return Err(NetworkError::SameSymbol);
        }

        let token_symbol = if buy { &memo.dest_symbol } else { src.symbol() };
        let binding = self
            .registry
            .binding(token_symbol.code())
            .ok_or(NetworkError::UnlistedToken)?;
        // binding lookup is by code; the listed precision must match too
        if &binding.symbol != token_symbol {
            return Err(NetworkError::UnlistedToken);
        }

        let (src_issuer, dest_issuer) = if buy {
            (state.base_issuer.clone(), binding.issuer.clone())
        } else {
            (binding.issuer.clone(), state.base_issuer.clone())
        };
        if issuer != &src_issuer {
            return Err(NetworkError::IssuerMismatch {
                issuer: issuer.clone(),
                symbol: src.symbol().to_string(),
            });
        }

        Ok(TradeIntent {
            trade_id: Uuid::new_v4(),
            trader: trader.clone(),
            src: src.clone(),
            src_issuer,
            dest_symbol: memo.dest_symbol,
            dest_issuer,
            dest_receiver: memo.dest_receiver,
            min_conversion_rate: memo.min_conversion_rate,
        })
    }

    async fn run_saga(
        &mut self,
        intent: TradeIntent,
        quoted: &mut Vec<AccountId>,
        winner: &mut Option<(AccountId, Settlement)>,
    ) -> Result<TradeReceipt, NetworkError> {
        let token_code = if intent.src.symbol() == &self.base_symbol {
            intent.dest_symbol.code().to_string()
        } else {
            intent.src.symbol().code().to_string()
        };

        // pull the source leg in before asking anyone to price it
        self.ledger
            .transfer(&intent.trader, &self.id, &intent.src, &intent.src_issuer, "")?;

        let quotes = self.collect_quotes(&token_code, intent.trade_id, &intent.src, quoted).await?;

        let mut saga = TradeSaga::new(intent);
        let mut pending: VecDeque<Effect> =
            saga.advance(TradeEvent::QuotesCollected(quotes))?.into();
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::RefundChange { to, asset, issuer } => {
                    self.ledger.transfer(&self.id, &to, &asset, &issuer, "")?;
                }
                Effect::SnapshotDestBalance { account, issuer, symbol } => {
                    let before = self.ledger.balance_of(&account, &issuer, &symbol);
                    pending = saga.advance(TradeEvent::BaselineCaptured(before))?.into();
                }
                Effect::TransferToReserve { reserve, asset, issuer, memo } => {
                    self.ledger.transfer(&self.id, &reserve, &asset, &issuer, &memo)?;
                }
                Effect::SettleAtReserve { reserve, asset, issuer } => {
                    let handle = self.handle(&reserve)?.clone();
                    let settlement = handle
                        .settle(
                            saga.intent().trade_id,
                            self.id.clone(),
                            asset,
                            issuer,
                            saga.intent().dest_receiver.as_str().to_string(),
                        )
                        .await?;
                    *winner = Some((reserve, settlement));
                }
                Effect::ReadDestBalance { account, issuer, symbol } => {
                    let after = self.ledger.balance_of(&account, &issuer, &symbol);
                    pending = saga.advance(TradeEvent::DestBalanceObserved(after))?.into();
                }
            }
        }

        saga.receipt().cloned().ok_or(NetworkError::PhaseOrder)
    }

    /// Fan a quote request out to every reserve bound to `token_code`, in
    /// slot order. Records which reserves stored a quote so an abort can
    /// clear them.
    async fn collect_quotes(
        &self,
        token_code: &str,
        trade_id: Uuid,
        src: &Asset,
        quoted: &mut Vec<AccountId>,
    ) -> Result<Vec<(AccountId, Option<RateQuote>)>, NetworkError> {
        let reserves: Vec<AccountId> = self
            .registry
            .binding(token_code)
            .ok_or(NetworkError::UnlistedToken)?
            .reserves()
            .cloned()
            .collect();

        let mut requests = Vec::with_capacity(reserves.len());
        for reserve in &reserves {
            let handle = self.handle(reserve)?.clone();
            let src = src.clone();
            requests.push(async move { handle.quote(trade_id, src).await });
        }

        let mut quotes = Vec::with_capacity(reserves.len());
        for (reserve, answer) in reserves.into_iter().zip(join_all(requests).await) {
            let quote = answer?;
            if quote.is_some() {
                quoted.push(reserve.clone());
            }
            quotes.push((reserve, quote));
        }
        Ok(quotes)
    }

    /// Undo reserve-local state after a rollback: restore the winner's
    /// fee accumulator, drop every stored quote for this trade. Best
    /// effort; an unreachable reserve only gets a warning since its
    /// ledger-visible state was already rolled back.
    async fn compensate(
        &self,
        trade_id: Uuid,
        quoted: &[AccountId],
        winner: Option<&(AccountId, Settlement)>,
    ) {
        if let Some((reserve, settlement)) = winner {
            if let Ok(handle) = self.handle(reserve) {
                if let Err(error) = handle.restore_fees(settlement.previous_fees.clone()).await {
                    warn!(%trade_id, reserve = %reserve, %error, "fee restore failed");
                }
            }
        }
        for reserve in quoted {
            if let Ok(handle) = self.handle(reserve) {
                if let Err(error) = handle.clear_quote(trade_id).await {
                    warn!(%trade_id, reserve = %reserve, %error, "quote clear failed");
                }
            }
        }
    }

    fn handle(&self, reserve: &AccountId) -> Result<&ReserveHandle, NetworkError> {
        self.handles.get(reserve).ok_or_else(|| NetworkError::UnknownReserve {
            reserve: reserve.clone(),
        })
    }

    /// Best available conversion rate for `src` into `dest_symbol`,
    /// without executing anything. Returns zero when no reserve quotes.
    pub async fn best_rate(
        &self,
        src: &Asset,
        dest_symbol: &Symbol,
    ) -> Result<Decimal, NetworkError> {
        let buy = src.symbol() == &self.base_symbol;
        if !buy && dest_symbol != &self.base_symbol {
            return Err(NetworkError::NoBaseSide);
        }
        let token_code = if buy { dest_symbol.code() } else { src.symbol().code() };
        let probe_id = Uuid::new_v4();

        let mut quoted = Vec::new();
        let quotes = self
            .collect_quotes(token_code, probe_id, src, &mut quoted)
            .await?;
        // probe quotes must not linger in reserve storage
        self.compensate(probe_id, &quoted, None).await;

        Ok(quotes
            .into_iter()
            .filter_map(|(_, quote)| quote.map(|q| q.rate))
            .max()
            .unwrap_or(Decimal::ZERO))
    }
}
