//! Reserve core: admin surface, quoting, settlement.

use crate::{ReserveConfig, ReserveError};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use swapnet_amm::{conversion_rate, dest_amount, trade_fee, CurveParams, RateQuote, TradeSide};
use swapnet_codec::parse_settlement_memo;
use swapnet_ledger::{Authorizer, Ledger, LedgerHandle};
use swapnet_types::{AccountId, Asset, Symbol};
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of a successful settlement.
///
/// `previous_fees` lets the orchestrator compensate the fee accrual if a
/// later phase aborts the trade.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub receiver: AccountId,
    pub dest: Asset,
    pub fee: Asset,
    pub previous_fees: Asset,
}

/// The reserve actor's state and behavior.
pub struct Reserve {
    id: AccountId,
    ledger: LedgerHandle,
    auth: Arc<dyn Authorizer>,
    config: Option<ReserveConfig>,
    params: Option<CurveParams>,
    quotes: HashMap<Uuid, RateQuote>,
}

impl Reserve {
    pub fn new(id: AccountId, ledger: LedgerHandle, auth: Arc<dyn Authorizer>) -> Self {
        Self {
            id,
            ledger,
            auth,
            config: None,
            params: None,
            quotes: HashMap::new(),
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn config(&self) -> Option<&ReserveConfig> {
        self.config.as_ref()
    }

    pub fn collected_fees(&self) -> Option<&Asset> {
        self.config.as_ref().map(|c| &c.collected_fees)
    }

    fn state(&self) -> Result<&ReserveConfig, ReserveError> {
        self.config.as_ref().ok_or(ReserveError::NotInitialized)
    }

    fn state_mut(&mut self) -> Result<&mut ReserveConfig, ReserveError> {
        self.config.as_mut().ok_or(ReserveError::NotInitialized)
    }

    fn require_account(&self, account: &AccountId) -> Result<(), ReserveError> {
        if !self.ledger.account_exists(account) {
            return Err(ReserveError::UnknownAccount {
                account: account.clone(),
            });
        }
        Ok(())
    }

    fn require_owner(&self, caller: &AccountId) -> Result<(), ReserveError> {
        let owner = self.state()?.owner.clone();
        self.auth.require(caller, &owner)?;
        Ok(())
    }

    // --- administration -------------------------------------------------

    /// One-time setup, authorized as the reserve identity itself.
    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        caller: &AccountId,
        owner: AccountId,
        network: AccountId,
        token_symbol: Symbol,
        token_issuer: AccountId,
        base_symbol: Symbol,
        base_issuer: AccountId,
        enable_trade: bool,
    ) -> Result<(), ReserveError> {
        for account in [&owner, &network, &token_issuer, &base_issuer] {
            self.require_account(account)?;
        }
        self.auth.require(caller, &self.id)?;
        if self.config.is_some() {
            return Err(ReserveError::AlreadyInitialized);
        }

        let collected_fees = Asset::zero(token_symbol.clone());
        self.config = Some(ReserveConfig {
            owner,
            network,
            token_symbol,
            token_issuer,
            base_symbol,
            base_issuer,
            trade_enabled: enable_trade,
            collected_fees,
        });
        info!(reserve = %self.id, "reserve initialized");
        Ok(())
    }

    pub fn set_params(
        &mut self,
        caller: &AccountId,
        r: Decimal,
        p_min: Decimal,
        max_base_cap_buy: Asset,
        max_base_cap_sell: Asset,
        fee_percent: Decimal,
        max_sell_rate: Decimal,
        min_sell_rate: Decimal,
    ) -> Result<(), ReserveError> {
        self.require_owner(caller)?;
        self.params = Some(CurveParams::new(
            r,
            p_min,
            max_base_cap_buy,
            max_base_cap_sell,
            fee_percent,
            max_sell_rate,
            min_sell_rate,
        )?);
        info!(reserve = %self.id, "curve params updated");
        Ok(())
    }

    pub fn set_owner(&mut self, caller: &AccountId, new_owner: AccountId) -> Result<(), ReserveError> {
        self.require_account(&new_owner)?;
        self.require_owner(caller)?;
        self.state_mut()?.owner = new_owner;
        Ok(())
    }

    pub fn set_network(&mut self, caller: &AccountId, network: AccountId) -> Result<(), ReserveError> {
        self.require_account(&network)?;
        self.require_owner(caller)?;
        self.state_mut()?.network = network;
        Ok(())
    }

    pub fn set_enabled(&mut self, caller: &AccountId, enable: bool) -> Result<(), ReserveError> {
        self.require_owner(caller)?;
        self.state_mut()?.trade_enabled = enable;
        Ok(())
    }

    /// Zero the fee accumulator. Owner-only; the only way fees decrease.
    pub fn reset_fees(&mut self, caller: &AccountId) -> Result<(), ReserveError> {
        self.require_owner(caller)?;
        let state = self.state_mut()?;
        state.collected_fees = Asset::zero(state.token_symbol.clone());
        Ok(())
    }

    /// Move reserve-owned funds out, owner-only.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        asset: &Asset,
        issuer: &AccountId,
    ) -> Result<(), ReserveError> {
        self.require_account(to)?;
        self.require_owner(caller)?;
        self.ledger.transfer(&self.id, to, asset, issuer, "")?;
        Ok(())
    }

    // --- trade path -----------------------------------------------------

    /// Quote a conversion for `src`, storing the result under `trade_id`.
    ///
    /// Returns `None` whenever this reserve cannot serve the trade so the
    /// orchestrator's fan-out continues over the remaining reserves.
    pub fn quote(&mut self, trade_id: Uuid, src: &Asset) -> Option<RateQuote> {
        let config = match &self.config {
            Some(config) if config.trade_enabled => config,
            _ => {
                debug!(reserve = %self.id, "abstain: not configured or disabled");
                return None;
            }
        };
        let params = match &self.params {
            Some(params) => params,
            None => {
                debug!(reserve = %self.id, "abstain: params not set");
                return None;
            }
        };

        let side = if src.symbol() == &config.base_symbol {
            TradeSide::Buy
        } else if src.symbol() == &config.token_symbol {
            TradeSide::Sell
        } else {
            debug!(reserve = %self.id, src = %src, "abstain: unrecognized symbol");
            return None;
        };

        let base_inventory = self
            .ledger
            .balance_of(&self.id, &config.base_issuer, &config.base_symbol)
            .to_decimal();
        let rate = conversion_rate(params, base_inventory, side, src)?;

        let (dest_symbol, dest_issuer) = match side {
            TradeSide::Buy => (&config.token_symbol, &config.token_issuer),
            TradeSide::Sell => (&config.base_symbol, &config.base_issuer),
        };
        let dest = dest_amount(rate, src, dest_symbol).ok()?;
        if !dest.is_positive() {
            return None;
        }

        // the reserve must be able to fund the payout it promises
        let holdings = self.ledger.balance_of(&self.id, dest_issuer, dest_symbol);
        if holdings.amount() < dest.amount() {
            debug!(reserve = %self.id, dest = %dest, holdings = %holdings, "abstain: insufficient liquidity");
            return None;
        }

        let quote = RateQuote {
            rate,
            dest_amount: dest,
        };
        self.quotes.insert(trade_id, quote.clone());
        debug!(reserve = %self.id, %trade_id, rate = %quote.rate, "quoted");
        Some(quote)
    }

    /// Drop a stored quote that will not be settled.
    pub fn clear_quote(&mut self, trade_id: Uuid) {
        self.quotes.remove(&trade_id);
    }

    /// Execute the reserve side of a settlement: the network has already
    /// transferred `src` to this reserve; pay the destination leg to the
    /// receiver named in the memo at the rate quoted for this trade.
    pub fn settle(
        &mut self,
        trade_id: Uuid,
        from: &AccountId,
        src: &Asset,
        issuer: &AccountId,
        memo: &str,
    ) -> Result<Settlement, ReserveError> {
        let config = self.state()?.clone();
        if !config.trade_enabled {
            return Err(ReserveError::TradeDisabled);
        }
        if from != &config.network {
            return Err(ReserveError::OnlyNetwork);
        }
        if issuer != &config.token_issuer && issuer != &config.base_issuer {
            return Err(ReserveError::UnexpectedIssuer {
                issuer: issuer.clone(),
            });
        }
        if !src.is_positive() {
            return Err(ReserveError::InvalidTransfer);
        }
        let side = if src.symbol() == &config.base_symbol {
            TradeSide::Buy
        } else if src.symbol() == &config.token_symbol {
            TradeSide::Sell
        } else {
            return Err(ReserveError::UnrecognizedAsset);
        };
        let params = self.params.clone().ok_or(ReserveError::ParamsNotSet)?;

        let receiver = parse_settlement_memo(memo)?;
        if receiver == self.id {
            return Err(ReserveError::ReceiverIsReserve);
        }

        // quoted earlier in this trade; consumed exactly once
        let quote = self
            .quotes
            .remove(&trade_id)
            .ok_or(ReserveError::NoStoredQuote)?;
        if quote.rate <= Decimal::ZERO {
            return Err(ReserveError::ZeroRate);
        }

        let (dest_symbol, dest_issuer) = match side {
            TradeSide::Buy => (&config.token_symbol, &config.token_issuer),
            TradeSide::Sell => (&config.base_symbol, &config.base_issuer),
        };
        let dest = dest_amount(quote.rate, src, dest_symbol)?;
        if !dest.is_positive() {
            return Err(ReserveError::NonPositiveDest);
        }

        let token_leg = match side {
            TradeSide::Buy => &dest,
            TradeSide::Sell => src,
        };
        let fee = trade_fee(token_leg, params.fee_percent, side)?;
        let previous_fees = config.collected_fees.clone();

        // pay out before touching the fee accumulator: a failed transfer
        // must leave no trace in reserve state
        self.ledger
            .transfer(&self.id, &receiver, &dest, dest_issuer, "")?;
        {
            let state = self.state_mut()?;
            state.collected_fees = state.collected_fees.checked_add(&fee)?;
        }

        info!(
            reserve = %self.id,
            %trade_id,
            receiver = %receiver,
            dest = %dest,
            fee = %fee,
            "settled"
        );
        Ok(Settlement {
            receiver,
            dest,
            fee,
            previous_fees,
        })
    }

    /// Compensation hook: restore the fee accumulator to its value before
    /// a now-aborted settlement.
    pub fn restore_fees(&mut self, previous: Asset) {
        if let Some(config) = self.config.as_mut() {
            config.collected_fees = previous;
        }
    }
}
