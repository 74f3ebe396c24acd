//! Trade settlement saga.
//!
//! One trade is a short saga the engine drives to completion inside a
//! single journaled ledger transaction. The saga itself is a pure state
//! machine: it consumes observations ([`TradeEvent`]) and emits the side
//! effects ([`Effect`]) the engine must perform next, which keeps every
//! phase transition unit-testable without a ledger or a runtime.
//!
//! Phases:
//!
//! 1. quotes collected → select the winning reserve (stable arg-max:
//!    first maximum in registry order), refund change if the traded
//!    source amount is below the offered one, snapshot the receiver's
//!    destination balance;
//! 2. baseline captured → transfer the source leg to the winner with the
//!    receiver's name as the memo, command the settlement, read the
//!    receiver's balance back;
//! 3. balance observed → the delta must equal the promised destination
//!    amount exactly, or the whole trade aborts.

use crate::NetworkError;
use rust_decimal::Decimal;
use swapnet_amm::RateQuote;
use swapnet_types::{AccountId, Asset, Symbol};
use tracing::debug;
use uuid::Uuid;

/// Everything a trade needs, resolved at intake.
#[derive(Debug, Clone)]
pub struct TradeIntent {
    pub trade_id: Uuid,
    pub trader: AccountId,
    pub src: Asset,
    pub src_issuer: AccountId,
    pub dest_symbol: Symbol,
    pub dest_issuer: AccountId,
    pub dest_receiver: AccountId,
    pub min_conversion_rate: Decimal,
}

/// Observations fed into the saga by the engine.
#[derive(Debug, Clone)]
pub enum TradeEvent {
    /// One entry per bound reserve, in registry slot order; `None` means
    /// the reserve abstained.
    QuotesCollected(Vec<(AccountId, Option<RateQuote>)>),
    /// The receiver's destination balance before settlement.
    BaselineCaptured(Asset),
    /// The receiver's destination balance after settlement.
    DestBalanceObserved(Asset),
}

/// Side effects the engine must perform, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Return unspent source funds to the trader.
    RefundChange { to: AccountId, asset: Asset, issuer: AccountId },
    /// Read the receiver's destination balance and feed it back as
    /// [`TradeEvent::BaselineCaptured`].
    SnapshotDestBalance { account: AccountId, issuer: AccountId, symbol: Symbol },
    /// Move the source leg to the winning reserve; the memo names the
    /// destination receiver.
    TransferToReserve { reserve: AccountId, asset: Asset, issuer: AccountId, memo: String },
    /// Command the winning reserve to settle this trade.
    SettleAtReserve { reserve: AccountId, asset: Asset, issuer: AccountId },
    /// Read the receiver's destination balance and feed it back as
    /// [`TradeEvent::DestBalanceObserved`].
    ReadDestBalance { account: AccountId, issuer: AccountId, symbol: Symbol },
}

/// Final outcome of a completed trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub trade_id: Uuid,
    pub reserve: AccountId,
    pub trader: AccountId,
    pub src: Asset,
    pub dest: Asset,
    pub receiver: AccountId,
    pub rate: Decimal,
}

#[derive(Debug, Clone)]
enum Phase {
    RatesRequested,
    RateSelected {
        reserve: AccountId,
        rate: Decimal,
        actual_src: Asset,
        actual_dest: Asset,
    },
    SettlementSent {
        reserve: AccountId,
        rate: Decimal,
        actual_src: Asset,
        actual_dest: Asset,
        dest_before: Asset,
    },
    Verified(TradeReceipt),
}

/// State machine for one trade.
#[derive(Debug, Clone)]
pub struct TradeSaga {
    intent: TradeIntent,
    phase: Phase,
}

impl TradeSaga {
    pub fn new(intent: TradeIntent) -> Self {
        Self {
            intent,
            phase: Phase::RatesRequested,
        }
    }

    pub fn intent(&self) -> &TradeIntent {
        &self.intent
    }

    /// The receipt, once the saga has verified the trade.
    pub fn receipt(&self) -> Option<&TradeReceipt> {
        match &self.phase {
            Phase::Verified(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// Advance one phase. An `Err` aborts the trade; the engine rolls the
    /// ledger back and compensates the reserves.
    pub fn advance(&mut self, event: TradeEvent) -> Result<Vec<Effect>, NetworkError> {
        match (&self.phase, event) {
            (Phase::RatesRequested, TradeEvent::QuotesCollected(quotes)) => {
                self.select_rate(quotes)
            }
            (Phase::RateSelected { .. }, TradeEvent::BaselineCaptured(before)) => {
                self.dispatch_settlement(before)
            }
            (Phase::SettlementSent { .. }, TradeEvent::DestBalanceObserved(after)) => {
                self.verify(after)
            }
            _ => Err(NetworkError::PhaseOrder),
        }
    }

    fn select_rate(
        &mut self,
        quotes: Vec<(AccountId, Option<RateQuote>)>,
    ) -> Result<Vec<Effect>, NetworkError> {
        // first strict maximum wins, so registry order breaks ties
        let mut best: Option<(AccountId, RateQuote)> = None;
        for (reserve, quote) in quotes {
            let Some(quote) = quote else { continue };
            if quote.rate <= Decimal::ZERO {
                continue;
            }
            match &best {
                Some((_, current)) if quote.rate <= current.rate => {}
                _ => best = Some((reserve, quote)),
            }
        }

        let (reserve, quote) = best.ok_or(NetworkError::NoAvailableRate)?;
        if quote.rate < self.intent.min_conversion_rate {
            return Err(NetworkError::RateBelowMinimum {
                best: quote.rate,
                min: self.intent.min_conversion_rate,
            });
        }

        let actual_src = self.intent.src.clone();
        let actual_dest = quote.dest_amount.clone();
        debug!(
            trade_id = %self.intent.trade_id,
            reserve = %reserve,
            rate = %quote.rate,
            dest = %actual_dest,
            "rate selected"
        );

        let mut effects = Vec::new();
        if actual_src.amount() < self.intent.src.amount() {
            let change = self.intent.src.checked_sub(&actual_src)?;
            effects.push(Effect::RefundChange {
                to: self.intent.trader.clone(),
                asset: change,
                issuer: self.intent.src_issuer.clone(),
            });
        }
        effects.push(Effect::SnapshotDestBalance {
            account: self.intent.dest_receiver.clone(),
            issuer: self.intent.dest_issuer.clone(),
            symbol: self.intent.dest_symbol.clone(),
        });

        self.phase = Phase::RateSelected {
            reserve,
            rate: quote.rate,
            actual_src,
            actual_dest,
        };
        Ok(effects)
    }

    fn dispatch_settlement(&mut self, dest_before: Asset) -> Result<Vec<Effect>, NetworkError> {
        let Phase::RateSelected {
            reserve,
            rate,
            actual_src,
            actual_dest,
        } = self.phase.clone()
        else {
            return Err(NetworkError::PhaseOrder);
        };

        let effects = vec![
            Effect::TransferToReserve {
                reserve: reserve.clone(),
                asset: actual_src.clone(),
                issuer: self.intent.src_issuer.clone(),
                memo: self.intent.dest_receiver.as_str().to_string(),
            },
            Effect::SettleAtReserve {
                reserve: reserve.clone(),
                asset: actual_src.clone(),
                issuer: self.intent.src_issuer.clone(),
            },
            Effect::ReadDestBalance {
                account: self.intent.dest_receiver.clone(),
                issuer: self.intent.dest_issuer.clone(),
                symbol: self.intent.dest_symbol.clone(),
            },
        ];

        self.phase = Phase::SettlementSent {
            reserve,
            rate,
            actual_src,
            actual_dest,
            dest_before,
        };
        Ok(effects)
    }

    fn verify(&mut self, dest_after: Asset) -> Result<Vec<Effect>, NetworkError> {
        let Phase::SettlementSent {
            reserve,
            rate,
            actual_src,
            actual_dest,
            dest_before,
        } = self.phase.clone()
        else {
            return Err(NetworkError::PhaseOrder);
        };

        let difference = dest_after.checked_sub(&dest_before)?;
        if difference != actual_dest {
            return Err(NetworkError::DestAmountMismatch {
                expected: actual_dest,
                observed: difference,
            });
        }

        self.phase = Phase::Verified(TradeReceipt {
            trade_id: self.intent.trade_id,
            reserve,
            trader: self.intent.trader.clone(),
            src: actual_src,
            dest: actual_dest,
            receiver: self.intent.dest_receiver.clone(),
            rate,
        });
        Ok(Vec::new())
    }
}
