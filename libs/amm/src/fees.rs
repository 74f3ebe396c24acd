//! Trading-fee computation.
//!
//! Fees are always denominated in the token leg of the trade. On a buy
//! the quoted token amount is already fee-reduced, so the fee is grossed
//! back up from the net amount; on a sell the fee comes straight off the
//! token input.

use crate::TradeSide;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use swapnet_types::{Asset, TypeError};

/// Fee owed on `token` (the trade's token leg) at `fee_percent`.
///
/// Buy: `token * fee / (100 - fee)`, the fee charged on top of the net
/// payout. Sell: `token * fee / 100`, the fee deducted from the input.
/// Truncates toward zero at the token's precision.
pub fn trade_fee(token: &Asset, fee_percent: Decimal, side: TradeSide) -> Result<Asset, TypeError> {
    let token_value = token.to_decimal();
    let fee_value = match side {
        TradeSide::Buy => token_value * fee_percent / (dec!(100) - fee_percent),
        TradeSide::Sell => token_value * fee_percent / dec!(100),
    };
    Asset::from_decimal(fee_value, token.symbol().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swapnet_types::Symbol;

    fn tok(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new("TOK", 4).unwrap())
    }

    #[test]
    fn buy_fee_grosses_up_from_net_amount() {
        // 110 TOK net at 0.25%: 110 * 0.25 / 99.75 = 0.27568... -> 0.2756
        let fee = trade_fee(&tok(110_0000), dec!(0.25), TradeSide::Buy).unwrap();
        assert_eq!(fee.amount(), 2_756);
    }

    #[test]
    fn sell_fee_is_straight_percentage() {
        // 110 TOK in at 0.25%: 0.275 TOK exactly
        let fee = trade_fee(&tok(110_0000), dec!(0.25), TradeSide::Sell).unwrap();
        assert_eq!(fee.amount(), 2_750);
    }

    #[test]
    fn zero_fee_percent_charges_nothing() {
        for side in [TradeSide::Buy, TradeSide::Sell] {
            let fee = trade_fee(&tok(110_0000), dec!(0), side).unwrap();
            assert_eq!(fee.amount(), 0);
        }
    }

    #[test]
    fn buy_fee_exceeds_sell_fee_for_same_leg() {
        let buy = trade_fee(&tok(110_0000), dec!(5), TradeSide::Buy).unwrap();
        let sell = trade_fee(&tok(110_0000), dec!(5), TradeSide::Sell).unwrap();
        assert!(buy.amount() > sell.amount());
    }
}
