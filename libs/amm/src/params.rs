//! Curve parameter validation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use swapnet_types::Asset;
use thiserror::Error;

/// Invalid curve parameter combinations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("illegal fee_percent {fee_percent}: must be in [0, 100)")]
    IllegalFeePercent { fee_percent: Decimal },

    #[error("min_sell_rate not smaller than max_sell_rate")]
    SellBoundsInverted,

    #[error("curve steepness r must be positive")]
    NonPositiveSteepness,

    #[error("minimum price p_min must be positive")]
    NonPositiveMinimumPrice,

    #[error("sell rate bounds must be positive")]
    NonPositiveSellBounds,
}

/// Pricing-curve parameters for one reserve.
///
/// Buy-rate bounds are the reciprocals of the sell-rate bounds and are
/// derived here rather than supplied, so the two directions can never
/// drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    pub r: Decimal,
    pub p_min: Decimal,
    pub max_base_cap_buy: Asset,
    pub max_base_cap_sell: Asset,
    pub fee_percent: Decimal,
    pub max_buy_rate: Decimal,
    pub min_buy_rate: Decimal,
    pub max_sell_rate: Decimal,
    pub min_sell_rate: Decimal,
}

impl CurveParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r: Decimal,
        p_min: Decimal,
        max_base_cap_buy: Asset,
        max_base_cap_sell: Asset,
        fee_percent: Decimal,
        max_sell_rate: Decimal,
        min_sell_rate: Decimal,
    ) -> Result<Self, ParamsError> {
        if fee_percent < dec!(0) || fee_percent >= dec!(100) {
            return Err(ParamsError::IllegalFeePercent { fee_percent });
        }
        if min_sell_rate >= max_sell_rate {
            return Err(ParamsError::SellBoundsInverted);
        }
        if r <= dec!(0) {
            return Err(ParamsError::NonPositiveSteepness);
        }
        if p_min <= dec!(0) {
            return Err(ParamsError::NonPositiveMinimumPrice);
        }
        if min_sell_rate <= dec!(0) {
            return Err(ParamsError::NonPositiveSellBounds);
        }

        Ok(Self {
            r,
            p_min,
            max_base_cap_buy,
            max_base_cap_sell,
            fee_percent,
            max_buy_rate: dec!(1) / min_sell_rate,
            min_buy_rate: dec!(1) / max_sell_rate,
            max_sell_rate,
            min_sell_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swapnet_types::Symbol;

    fn base_cap(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new("SYS", 4).unwrap())
    }

    fn params(fee: Decimal, max_sell: Decimal, min_sell: Decimal) -> Result<CurveParams, ParamsError> {
        CurveParams::new(
            dec!(0.01),
            dec!(0.05),
            base_cap(1_000_0000),
            base_cap(1_000_0000),
            fee,
            max_sell,
            min_sell,
        )
    }

    #[test]
    fn derives_buy_bounds_as_reciprocals() {
        let p = params(dec!(0.25), dec!(0.1), dec!(0.05)).unwrap();
        assert_eq!(p.max_buy_rate, dec!(20));
        assert_eq!(p.min_buy_rate, dec!(10));
    }

    #[test]
    fn rejects_illegal_fee() {
        assert!(matches!(
            params(dec!(100), dec!(0.1), dec!(0.05)),
            Err(ParamsError::IllegalFeePercent { .. })
        ));
        assert!(matches!(
            params(dec!(-1), dec!(0.1), dec!(0.05)),
            Err(ParamsError::IllegalFeePercent { .. })
        ));
        assert!(params(dec!(0), dec!(0.1), dec!(0.05)).is_ok());
    }

    #[test]
    fn rejects_inverted_sell_bounds() {
        assert_eq!(
            params(dec!(0.25), dec!(0.05), dec!(0.1)),
            Err(ParamsError::SellBoundsInverted)
        );
        assert_eq!(
            params(dec!(0.25), dec!(0.05), dec!(0.05)),
            Err(ParamsError::SellBoundsInverted)
        );
    }
}
