//! Conversion-rate derivation along the exponential price curve.
//!
//! Every path that cannot produce a usable rate returns `None`: the
//! reserve abstains from quoting rather than failing the fan-out.

use crate::CurveParams;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use swapnet_types::{Asset, Symbol, TypeError};
use tracing::trace;

/// Direction of a trade from the reserve's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    /// Base asset in, token out.
    Buy,
    /// Token in, base asset out.
    Sell,
}

/// Instantaneous price `P(E) = p_min * e^(r*E)` in base units per token.
fn price_at(params: &CurveParams, base_inventory: Decimal) -> Option<Decimal> {
    let exponent = params.r.checked_mul(base_inventory)?;
    Some(params.p_min.checked_mul(exponent.checked_exp()?)?)
}

/// Token volume bought with `delta_e` of base asset.
fn tokens_for_base(params: &CurveParams, price: Decimal, delta_e: Decimal) -> Option<Decimal> {
    let decay = params.r.checked_mul(delta_e)?.checked_mul(dec!(-1))?.checked_exp()?;
    let numerator = dec!(1).checked_sub(decay)?;
    numerator.checked_div(params.r.checked_mul(price)?)
}

/// Base volume received for `delta_t` tokens.
fn base_for_tokens(params: &CurveParams, price: Decimal, delta_t: Decimal) -> Option<Decimal> {
    let inner = dec!(1).checked_add(params.r.checked_mul(price)?.checked_mul(delta_t)?)?;
    inner.checked_ln()?.checked_div(params.r)
}

fn reduce_fee(params: &CurveParams, value: Decimal) -> Decimal {
    (dec!(100) - params.fee_percent) * value / dec!(100)
}

/// Clamp a candidate rate to the per-direction bounds; out of bounds
/// means the reserve abstains.
fn validated(params: &CurveParams, rate: Decimal, side: TradeSide) -> Option<Decimal> {
    let (min_allowed, max_allowed) = match side {
        TradeSide::Buy => (params.min_buy_rate, params.max_buy_rate),
        TradeSide::Sell => (params.min_sell_rate, params.max_sell_rate),
    };
    if rate <= dec!(0) || rate < min_allowed || rate > max_allowed {
        trace!(%rate, %min_allowed, %max_allowed, "rate outside allowed bounds");
        return None;
    }
    Some(rate)
}

/// Compute the conversion rate for `src` against a reserve holding
/// `base_inventory` whole units of the base asset.
///
/// Returns `None` whenever the reserve should abstain: trade size over a
/// cap, rate outside the configured bounds, or curve arithmetic leaving
/// the representable range.
pub fn conversion_rate(
    params: &CurveParams,
    base_inventory: Decimal,
    side: TradeSide,
    src: &Asset,
) -> Option<Decimal> {
    let price = price_at(params, base_inventory)?;

    let rate = match side {
        TradeSide::Buy => {
            if src.to_decimal() > params.max_base_cap_buy.to_decimal() {
                trace!(src = %src, cap = %params.max_base_cap_buy, "buy exceeds base cap");
                return None;
            }
            let delta_e = src.to_decimal();
            if delta_e.is_zero() {
                reduce_fee(params, dec!(1).checked_div(price)?)
            } else {
                let delta_t = tokens_for_base(params, price, delta_e)?;
                reduce_fee(params, delta_t).checked_div(delta_e)?
            }
        }
        TradeSide::Sell => {
            let token_in = src.to_decimal();
            let delta_t = reduce_fee(params, token_in);
            if delta_t.is_zero() {
                reduce_fee(params, price)
            } else {
                let delta_e = base_for_tokens(params, price, delta_t)?;
                if delta_e > params.max_base_cap_sell.to_decimal() {
                    trace!(src = %src, cap = %params.max_base_cap_sell, "sell exceeds base cap");
                    return None;
                }
                delta_e.checked_div(token_in)?
            }
        }
    };

    validated(params, rate, side)
}

/// Destination amount for a source amount at a given rate, re-scaled
/// between the two symbols' precisions, truncating toward zero.
pub fn dest_amount(rate: Decimal, src: &Asset, dest_symbol: &Symbol) -> Result<Asset, TypeError> {
    let value = src
        .to_decimal()
        .checked_mul(rate)
        .ok_or_else(|| TypeError::AmountOverflow {
            symbol: dest_symbol.to_string(),
        })?;
    Asset::from_decimal(value, dest_symbol.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys() -> Symbol {
        Symbol::new("SYS", 4).unwrap()
    }

    fn tok() -> Symbol {
        Symbol::new("TOK", 4).unwrap()
    }

    fn params(fee_percent: Decimal) -> CurveParams {
        // P(0) = p_min = 0.05 base per token
        CurveParams::new(
            dec!(0.01),
            dec!(0.05),
            Asset::new(500_0000, sys()),
            Asset::new(500_0000, sys()),
            fee_percent,
            dec!(0.1),
            dec!(0.01),
        )
        .unwrap()
    }

    fn close(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn zero_quantity_buy_rate_is_inverse_spot_price() {
        let rate = conversion_rate(&params(dec!(0)), dec!(0), TradeSide::Buy, &Asset::zero(sys()))
            .unwrap();
        assert_eq!(rate, dec!(20));
    }

    #[test]
    fn buy_rate_declines_with_trade_size() {
        // delta_t = (1 - e^-1) / (0.01 * 0.05) = 1264.24..., rate = 12.6424...
        let p = params(dec!(0));
        let rate =
            conversion_rate(&p, dec!(0), TradeSide::Buy, &Asset::new(100_0000, sys())).unwrap();
        assert!(close(rate, dec!(12.6424), dec!(0.001)));

        let small =
            conversion_rate(&p, dec!(0), TradeSide::Buy, &Asset::new(1_0000, sys())).unwrap();
        assert!(small > rate);
        assert!(small < dec!(20));
    }

    #[test]
    fn sell_rate_matches_curve_integral() {
        // delta_e = ln(1 + 0.0005 * 1000) / 0.01 = 40.5465..., rate = 0.0405465...
        let rate = conversion_rate(
            &params(dec!(0)),
            dec!(0),
            TradeSide::Sell,
            &Asset::new(1000_0000, tok()),
        )
        .unwrap();
        assert!(close(rate, dec!(0.0405465), dec!(0.00001)));
    }

    #[test]
    fn fee_reduces_the_quoted_rate() {
        let gross =
            conversion_rate(&params(dec!(0)), dec!(0), TradeSide::Buy, &Asset::new(100_0000, sys()))
                .unwrap();
        let net =
            conversion_rate(&params(dec!(10)), dec!(0), TradeSide::Buy, &Asset::new(100_0000, sys()))
                .unwrap();
        assert!(close(net, gross * dec!(0.9), dec!(0.0001)));
    }

    #[test]
    fn buy_above_cap_abstains() {
        // cap is 500.0000 SYS
        assert!(conversion_rate(
            &params(dec!(0)),
            dec!(0),
            TradeSide::Buy,
            &Asset::new(501_0000, sys()),
        )
        .is_none());
    }

    #[test]
    fn sell_with_base_payout_above_cap_abstains() {
        let mut p = params(dec!(0));
        p.max_base_cap_sell = Asset::new(30_0000, sys());
        // payout would be ~40.5 SYS > 30 cap
        assert!(conversion_rate(&p, dec!(0), TradeSide::Sell, &Asset::new(1000_0000, tok())).is_none());
    }

    #[test]
    fn rate_outside_bounds_abstains() {
        let mut p = params(dec!(0));
        // Narrow the buy window above the achievable ~12.64 rate
        p.min_buy_rate = dec!(15);
        assert!(
            conversion_rate(&p, dec!(0), TradeSide::Buy, &Asset::new(100_0000, sys())).is_none()
        );
    }

    #[test]
    fn dest_amount_rescales_between_precisions() {
        let src = Asset::new(100_0000, sys()); // 100.0000 SYS
        let dest = dest_amount(dec!(1.1), &src, &tok()).unwrap();
        assert_eq!(dest, Asset::new(110_0000, tok()));

        let coarse = Symbol::new("CTOK", 2).unwrap();
        let dest = dest_amount(dec!(1.1), &src, &coarse).unwrap();
        assert_eq!(dest.amount(), 11_000); // 110.00 CTOK

        // truncation toward zero at the destination precision
        let dest = dest_amount(dec!(0.333333333), &src, &tok()).unwrap();
        assert_eq!(dest.amount(), 33_3333); // 33.3333 TOK
    }
}
