//! Scaled-integer asset amounts.
//!
//! An [`Asset`] is an `i64` amount in the symbol's smallest unit, e.g.
//! `Asset::new(1_000_000, tok4)` is `100.0000 TOK`. All arithmetic is
//! checked; conversion to and from `Decimal` is the only sanctioned way
//! to apply a rate, and conversion back always truncates toward zero.

use crate::{Symbol, TypeError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    amount: i64,
    symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    fn require_same_symbol(&self, other: &Asset) -> Result<(), TypeError> {
        if self.symbol != other.symbol {
            return Err(TypeError::SymbolMismatch {
                left: self.symbol.to_string(),
                right: other.symbol.to_string(),
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Asset) -> Result<Asset, TypeError> {
        self.require_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| TypeError::AmountOverflow {
                symbol: self.symbol.to_string(),
            })?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Asset) -> Result<Asset, TypeError> {
        self.require_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| TypeError::AmountOverflow {
                symbol: self.symbol.to_string(),
            })?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    /// Exact value in whole units as a `Decimal`.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount, self.symbol.precision() as u32)
    }

    /// Scale a `Decimal` of whole units back into an asset, truncating
    /// toward zero at the symbol's precision.
    pub fn from_decimal(value: Decimal, symbol: Symbol) -> Result<Asset, TypeError> {
        let scaled = value
            .checked_mul(Decimal::from(symbol.scale()))
            .ok_or_else(|| TypeError::AmountOverflow {
                symbol: symbol.to_string(),
            })?
            .trunc();
        let amount = scaled.to_i64().ok_or_else(|| TypeError::Unrepresentable {
            value: value.to_string(),
            precision: symbol.precision(),
        })?;
        Ok(Asset::new(amount, symbol))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.symbol.scale();
        let sign = if self.amount < 0 { "-" } else { "" };
        let magnitude = self.amount.unsigned_abs();
        let whole = magnitude / scale as u64;
        let fractional = magnitude % scale as u64;
        if self.symbol.precision() == 0 {
            write!(f, "{}{} {}", sign, whole, self.symbol.code())
        } else {
            write!(
                f,
                "{}{}.{:0width$} {}",
                sign,
                whole,
                fractional,
                self.symbol.code(),
                width = self.symbol.precision() as usize
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tok() -> Symbol {
        Symbol::new("TOK", 4).unwrap()
    }

    #[test]
    fn displays_with_fixed_precision() {
        assert_eq!(Asset::new(1_100_000, tok()).to_string(), "110.0000 TOK");
        assert_eq!(Asset::new(5, tok()).to_string(), "0.0005 TOK");
        assert_eq!(Asset::new(-25_000, tok()).to_string(), "-2.5000 TOK");
    }

    #[test]
    fn checked_arithmetic_requires_same_symbol() {
        let sys = Symbol::new("SYS", 4).unwrap();
        let a = Asset::new(100, tok());
        let b = Asset::new(50, sys);
        assert!(matches!(
            a.checked_add(&b),
            Err(TypeError::SymbolMismatch { .. })
        ));

        let c = Asset::new(50, tok());
        assert_eq!(a.checked_sub(&c).unwrap().amount(), 50);
        assert_eq!(a.checked_add(&c).unwrap().amount(), 150);
    }

    #[test]
    fn add_overflow_is_caught() {
        let a = Asset::new(i64::MAX, tok());
        let b = Asset::new(1, tok());
        assert!(matches!(
            a.checked_add(&b),
            Err(TypeError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn decimal_round_trip_truncates_toward_zero() {
        let asset = Asset::new(1_234_567, tok());
        assert_eq!(asset.to_decimal(), dec!(123.4567));

        // 0.00009 is below one smallest unit at precision 4: truncated away
        let truncated = Asset::from_decimal(dec!(123.45679), tok()).unwrap();
        assert_eq!(truncated.amount(), 1_234_567);

        let negative = Asset::from_decimal(dec!(-1.99999), tok()).unwrap();
        assert_eq!(negative.amount(), -19_999);
    }
}
