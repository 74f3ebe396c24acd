//! Trade memo parsing and formatting.

use crate::MemoError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use swapnet_types::{AccountId, Symbol};

/// Decoded trade intent memo.
///
/// Carries everything the trader communicates in the deposit memo: the
/// destination symbol (with its precision), who receives the proceeds,
/// and the worst conversion rate the trader will accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeMemo {
    pub dest_symbol: Symbol,
    pub dest_receiver: AccountId,
    pub min_conversion_rate: Decimal,
}

impl TradeMemo {
    /// Parse `"<precision> <SYM>,<receiver>,<min_rate>"`.
    pub fn parse(memo: &str) -> Result<Self, MemoError> {
        if memo.is_empty() {
            return Err(MemoError::Empty);
        }

        let fields: Vec<&str> = memo.split(',').collect();
        if fields.len() != 3 {
            return Err(MemoError::WrongFieldCount { got: fields.len() });
        }

        let (precision_str, code) =
            fields[0]
                .split_once(' ')
                .ok_or_else(|| MemoError::MalformedDestination {
                    field: fields[0].to_string(),
                })?;
        let precision: u8 =
            precision_str
                .parse()
                .map_err(|_| MemoError::InvalidPrecision {
                    value: precision_str.to_string(),
                })?;
        let dest_symbol = Symbol::new(code, precision)?;

        if fields[1].is_empty() {
            return Err(MemoError::MissingReceiver);
        }
        let dest_receiver = AccountId::from(fields[1]);

        let min_conversion_rate =
            Decimal::from_str(fields[2]).map_err(|_| MemoError::InvalidRate {
                value: fields[2].to_string(),
            })?;

        Ok(Self {
            dest_symbol,
            dest_receiver,
            min_conversion_rate,
        })
    }
}

impl fmt::Display for TradeMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {},{},{}",
            self.dest_symbol.precision(),
            self.dest_symbol.code(),
            self.dest_receiver,
            self.min_conversion_rate
        )
    }
}

/// Decode the phase-2 settlement memo: the receiver's name, non-empty.
pub fn parse_settlement_memo(memo: &str) -> Result<AccountId, MemoError> {
    if memo.is_empty() {
        return Err(MemoError::MissingReceiver);
    }
    Ok(AccountId::from(memo))
}
