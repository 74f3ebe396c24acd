//! Error types for value validation and scaled-integer arithmetic.

use thiserror::Error;

/// Validation and arithmetic failures on core value types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Symbol code is empty, too long, or contains non-uppercase characters
    #[error("invalid symbol code '{code}': expected 1-7 uppercase A-Z characters")]
    InvalidSymbolCode { code: String },

    /// Symbol precision exceeds the supported maximum
    #[error("invalid symbol precision {precision}: maximum is {max}")]
    InvalidPrecision { precision: u8, max: u8 },

    /// Arithmetic between assets of different symbols or precisions
    #[error("symbol mismatch: {left} vs {right}")]
    SymbolMismatch { left: String, right: String },

    /// Scaled-integer amount would overflow i64
    #[error("amount overflow for symbol {symbol}")]
    AmountOverflow { symbol: String },

    /// Decimal value cannot be represented as a scaled i64 amount
    #[error("value {value} is not representable at precision {precision}")]
    Unrepresentable { value: String, precision: u8 },
}
