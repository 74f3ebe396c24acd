//! Memo parsing errors with diagnostic context.

use thiserror::Error;

/// Failures while decoding a trade or settlement memo
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Trade deposits require a memo carrying the trade details
    #[error("needs a memo with transaction details")]
    Empty,

    /// Memo does not have the three comma-separated fields
    #[error("malformed memo: expected '<precision> <symbol>,<receiver>,<min_rate>', got {got} field(s)")]
    WrongFieldCount { got: usize },

    /// Destination field does not split into precision and symbol
    #[error("malformed destination '{field}': expected '<precision> <symbol>'")]
    MalformedDestination { field: String },

    /// Precision is not a valid integer
    #[error("invalid destination precision '{value}'")]
    InvalidPrecision { value: String },

    /// Symbol code fails validation
    #[error(transparent)]
    InvalidSymbol(#[from] swapnet_types::TypeError),

    /// Receiver field is empty
    #[error("memo names no destination receiver")]
    MissingReceiver,

    /// Minimum conversion rate is not a decimal number
    #[error("invalid minimum conversion rate '{value}'")]
    InvalidRate { value: String },
}
