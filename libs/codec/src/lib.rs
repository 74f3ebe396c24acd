//! # Swapnet Memo Codec
//!
//! Wire codec for the two memo formats the trade pipeline exchanges with
//! the outside world. Both formats are contracts with existing clients
//! and must round-trip bit-exact.
//!
//! - **Trade memo** (trader → network, attached to the deposit):
//!   `"<precision:int> <SYM>,<receiver>,<min_rate:decimal>"`, e.g.
//!   `"4 TOK,alice,1.05"`.
//! - **Settlement memo** (network → reserve, attached to the source
//!   transfer): the destination receiver's account name as a plain
//!   string.
//!
//! The minimum conversion rate is parsed as [`rust_decimal::Decimal`],
//! never binary floating point, so formatting a parsed memo reproduces
//! the input exactly.

pub mod error;
pub mod memo;

pub use error::MemoError;
pub use memo::{parse_settlement_memo, TradeMemo};
