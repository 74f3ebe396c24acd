//! # Swapnet Types Library
//!
//! Core value types shared by every swapnet crate.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: all financial values are stored as scaled
//!   integers (`i64` amount + decimal precision on the symbol). Binary
//!   floating point never touches an amount.
//! - **Explicit Conversions**: crossing between scaled integers and
//!   `rust_decimal::Decimal` happens only at named conversion points
//!   ([`Asset::to_decimal`] / [`Asset::from_decimal`]), which truncate
//!   toward zero by policy.
//! - **Type Safety**: a [`Symbol`] carries its precision, so two assets
//!   with the same code but different precisions can never be mixed
//!   silently.
//!
//! ```rust
//! use swapnet_types::{Asset, Symbol};
//!
//! let tok = Symbol::new("TOK", 4).unwrap();
//! let amount = Asset::new(1_100_000, tok); // 110.0000 TOK
//! assert_eq!(amount.to_string(), "110.0000 TOK");
//! ```

pub mod account;
pub mod asset;
pub mod error;
pub mod symbol;

pub use account::AccountId;
pub use asset::Asset;
pub use error::TypeError;
pub use symbol::Symbol;
