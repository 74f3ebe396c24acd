//! # Swapnet AMM Library: Pricing and Fee Engine
//!
//! ## Purpose
//!
//! Pure mathematical core for reserve pricing: the exponential price
//! curve, buy/sell conversion rates with fee reduction, rate-bound
//! clamping, trade-size caps, precision-safe destination-amount scaling,
//! and the fee bookkeeping formulas. No I/O: every function is a pure
//! function of curve parameters and supplied liquidity.
//!
//! ## Pricing model
//!
//! The reserve prices one token against the base asset along
//! `P(E) = p_min * e^(r*E)` where `E` is the reserve's base-asset
//! inventory in whole units. Buying token with `ΔE` of base yields
//! `ΔT = (1 - e^(-r*ΔE)) / (r * P(E))` tokens; selling `ΔT` tokens
//! yields `ΔE = ln(1 + r * P(E) * ΔT) / r` of base. Quoted rates are
//! reduced by the configured fee and clamped to per-direction bounds;
//! any violation of a bound or cap makes the reserve abstain (`None`),
//! never error.
//!
//! ## Precision
//!
//! All arithmetic is `rust_decimal::Decimal` (28 significant digits,
//! `maths` feature for `exp`/`ln`); conversions back to scaled integer
//! amounts truncate toward zero. Binary floating point is never used.

pub mod curve;
pub mod fees;
pub mod params;
pub mod quote;

pub use curve::{conversion_rate, dest_amount, TradeSide};
pub use fees::trade_fee;
pub use params::{CurveParams, ParamsError};
pub use quote::RateQuote;

pub use rust_decimal::Decimal;
