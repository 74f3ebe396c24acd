//! Token symbols with attached decimal precision.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum supported decimal precision for any symbol.
pub const MAX_PRECISION: u8 = 18;

/// A token symbol: short uppercase code plus decimal precision.
///
/// Precision travels with the symbol so that amount scaling is never
/// ambiguous. `"4,TOK"` in the wire-adjacent display form means TOK with
/// four decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    code: String,
    precision: u8,
}

impl Symbol {
    pub fn new(code: impl Into<String>, precision: u8) -> Result<Self, TypeError> {
        let code = code.into();
        if code.is_empty() || code.len() > 7 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(TypeError::InvalidSymbolCode { code });
        }
        if precision > MAX_PRECISION {
            return Err(TypeError::InvalidPrecision {
                precision,
                max: MAX_PRECISION,
            });
        }
        Ok(Self { code, precision })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Scale factor between whole units and smallest units (10^precision).
    pub fn scale(&self) -> i64 {
        10i64.pow(self.precision as u32)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}
