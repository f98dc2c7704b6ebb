//! Fixed-point wire values: an integer mantissa plus a decimal exponent.
//!
//! The backend never sends prices or sizes as floats. Every quantity arrives as
//! `raw_<field>` + `<field>_decimals`, meaning `raw * 10^-decimals`. Conversion to
//! `f64` rounds exactly once, at the very end.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::error::DecodeError;

/// Largest decimal exponent accepted (the scale limit of `rust_decimal`).
pub const MAX_DECIMALS: u32 = 28;

/// Powers of ten that are exactly representable as `f64`.
const EXACT_POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
    1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Mantissas up to 2^53 convert to `f64` without rounding.
const MAX_EXACT_MANTISSA: u64 = 1 << 53;

/// A validated `mantissa * 10^-decimals` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointValue {
    mantissa: i64,
    decimals: u32,
}

impl FixedPointValue {
    /// Validate a raw wire pair. `field` names the quantity for error messages.
    pub fn from_wire(
        field: &'static str,
        mantissa: i64,
        decimals: i64,
    ) -> Result<Self, DecodeError> {
        if decimals < 0 {
            return Err(DecodeError::NegativeDecimals { field, decimals });
        }
        if decimals > MAX_DECIMALS as i64 {
            return Err(DecodeError::DecimalsOutOfRange { field, decimals });
        }
        Ok(Self {
            mantissa,
            decimals: decimals as u32,
        })
    }

    pub fn mantissa(&self) -> i64 {
        self.mantissa
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Exact decimal representation.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.mantissa, self.decimals)
    }

    /// Nearest `f64` to the exact value.
    pub fn to_f64(&self) -> f64 {
        let d = self.decimals as usize;
        if d < EXACT_POW10.len() && self.mantissa.unsigned_abs() <= MAX_EXACT_MANTISSA {
            // Both operands are exact, so IEEE division rounds once.
            return self.mantissa as f64 / EXACT_POW10[d];
        }

        // Outside the exact range: let the float parser do the single rounding.
        let decimal = self.to_decimal();
        decimal
            .to_string()
            .parse::<f64>()
            .unwrap_or_else(|_| decimal.to_f64().unwrap_or_default())
    }
}

/// Decode `mantissa * 10^-decimals` into an `f64`.
///
/// Fails with [`DecodeError`] when `decimals` is negative or above [`MAX_DECIMALS`]
/// instead of producing infinity or NaN.
pub fn decode_fixed_point(
    field: &'static str,
    mantissa: i64,
    decimals: i64,
) -> Result<f64, DecodeError> {
    Ok(FixedPointValue::from_wire(field, mantissa, decimals)?.to_f64())
}
