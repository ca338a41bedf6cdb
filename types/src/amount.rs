//! Minor-unit amounts and the decimal conversion boundary.
//!
//! The engine does all of its arithmetic and comparisons in the ledger's
//! integer minor-unit domain (NQT, QNT, raw currency units) and converts to
//! decimal exactly once, at the persistence boundary. Conversion never
//! rounds in either direction.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmountError;

/// Largest scale the decimal boundary can represent.
pub const MAX_SCALE: u32 = 28;

/// An amount in ledger minor units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NativeAmount(u128);

impl NativeAmount {
    pub const ZERO: NativeAmount = NativeAmount(0);

    pub const fn new(units: u128) -> Self {
        NativeAmount(units)
    }

    pub const fn units(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: NativeAmount) -> Option<NativeAmount> {
        self.0.checked_add(rhs.0).map(NativeAmount)
    }

    pub fn checked_sub(self, rhs: NativeAmount) -> Option<NativeAmount> {
        self.0.checked_sub(rhs.0).map(NativeAmount)
    }

    pub fn saturating_sub(self, rhs: NativeAmount) -> NativeAmount {
        NativeAmount(self.0.saturating_sub(rhs.0))
    }

    /// Parses a ledger-native amount field, which NXT nodes report as an
    /// unsigned base-10 digit string.
    pub fn parse(raw: &str) -> Result<NativeAmount, AmountError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::InvalidDigits {
                value: raw.to_string(),
            });
        }
        trimmed
            .parse::<u128>()
            .map(NativeAmount)
            .map_err(|_| AmountError::OutOfRange)
    }

    /// Converts minor units to a decimal amount at the given scale.
    pub fn to_decimal(self, scale: u32) -> Result<Decimal, AmountError> {
        if scale > MAX_SCALE {
            return Err(AmountError::ScaleTooLarge { scale });
        }
        let mantissa = i128::try_from(self.0).map_err(|_| AmountError::OutOfRange)?;
        Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|_| AmountError::OutOfRange)
    }

    /// Converts a decimal amount back to minor units at the given scale.
    ///
    /// Fails on negative values, on fractional parts finer than the scale,
    /// and on magnitudes the decimal type cannot hold at that scale.
    pub fn from_decimal(value: Decimal, scale: u32) -> Result<NativeAmount, AmountError> {
        if scale > MAX_SCALE {
            return Err(AmountError::ScaleTooLarge { scale });
        }
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative { value });
        }
        let mut scaled = value;
        scaled.rescale(scale);
        // rescale rounds when digits are lost and caps the scale on overflow;
        // both outcomes are rejected here.
        if scaled.scale() != scale || scaled != value {
            return Err(AmountError::PrecisionLoss { value, scale });
        }
        u128::try_from(scaled.mantissa())
            .map(NativeAmount)
            .map_err(|_| AmountError::OutOfRange)
    }
}

impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
