use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of the minor-unit / decimal conversion boundary.
///
/// Money conversion never rounds: anything that cannot be represented
/// exactly is an error, and the caller decides whether that drops a
/// transaction or aborts a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is not a base-10 digit string: {value:?}")]
    InvalidDigits { value: String },

    #[error("amount does not fit the supported numeric range")]
    OutOfRange,

    #[error("negative amount {value} is not representable in minor units")]
    Negative { value: Decimal },

    #[error("amount {value} has more fractional digits than scale {scale} allows")]
    PrecisionLoss { value: Decimal, scale: u32 },

    #[error("scale {scale} exceeds the supported maximum")]
    ScaleTooLarge { scale: u32 },
}
