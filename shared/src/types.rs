//! Common value types and fixed-precision arithmetic
//!
//! Every weight and monetary amount in the platform is a `rust_decimal`
//! value; binary floating point is never used for mass or money. The
//! helpers here fix the rounding rules once so repeated accumulation
//! cannot drift.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency code applied to all monetary amounts
pub const DEFAULT_CURRENCY: &str = "MAD";

/// Measurement unit applied to item quantities when none is given
pub const DEFAULT_UNIT: &str = "kg";

/// Decimal places kept on monetary amounts
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept on weights
pub const WEIGHT_SCALE: u32 = 2;

/// Decimal places kept on a ratio before scaling it to a percentage
pub const RATE_SCALE: u32 = 4;

/// Round a monetary amount to 2 decimal places, half-up
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a weight to 2 decimal places, half-up
pub fn round_weight(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(WEIGHT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Amount of a line at a unit price, rounded as money
pub fn line_amount(quantity: Decimal, unit_price: Decimal) -> Decimal {
    round_money(quantity * unit_price)
}

/// Share of `part` in `whole`, expressed as a percentage.
///
/// The ratio is rounded half-up to [`RATE_SCALE`] decimal places before
/// being scaled to a percentage. Returns zero when `whole` is zero or
/// negative, so callers never divide by zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (part / whole).round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED
}
