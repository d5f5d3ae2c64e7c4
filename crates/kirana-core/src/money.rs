//! # Money Module
//!
//! Rounding and display helpers for the store's decimal amounts.
//!
//! ## Why a Nudged Round?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Rates and quantities arrive as binary floats:                          │
//! │    10.005 is stored as 10.00499999999999989...                          │
//! │    10.005 × 100 = 1000.4999999999999  → naive round gives 10.00 ❌      │
//! │                                                                         │
//! │  OUR SOLUTION: scale, nudge by a few ULPs, round half away from zero    │
//! │    1000.4999999999999 + 1.8e-12 = 1000.5000000000017 → 10.01 ✅         │
//! │                                                                         │
//! │  The nudge scales with the magnitude, so it only ever decides ties      │
//! │  that were lost to representation error.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::money::{format_currency, format_quantity, round2};
//!
//! assert_eq!(round2(1.005), 1.01);
//! assert_eq!(round2(f64::NAN), 0.0);
//! assert_eq!(format_currency(1234.5), "₹1234.50");
//! assert_eq!(format_quantity(0.5, "KG"), "1/2 KG");
//! ```

// =============================================================================
// Constants
// =============================================================================

/// Currency glyph used by [`format_currency`].
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Relative nudge applied before rounding, in units of the scaled value.
const ROUNDING_NUDGE: f64 = f64::EPSILON * 8.0;

// =============================================================================
// Normalization
// =============================================================================

/// Coerces a value to a finite number. NaN and infinities become zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Rounds an amount to two decimal places.
///
/// ## Rules
/// - Non-finite input (NaN, ±∞) is coerced to `0`
/// - Ties round away from zero after a magnitude-relative nudge, so values
///   like `1.005` and `10.005` round up as written
/// - Never returns negative zero
///
/// ## Example
/// ```rust
/// use kirana_core::money::round2;
///
/// assert_eq!(round2(10.005), 10.01);
/// assert_eq!(round2(-2.675), -2.68);
/// assert_eq!(round2(0.1 + 0.2), 0.3);
/// ```
pub fn round2(value: f64) -> f64 {
    let value = finite_or_zero(value);
    let scaled = value * 100.0;
    let magnitude = scaled.abs();
    let nudged = magnitude + magnitude.max(1.0) * ROUNDING_NUDGE;
    let rounded = nudged.round().copysign(scaled) / 100.0;

    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Sums values and rounds the result once.
pub fn sum_round2<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    round2(values.into_iter().map(finite_or_zero).sum())
}

// =============================================================================
// Display
// =============================================================================

/// Formats an amount with the default currency glyph and two decimals.
///
/// ## Example
/// ```rust
/// use kirana_core::money::format_currency;
///
/// assert_eq!(format_currency(1200.0), "₹1200.00");
/// assert_eq!(format_currency(-5.5), "-₹5.50");
/// ```
pub fn format_currency(amount: f64) -> String {
    format_currency_with(amount, DEFAULT_CURRENCY_SYMBOL)
}

/// Formats an amount with a caller-supplied currency glyph.
pub fn format_currency_with(amount: f64, symbol: &str) -> String {
    let amount = round2(amount);
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{:.2}", sign, symbol, amount.abs())
}

/// Formats a quantity for display, followed by its unit.
///
/// ## Rules
/// - `0.25`, `0.5`, `0.75` render as `1/4`, `1/2`, `3/4`
/// - Whole numbers render without decimals
/// - Anything else renders with up to three decimals, trailing zeros stripped
///
/// An empty unit renders the number alone.
pub fn format_quantity(quantity: f64, unit: &str) -> String {
    let quantity = finite_or_zero(quantity);

    let number = if quantity == 0.25 {
        "1/4".to_string()
    } else if quantity == 0.5 {
        "1/2".to_string()
    } else if quantity == 0.75 {
        "3/4".to_string()
    } else if quantity == 0.0 {
        "0".to_string()
    } else if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        let fixed = format!("{:.3}", quantity);
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    };

    let unit = unit.trim();
    if unit.is_empty() {
        number
    } else {
        format!("{} {}", number, unit)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
