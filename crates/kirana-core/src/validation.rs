//! # Validation Module
//!
//! Input checks for Kirana. Every mutating operation runs these first and
//! touches nothing when one fails.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator input (CLI flag, JSON field)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clap / serde: type parsing                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  THIS MODULE: business rules                                            │
//! │  ├── name empty?            → Required                                 │
//! │  ├── NaN / infinite?        → NotANumber                               │
//! │  ├── rate or amount < 0?    → Negative                                 │
//! │  ├── quantity ≤ 0?          → MustBePositive                           │
//! │  └── date not DD-MM-YYYY?   → InvalidFormat                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Catalog / StockLedger / Cart / Reconciler mutation                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::validation::{validate_item_name, validate_stock_amount};
//!
//! validate_item_name("PALM.OIL(1KG) BOX").unwrap();
//! assert!(validate_stock_amount(-1.0).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{bill_date, ItemDraft};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Format of calendar dates given to report ranges.
pub const RANGE_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Item Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty after trimming
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }

    Ok(())
}

/// Validates a store or purchase rate.
///
/// ## Rules
/// - Must be a finite number
/// - Zero is allowed (free or unpriced items in the starter catalog)
///
/// ## Example
/// ```rust
/// use kirana_core::validation::validate_rate;
///
/// assert!(validate_rate("storeRate", 1200.0).is_ok());
/// assert!(validate_rate("storeRate", 0.0).is_ok());
/// assert!(validate_rate("purchaseRate", -1.0).is_err());
/// ```
pub fn validate_rate(field: &str, rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() {
        return Err(ValidationError::not_a_number(field));
    }

    if rate < 0.0 {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

/// Validates a complete item draft.
pub fn validate_item_draft(draft: &ItemDraft) -> ValidationResult<()> {
    validate_item_name(&draft.name)?;
    validate_rate("storeRate", draft.store_rate)?;
    validate_rate("purchaseRate", draft.purchase_rate)?;
    Ok(())
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates a sale quantity.
///
/// ## Rules
/// - Must be a finite number
/// - Must be positive (> 0); fractional quantities are fine (0.25 KG)
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::not_a_number("quantity"));
    }

    if quantity <= 0.0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    Ok(())
}

/// Validates a signed quantity change. Only finiteness is required.
pub fn validate_quantity_delta(delta: f64) -> ValidationResult<()> {
    if !delta.is_finite() {
        return Err(ValidationError::not_a_number("quantity"));
    }

    Ok(())
}

/// Validates the amount of a stock operation.
///
/// ## Rules
/// - Must be a finite number
/// - Must be zero or more
pub fn validate_stock_amount(amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::not_a_number("amount"));
    }

    if amount < 0.0 {
        return Err(ValidationError::negative("amount"));
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a bill date written as `DD-MM-YYYY`.
///
/// ## Example
/// ```rust
/// use kirana_core::validation::parse_bill_date;
///
/// assert!(parse_bill_date("15-03-2024").is_ok());
/// assert!(parse_bill_date("2024-03-15").is_err());
/// ```
pub fn parse_bill_date(value: &str) -> ValidationResult<NaiveDate> {
    bill_date::parse(value)
        .ok_or_else(|| ValidationError::invalid_format("date", "expected DD-MM-YYYY"))
}

/// Parses a report range bound written as `YYYY-MM-DD`.
pub fn parse_range_date(value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), RANGE_DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_format("date", "expected YYYY-MM-DD"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("VELLEM").is_ok());
        assert_eq!(
            validate_item_name("   "),
            Err(ValidationError::required("name"))
        );
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("storeRate", 0.0).is_ok());
        assert!(validate_rate("storeRate", 99.5).is_ok());
        assert_eq!(
            validate_rate("storeRate", -0.01),
            Err(ValidationError::negative("storeRate"))
        );
        assert_eq!(
            validate_rate("purchaseRate", f64::NAN),
            Err(ValidationError::not_a_number("purchaseRate"))
        );
    }

    #[test]
    fn test_validate_item_draft() {
        assert!(validate_item_draft(&ItemDraft::new("KRAMBU", "KG", 1200.0, 850.0)).is_ok());
        assert!(validate_item_draft(&ItemDraft::new("", "KG", 1.0, 1.0)).is_err());
        assert!(validate_item_draft(&ItemDraft::new("KRAMBU", "KG", 1.0, -1.0)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0.25).is_ok());
        assert!(validate_quantity(3.0).is_ok());
        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
        assert!(validate_quantity_delta(-2.0).is_ok());
        assert!(validate_quantity_delta(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_stock_amount() {
        assert!(validate_stock_amount(0.0).is_ok());
        assert!(validate_stock_amount(12.5).is_ok());
        assert!(validate_stock_amount(-3.0).is_err());
        assert!(validate_stock_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(
            parse_bill_date("01-04-2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
        assert!(parse_bill_date("31-02-2024").is_err());
        assert_eq!(
            parse_range_date("2024-03-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert!(parse_range_date("31-03-2024").is_err());
    }
}
