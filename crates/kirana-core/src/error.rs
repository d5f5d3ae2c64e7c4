//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kirana-core errors (this file)                                        │
//! │  ├── CoreError        - Bookkeeping rule violations                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kirana-db errors (separate crate)                                     │
//! │  └── DbError          - Store failures, wraps CoreError                │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → terminal     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sale that references an item with no stock entry is not an error here:
//! the ledger heals it and reports [`crate::StockOutcome::Created`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core bookkeeping errors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Catalog item cannot be found.
    #[error("Item not found: {0}")]
    ItemNotFound(u64),

    /// Bill cannot be found in the archive.
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Cart has no line for this item.
    #[error("Item {0} is not in the cart")]
    NotInCart(u64),

    /// Bill line for this item does not exist on the bill being edited.
    #[error("Bill {bill_number} has no line for item {item_id}")]
    LineNotFound { bill_number: String, item_id: u64 },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A bill with this number is already archived.
    #[error("Bill {0} already exists")]
    DuplicateBill(String),

    /// Subtraction would take stock below zero under the reject policy.
    ///
    /// ## When This Occurs
    /// Only with [`crate::OversellPolicy::Reject`]. The default clamp policy
    /// floors at zero instead.
    #[error("Insufficient stock for {item_name}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: u64,
        item_name: String,
        available: f64,
        requested: f64,
    },

    /// A persisted bill cannot be normalized: neither its date nor its
    /// timestamp parse.
    #[error("Bill {bill_number} is corrupt: {reason}")]
    CorruptBill { bill_number: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any mutation; nothing is changed when one is returned.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value is not a finite number.
    #[error("{field} must be a number")]
    NotANumber { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., bad date, unknown stock operation).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn not_a_number(field: &str) -> Self {
        ValidationError::NotANumber {
            field: field.to_string(),
        }
    }

    pub(crate) fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub(crate) fn negative(field: &str) -> Self {
        ValidationError::Negative {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            item_id: 3,
            item_name: "ELLACHI".to_string(),
            available: 2.5,
            requested: 4.0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for ELLACHI: available 2.5, requested 4"
        );

        let err = CoreError::BillNotFound("BILL-004".to_string());
        assert_eq!(err.to_string(), "Bill not found: BILL-004");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");
        assert_eq!(
            ValidationError::negative("storeRate").to_string(),
            "storeRate cannot be negative"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::not_a_number("quantity").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
