//! # Error Types
//!
//! Domain-specific error types for shopkeep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopkeep-core errors (this file)                                       │
//! │  ├── CartError        - Cart operation rejections                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopkeep-session errors (separate crate)                              │
//! │  └── SessionError     - Persistence / header-sync failures             │
//! │                                                                         │
//! │  shopkeep-api errors (separate crate)                                  │
//! │  └── ApiError         - Backend request failures                       │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → ApiError → UI toast               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, stock counts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Cart rejections are synchronous return values the UI can branch on

use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart operation rejections.
///
/// Every rejection leaves the cart untouched. Callers show a warning and
/// move on; these are expected outcomes, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Attempted to add a product with zero available stock.
    ///
    /// A line item is never created with quantity 0, so a zero-stock
    /// product cannot enter the cart at all.
    #[error("'{name}' is out of stock")]
    OutOfStock { product_id: String, name: String },

    /// Requested quantity would exceed the stock snapshot taken when the
    /// product was added.
    #[error("quantity {requested} exceeds available stock ({max_stock})")]
    StockExceeded {
        product_id: String,
        requested: i64,
        max_stock: i64,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before a request is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email address).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_messages() {
        let err = CartError::StockExceeded {
            product_id: "p1".to_string(),
            requested: 5,
            max_stock: 2,
        };
        assert_eq!(err.to_string(), "quantity 5 exceeds available stock (2)");

        let err = CartError::OutOfStock {
            product_id: "p2".to_string(),
            name: "Widget".to_string(),
        };
        assert_eq!(err.to_string(), "'Widget' is out of stock");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer".to_string(),
        };
        assert_eq!(err.to_string(), "customer is required");

        let err = ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "missing '@'".to_string(),
        };
        assert_eq!(err.to_string(), "email has invalid format: missing '@'");
    }
}
