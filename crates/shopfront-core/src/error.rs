//! # Error Types
//!
//! Domain-specific error types for shopfront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopfront-core errors (this file)                                     │
//! │  ├── DomainError      - Expected business failures                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopfront-db errors (separate crate)                                  │
//! │  └── StoreError       - Persistence failures, wraps DomainError        │
//! │                                                                         │
//! │  Flow: ValidationError → DomainError → StoreError → terminal message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, counts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Domain errors are recoverable by caller choice and never leave
//!    partial side effects behind

use thiserror::Error;

// =============================================================================
// Domain Error
// =============================================================================

/// Expected business failures.
///
/// These are returned as typed results, never thrown as unexpected
/// failures. An operation that fails with a `DomainError` has applied
/// no side effects.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Checkout found a cart line whose quantity exceeds the stock on hand.
    ///
    /// ## When This Occurs
    /// The cart was filled while stock was available, then stock changed
    /// before checkout. The whole checkout rolls back: no order row, no
    /// order lines, no stock change, cart untouched.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// A cart mutation would push a line's quantity past the stock on hand.
    ///
    /// This is the advisory check at cart-edit time; checkout re-validates
    /// authoritatively inside its transaction.
    #[error("cannot put {requested} of product {product_id} in the cart: only {available} in stock")]
    CartStockExceeded {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Product id does not exist in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(i64),

    /// Order number does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed email or price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with DomainError.
pub type DomainResult<T> = Result<T, DomainError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomainError::InsufficientStock {
            product_id: 7,
            available: 1,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 7: available 1, requested 5"
        );

        assert_eq!(DomainError::EmptyCart.to_string(), "cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        };
        assert_eq!(err.to_string(), "email must be at most 254 characters");
    }

    #[test]
    fn test_validation_converts_to_domain_error() {
        let validation_err = ValidationError::Required {
            field: "address".to_string(),
        };
        let domain_err: DomainError = validation_err.into();
        assert!(matches!(domain_err, DomainError::Validation(_)));
    }
}
