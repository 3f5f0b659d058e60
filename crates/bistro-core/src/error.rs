//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ValidationError  - construction-time input validation (fail fast)  │
//! │  CoreError        - programmer misuse of the order lifecycle        │
//! │                                                                     │
//! │  Payment declines are NOT errors: they surface as the CANCELLED     │
//! │  order status returned by Order::process.                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (order id, field name)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::order::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent misuse of the order lifecycle or bill assembly, not
/// expected business outcomes. A declined payment is reported through
/// [`OrderStatus::Cancelled`], never through this type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `process` was invoked on an order that already left the NEW state.
    ///
    /// The lifecycle is strictly forward: NEW → PLACED → (CANCELLED |
    /// COMPLETED). Re-processing a terminal order is programmer misuse.
    #[error("order #{order_id} is {status}, cannot be processed again")]
    AlreadyProcessed { order_id: u64, status: OrderStatus },

    /// A line was appended to an order that is no longer NEW.
    #[error("order #{order_id} is {status}, lines can only be added while new")]
    OrderClosed { order_id: u64, status: OrderStatus },

    /// The one-shot bill generator was handed an empty line set.
    #[error("bill for order #{order_id} requires at least one order line")]
    EmptyBill { order_id: u64 },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when constructor input doesn't meet requirements. They are
/// raised before any business logic runs and are never silently coerced.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required identifier is missing or blank.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: &'static str },
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
        let err = CoreError::AlreadyProcessed {
            order_id: 1001,
            status: OrderStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "order #1001 is COMPLETED, cannot be processed again"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required { field: "cashier id" };
        assert_eq!(err.to_string(), "cashier id is required");

        let err = ValidationError::OutOfRange {
            field: "tax rate",
            min: 0,
            max: 10000,
        };
        assert_eq!(err.to_string(), "tax rate must be between 0 and 10000");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "wallet id" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
