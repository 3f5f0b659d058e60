//! # Validation Module
//!
//! Fail-fast input validation for bistro-core constructors.
//!
//! Validation runs before any business logic: blank identifiers,
//! out-of-range tax rates, and negative fees are rejected at construction
//! time and never silently coerced.
//!
//! ## Usage
//! ```rust
//! use bistro_core::validation::{validate_required, validate_tax_rate};
//! use bistro_core::money::TaxRate;
//!
//! let cashier = validate_required("cashier id", "  C-07  ").unwrap();
//! assert_eq!(cashier, "C-07");
//!
//! assert!(validate_tax_rate(TaxRate::from_bps(1400)).is_ok());
//! assert!(validate_tax_rate(TaxRate::from_bps(10001)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, TaxRate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required identifier (cashier id, card number, wallet id,
/// delivery address, pickup time).
///
/// ## Rules
/// - Must not be empty after trimming
///
/// ## Returns
/// The trimmed value.
pub fn validate_required(field: &'static str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a tax rate.
///
/// ## Rules
/// - Must be between 0 and 10000 basis points (0% to 100%)
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate",
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a dine-in table number.
///
/// ## Rules
/// - Must be positive (table 0 does not exist)
pub fn validate_table_number(table_number: u32) -> ValidationResult<()> {
    if table_number == 0 {
        return Err(ValidationError::MustBePositive {
            field: "table number",
        });
    }

    Ok(())
}

/// Validates a delivery fee.
///
/// ## Rules
/// - Must not be negative
/// - Zero is allowed (free delivery)
pub fn validate_delivery_fee(fee: Money) -> ValidationResult<()> {
    if fee.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "delivery fee",
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
