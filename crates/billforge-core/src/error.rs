//! # Error Types
//!
//! Domain-specific error types for billforge-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billforge-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ItemsBlobError   - Stored line-item blob cannot be decoded        │
//! │                                                                         │
//! │  billforge-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  billforge-pdf errors (separate crate)                                 │
//! │  └── RenderError      - Document rejected before layout                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CLI (anyhow) → exit message       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (document number, line number)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Document has exceeded the maximum allowed number of line items.
    #[error("Document cannot have more than {max} line items")]
    TooManyItems { max: usize },

    /// Discount is larger than what it is deducted from.
    ///
    /// ## When This Occurs
    /// Only raised by the opt-in `validate_discount_covered` check. Totals
    /// themselves never clamp a negative grand total.
    #[error("Discount {discount} exceeds subtotal plus tax {available}")]
    DiscountExceedsTotal { discount: String, available: String },

    /// Stored line items could not be decoded.
    #[error("Stored items are unreadable: {0}")]
    Items(#[from] ItemsBlobError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Raised before anything is persisted or rendered.
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

    /// Invalid format (e.g., non-numeric price, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A line of the item list could not be parsed.
    ///
    /// ## User Workflow
    /// ```text
    /// Items textarea:
    ///   1  Website design | 1 | 25000
    ///   2  Hosting 12
    ///         │
    ///         ▼
    /// InvalidItemLine { line: 2, reason: "expected 'description | qty | price'" }
    ///         │
    ///         ▼
    /// User sees: "Item line 2: expected 'description | qty | price'"
    /// ```
    #[error("Item line {line}: {reason}")]
    InvalidItemLine { line: usize, reason: String },
}

// =============================================================================
// Stored Items Error
// =============================================================================

/// Errors decoding a persisted line-item blob.
#[derive(Debug, Error)]
pub enum ItemsBlobError {
    /// The blob has no `#items vN` header line.
    #[error("missing items header")]
    MissingHeader,

    /// The header names a format version this build cannot read.
    #[error("unsupported items format version: {0}")]
    UnsupportedVersion(String),

    /// A line inside the blob is malformed.
    #[error(transparent)]
    Line(#[from] ValidationError),
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
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "doc_number".to_string(),
        };
        assert_eq!(err.to_string(), "doc_number is required");

        let err = ValidationError::InvalidItemLine {
            line: 2,
            reason: "expected 'description | qty | price'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Item line 2: expected 'description | qty | price'"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_blob_error_wraps_line_error() {
        let err: ItemsBlobError = ValidationError::InvalidItemLine {
            line: 3,
            reason: "bad".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Item line 3: bad");
    }
}
