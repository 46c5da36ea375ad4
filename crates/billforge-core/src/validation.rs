//! # Validation Module
//!
//! Input validation for documents before they are saved or rendered.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Item codec (items.rs)                                        │
//! │  └── Line shape: three tokens, numeric quantity and price              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required header fields, length limits                             │
//! │  ├── Rates within 0-100 %, discount not negative                       │
//! │  └── Item ranges: quantity > 0, price ≥ 0, item count                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE (doc_type, doc_number)                                     │
//! │                                                                         │
//! │  Nothing is persisted or rendered until layers 1 and 2 pass.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Document, DocumentHeader, LineItem, TaxRate};
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_DOC_NUMBER_LEN, MAX_LINE_ITEMS, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a document number.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No line breaks (it is printed on a single line and used in file names)
///
/// ## Example
/// ```rust
/// use billforge_core::validation::validate_doc_number;
///
/// assert!(validate_doc_number("INV-2024-001").is_ok());
/// assert!(validate_doc_number("   ").is_err());
/// ```
pub fn validate_doc_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "doc_number".to_string(),
        });
    }

    if number.chars().count() > MAX_DOC_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "doc_number".to_string(),
            max: MAX_DOC_NUMBER_LEN,
        });
    }

    if number.contains(['\n', '\r']) {
        return Err(ValidationError::InvalidFormat {
            field: "doc_number".to_string(),
            reason: "must be a single line".to_string(),
        });
    }

    Ok(())
}

/// Validates that a text field is present.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a percentage tax rate.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_tax_rate(field: &str, rate: TaxRate) -> ValidationResult<()> {
    let pct = rate.percent();
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a flat discount amount.
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount".to_string(),
        });
    }
    validate_upper_bound("discount", discount.amount(), MAX_AMOUNT)
}

fn validate_upper_bound(field: &str, value: Decimal, max: i64) -> ValidationResult<()> {
    if value > Decimal::from(max) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }
    Ok(())
}

/// Validates one line item.
///
/// ## Rules
/// - Description must not be empty
/// - Quantity must be positive (> 0)
/// - Unit price must be non-negative (zero is a free item)
/// - Quantity and unit price stay under [`MAX_QUANTITY`] and [`MAX_AMOUNT`]
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_required("description", item.description())?;

    if item.quantity() <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if item.unit_price().is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_price".to_string(),
        });
    }

    validate_upper_bound("quantity", item.quantity(), MAX_QUANTITY)?;
    validate_upper_bound("unit_price", item.unit_price().amount(), MAX_AMOUNT)?;

    Ok(())
}

// =============================================================================
// Document Validators
// =============================================================================

/// Validates every header field.
pub fn validate_header(header: &DocumentHeader) -> ValidationResult<()> {
    validate_doc_number(&header.doc_number)?;
    validate_required("company_name", &header.company_name)?;
    validate_required("customer_name", &header.customer_name)?;
    validate_required("customer_address", &header.customer_address)?;
    validate_tax_rate("cgst_rate", header.cgst_rate)?;
    validate_tax_rate("sgst_rate", header.sgst_rate)?;
    validate_discount(header.discount)?;
    Ok(())
}

/// Validates a whole document: header, item count and every item.
///
/// ## User Workflow
/// ```text
/// Create document
///      │
///      ▼
/// validate_document() ← THIS FUNCTION
///      │
///      ├── header field missing? → Validation error, nothing saved
///      ├── no items / too many?  → Validation error, nothing saved
///      │
///      └── OK → insert into store → render PDF
/// ```
pub fn validate_document(document: &Document) -> CoreResult<()> {
    validate_header(&document.header)?;

    if document.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        }
        .into());
    }

    if document.items.len() > MAX_LINE_ITEMS {
        return Err(CoreError::TooManyItems {
            max: MAX_LINE_ITEMS,
        });
    }

    for item in &document.items {
        validate_line_item(item)?;
    }

    Ok(())
}

/// Optional check that the discount does not exceed subtotal plus tax.
///
/// Totals never clamp, so callers that must not issue a negative document
/// run this after [`validate_document`].
pub fn validate_discount_covered(document: &Document) -> CoreResult<()> {
    let totals = document.totals();
    let available = totals.subtotal + totals.tax_total;
    if totals.discount > available {
        return Err(CoreError::DiscountExceedsTotal {
            discount: totals.discount.to_string(),
            available: available.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocType;
    use chrono::NaiveDate;

    fn header() -> DocumentHeader {
        DocumentHeader {
            doc_number: "INV-001".to_string(),
            doc_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            company_name: "Acme Systems".to_string(),
            company_address: "12 MG Road\nBengaluru".to_string(),
            customer_name: "Globex".to_string(),
            customer_address: "Sector 5\nKolkata".to_string(),
            cgst_rate: TaxRate::from_percent(Decimal::from(9)),
            sgst_rate: TaxRate::from_percent(Decimal::from(9)),
            discount: Money::zero(),
        }
    }

    fn item(qty: i64, price: i64) -> LineItem {
        LineItem::new("Item", Decimal::from(qty), Money::from_major_minor(price, 0))
    }

    #[test]
    fn test_doc_number_rules() {
        assert!(validate_doc_number("INV-1").is_ok());
        assert!(matches!(
            validate_doc_number(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_doc_number(&"9".repeat(65)),
            Err(ValidationError::TooLong { max: 64, .. })
        ));
        assert!(validate_doc_number("A\nB").is_err());
    }

    #[test]
    fn test_tax_rate_range() {
        assert!(validate_tax_rate("cgst_rate", TaxRate::from_percent(Decimal::ZERO)).is_ok());
        assert!(validate_tax_rate("cgst_rate", TaxRate::from_percent(Decimal::ONE_HUNDRED)).is_ok());
        assert!(validate_tax_rate("cgst_rate", TaxRate::from_percent(Decimal::from(-1))).is_err());
        assert!(validate_tax_rate("cgst_rate", TaxRate::from_percent(Decimal::from(101))).is_err());
    }

    #[test]
    fn test_line_item_rules() {
        assert!(validate_line_item(&item(1, 0)).is_ok());
        assert!(validate_line_item(&item(0, 10)).is_err());
        assert!(validate_line_item(&item(1, -10)).is_err());
        let blank = LineItem::new("  ", Decimal::ONE, Money::zero());
        assert!(validate_line_item(&blank).is_err());
    }

    #[test]
    fn test_line_item_upper_bounds() {
        assert!(validate_line_item(&item(MAX_QUANTITY, MAX_AMOUNT)).is_ok());
        assert!(matches!(
            validate_line_item(&item(MAX_QUANTITY + 1, 1)),
            Err(ValidationError::OutOfRange { max: MAX_QUANTITY, .. })
        ));
        let err = validate_line_item(&item(1, MAX_AMOUNT + 1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unit_price must be between 0 and 1000000000000"
        );
    }

    #[test]
    fn test_huge_numbers_rejected_before_totals() {
        let items =
            crate::items::parse_items("Hosting | 100000000000000000000 | 100000000000000000000")
                .unwrap();
        let doc = Document::new(DocType::Invoice, header(), items);
        assert!(matches!(
            validate_document(&doc),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        // The largest accepted document still totals without overflow.
        let items = vec![item(MAX_QUANTITY, MAX_AMOUNT); MAX_LINE_ITEMS];
        let mut h = header();
        h.cgst_rate = TaxRate::from_percent(Decimal::ONE_HUNDRED);
        h.sgst_rate = TaxRate::from_percent(Decimal::ONE_HUNDRED);
        h.discount = Money::from_major_minor(MAX_AMOUNT, 0);
        let doc = Document::new(DocType::Invoice, h, items);
        assert!(validate_document(&doc).is_ok());
        assert!(doc.totals().grand_total.is_positive());
    }

    #[test]
    fn test_discount_upper_bound() {
        assert!(validate_discount(Money::from_major_minor(MAX_AMOUNT, 0)).is_ok());
        assert!(validate_discount(Money::from_major_minor(MAX_AMOUNT + 1, 0)).is_err());
    }

    #[test]
    fn test_document_requires_items() {
        let doc = Document::new(DocType::Invoice, header(), vec![]);
        let err = validate_document(&doc).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: items is required");
    }

    #[test]
    fn test_document_rejects_negative_discount() {
        let mut h = header();
        h.discount = Money::from_major_minor(-1, 0);
        let doc = Document::new(DocType::Invoice, h, vec![item(1, 10)]);
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn test_document_item_limit() {
        let items = vec![item(1, 1); MAX_LINE_ITEMS + 1];
        let doc = Document::new(DocType::Quotation, header(), items);
        assert!(matches!(
            validate_document(&doc),
            Err(CoreError::TooManyItems { .. })
        ));
    }

    #[test]
    fn test_discount_covered_is_opt_in() {
        let mut h = header();
        h.discount = Money::from_major_minor(500, 0);
        let doc = Document::new(DocType::Invoice, h, vec![item(1, 100)]);

        assert!(validate_document(&doc).is_ok());
        assert!(matches!(
            validate_discount_covered(&doc),
            Err(CoreError::DiscountExceedsTotal { .. })
        ));
    }
}
