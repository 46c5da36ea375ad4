//! # Domain Types
//!
//! Core domain types for invoices and quotations.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Domain Types                                     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Document     │   │ DocumentHeader  │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  doc_type       │──►│  doc_number     │   │  description    │       │
//! │  │  header         │   │  doc_date       │   │  quantity       │       │
//! │  │  items ─────────┼───┼─────────────────┼──►│  unit_price     │       │
//! │  └────────┬────────┘   │  company/cust.  │   └─────────────────┘       │
//! │           │            │  cgst/sgst/disc │                              │
//! │           ▼            └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DocumentTotals  │   │    TaxRate      │   │    DocType      │       │
//! │  │  (derived only) │   │  percent (dec)  │   │  Invoice        │       │
//! │  │  subtotal ...   │   │  9 = 9 %        │   │  Quotation      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A `Document` owns its header and its ordered items outright. Totals are
//! always recomputed from the items; they are never stored on the document.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate expressed as a percentage (`9` means 9 %).
///
/// ## Why a Decimal Percentage?
/// GST slabs are published as percentages, including fractional ones such
/// as 2.5 %. A decimal keeps `2.5` exact and prints back as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[inline]
    pub const fn from_percent(percent: Decimal) -> Self {
        TaxRate(percent)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// Prints the percentage without trailing zeros: `9`, `2.5`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

// =============================================================================
// Document Type
// =============================================================================

/// The kind of commercial document being produced.
///
/// Drives the printed title, the labels in the metadata and party blocks,
/// the storage partition and the download file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// A bill for goods or services delivered.
    Invoice,
    /// A priced offer sent before work starts.
    Quotation,
}

impl DocType {
    /// Title printed at the top of the first page.
    pub const fn title(&self) -> &'static str {
        match self {
            DocType::Invoice => "INVOICE",
            DocType::Quotation => "QUOTATION",
        }
    }

    /// Label used in running text (`Invoice #:`, `Quotation to:`).
    pub const fn label(&self) -> &'static str {
        match self {
            DocType::Invoice => "Invoice",
            DocType::Quotation => "Quotation",
        }
    }

    /// Lowercase identifier used in storage and configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocType::Invoice => "invoice",
            DocType::Quotation => "quotation",
        }
    }
}

impl Default for DocType {
    fn default() -> Self {
        DocType::Invoice
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoice" => Ok(DocType::Invoice),
            "quotation" | "quote" => Ok(DocType::Quotation),
            other => Err(ValidationError::InvalidFormat {
                field: "doc_type".to_string(),
                reason: format!("unknown document type '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One billable row: description, quantity and unit price.
///
/// Fields are private so an item cannot change after it was validated;
/// build a new one instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    description: String,
    quantity: Decimal,
    unit_price: Money,
}

impl LineItem {
    /// Creates a line item. Range checks live in [`crate::validation`].
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Money) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// `quantity × unit_price`, exact.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Quantity as printed: no trailing zeros (`2`, `2.5`).
    pub fn quantity_display(&self) -> String {
        self.quantity.normalize().to_string()
    }
}

// =============================================================================
// Document Header
// =============================================================================

/// Everything about a document except its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    /// External identifier, unique per document type.
    pub doc_number: String,

    /// Issue date printed as dd/mm/yyyy.
    pub doc_date: NaiveDate,

    /// Issuing company.
    pub company_name: String,

    /// Multi-line; line breaks are preserved on the page.
    pub company_address: String,

    pub customer_name: String,

    /// Multi-line; line breaks are preserved on the page.
    pub customer_address: String,

    pub cgst_rate: TaxRate,

    pub sgst_rate: TaxRate,

    /// Flat amount deducted after tax.
    pub discount: Money,
}

impl DocumentHeader {
    /// Date in the printed `dd/mm/yyyy` form.
    pub fn date_display(&self) -> String {
        self.doc_date.format("%d/%m/%Y").to_string()
    }
}

// =============================================================================
// Document
// =============================================================================

/// The unit that is validated, persisted and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_type: DocType,
    pub header: DocumentHeader,
    pub items: Vec<LineItem>,
}

impl Document {
    pub fn new(doc_type: DocType, header: DocumentHeader, items: Vec<LineItem>) -> Self {
        Document {
            doc_type,
            header,
            items,
        }
    }

    /// Computes the derived totals for this document.
    pub fn totals(&self) -> DocumentTotals {
        DocumentTotals::compute(
            &self.items,
            self.header.cgst_rate,
            self.header.sgst_rate,
            self.header.discount,
        )
    }
}

// =============================================================================
// Document Totals
// =============================================================================

/// Derived amounts for a document. Never stored independently of the
/// items they were computed from.
///
/// ## Calculation
/// ```text
/// subtotal    = Σ quantity × unit_price
/// cgst_amount = subtotal × cgst_rate / 100
/// sgst_amount = subtotal × sgst_rate / 100
/// tax_total   = cgst_amount + sgst_amount
/// grand_total = subtotal + tax_total − discount     (not clamped at zero)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub subtotal: Money,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub tax_total: Money,
    pub discount: Money,
    pub grand_total: Money,
}

impl DocumentTotals {
    pub fn compute(items: &[LineItem], cgst: TaxRate, sgst: TaxRate, discount: Money) -> Self {
        let subtotal: Money = items.iter().map(LineItem::line_total).sum();
        let cgst_amount = subtotal.calculate_tax(cgst);
        let sgst_amount = subtotal.calculate_tax(sgst);
        let tax_total = cgst_amount + sgst_amount;

        DocumentTotals {
            subtotal,
            cgst_amount,
            sgst_amount,
            tax_total,
            discount,
            grand_total: subtotal + tax_total - discount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(desc: &str, qty: i64, price: i64) -> LineItem {
        LineItem::new(desc, Decimal::from(qty), Money::from_major_minor(price, 0))
    }

    #[test]
    fn test_totals_with_both_taxes() {
        let items = vec![item("A", 1, 100), item("B", 2, 50)];
        let nine = TaxRate::from_percent(Decimal::from(9));
        let totals = DocumentTotals::compute(&items, nine, nine, Money::zero());

        assert_eq!(totals.subtotal, Money::from_major_minor(200, 0));
        assert_eq!(totals.cgst_amount, Money::from_major_minor(18, 0));
        assert_eq!(totals.sgst_amount, Money::from_major_minor(18, 0));
        assert_eq!(totals.tax_total, Money::from_major_minor(36, 0));
        assert_eq!(totals.grand_total, Money::from_major_minor(236, 0));
    }

    #[test]
    fn test_grand_total_is_not_clamped() {
        let items = vec![item("A", 1, 100)];
        let totals = DocumentTotals::compute(
            &items,
            TaxRate::zero(),
            TaxRate::zero(),
            Money::from_major_minor(150, 0),
        );
        assert_eq!(totals.grand_total, Money::from_major_minor(-50, 0));
    }

    #[test]
    fn test_fractional_quantity() {
        let line = LineItem::new(
            "Consulting hours",
            Decimal::new(25, 1),
            Money::from_major_minor(1500, 0),
        );
        assert_eq!(line.line_total(), Money::from_major_minor(3750, 0));
        assert_eq!(line.quantity_display(), "2.5");
        assert_eq!(item("x", 3, 1).quantity_display(), "3");
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_percent(Decimal::new(900, 2)).to_string(), "9");
        assert_eq!(TaxRate::from_percent(Decimal::new(25, 1)).to_string(), "2.5");
    }

    #[test]
    fn test_doc_type_parse_and_labels() {
        assert_eq!("Invoice".parse::<DocType>().unwrap(), DocType::Invoice);
        assert_eq!("quote".parse::<DocType>().unwrap(), DocType::Quotation);
        assert!("receipt".parse::<DocType>().is_err());
        assert_eq!(DocType::Quotation.title(), "QUOTATION");
        assert_eq!(DocType::default(), DocType::Invoice);
    }

    #[test]
    fn test_doc_type_serde_lowercase() {
        let json = serde_json::to_string(&DocType::Quotation).unwrap();
        assert_eq!(json, "\"quotation\"");
    }

    #[test]
    fn test_date_display() {
        let header = DocumentHeader {
            doc_number: "INV-1".to_string(),
            doc_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            company_name: String::new(),
            company_address: String::new(),
            customer_name: String::new(),
            customer_address: String::new(),
            cgst_rate: TaxRate::zero(),
            sgst_rate: TaxRate::zero(),
            discount: Money::zero(),
        };
        assert_eq!(header.date_display(), "07/03/2024");
    }
}
