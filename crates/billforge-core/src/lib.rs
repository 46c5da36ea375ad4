//! # billforge-core: Pure Business Logic for Billforge
//!
//! This crate is the **heart** of Billforge. It contains the invoice and
//! quotation domain as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Billforge Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    billforge CLI                                │   │
//! │  │    create ──► list ──► render ──► delete ──► summary            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ billforge-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐  │   │
//! │  │  │  types  │ │  money  │ │  words  │ │  items  │ │validation│  │   │
//! │  │  │Document │ │  Money  │ │ crore/  │ │  pipe   │ │  rules   │  │   │
//! │  │  │ Totals  │ │ TaxRate │ │  lakh   │ │  codec  │ │          │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                    │                                  │                 │
//! │  ┌─────────────────▼──────────────┐  ┌────────────────▼─────────────┐  │
//! │  │  billforge-db (SQLite store)   │  │  billforge-pdf (renderer)    │  │
//! │  └────────────────────────────────┘  └──────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Document, LineItem, DocumentTotals, etc.)
//! - [`money`] - Exact decimal money
//! - [`words`] - Amount in words (Indian and international grouping)
//! - [`items`] - Pipe-delimited line-item codec
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use billforge_core::items::parse_items;
//! use billforge_core::types::{DocumentTotals, TaxRate};
//! use billforge_core::words::to_words;
//! use billforge_core::Money;
//! use rust_decimal::Decimal;
//!
//! let items = parse_items("A | 1 | 100\nB | 2 | 50").unwrap();
//! let nine = TaxRate::from_percent(Decimal::from(9));
//! let totals = DocumentTotals::compute(&items, nine, nine, Money::zero());
//!
//! assert_eq!(totals.grand_total.to_string(), "236.00");
//! assert_eq!(
//!     to_words(totals.grand_total.amount()),
//!     "Two Hundred Thirty Six Rupees Only"
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod items;
pub mod money;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ItemsBlobError, ValidationError};
pub use money::Money;
pub use types::*;
pub use words::{to_words, to_words_with, NumberingSystem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items on a single document.
///
/// ## Business Reason
/// Keeps documents printable in a reasonable number of pages and stops a
/// pasted spreadsheet from producing a runaway record.
pub const MAX_LINE_ITEMS: usize = 200;

/// Maximum length of a document number.
pub const MAX_DOC_NUMBER_LEN: usize = 64;

/// Largest quantity accepted on one line item.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest unit price or discount in rupees (one lakh crore).
///
/// With [`MAX_QUANTITY`] and [`MAX_LINE_ITEMS`] this keeps every total well
/// inside `Decimal` range, so totals arithmetic cannot overflow.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;
