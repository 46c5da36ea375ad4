//! # billforge-pdf: Document Renderer
//!
//! Lays out an invoice or quotation on A4 pages and writes the PDF.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Render Pipeline                                 │
//! │                                                                         │
//! │  startup (once)                       per document                      │
//! │  ──────────────                       ────────────                      │
//! │  FontSet::resolve(ttf paths)─┐        Document (billforge-core)         │
//! │  Logo::load(path) ───────────┤              │                           │
//! │  RenderConfig ───────────────┤              ▼                           │
//! │                              └──► DocumentRenderer::render              │
//! │                                         │                               │
//! │                                         ├── validate_document           │
//! │                                         ├── layout (wrap, paginate)     │
//! │                                         └── assemble (pdf-writer)       │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                         Vec<u8> PDF bytes               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use billforge_core::{DocType, Document, DocumentHeader, LineItem, Money, TaxRate};
//! use billforge_pdf::{DocumentRenderer, FontSet, RenderConfig};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let header = DocumentHeader {
//!     doc_number: "DC0001".into(),
//!     doc_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
//!     company_name: "Data Center".into(),
//!     company_address: String::new(),
//!     customer_name: "The Secretary".into(),
//!     customer_address: "Satara 415002".into(),
//!     cgst_rate: TaxRate::from_percent(Decimal::from(9)),
//!     sgst_rate: TaxRate::from_percent(Decimal::from(9)),
//!     discount: Money::zero(),
//! };
//! let items = vec![LineItem::new("Hosting", Decimal::ONE, Money::from_major_minor(100, 0))];
//! let document = Document::new(DocType::Invoice, header, items);
//!
//! let renderer = DocumentRenderer::new(FontSet::builtin(), RenderConfig::default());
//! let pdf = renderer.render(&document, None).unwrap();
//! assert!(pdf.starts_with(b"%PDF"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

mod canvas;
pub mod config;
pub mod error;
pub mod fonts;
pub mod logo;
mod metrics;
pub mod renderer;
pub mod theme;
pub mod wrap;

// =============================================================================
// Re-exports
// =============================================================================

pub use canvas::Align;
pub use config::{RenderConfig, DEFAULT_TERMS};
pub use error::{AssetError, RenderError, RenderResult};
pub use fonts::{BuiltinFont, EmbeddedFont, FontFace, FontSet, FontWeight, TextMeasure};
pub use logo::Logo;
pub use renderer::{output_file_name, DocumentRenderer, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
pub use theme::{Color, ColorTheme};
pub use wrap::{wrap_paragraphs, wrap_text};
