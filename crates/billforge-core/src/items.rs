//! # Line-Item Text Codec
//!
//! The pipe-delimited format used both for typed-in item lists and for the
//! `items` column of a stored document.
//!
//! ## Line Format
//! ```text
//! Website design | phase 1 | 1 | 25000
//! └──────────┬──────────┘   │    └── unit price (last token)
//!            │              └─────── quantity  (second to last)
//!            └────────────────────── description (everything before,
//!                                    rejoined with '|')
//! ```
//!
//! ## Stored Blob
//! ```text
//! #items v1
//! Website design | 1 | 25000
//! Hosting | 12 | 499.5
//! ```
//! The header line versions the format. Decoding is strict: an unknown
//! header or malformed line is an error, never a best-effort guess.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ItemsBlobError, ValidationError};
use crate::money::Money;
use crate::types::LineItem;
use crate::validation::ValidationResult;

/// Prefix of the first line of a stored blob.
pub const ITEMS_HEADER_PREFIX: &str = "#items ";

/// Version written by [`serialize_items`].
pub const ITEMS_FORMAT_VERSION: &str = "v1";

// =============================================================================
// Parsing
// =============================================================================

/// Parses one `description | qty | price` line.
///
/// `line_no` is 1-based and only used in error messages.
///
/// ## Example
/// ```rust
/// use billforge_core::items::parse_item_line;
///
/// let item = parse_item_line("Cable | Cat6 | 3 | 120.50", 1).unwrap();
/// assert_eq!(item.description(), "Cable | Cat6");
/// assert!(parse_item_line("Cable 3", 2).is_err());
/// ```
pub fn parse_item_line(line: &str, line_no: usize) -> ValidationResult<LineItem> {
    let tokens: Vec<&str> = line.split('|').collect();
    if tokens.len() < 3 {
        return Err(ValidationError::InvalidItemLine {
            line: line_no,
            reason: "expected 'description | qty | price'".to_string(),
        });
    }

    let split = tokens.len() - 2;
    let description = tokens[..split].join("|").trim().to_string();
    let qty_text = tokens[split].trim();
    let price_text = tokens[split + 1].trim();

    let quantity = Decimal::from_str(qty_text).map_err(|_| ValidationError::InvalidItemLine {
        line: line_no,
        reason: format!("quantity '{qty_text}' is not a number"),
    })?;

    let unit_price = Money::from_str(price_text).map_err(|_| ValidationError::InvalidItemLine {
        line: line_no,
        reason: format!("price '{price_text}' is not a number"),
    })?;

    Ok(LineItem::new(description, quantity, unit_price))
}

/// Parses a multi-line item list. Blank lines are skipped; line numbers in
/// errors count every line of the input.
pub fn parse_items(text: &str) -> ValidationResult<Vec<LineItem>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_item_line(line, idx + 1))
        .collect()
}

// =============================================================================
// Serialization
// =============================================================================

/// Formats one item back into its line form.
pub fn format_item_line(item: &LineItem) -> String {
    format!(
        "{} | {} | {}",
        item.description(),
        item.quantity_display(),
        item.unit_price().amount().normalize()
    )
}

/// Serializes items into the versioned blob stored with a document.
pub fn serialize_items(items: &[LineItem]) -> String {
    let mut out = format!("{ITEMS_HEADER_PREFIX}{ITEMS_FORMAT_VERSION}\n");
    for item in items {
        out.push_str(&format_item_line(item));
        out.push('\n');
    }
    out
}

/// Decodes a stored blob produced by [`serialize_items`].
pub fn decode_stored_items(blob: &str) -> Result<Vec<LineItem>, ItemsBlobError> {
    let mut lines = blob.lines().enumerate().skip_while(|(_, l)| l.trim().is_empty());

    let header = match lines.next() {
        Some((_, line)) => line.trim(),
        None => return Err(ItemsBlobError::MissingHeader),
    };
    let version = header
        .strip_prefix(ITEMS_HEADER_PREFIX)
        .ok_or(ItemsBlobError::MissingHeader)?
        .trim();
    if version != ITEMS_FORMAT_VERSION {
        return Err(ItemsBlobError::UnsupportedVersion(version.to_string()));
    }

    let mut items = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        items.push(parse_item_line(line, idx + 1)?);
    }
    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================
