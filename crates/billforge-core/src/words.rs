//! # Amount in Words
//!
//! Converts a currency amount into the English phrase printed under the
//! totals block, e.g. `Twelve Lakh Thirty Four Thousand Five Hundred Sixty
//! Seven Rupees And Eighty Nine Paise Only`.
//!
//! ## Grouping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Indian (default)                  International                       │
//! │  ─────────────────                 ─────────────                        │
//! │  1,23,45,678                       12,345,678                          │
//! │   │  │  │  └── 0-999 remainder       │   │   └── 0-999 remainder       │
//! │   │  │  └───── thousand              │   └────── thousand              │
//! │   │  └──────── lakh    (10^5)        └────────── million  (10^6)       │
//! │   └─────────── crore   (10^7)        (billion   (10^9) above that)     │
//! │                                                                         │
//! │  A crore count above 999 is grouped again: "One Thousand Crore".       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Phrase Structure
//! `<rupees words> Rupees [And <paise words> Paise] Only`
//! - "Rupees" appears only when the whole part is non-zero
//! - "And" appears only when both parts are present
//! - an amount that rounds to zero reads `Zero Rupees Only`
//!
//! ## Usage
//! ```rust
//! use billforge_core::words::to_words;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(to_words(Decimal::from(100_000)), "One Lakh Rupees Only");
//! assert_eq!(to_words(Decimal::new(50, 2)), "Fifty Paise Only");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const BILLION: u128 = 1_000_000_000;
const MILLION: u128 = 1_000_000;
const THOUSAND: u128 = 1_000;

// =============================================================================
// Numbering System
// =============================================================================

/// How the whole-rupee part is grouped into scale words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingSystem {
    /// Crore / lakh / thousand.
    #[default]
    Indian,
    /// Billion / million / thousand.
    International,
}

impl FromStr for NumberingSystem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indian" => Ok(NumberingSystem::Indian),
            "international" => Ok(NumberingSystem::International),
            other => Err(ValidationError::InvalidFormat {
                field: "numbering_system".to_string(),
                reason: format!("expected 'indian' or 'international', got '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Converts an amount to words using Indian grouping.
pub fn to_words(amount: Decimal) -> String {
    to_words_with(amount, NumberingSystem::Indian)
}

/// Converts an amount to words using the given grouping.
///
/// Paise are `round((amount − whole) × 100)` with round-half-to-even; a
/// result of 100 carries into the rupees (`0.999` → `One Rupees Only`).
/// Negative amounts are prefixed with `Minus`.
pub fn to_words_with(amount: Decimal, system: NumberingSystem) -> String {
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let amount = amount.abs();

    let whole_dec = amount.trunc();
    let mut paise = ((amount - whole_dec) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u32()
        .unwrap_or(0);
    // Decimal tops out near 7.9e28, well inside u128.
    let mut whole = whole_dec.to_u128().unwrap_or(0);
    if paise >= 100 {
        whole += 1;
        paise -= 100;
    }

    if whole == 0 && paise == 0 {
        return "Zero Rupees Only".to_string();
    }

    let mut words: Vec<&'static str> = Vec::new();
    if negative {
        words.push("Minus");
    }

    let before_whole = words.len();
    match system {
        NumberingSystem::Indian => push_indian(whole, &mut words),
        NumberingSystem::International => push_international(whole, &mut words),
    }
    let has_rupees = words.len() > before_whole;
    if has_rupees {
        words.push("Rupees");
    }

    if paise > 0 {
        if has_rupees {
            words.push("And");
        }
        push_hundreds(paise as u128, &mut words);
        words.push("Paise");
    }

    words.push("Only");
    words.join(" ")
}

/// Words for a number from 0 to 999 (empty for 0).
///
/// `11` through `19` are table entries, never composed from tens and ones.
/// Only the last three digits of `n` are read.
///
/// ## Example
/// ```rust
/// use billforge_core::words::convert_hundreds;
///
/// assert_eq!(convert_hundreds(115), "One Hundred Fifteen");
/// assert_eq!(convert_hundreds(0), "");
/// ```
pub fn convert_hundreds(n: u32) -> String {
    let mut words = Vec::new();
    push_hundreds((n % 1000) as u128, &mut words);
    words.join(" ")
}

// =============================================================================
// Grouping
// =============================================================================

fn push_hundreds(n: u128, words: &mut Vec<&'static str>) {
    let mut n = (n % 1000) as usize;
    if n >= 100 {
        words.push(ONES[n / 100]);
        words.push("Hundred");
        n %= 100;
    }
    if n >= 20 {
        words.push(TENS[n / 10]);
        n %= 10;
    }
    if n > 0 {
        words.push(ONES[n]);
    }
}

fn push_indian(n: u128, words: &mut Vec<&'static str>) {
    let crore = n / CRORE;
    let lakh = (n % CRORE) / LAKH;
    let thousand = (n % LAKH) / THOUSAND;
    let rest = n % THOUSAND;

    if crore > 0 {
        push_indian(crore, words);
        words.push("Crore");
    }
    if lakh > 0 {
        push_hundreds(lakh, words);
        words.push("Lakh");
    }
    if thousand > 0 {
        push_hundreds(thousand, words);
        words.push("Thousand");
    }
    push_hundreds(rest, words);
}

fn push_international(n: u128, words: &mut Vec<&'static str>) {
    let billion = n / BILLION;
    let million = (n % BILLION) / MILLION;
    let thousand = (n % MILLION) / THOUSAND;
    let rest = n % THOUSAND;

    if billion > 0 {
        push_international(billion, words);
        words.push("Billion");
    }
    if million > 0 {
        push_hundreds(million, words);
        words.push("Million");
    }
    if thousand > 0 {
        push_hundreds(thousand, words);
        words.push("Thousand");
    }
    push_hundreds(rest, words);
}

// =============================================================================
// Unit Tests
// =============================================================================
