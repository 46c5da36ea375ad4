//! Greedy word wrapping against real font metrics.

use crate::fonts::TextMeasure;

/// Splits `text` into lines no wider than `max_width` points.
///
/// Words are separated by runs of whitespace. Words are added to the current
/// line while it still fits; the word that overflows starts the next line.
/// A single word wider than the budget sits alone on its line, unsplit.
///
/// ## Example
/// ```rust
/// use billforge_pdf::{wrap_text, FontSet};
///
/// let fonts = FontSet::builtin();
/// let lines = wrap_text("Annual maintenance contract", fonts.regular(), 10.0, 80.0);
/// assert!(lines.len() > 1);
/// ```
pub fn wrap_text(text: &str, font: &impl TextMeasure, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        // Measure the joined line so the check matches what gets drawn.
        let candidate = format!("{current} {word}");
        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Like [`wrap_text`], but honours explicit line breaks first.
///
/// Each input line is wrapped on its own; blank input lines are dropped.
pub fn wrap_paragraphs(
    text: &str,
    font: &impl TextMeasure,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_text(line, font, size, max_width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 5pt wide at any size.
    struct Mono;

    impl TextMeasure for Mono {
        fn text_width(&self, text: &str, _size: f32) -> f32 {
            text.chars().count() as f32 * 5.0
        }
    }

    #[test]
    fn test_fits_on_one_line() {
        assert_eq!(wrap_text("web hosting", &Mono, 10.0, 100.0), vec!["web hosting"]);
    }

    #[test]
    fn test_breaks_before_overflowing_word() {
        // "aaaa bbbb" = 9 chars = 45pt; budget 40pt
        let lines = wrap_text("aaaa bbbb cc", &Mono, 10.0, 40.0);
        assert_eq!(lines, vec!["aaaa", "bbbb cc"]);
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        let lines = wrap_text("aaaa bbb", &Mono, 10.0, 40.0);
        assert_eq!(lines, vec!["aaaa bbb"]);
    }

    #[test]
    fn test_long_word_is_not_split() {
        let lines = wrap_text("a supercalifragilistic b", &Mono, 10.0, 20.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let lines = wrap_text("  one   two  ", &Mono, 10.0, 100.0);
        assert_eq!(lines, vec!["one two"]);
        assert!(wrap_text("   ", &Mono, 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_builtin_lines_fit_description_column() {
        use crate::fonts::FontSet;

        let fonts = FontSet::builtin();
        let font = fonts.regular();
        // Description column of the item table, less cell padding.
        let budget = 220.0 - 2.0 * 6.0;
        let text = "Annual maintenance contract covering quarterly preventive \
                    visits, WWWWWWWW replacement parts, on-site engineer support, \
                    remote monitoring and an uninterruptiblepowersupplyreplacementkit";

        let lines = wrap_text(text, font, 10.0, budget);
        assert!(lines.len() > 2);
        for line in &lines {
            let single_word = !line.contains(' ');
            assert!(
                single_word || font.text_width(line, 10.0) <= budget,
                "{line:?} overflows"
            );
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_paragraphs_keep_line_breaks() {
        let lines = wrap_paragraphs("12 MG Road\n\nBengaluru 560001", &Mono, 10.0, 200.0);
        assert_eq!(lines, vec!["12 MG Road", "Bengaluru 560001"]);
    }
}
