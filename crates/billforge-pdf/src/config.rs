//! Render settings shared by invoices and quotations.

use billforge_core::DocType;

use crate::theme::ColorTheme;

/// Boilerplate printed under the heading "Terms and Conditions:".
pub const DEFAULT_TERMS: &str = "1. Validity: Quotation valid for 30 days.\n\
2. Service Duration: 12 months from date of activation.\n\
3. Support Includes: Regular updates, monitoring and priority issue resolution.";

/// What to draw around the document data.
///
/// ## Example
/// ```rust
/// use billforge_core::DocType;
/// use billforge_pdf::RenderConfig;
///
/// let config = RenderConfig::for_doc_type(DocType::Quotation)
///     .with_watermark(true)
///     .with_tagline("Cloud & Colocation");
/// assert!(config.terms_text.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Kind of document this configuration is prepared for.
    pub doc_type: DocType,
    /// Paint the logo faintly behind the content of every page.
    pub show_watermark: bool,
    /// Terms block; `None` leaves it out.
    pub terms_text: Option<String>,
    /// Start the terms block on a fresh page.
    pub terms_on_new_page: bool,
    pub theme: ColorTheme,
    /// Line under the company name.
    pub tagline: Option<String>,
}

impl RenderConfig {
    /// Settings for the given document type with the standard terms and
    /// that type's default palette.
    pub fn for_doc_type(doc_type: DocType) -> Self {
        RenderConfig {
            doc_type,
            show_watermark: false,
            terms_text: Some(DEFAULT_TERMS.to_string()),
            terms_on_new_page: false,
            theme: ColorTheme::for_doc_type(doc_type),
            tagline: None,
        }
    }

    pub fn with_watermark(mut self, show: bool) -> Self {
        self.show_watermark = show;
        self
    }

    pub fn with_terms(mut self, terms: Option<String>) -> Self {
        self.terms_text = terms;
        self
    }

    pub fn with_terms_on_new_page(mut self, new_page: bool) -> Self {
        self.terms_on_new_page = new_page;
        self
    }

    pub fn with_theme(mut self, theme: ColorTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        let tagline = tagline.into();
        self.tagline = (!tagline.trim().is_empty()).then_some(tagline);
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::for_doc_type(DocType::Invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.doc_type, DocType::Invoice);
        assert!(!config.show_watermark);
        assert!(!config.terms_on_new_page);
        assert_eq!(config.terms_text.as_deref(), Some(DEFAULT_TERMS));
    }

    #[test]
    fn test_theme_follows_doc_type() {
        let invoice = RenderConfig::for_doc_type(DocType::Invoice);
        let quotation = RenderConfig::for_doc_type(DocType::Quotation);
        assert_eq!(invoice.theme, ColorTheme::default());
        assert_eq!(quotation.theme, ColorTheme::for_doc_type(DocType::Quotation));
        assert_ne!(invoice.theme, quotation.theme);
    }

    #[test]
    fn test_blank_tagline_is_dropped() {
        let config = RenderConfig::default().with_tagline("   ");
        assert!(config.tagline.is_none());
    }

    #[test]
    fn test_terms_can_be_removed() {
        let config = RenderConfig::default().with_terms(None);
        assert!(config.terms_text.is_none());
    }
}
