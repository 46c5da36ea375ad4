//! # Render Errors
//!
//! Two error families live here:
//!
//! - [`RenderError`]: returned by `DocumentRenderer::render`. The document is
//!   validated before any layout, so the only failure is a rejected document.
//! - [`AssetError`]: returned while loading fonts or a logo. Callers at
//!   startup log it and fall back (built-in fonts, no logo), so it never
//!   reaches the user as a hard failure.

use std::path::PathBuf;

use billforge_core::CoreError;
use thiserror::Error;

/// Error produced while rendering a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document failed validation; nothing was laid out.
    ///
    /// ## When This Occurs
    /// - Empty document number or customer name
    /// - Tax rate outside 0..=100, negative discount
    /// - No line items, or more than the allowed maximum
    #[error("Invalid document: {0}")]
    Validation(#[from] CoreError),
}

/// Error produced while loading a font or an image.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data: {0}")]
    InvalidFont(String),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use billforge_core::ValidationError;

    #[test]
    fn test_validation_error_display() {
        let err: RenderError = CoreError::from(ValidationError::Required {
            field: "doc_number".to_string(),
        })
        .into();
        assert!(err.to_string().starts_with("Invalid document:"));
        assert!(err.to_string().contains("doc_number"));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = AssetError::io(
            "/missing/logo.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/missing/logo.png"));
    }
}
