//! `billforge render`: write the PDF of a stored document again.

use std::path::PathBuf;

use anyhow::Context;
use billforge_core::DocType;
use billforge_db::DbError;
use billforge_pdf::output_file_name;
use tracing::info;

use crate::commands::write_pdf;
use crate::state::AppState;

pub async fn execute(
    state: &AppState,
    doc_type: DocType,
    number: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let stored = state
        .db
        .documents()
        .get_by_number(doc_type, number)
        .await?
        .ok_or_else(|| DbError::not_found(doc_type.label(), number.trim()))?;

    let document = stored
        .to_document()
        .with_context(|| format!("Stored {} {} is unreadable", doc_type.label(), number))?;

    let bytes = state.renderer(doc_type).render(&document, state.logo())?;
    let dir = out.unwrap_or_else(|| state.config.output.dir.clone());
    let path = write_pdf(&dir, &output_file_name(doc_type, &document.header.doc_number), &bytes)?;

    info!(number = %document.header.doc_number, path = %path.display(), "Document re-rendered");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::state::tests::{test_state, PASSWORD};

    #[tokio::test]
    async fn test_render_stored_document() {
        let mut state = test_state().await;
        state.login_with("admin", PASSWORD).unwrap();
        let created = create::execute(
            &state,
            DocType::Quotation,
            &create::tests::args("Q-9"),
            "Colocation rack | 2 | 12000",
        )
        .await
        .unwrap();
        std::fs::remove_file(&created.pdf_path).unwrap();

        let path = execute(&state, DocType::Quotation, "Q-9", None).await.unwrap();
        assert_eq!(path, created.pdf_path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("(QUOTATION) Tj"));
    }

    #[tokio::test]
    async fn test_render_unknown_number() {
        let state = test_state().await;
        let err = execute(&state, DocType::Invoice, "NOPE", None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::NotFound { .. })
        ));
    }
}
