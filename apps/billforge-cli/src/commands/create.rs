//! `billforge create`: save a new document and write its PDF.
//!
//! Saving and rendering are separate steps. Once the insert succeeds the
//! record stays, even if rendering or writing the file fails afterwards;
//! `billforge render <number>` reproduces the PDF from the stored record.

use std::path::PathBuf;

use anyhow::Context;
use billforge_core::items::parse_items;
use billforge_core::validation::validate_document;
use billforge_core::{DocType, Document, DocumentHeader, Money, TaxRate};
use billforge_db::StoredDocument;
use billforge_pdf::output_file_name;
use chrono::Local;
use tracing::{error, info};

use crate::cli::CreateArgs;
use crate::commands::write_pdf;
use crate::state::AppState;

/// Outcome of a successful `create`.
#[derive(Debug)]
pub struct Created {
    pub stored: StoredDocument,
    pub pdf_path: PathBuf,
}

/// Builds the document from arguments and item text, persists it, renders it.
pub async fn execute(
    state: &AppState,
    doc_type: DocType,
    args: &CreateArgs,
    items_text: &str,
) -> anyhow::Result<Created> {
    let session = state.require_session()?;

    let items = parse_items(items_text)?;
    let header = DocumentHeader {
        doc_number: args.number.trim().to_string(),
        doc_date: args.date.unwrap_or_else(|| Local::now().date_naive()),
        company_name: state.config.company.name.clone(),
        company_address: state.config.company.address.clone(),
        customer_name: args.customer.trim().to_string(),
        customer_address: args.address.join("\n"),
        cgst_rate: TaxRate::from_percent(args.cgst),
        sgst_rate: TaxRate::from_percent(args.sgst),
        discount: Money::new(args.discount),
    };
    let document = Document::new(doc_type, header, items);

    validate_document(&document)?;

    let stored = state.db.documents().insert(&document).await?;
    info!(
        user = %session.username(),
        doc_type = %doc_type,
        number = %stored.header.doc_number,
        total = %stored.total,
        "Document saved"
    );

    let pdf_path = render_and_write(state, &document, args.out.clone())
        .inspect_err(|e| {
            error!(
                number = %document.header.doc_number,
                error = %e,
                "Saved but not rendered"
            );
        })
        .with_context(|| {
            format!(
                "{} {} was saved but its PDF was not written; run `billforge render {}`",
                doc_type.label(),
                document.header.doc_number,
                document.header.doc_number
            )
        })?;

    Ok(Created { stored, pdf_path })
}

fn render_and_write(
    state: &AppState,
    document: &Document,
    out: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let bytes = state
        .renderer(document.doc_type)
        .render(document, state.logo())?;
    let dir = out.unwrap_or_else(|| state.config.output.dir.clone());
    write_pdf(
        &dir,
        &output_file_name(document.doc_type, &document.header.doc_number),
        &bytes,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::tests::{test_state, PASSWORD};
    use billforge_core::{CoreError, ValidationError};
    use billforge_db::DbError;
    use rust_decimal::Decimal;

    pub(crate) fn args(number: &str) -> CreateArgs {
        CreateArgs {
            number: number.to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 8, 31),
            customer: "The Secretary".to_string(),
            address: vec!["Rayat Shikshan Sanstha's".into(), "Satara 415002".into()],
            items: "-".to_string(),
            cgst: Decimal::from(9),
            sgst: Decimal::from(9),
            discount: Decimal::ZERO,
            out: None,
        }
    }

    const ITEMS: &str = "A | 1 | 100\nB | 2 | 50\n";

    #[tokio::test]
    async fn test_create_saves_and_writes_pdf() {
        let mut state = test_state().await;
        state.login_with("admin", PASSWORD).unwrap();

        let created = execute(&state, DocType::Invoice, &args("DC0001"), ITEMS)
            .await
            .unwrap();

        assert_eq!(created.stored.total, Money::from_major_minor(236, 0));
        assert!(created.pdf_path.ends_with("Invoice_DC0001.pdf"));
        let bytes = std::fs::read(&created.pdf_path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let found = state
            .db
            .documents()
            .get_by_number(DocType::Invoice, "DC0001")
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_missing_logo_still_renders() {
        let AppState { mut config, db, .. } = test_state().await;
        config.assets.logo_path = Some(config.output.dir.join("no-such-logo.png"));
        let mut state = AppState::with_database(config, db);
        state.login_with("admin", PASSWORD).unwrap();
        assert!(state.logo().is_none());

        let created = execute(&state, DocType::Invoice, &args("DC0009"), "Data Center | 1 | 100\n")
            .await
            .unwrap();

        let bytes = std::fs::read(&created.pdf_path).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Data Center) Tj"));
        assert!(!text.contains("/Subtype /Image"));
    }

    #[tokio::test]
    async fn test_create_requires_login() {
        let state = test_state().await;
        let err = execute(&state, DocType::Invoice, &args("DC0001"), ITEMS)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::auth::AuthError>(),
            Some(crate::auth::AuthError::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn test_bad_item_line_saves_nothing() {
        let mut state = test_state().await;
        state.login_with("admin", PASSWORD).unwrap();

        let err = execute(&state, DocType::Invoice, &args("DC0002"), "Hosting | 1\n")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidItemLine { line: 1, .. })
        ));
        assert!(state.db.documents().fetch_all(DocType::Invoice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_rate_rejected_before_insert() {
        let mut state = test_state().await;
        state.login_with("admin", PASSWORD).unwrap();

        let mut bad = args("DC0003");
        bad.cgst = Decimal::from(-1);
        let err = execute(&state, DocType::Invoice, &bad, ITEMS).await.unwrap_err();
        assert!(err.downcast_ref::<CoreError>().is_some());
        assert!(state.db.documents().fetch_all(DocType::Invoice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let mut state = test_state().await;
        state.login_with("admin", PASSWORD).unwrap();

        execute(&state, DocType::Quotation, &args("Q-1"), ITEMS).await.unwrap();
        let err = execute(&state, DocType::Quotation, &args("Q-1"), ITEMS)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::UniqueViolation { .. })
        ));

        // Same number is free in the other partition.
        execute(&state, DocType::Invoice, &args("Q-1"), ITEMS).await.unwrap();
    }
}
