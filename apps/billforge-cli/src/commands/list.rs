//! `billforge list`: saved documents, newest first.

use billforge_core::DocType;
use billforge_db::StoredDocument;
use comfy_table::{Cell, CellAlignment, Table};

use crate::state::AppState;

pub async fn execute(state: &AppState, doc_type: DocType) -> anyhow::Result<Vec<StoredDocument>> {
    Ok(state.db.documents().fetch_all(doc_type).await?)
}

/// History as a terminal table.
///
/// A record whose item blob cannot be read still lists, with 0 items.
pub fn table(documents: &[StoredDocument]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Number", "Date", "Customer", "Items", "Sub Total", "Total", "Saved",
    ]);

    for doc in documents {
        let items = doc.items_or_empty().len();
        table.add_row(vec![
            Cell::new(&doc.header.doc_number),
            Cell::new(doc.header.date_display()),
            Cell::new(&doc.header.customer_name),
            Cell::new(items).set_alignment(CellAlignment::Right),
            Cell::new(doc.subtotal.format_grouped()).set_alignment(CellAlignment::Right),
            Cell::new(doc.total.format_grouped()).set_alignment(CellAlignment::Right),
            Cell::new(doc.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::state::tests::{test_state, PASSWORD};

    #[tokio::test]
    async fn test_list_newest_first_per_type() {
        let mut state = test_state().await;
        state.login_with("admin", PASSWORD).unwrap();

        for number in ["DC0001", "DC0002"] {
            create::execute(
                &state,
                DocType::Invoice,
                &create::tests::args(number),
                "Hosting | 1 | 1500",
            )
            .await
            .unwrap();
        }

        let invoices = execute(&state, DocType::Invoice).await.unwrap();
        let numbers: Vec<&str> = invoices.iter().map(|d| d.header.doc_number.as_str()).collect();
        assert_eq!(numbers, vec!["DC0002", "DC0001"]);
        assert!(execute(&state, DocType::Quotation).await.unwrap().is_empty());

        let rendered = table(&invoices).to_string();
        assert!(rendered.contains("DC0002"));
        assert!(rendered.contains("1,770.00"));
    }
}
