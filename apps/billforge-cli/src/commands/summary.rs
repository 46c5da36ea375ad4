//! `billforge summary`: count, revenue and average per document type.

use billforge_core::DocType;
use billforge_db::RevenueSummary;
use comfy_table::{Cell, CellAlignment, Table};

use crate::state::AppState;

pub async fn execute(state: &AppState, doc_type: DocType) -> anyhow::Result<RevenueSummary> {
    Ok(state.db.documents().summary(doc_type).await?)
}

pub fn table(doc_type: DocType, summary: &RevenueSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        format!("{}s", doc_type.label()),
        "Total Revenue".to_string(),
        "Average".to_string(),
    ]);
    table.add_row(vec![
        Cell::new(summary.count).set_alignment(CellAlignment::Right),
        Cell::new(summary.total_revenue.format_grouped()).set_alignment(CellAlignment::Right),
        Cell::new(summary.average.format_grouped()).set_alignment(CellAlignment::Right),
    ]);
    table
}
