//! # Document Repository
//!
//! Database operations for saved invoices and quotations.
//!
//! ## Record Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Document Lifecycle                                │
//! │                                                                         │
//! │  1. INSERT (once)                                                      │
//! │     └── insert() → StoredDocument { id, created_at, totals, blob }     │
//! │         duplicate number for the same type → UniqueViolation          │
//! │                                                                         │
//! │  2. READ (many times)                                                  │
//! │     ├── fetch_all()      → history, newest first                       │
//! │     ├── get_by_number()  → one record, re-rendered on demand           │
//! │     └── summary()        → count / revenue / average                   │
//! │                                                                         │
//! │  3. DELETE (explicit)                                                  │
//! │     └── delete() → row removed, NotFound if it never existed           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money and rates are written as decimal TEXT and parsed back exactly.
//! Each write is one statement, so a failed insert leaves nothing behind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use billforge_core::items::{decode_stored_items, serialize_items};
use billforge_core::{
    DocType, Document, DocumentHeader, ItemsBlobError, LineItem, Money, TaxRate,
};

// =============================================================================
// Records
// =============================================================================

/// A document as persisted: header, serialized items, totals and the
/// server-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Surrogate key (UUID v4).
    pub id: String,
    pub doc_type: DocType,
    pub header: DocumentHeader,
    /// Versioned pipe-delimited item list, see `billforge_core::items`.
    pub items_blob: String,
    pub subtotal: Money,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Rebuilds the full document, failing on an unreadable item blob.
    pub fn to_document(&self) -> Result<Document, ItemsBlobError> {
        let items = decode_stored_items(&self.items_blob)?;
        Ok(Document::new(self.doc_type, self.header.clone(), items))
    }

    /// Items for display. A corrupt blob is logged and shows as empty so a
    /// history listing never fails on one bad row.
    pub fn items_or_empty(&self) -> Vec<LineItem> {
        match decode_stored_items(&self.items_blob) {
            Ok(items) => items,
            Err(err) => {
                warn!(
                    id = %self.id,
                    doc_number = %self.header.doc_number,
                    error = %err,
                    "Stored items unreadable, showing none"
                );
                Vec::new()
            }
        }
    }
}

/// Scalar aggregates shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueSummary {
    pub count: i64,
    pub total_revenue: Money,
    pub average: Money,
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    doc_type: DocType,
    doc_number: String,
    doc_date: NaiveDate,
    customer_name: String,
    customer_address: String,
    company_name: String,
    company_address: String,
    items: String,
    subtotal: String,
    cgst_rate: String,
    sgst_rate: String,
    discount: String,
    total: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = DbError;

    fn try_from(row: DocumentRow) -> DbResult<Self> {
        let subtotal = parse_decimal(&row.id, "subtotal", &row.subtotal)?;
        let cgst = parse_decimal(&row.id, "cgst_rate", &row.cgst_rate)?;
        let sgst = parse_decimal(&row.id, "sgst_rate", &row.sgst_rate)?;
        let discount = parse_decimal(&row.id, "discount", &row.discount)?;
        let total = parse_decimal(&row.id, "total", &row.total)?;

        Ok(StoredDocument {
            id: row.id,
            doc_type: row.doc_type,
            header: DocumentHeader {
                doc_number: row.doc_number,
                doc_date: row.doc_date,
                company_name: row.company_name,
                company_address: row.company_address,
                customer_name: row.customer_name,
                customer_address: row.customer_address,
                cgst_rate: TaxRate::from_percent(cgst),
                sgst_rate: TaxRate::from_percent(sgst),
                discount: Money::new(discount),
            },
            items_blob: row.items,
            subtotal: Money::new(subtotal),
            total: Money::new(total),
            created_at: row.created_at,
        })
    }
}

fn parse_decimal(id: &str, column: &str, text: &str) -> DbResult<Decimal> {
    Decimal::from_str(text.trim()).map_err(|e| DbError::CorruptRecord {
        id: id.to_string(),
        reason: format!("{column} '{text}': {e}"),
    })
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for document database operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Persists a validated document and returns the stored record.
    ///
    /// ## Errors
    /// - `UniqueViolation` when the number already exists for this type
    pub async fn insert(&self, document: &Document) -> DbResult<StoredDocument> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let totals = document.totals();
        let items_blob = serialize_items(&document.items);

        let mut header = document.header.clone();
        header.doc_number = header.doc_number.trim().to_string();

        debug!(
            doc_type = document.doc_type.as_str(),
            doc_number = %header.doc_number,
            items = document.items.len(),
            "Inserting document"
        );

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, doc_type, doc_number, doc_date,
                customer_name, customer_address, company_name, company_address,
                items, subtotal, cgst_rate, sgst_rate, discount, total, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&id)
        .bind(document.doc_type)
        .bind(&header.doc_number)
        .bind(header.doc_date)
        .bind(&header.customer_name)
        .bind(&header.customer_address)
        .bind(&header.company_name)
        .bind(&header.company_address)
        .bind(&items_blob)
        .bind(totals.subtotal.amount().to_string())
        .bind(header.cgst_rate.percent().to_string())
        .bind(header.sgst_rate.percent().to_string())
        .bind(header.discount.amount().to_string())
        .bind(totals.grand_total.amount().to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate(
                format!("{} number", document.doc_type.as_str()),
                header.doc_number.clone(),
            ),
            other => other,
        })?;

        info!(
            id = %id,
            doc_type = document.doc_type.as_str(),
            doc_number = %header.doc_number,
            total = %totals.grand_total,
            "Document saved"
        );

        Ok(StoredDocument {
            id,
            doc_type: document.doc_type,
            header,
            items_blob,
            subtotal: totals.subtotal,
            total: totals.grand_total,
            created_at,
        })
    }

    /// Gets one document by its number.
    pub async fn get_by_number(
        &self,
        doc_type: DocType,
        doc_number: &str,
    ) -> DbResult<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, doc_type, doc_number, doc_date,
                   customer_name, customer_address, company_name, company_address,
                   items, subtotal, cgst_rate, sgst_rate, discount, total, created_at
            FROM documents
            WHERE doc_type = ?1 AND doc_number = ?2
            "#,
        )
        .bind(doc_type)
        .bind(doc_number.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoredDocument::try_from).transpose()
    }

    /// Lists every document of a type, newest first.
    pub async fn fetch_all(&self, doc_type: DocType) -> DbResult<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, doc_type, doc_number, doc_date,
                   customer_name, customer_address, company_name, company_address,
                   items, subtotal, cgst_rate, sgst_rate, discount, total, created_at
            FROM documents
            WHERE doc_type = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(doc_type)
        .fetch_all(&self.pool)
        .await?;

        debug!(doc_type = doc_type.as_str(), count = rows.len(), "Fetched documents");

        rows.into_iter().map(StoredDocument::try_from).collect()
    }

    /// Deletes a document by number.
    ///
    /// ## Errors
    /// - `NotFound` when no such document exists
    pub async fn delete(&self, doc_type: DocType, doc_number: &str) -> DbResult<()> {
        let doc_number = doc_number.trim();
        let result = sqlx::query("DELETE FROM documents WHERE doc_type = ?1 AND doc_number = ?2")
            .bind(doc_type)
            .bind(doc_number)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(doc_type.label(), doc_number));
        }

        info!(doc_type = doc_type.as_str(), doc_number = %doc_number, "Document deleted");
        Ok(())
    }

    /// Count, revenue sum and average of stored totals.
    ///
    /// Summed in Rust rather than SQL so the decimal TEXT columns never pass
    /// through floating point.
    pub async fn summary(&self, doc_type: DocType) -> DbResult<RevenueSummary> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, total FROM documents WHERE doc_type = ?1")
                .bind(doc_type)
                .fetch_all(&self.pool)
                .await?;

        let mut revenue = Decimal::ZERO;
        for (id, total) in &rows {
            revenue += parse_decimal(id, "total", total)?;
        }

        let count = rows.len() as i64;
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            revenue / Decimal::from(count)
        };

        Ok(RevenueSummary {
            count,
            total_revenue: Money::new(revenue),
            average: Money::new(average),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
