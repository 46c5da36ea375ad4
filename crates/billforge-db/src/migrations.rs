//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary, so
//! a fresh data directory gets its schema on the first `billforge` run.
//!
//! ```text
//! Database::new
//!     │
//!     ▼
//! _sqlx_migrations ──► which versions already ran?
//!     │
//!     ├── 001_documents.sql   documents table, UNIQUE (doc_type, doc_number)
//!     │
//!     ▼
//! pending files run in version order, each recorded with its checksum
//! ```
//!
//! Shipped files are immutable: sqlx refuses to start when a recorded
//! checksum no longer matches. Schema changes go into a new `NNN_name.sql`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. A no-op when the schema is current.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying migrations");
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    // The bookkeeping table is missing until the first run.
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_all_migrations_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (embedded, applied) = super::migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_status_before_first_run() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let (embedded, applied) = super::migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(applied, 0);

        db.run_migrations().await.unwrap();
        // Running twice is harmless.
        db.run_migrations().await.unwrap();
        assert!(db.documents().fetch_all(billforge_core::DocType::Invoice).await.unwrap().is_empty());
    }
}
