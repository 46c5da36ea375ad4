//! # billforge-db: Database Layer for Billforge
//!
//! This crate provides the document store. It uses SQLite for local storage
//! with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Billforge Data Flow                              │
//! │                                                                         │
//! │  CLI command (create / list / render / delete / summary)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  billforge-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repository    │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │◄───│ (document.rs)  │   │  (embedded)  │   │   │
//! │  │   │  SqlitePool   │    │ DocumentRepo   │   │ 001_docs.sql │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir, or BILLFORGE_DB_PATH)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use billforge_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("billforge.db")).await?;
//! let saved = db.documents().insert(&document).await?;
//! let history = db.documents().fetch_all(DocType::Invoice).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};
pub use repository::document::{DocumentRepository, RevenueSummary, StoredDocument};
