//! # Repository Module
//!
//! Database repository implementations for Billforge.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.documents().fetch_all(DocType::Invoice)                    │
//! │       ▼                                                                 │
//! │  DocumentRepository                                                    │
//! │  ├── insert(&self, document)                                           │
//! │  ├── get_by_number(&self, doc_type, number)                            │
//! │  ├── fetch_all(&self, doc_type)                                        │
//! │  ├── delete(&self, doc_type, number)                                   │
//! │  └── summary(&self, doc_type)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite `documents` table                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records are write-once: there is no update. A correction is a delete
//! followed by a new insert.

pub mod document;
