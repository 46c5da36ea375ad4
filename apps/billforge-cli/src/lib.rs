//! # Billforge CLI
//!
//! Command line front end over the billforge crates.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         billforge <command>                             │
//! │                                                                         │
//! │  1. Initialize logging (stderr, RUST_LOG)                              │
//! │  2. Load AppConfig (billforge.toml → BILLFORGE_* → validate)           │
//! │  3. Build AppState (open SQLite, migrate, load fonts, decode logo)     │
//! │  4. Login if the command mutates data                                   │
//! │  5. Dispatch to commands::<name>::execute                               │
//! │  6. Print the result to stdout                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! | Code | Failure                                   |
//! |------|-------------------------------------------|
//! | 1    | anything not listed below                 |
//! | 2    | configuration                             |
//! | 3    | authentication                            |
//! | 4    | invalid input (items, rates, fields)      |
//! | 5    | document not found                        |
//! | 6    | duplicate document number                 |
//! | 7    | PDF rendering                             |

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod state;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use billforge_core::{CoreError, ValidationError};
use billforge_db::DbError;
use billforge_pdf::RenderError;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::auth::AuthError;
use crate::cli::{Cli, Command};
use crate::config::{AppConfig, ConfigError};
use crate::state::AppState;

/// Installs the log subscriber. Logs go to stderr; stdout carries results.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,billforge=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one parsed command line to completion.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let mut state = AppState::init(config).await?;
    let doc_type = cli.doc_type();

    if cli.command.is_mutating() {
        let username = cli
            .user
            .clone()
            .unwrap_or_else(|| state.config.auth.username.clone());
        state.login(&username)?;
    }

    info!(command = ?cli.command, doc_type = %doc_type, "Running");

    match cli.command {
        Command::Create(args) => {
            let items_text = read_items(&args.items)?;
            let created = commands::create::execute(&state, doc_type, &args, &items_text).await?;
            println!(
                "Saved {} {} (total {})",
                doc_type.label(),
                created.stored.header.doc_number,
                created.stored.total.format_grouped()
            );
            println!("{}", created.pdf_path.display());
        }
        Command::List => {
            let documents = commands::list::execute(&state, doc_type).await?;
            if documents.is_empty() {
                println!("No {}s saved yet", doc_type.label().to_lowercase());
            } else {
                println!("{}", commands::list::table(&documents));
            }
        }
        Command::Render { number, out } => {
            let path = commands::render::execute(&state, doc_type, &number, out).await?;
            println!("{}", path.display());
        }
        Command::Delete { number, confirm } => {
            commands::delete::execute(&state, doc_type, &number, confirm).await?;
            println!("Deleted {} {}", doc_type.label(), number.trim());
        }
        Command::Summary => {
            let summary = commands::summary::execute(&state, doc_type).await?;
            println!("{}", commands::summary::table(doc_type, &summary));
        }
    }

    state.db.close().await;
    Ok(())
}

/// Item text from a file, or from stdin when `source` is `-`.
fn read_items(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        debug!("Reading items from stdin");
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Cannot read items from stdin")?;
        Ok(text)
    } else {
        let path = Path::new(source);
        std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read items file {}", path.display()))
    }
}

/// Maps a failure to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        2
    } else if err.downcast_ref::<AuthError>().is_some() {
        3
    } else if err.downcast_ref::<ValidationError>().is_some()
        || err.downcast_ref::<CoreError>().is_some()
        || matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::Validation(_))
        )
    {
        4
    } else if let Some(db) = err.downcast_ref::<DbError>() {
        match db {
            DbError::NotFound { .. } => 5,
            DbError::UniqueViolation { .. } => 6,
            _ => 1,
        }
    } else if err.downcast_ref::<RenderError>().is_some() {
        7
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = anyhow::Error::from(AuthError::InvalidCredentials);
        assert_eq!(exit_code(&err), 3);
        let err = anyhow::Error::from(AuthError::NotLoggedIn);
        assert_eq!(exit_code(&err), 3);

        let err = anyhow::Error::from(ValidationError::InvalidItemLine {
            line: 2,
            reason: "expected 3 fields".into(),
        });
        assert_eq!(exit_code(&err), 4);

        let err = anyhow::Error::from(DbError::not_found("Invoice", "DC0001"));
        assert_eq!(exit_code(&err), 5);

        let err = anyhow::Error::from(DbError::duplicate("doc_number", "DC0001"));
        assert_eq!(exit_code(&err), 6);

        let err = anyhow::Error::from(ConfigError::NoDataDir);
        assert_eq!(exit_code(&err), 2);

        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), 1);
    }

    #[test]
    fn test_context_keeps_exit_code() {
        let err = anyhow::Error::from(DbError::duplicate("doc_number", "Q-1"))
            .context("while creating Q-1");
        assert_eq!(exit_code(&err), 6);
    }

    #[test]
    fn test_read_items_from_file() {
        let path = std::env::temp_dir().join(format!("billforge-items-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, "Hosting | 1 | 1500\n").unwrap();
        let text = read_items(path.to_str().unwrap()).unwrap();
        assert_eq!(text, "Hosting | 1 | 1500\n");
        std::fs::remove_file(&path).unwrap();

        assert!(read_items("/nonexistent/billforge/items.txt").is_err());
    }
}
