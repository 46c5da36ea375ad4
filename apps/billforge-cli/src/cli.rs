//! Command line definition.

use std::path::PathBuf;

use billforge_core::DocType;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Debug, Parser)]
#[command(
    name = "billforge",
    version,
    about = "Invoices and quotations as PDF, with amounts in words"
)]
pub struct Cli {
    /// Config file (defaults to billforge.toml in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Work with quotations instead of invoices
    #[arg(long, global = true)]
    pub quotation: bool,

    /// Username for commands that change data (password from BILLFORGE_PASSWORD)
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn doc_type(&self) -> DocType {
        if self.quotation {
            DocType::Quotation
        } else {
            DocType::Invoice
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save a new document and write its PDF
    Create(CreateArgs),

    /// List saved documents, newest first
    List,

    /// Write the PDF of a saved document again
    Render {
        /// Document number
        number: String,

        /// Output directory (defaults to output.dir from the config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete a saved document
    Delete {
        /// Document number
        number: String,

        /// Required: deletion cannot be undone
        #[arg(long)]
        confirm: bool,
    },

    /// Count, revenue and average of saved documents
    Summary,
}

impl Command {
    /// Commands that change stored data and therefore need a login.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Command::Create(_) | Command::Delete { .. })
    }
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Document number, unique per document type
    #[arg(long)]
    pub number: String,

    /// Issue date as dd/mm/yyyy or yyyy-mm-dd (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Customer name
    #[arg(long)]
    pub customer: String,

    /// Customer address line; repeat for more lines
    #[arg(long = "address", required = true)]
    pub address: Vec<String>,

    /// File with one `description | qty | price` per line, `-` for stdin
    #[arg(long, default_value = "-")]
    pub items: String,

    /// CGST rate in percent
    #[arg(long, default_value = "9")]
    pub cgst: Decimal,

    /// SGST rate in percent
    #[arg(long, default_value = "9")]
    pub sgst: Decimal,

    /// Flat discount deducted after tax
    #[arg(long, default_value = "0")]
    pub discount: Decimal,

    /// Output directory (defaults to output.dir from the config)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Accepts `31/08/2025` and `2025-08-31`.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date '{value}', expected dd/mm/yyyy"))
}
