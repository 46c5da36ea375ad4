//! # Commands
//!
//! One module per subcommand. Each `execute` takes the shared [`AppState`]
//! and returns data; printing happens in the dispatcher so the handlers can
//! be tested against an in-memory database.
//!
//! ```text
//! commands/
//! ├── create.rs   validate → insert → render → write
//! ├── list.rs     history table, newest first
//! ├── render.rs   re-render a stored record
//! ├── delete.rs   remove by number (--confirm)
//! └── summary.rs  count / revenue / average
//! ```
//!
//! [`AppState`]: crate::state::AppState

pub mod create;
pub mod delete;
pub mod list;
pub mod render;
pub mod summary;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

/// Writes PDF bytes into `dir`, creating it if needed.
pub(crate) fn write_pdf(dir: &Path, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create output directory {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).with_context(|| format!("Cannot write {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "PDF written");
    Ok(path)
}
