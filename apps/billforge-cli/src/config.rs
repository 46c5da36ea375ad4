//! # Application Configuration
//!
//! Everything the CLI needs that is not a per-command argument.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLFORGE_DB_PATH=/srv/billing/billforge.db                        │
//! │     BILLFORGE_COMPANY_NAME="Data Center"                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/billforge/billforge.toml (Linux)                         │
//! │     ~/Library/Application Support/com.billforge.billforge/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/billing/billforge.db"
//!
//! [company]
//! name = "Data Center"
//! address = "Plot 7, MIDC\nSatara 415004"
//! tagline = "Cloud & Colocation"
//!
//! [assets]
//! logo_path = "assets/logo.png"
//! font_regular = "assets/fonts/Inter-Regular.ttf"
//! font_bold = "assets/fonts/Inter-Bold.ttf"
//!
//! [render]
//! show_watermark = true
//! terms_on_new_page = false
//! # terms_text = ""          # empty string removes the terms block
//!
//! [render.theme]             # optional; replaces the per-type palette
//! primary = "#2D3748"
//! border = "#E2E8F0"
//!
//! [auth]
//! username = "admin"
//! password_sha256 = "<64 hex digits>"
//!
//! [output]
//! dir = "invoices"
//! ```

use std::path::{Path, PathBuf};

use billforge_core::DocType;
use billforge_pdf::{ColorTheme, RenderConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "billforge.toml";

/// Database file name inside the platform data directory.
pub const DB_FILE_NAME: &str = "billforge.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the platform data directory")]
    NoDataDir,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// The issuing company printed in every document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySettings {
    #[serde(default = "default_company_name")]
    pub name: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub tagline: Option<String>,
}

fn default_company_name() -> String {
    "Data Center".to_string()
}

impl Default for CompanySettings {
    fn default() -> Self {
        CompanySettings {
            name: default_company_name(),
            address: String::new(),
            tagline: None,
        }
    }
}

/// Optional files. Anything missing degrades gracefully at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetSettings {
    #[serde(default)]
    pub logo_path: Option<PathBuf>,

    #[serde(default)]
    pub font_regular: Option<PathBuf>,

    #[serde(default)]
    pub font_bold: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub show_watermark: bool,

    /// `None` prints the standard terms; an empty string prints none.
    #[serde(default)]
    pub terms_text: Option<String>,

    #[serde(default)]
    pub terms_on_new_page: bool,

    /// Overrides the per-type palette for both document types.
    #[serde(default)]
    pub theme: Option<ColorTheme>,
}

/// The single shared credential guarding mutating commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_username")]
    pub username: String,

    /// Lowercase hex SHA-256 of the password. Unset disables mutations.
    #[serde(default)]
    pub password_sha256: Option<String>,
}

fn default_username() -> String {
    "admin".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            username: default_username(),
            password_sha256: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory rendered PDFs are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            dir: default_output_dir(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub company: CompanySettings,

    #[serde(default)]
    pub assets: AssetSettings,

    #[serde(default)]
    pub render: RenderSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (an explicit `path` must exist; the platform default may not)
    /// 3. `BILLFORGE_*` environment variables
    /// 4. Validation
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(path = %path.display(), "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company.name.trim().is_empty() {
            return Err(ConfigError::Invalid("company.name must not be empty".into()));
        }

        if self.auth.username.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.username must not be empty".into()));
        }

        if let Some(digest) = &self.auth.password_sha256 {
            let digest = digest.trim();
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid(
                    "auth.password_sha256 must be 64 hex digits".into(),
                ));
            }
        }

        if self.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output.dir must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `BILLFORGE_*` variables from the process environment.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("BILLFORGE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("BILLFORGE_COMPANY_NAME") {
            self.company.name = name;
        }

        if let Some(address) = lookup("BILLFORGE_COMPANY_ADDRESS") {
            // Shells make real newlines awkward; accept a literal "\n".
            self.company.address = address.replace("\\n", "\n");
        }

        if let Some(tagline) = lookup("BILLFORGE_TAGLINE") {
            self.company.tagline = Some(tagline);
        }

        if let Some(path) = lookup("BILLFORGE_LOGO_PATH") {
            self.assets.logo_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("BILLFORGE_FONT_REGULAR") {
            self.assets.font_regular = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("BILLFORGE_FONT_BOLD") {
            self.assets.font_bold = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("BILLFORGE_WATERMARK") {
            match parse_bool(&flag) {
                Some(value) => self.render.show_watermark = value,
                None => warn!(value = %flag, "Ignoring BILLFORGE_WATERMARK, expected true/false"),
            }
        }

        if let Some(flag) = lookup("BILLFORGE_TERMS_ON_NEW_PAGE") {
            match parse_bool(&flag) {
                Some(value) => self.render.terms_on_new_page = value,
                None => warn!(value = %flag, "Ignoring BILLFORGE_TERMS_ON_NEW_PAGE, expected true/false"),
            }
        }

        if let Some(user) = lookup("BILLFORGE_USER") {
            self.auth.username = user;
        }

        if let Some(digest) = lookup("BILLFORGE_PASSWORD_SHA256") {
            self.auth.password_sha256 = Some(digest);
        }

        if let Some(dir) = lookup("BILLFORGE_OUTPUT_DIR") {
            debug!(dir = %dir, "Overriding output directory from environment");
            self.output.dir = PathBuf::from(dir);
        }
    }

    /// Render settings for one document type.
    pub fn render_config(&self, doc_type: DocType) -> RenderConfig {
        let mut config = RenderConfig::for_doc_type(doc_type)
            .with_watermark(self.render.show_watermark)
            .with_terms_on_new_page(self.render.terms_on_new_page);
        if let Some(theme) = self.render.theme {
            config = config.with_theme(theme);
        }
        if let Some(terms) = &self.render.terms_text {
            config = config.with_terms(Some(terms.clone()));
        }
        if let Some(tagline) = &self.company.tagline {
            config = config.with_tagline(tagline.clone());
        }
        config
    }

    /// Database file, defaulting to the platform data directory.
    ///
    /// ## Platform-Specific Paths
    /// - **Linux**: `~/.local/share/billforge/billforge.db`
    /// - **macOS**: `~/Library/Application Support/com.billforge.billforge/billforge.db`
    /// - **Windows**: `%APPDATA%\billforge\billforge\data\billforge.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        Ok(data_dir.join(DB_FILE_NAME))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "billforge", "billforge")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
