//! # Application State
//!
//! Built once at startup and handed to every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           AppState                                      │
//! │                                                                         │
//! │  config   ── AppConfig (TOML + env, validated)                         │
//! │  db       ── Database (SQLite pool, migrations applied)                │
//! │  fonts    ── FontSet (resolved once: TrueType pair or Helvetica)       │
//! │  logo     ── Option<Arc<Logo>> (decoded once, read-only)               │
//! │  session  ── Option<Session> (present after a successful login)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use billforge_core::DocType;
use billforge_db::{Database, DbConfig};
use billforge_pdf::{DocumentRenderer, FontSet, Logo};
use tracing::info;

use crate::auth::{AuthError, Session};
use crate::config::AppConfig;

pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub fonts: FontSet,
    pub logo: Option<Arc<Logo>>,
    pub session: Option<Session>,
}

impl AppState {
    /// Opens the database named by the config and resolves assets.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db_path = config.database_path()?;
        info!(path = %db_path.display(), "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        Ok(Self::with_database(config, db))
    }

    /// Uses an already-open database; fonts and logo are resolved here.
    pub fn with_database(config: AppConfig, db: Database) -> Self {
        let fonts = FontSet::resolve(
            config.assets.font_regular.as_deref(),
            config.assets.font_bold.as_deref(),
        );
        let logo = config
            .assets
            .logo_path
            .as_deref()
            .and_then(Logo::load)
            .map(Arc::new);

        info!(
            embedded_fonts = fonts.is_embedded(),
            logo = logo.is_some(),
            "State initialized"
        );

        AppState {
            config,
            db,
            fonts,
            logo,
            session: None,
        }
    }

    /// Logs in with the password from the environment.
    pub fn login(&mut self, username: &str) -> Result<&Session, AuthError> {
        let session = Session::login_from_env(&self.config.auth, username)?;
        Ok(self.session.insert(session))
    }

    /// Logs in with an explicit password.
    pub fn login_with(&mut self, username: &str, password: &str) -> Result<&Session, AuthError> {
        let session = Session::login(&self.config.auth, username, Some(password))?;
        Ok(self.session.insert(session))
    }

    /// The current session, or [`AuthError::NotLoggedIn`] when no login ran.
    pub fn require_session(&self) -> Result<&Session, AuthError> {
        self.session.as_ref().ok_or(AuthError::NotLoggedIn)
    }

    pub fn renderer(&self, doc_type: DocType) -> DocumentRenderer {
        DocumentRenderer::new(self.fonts.clone(), self.config.render_config(doc_type))
    }

    pub fn logo(&self) -> Option<&Logo> {
        self.logo.as_deref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::hash_password;

    pub(crate) const PASSWORD: &str = "s3cret";

    /// State over an in-memory database writing PDFs to a fresh temp dir.
    pub(crate) async fn test_state() -> AppState {
        let mut config = AppConfig::default();
        config.company.address = "Plot 7, MIDC\nSatara 415004".into();
        config.auth.password_sha256 = Some(hash_password(PASSWORD));
        config.output.dir = std::env::temp_dir().join(format!("billforge-{}", uuid::Uuid::new_v4()));

        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::with_database(config, db)
    }

    #[tokio::test]
    async fn test_state_without_assets() {
        let state = test_state().await;
        assert!(!state.fonts.is_embedded());
        assert!(state.logo().is_none());
        assert!(matches!(state.require_session(), Err(AuthError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_login_sets_session() {
        let mut state = test_state().await;
        assert!(state.login_with("admin", "wrong").is_err());
        assert!(state.session.is_none());

        state.login_with("admin", PASSWORD).unwrap();
        assert_eq!(state.require_session().unwrap().username(), "admin");
    }

    #[tokio::test]
    async fn test_renderer_follows_config() {
        let mut state = test_state().await;
        state.config.render.show_watermark = true;
        let renderer = state.renderer(DocType::Quotation);
        assert_eq!(renderer.config().doc_type, DocType::Quotation);
        assert!(renderer.config().show_watermark);
    }
}
