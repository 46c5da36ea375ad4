//! # Session
//!
//! Mutating commands (create, delete) require the single shared credential.
//! The password never touches disk: the config holds its SHA-256 digest and
//! the CLI reads the clear text from `BILLFORGE_PASSWORD`.
//!
//! ```text
//! --user admin  +  BILLFORGE_PASSWORD=...
//!        │                  │
//!        │                  ▼
//!        │           sha256 → hex
//!        ▼                  ▼
//!  auth.username ==   auth.password_sha256 ==   → Session
//! ```

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AuthSettings;

/// Environment variable carrying the clear-text password.
pub const PASSWORD_ENV: &str = "BILLFORGE_PASSWORD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No password is configured; set auth.password_sha256 to enable this command")]
    NotConfigured,

    #[error("BILLFORGE_PASSWORD is not set")]
    MissingPassword,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in; pass --user and set BILLFORGE_PASSWORD")]
    NotLoggedIn,
}

/// Proof that the caller presented the shared credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    /// Checks `username`/`password` against the configured credential.
    pub fn login(
        settings: &AuthSettings,
        username: &str,
        password: Option<&str>,
    ) -> Result<Session, AuthError> {
        let expected = settings
            .password_sha256
            .as_deref()
            .ok_or(AuthError::NotConfigured)?;
        let password = password.ok_or(AuthError::MissingPassword)?;

        let user_ok = username == settings.username;
        let digest_ok = hash_password(password).eq_ignore_ascii_case(expected.trim());

        if user_ok && digest_ok {
            info!(user = %username, "Logged in");
            Ok(Session {
                username: username.to_string(),
            })
        } else {
            warn!(user = %username, "Login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Reads the password from the environment and logs in.
    pub fn login_from_env(settings: &AuthSettings, username: &str) -> Result<Session, AuthError> {
        let password = std::env::var(PASSWORD_ENV).ok();
        Self::login(settings, username, password.as_deref())
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Lowercase hex SHA-256 of `password`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AuthSettings {
        AuthSettings {
            username: "admin".into(),
            password_sha256: Some(hash_password("s3cret")),
        }
    }

    #[test]
    fn test_hash_password() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_login_success() {
        let session = Session::login(&settings(), "admin", Some("s3cret")).unwrap();
        assert_eq!(session.username(), "admin");
    }

    #[test]
    fn test_uppercase_digest_accepted() {
        let mut settings = settings();
        settings.password_sha256 = settings.password_sha256.map(|d| d.to_uppercase());
        assert!(Session::login(&settings, "admin", Some("s3cret")).is_ok());
    }

    #[test]
    fn test_login_failures() {
        assert_eq!(
            Session::login(&settings(), "admin", Some("wrong")),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            Session::login(&settings(), "root", Some("s3cret")),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            Session::login(&settings(), "admin", None),
            Err(AuthError::MissingPassword)
        );
        assert_eq!(
            Session::login(&AuthSettings::default(), "admin", Some("s3cret")),
            Err(AuthError::NotConfigured)
        );
    }
}
