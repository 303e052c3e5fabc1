use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

/// The persisted session record. A logged-in record always carries a
/// non-empty token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub auth_token: Option<String>,
    pub user_email: Option<String>,
    #[serde(default)]
    pub is_logged_in: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Durable storage of the current session.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default location, `<config_dir>/fitlog/session.toml`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(
            dirs::config_dir()
                .context("Cannot determine config directory")?
                .join("fitlog")
                .join("session.toml"),
        ))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persists the token and email and marks the session logged in. The
    /// record is on disk when this returns.
    pub fn save(&self, token: &str, email: &str) -> Result<()> {
        let session = Session {
            auth_token: Some(token.to_string()),
            user_email: Some(email.to_string()),
            is_logged_in: true,
        };
        let raw = toml::to_string_pretty(&session)?;
        secure_write(&self.path, &raw)
    }

    /// The last saved session, or the anonymous record if nothing was ever
    /// saved. A stored record claiming to be logged in without a token
    /// reads back as anonymous.
    pub fn read(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::anonymous());
        }

        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session at {}", self.path.display()))?;
        let session: Session = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse session at {}", self.path.display()))?;

        let token_missing = session
            .auth_token
            .as_deref()
            .map_or(true, |token| token.is_empty());
        if session.is_logged_in && token_missing {
            return Ok(Session::anonymous());
        }

        Ok(session)
    }

    /// Erases the stored session. Calling it again is a no-op.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}
