use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use log::{info, warn};
use thiserror::Error;
use crate::models::Session;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse session file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// File-backed session storage (one JSON document)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current session; expired sessions are cleared and reported as absent
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|source| SessionError::Io { path: self.path.clone(), source })?;
        let session: Session = serde_json::from_str(&content)
            .map_err(|source| SessionError::Corrupt { path: self.path.clone(), source })?;

        if session.is_expired(now) {
            warn!("session {} for {} expired; clearing", session.id, session.user.name);
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Persist a session, creating parent directories if needed
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if session.token.trim().is_empty() {
            return Err(SessionError::EmptyField("Token"));
        }
        if session.user.name.trim().is_empty() {
            return Err(SessionError::EmptyField("User name"));
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| SessionError::Io { path: parent.to_path_buf(), source })?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|source| SessionError::Corrupt { path: self.path.clone(), source })?;
        std::fs::write(&self.path, json)
            .map_err(|source| SessionError::Io { path: self.path.clone(), source })?;

        info!("saved session {} for {}", session.id, session.user.name);
        Ok(())
    }

    /// Remove the session file. Returns whether a session was present.
    pub fn clear(&self) -> Result<bool, SessionError> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .map_err(|source| SessionError::Io { path: self.path.clone(), source })?;
        info!("cleared session file {}", self.path.display());
        Ok(true)
    }
}
