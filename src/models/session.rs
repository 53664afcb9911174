use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached user record for the signed-in agent/admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Option<String>,
    pub name: String,
    pub email: Option<String>,
}

/// Authenticated session context
///
/// Created at login, loaded at command start, removed on logout or once
/// `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub token: String,
    pub user: SessionUser,
    pub role: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Start a new session
    pub fn new(token: String, user: SessionUser, role: String, ttl_secs: Option<i64>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            token,
            user,
            role,
            started_at: now,
            expires_at: ttl_secs.map(|secs| now + chrono::Duration::seconds(secs)),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
