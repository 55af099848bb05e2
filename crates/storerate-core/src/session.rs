//! # Session Record
//!
//! The identity kept on the client after a successful login. It is built
//! once from the login response, stored as a single value, and cleared as a
//! single value on logout or when the role gate refuses the role.

use crate::model::{Role, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The logged-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    /// Bearer token, when the server hands one out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionRecord {
    pub fn new(user_id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Errors from a [`SessionStore`] backend.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session record is corrupt: {0}")]
    Corrupt(String),
}

/// Where the session record lives between calls.
pub trait SessionStore {
    /// Read the current record, `None` when nobody is logged in.
    fn load(&self) -> Result<Option<SessionRecord>, SessionError>;

    /// Replace the current record.
    fn save(&mut self, record: &SessionRecord) -> Result<(), SessionError>;

    /// Remove any stored record. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Session storage held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    current: Option<SessionRecord>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, SessionError> {
        Ok(self.current.clone())
    }

    fn save(&mut self, record: &SessionRecord) -> Result<(), SessionError> {
        self.current = Some(record.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.current = None;
        Ok(())
    }
}
