//! Bearer credentials for the presentation service.
//!
//! SYSTEM CONTEXT
//! ==============
//! Session storage belongs to the host. The HTTP client only asks for the
//! current token and reports a 401 back so the host can end the session.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Mutex, PoisonError};

/// Supplies the bearer credential and learns when it was rejected.
pub trait CredentialProvider: Send + Sync {
    /// Current token, if signed in.
    fn bearer_token(&self) -> Option<String>;

    /// The service rejected the token; drop the session.
    fn invalidate(&self);
}

/// In-memory session token.
#[derive(Debug, Default)]
pub struct SessionToken {
    token: Mutex<Option<String>>,
}

impl SessionToken {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { token: Mutex::new(token) }
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }
}

impl CredentialProvider for SessionToken {
    fn bearer_token(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn invalidate(&self) {
        tracing::warn!("session token rejected; signing out");
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
