//! Driven port persisting the signed-in session between runs.

use super::define_port_error;
use crate::domain::Session;

define_port_error! {
    /// Errors raised while persisting the session.
    pub enum SessionStoreError {
        /// Storage could not be read or written.
        Io { message: String } =>
            "session storage failed: {message}",
        /// Stored content could not be decoded.
        Corrupt { message: String } =>
            "stored session is unreadable: {message}",
    }
}

/// Storage for the token, account and role held between logins.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Stored session, if any.
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Remove the stored session; succeeds when nothing is stored.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Store that keeps nothing; every load reports no session.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSessionStore;

impl SessionStore for NoSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        Ok(None)
    }

    fn save(&self, _session: &Session) -> Result<(), SessionStoreError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        Ok(())
    }
}
