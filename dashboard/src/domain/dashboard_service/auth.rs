//! Login, logout and account recovery.

use tracing::{info, warn};

use super::Dashboard;
use crate::domain::ports::{AuthApi, DashboardApi, MutationAck, VerifiedEmail};
use crate::domain::{
    ActivationChallenge, EmailAddress, EmailVerification, Error, LoginCredentials,
    LoginValidationError, PasswordReset, Session, SessionError,
};

impl<B: DashboardApi> Dashboard<B> {
    /// Authenticate and open a session.
    ///
    /// The role is fixed from the login response. An accepted login for an
    /// account awaiting approval still opens a session. Cached data from a
    /// previous session is discarded and the new session is persisted; a
    /// storage failure is logged and does not fail the login.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let response = self.backend.login(credentials).await.map_err(|error| {
            warn!(ses_id = credentials.ses_id(), error = %error, "login failed");
            Error::from(error)
        })?;
        let session = Session::from_login(response)
            .map_err(|error: SessionError| Error::unauthorized(error.to_string()))?;
        self.cache.clear();
        if let Err(error) = self.sessions.save(&session) {
            warn!(error = %error, "failed to persist session");
        }
        info!(
            user = %session.user().id,
            role = session.role().as_str(),
            awaiting_approval = session.awaiting_approval(),
            "session opened"
        );
        Ok(session)
    }

    /// Session persisted by an earlier login, if any.
    pub fn restore_session(&self) -> Result<Option<Session>, Error> {
        self.sessions
            .load()
            .map_err(|error| Error::internal(error.to_string()))
    }

    /// Close `session`: drop cached data and forget the persisted token.
    pub fn logout(&self, session: Session) -> Result<(), Error> {
        self.cache.clear();
        self.sessions
            .clear()
            .map_err(|error| Error::internal(error.to_string()))?;
        info!(user = %session.user().id, "session closed");
        Ok(())
    }

    /// Ask the backend to email a reset link.
    pub async fn forgot_password(&self, ses_id: &str) -> Result<MutationAck, Error> {
        let ses_id = ses_id.trim();
        if ses_id.is_empty() {
            return Err(Error::invalid_request(LoginValidationError::EmptySesId.to_string()));
        }
        self.backend
            .forgot_password(ses_id)
            .await
            .map_err(Error::from)
    }

    /// Set a new password with the token from the reset link.
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<MutationAck, Error> {
        self.backend
            .reset_password(reset)
            .await
            .map_err(Error::from)
    }

    /// Send a one-time code to `email`.
    pub async fn send_activation_email(
        &self,
        email: &EmailAddress,
    ) -> Result<ActivationChallenge, Error> {
        self.backend
            .send_activation_email(email)
            .await
            .map_err(Error::from)
    }

    /// Confirm the one-time code; the returned token unlocks registration.
    pub async fn verify_email(
        &self,
        verification: &EmailVerification,
    ) -> Result<VerifiedEmail, Error> {
        self.backend
            .verify_email(verification)
            .await
            .map_err(Error::from)
    }
}
