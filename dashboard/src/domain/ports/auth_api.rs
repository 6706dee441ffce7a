//! Driven port for authentication and account recovery endpoints.

use async_trait::async_trait;

use super::{ApiError, MutationAck};
use crate::domain::{
    ActivationChallenge, EmailAddress, EmailVerification, LoginCredentials, LoginResponse,
    PasswordReset,
};

/// Result of a successful email verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedEmail {
    /// Token to attach to the self-service registration.
    pub token: String,
    /// Server notification text.
    pub message: String,
}

/// Authentication endpoints. None of them needs a bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token and the account.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError>;

    /// Ask for a password reset link for `ses_id`.
    async fn forgot_password(&self, ses_id: &str) -> Result<MutationAck, ApiError>;

    /// Set a new password using a reset link token.
    async fn reset_password(&self, reset: &PasswordReset) -> Result<MutationAck, ApiError>;

    /// Send a one-time code to `email` before self-registration.
    async fn send_activation_email(
        &self,
        email: &EmailAddress,
    ) -> Result<ActivationChallenge, ApiError>;

    /// Confirm the one-time code.
    async fn verify_email(
        &self,
        verification: &EmailVerification,
    ) -> Result<VerifiedEmail, ApiError>;
}
