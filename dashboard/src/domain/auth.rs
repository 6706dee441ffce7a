//! Authentication primitives and the explicit caller session.
//!
//! Login, password recovery and email verification inputs are validated here
//! before any request is issued. A successful login yields a [`Session`]
//! which callers pass to every operation that needs the bearer token or the
//! caller's role.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::user::{PASSWORD_MIN, is_valid_email};
use super::{Role, User};

/// Domain error returned when authentication inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// `seS_id` was missing or blank once trimmed.
    EmptySesId,
    /// Password shorter than the minimum.
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Email address failed the syntax check.
    InvalidEmail,
    /// One-time code was blank.
    EmptyCode,
    /// Reset or verification token was blank.
    EmptyToken,
    /// Password confirmation differs.
    PasswordMismatch,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySesId => write!(f, "Sesa-Id is required"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::EmptyCode => write!(f, "Verification code is required"),
            Self::EmptyToken => write!(f, "Reset link is invalid or expired"),
            Self::PasswordMismatch => write!(f, "Passwords must match"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Device class reported with a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Mobile browser or app.
    Mobile,
    /// Desktop browser; the dashboard always reports this.
    #[default]
    Desktop,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `ses_id` is trimmed and non-empty.
/// - `password` has at least [`PASSWORD_MIN`] characters.
///
/// # Examples
/// ```
/// use dashboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" SESA1 ", "secret1").unwrap();
/// assert_eq!(creds.ses_id(), "SESA1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoginCredentials {
    ses_id: String,
    password: Zeroizing<String>,
    latitude: f64,
    longitude: f64,
    device_type: DeviceType,
}

impl LoginCredentials {
    /// Construct desktop credentials with an unknown location.
    pub fn try_from_parts(ses_id: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = ses_id.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptySesId);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            ses_id: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            latitude: 0.0,
            longitude: 0.0,
            device_type: DeviceType::Desktop,
        })
    }

    /// Attach the caller's position and device class.
    #[must_use]
    pub fn with_location(mut self, latitude: f64, longitude: f64, device: DeviceType) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self.device_type = device;
        self
    }

    /// Login name.
    pub fn ses_id(&self) -> &str {
        &self.ses_id
    }

    /// Password as supplied.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Reported latitude.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Reported longitude.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Reported device class.
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }
}

/// Bearer token issued at login.
///
/// `Debug` output is redacted; the secret is wiped on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Expose the secret for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<AuthToken> for String {
    fn from(value: AuthToken) -> Self {
        value.0.as_str().to_owned()
    }
}

/// Backend answer to a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Issued bearer token.
    pub token: AuthToken,
    /// The authenticated account.
    pub user: User,
    /// Server notification text.
    pub message: String,
}

/// Raised when a login response cannot become a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The user's type does not name a known role.
    UnknownRole,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRole => write!(f, "account has no recognised role"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Authenticated caller: token, account and role.
///
/// The role is fixed at login and held until logout. It only selects which
/// affordances are offered; the backend still authorises every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    token: AuthToken,
    user: User,
    role: Role,
}

impl Session {
    /// Build a session from a login response.
    ///
    /// Any login the backend accepted opens a session, including one for an
    /// account that is not yet active; see [`Session::awaiting_approval`].
    pub fn from_login(response: LoginResponse) -> Result<Self, SessionError> {
        let role = response.user.role().ok_or(SessionError::UnknownRole)?;
        Ok(Self {
            token: response.token,
            user: response.user,
            role,
        })
    }

    /// Assemble a session from stored parts.
    pub fn new(token: AuthToken, user: User, role: Role) -> Self {
        Self { token, user, role }
    }

    /// Whether the signed-in account is still waiting for approval.
    pub fn awaiting_approval(&self) -> bool {
        !self.user.is_active
    }

    /// Bearer token.
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Authenticated account.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Caller role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Replace the cached account after a profile edit.
    pub fn refresh_user(&mut self, user: User) {
        self.user = user;
    }
}

/// Validated email address for recovery and verification flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate the syntax of `raw`.
    pub fn parse(raw: &str) -> Result<Self, LoginValidationError> {
        let trimmed = raw.trim();
        if !is_valid_email(trimmed) {
            return Err(LoginValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Password reset request carrying the token from the reset link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    token: String,
    password: Zeroizing<String>,
}

impl PasswordReset {
    /// Validate the link token, the new password and its confirmation.
    pub fn try_new(
        token: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Self, LoginValidationError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(LoginValidationError::EmptyToken);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password != confirm {
            return Err(LoginValidationError::PasswordMismatch);
        }
        Ok(Self {
            token: token.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Token from the reset link.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// New password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Server answer to an activation email request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationChallenge {
    /// Token to echo back with the one-time code.
    pub token: String,
    /// Seconds until the code expires.
    pub expires_in: u64,
    /// Server notification text.
    pub message: String,
}

/// One-time code submission completing email verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVerification {
    /// Address being verified.
    pub email: EmailAddress,
    /// Code received by email.
    pub otp: String,
    /// Token from the [`ActivationChallenge`].
    pub token: String,
}

impl EmailVerification {
    /// Validate a verification submission.
    pub fn try_new(
        email: EmailAddress,
        otp: &str,
        challenge: &ActivationChallenge,
    ) -> Result<Self, LoginValidationError> {
        let otp = otp.trim();
        if otp.is_empty() {
            return Err(LoginValidationError::EmptyCode);
        }
        Ok(Self {
            email,
            otp: otp.to_owned(),
            token: challenge.token.clone(),
        })
    }
}
