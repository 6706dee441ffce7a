//! User records, registration forms and partial updates.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{EntityId, Reference, Role};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors raised by registration and profile forms.
///
/// Messages are the notification texts shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptySesId,
    InvalidEmail,
    PasswordTooShort { min: usize },
    PasswordMismatch,
    MissingRole,
    MissingRegion,
    MissingCountry,
    EmptyDepartment,
    EmptyDesignation,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::EmptySesId => write!(f, "Sesa-Id is required"),
            Self::InvalidEmail => write!(f, "Invalid email address"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordMismatch => write!(f, "Passwords must match"),
            Self::MissingRole => write!(f, "Role is required"),
            Self::MissingRegion => write!(f, "Region is required"),
            Self::MissingCountry => write!(f, "Country is required"),
            Self::EmptyDepartment => write!(f, "Department is required"),
            Self::EmptyDesignation => write!(f, "Designation is required"),
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whether `value` looks like an email address.
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value.trim())
}

/// Validate a password against the length rule shared by every form.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    Ok(())
}

/// Dashboard account as listed by the backend.
///
/// ## Invariants
/// - `id` is a valid [`EntityId`].
/// - references are normalised; see [`Reference`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier.
    pub id: EntityId,
    /// External employee id (`seS_id`), used as the login name.
    pub ses_id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// Whether an administrator approved a self-registration.
    pub is_approved: bool,
    /// Department name.
    pub department: String,
    /// Designation name.
    pub designation: String,
    /// Owning region.
    pub region: Option<Reference>,
    /// Owning country.
    pub country: Option<Reference>,
    /// User type; the name carries the role.
    pub user_type: Option<Reference>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Role named by the user type, if recognised.
    pub fn role(&self) -> Option<Role> {
        self.user_type
            .as_ref()
            .and_then(Reference::name)
            .and_then(|name| name.parse().ok())
    }

    /// Whether the account is waiting for approval.
    pub fn is_pending(&self) -> bool {
        !self.is_active
    }

    /// Case-insensitive match against name, email and `seS_id`.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.name, &self.email, &self.ses_id]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// How an account comes into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOrigin {
    /// Self-service sign up: inactive and unapproved until reviewed.
    SelfService,
    /// Created by an administrator: active immediately.
    Administrator,
}

/// Raw registration form input, validated by [`RegistrationForm::validate`].
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub ses_id: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: Option<EntityId>,
    pub region: Option<EntityId>,
    pub country: Option<EntityId>,
    pub department: String,
    pub designation: String,
    /// Token returned by email verification, required by self-service sign up.
    pub verification_token: Option<String>,
}

impl RegistrationForm {
    /// Validate the form and produce the payload sent to the backend.
    ///
    /// Checks run in form order so the first message matches the first
    /// offending field.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{EntityId, RegistrationForm, RegistrationOrigin, UserValidationError};
    ///
    /// let form = RegistrationForm { name: "Ada".into(), ..RegistrationForm::default() };
    /// let err = form.validate(RegistrationOrigin::SelfService).unwrap_err();
    /// assert_eq!(err, UserValidationError::EmptySesId);
    /// ```
    pub fn validate(self, origin: RegistrationOrigin) -> Result<NewUser, UserValidationError> {
        let name = required(self.name, UserValidationError::EmptyName)?;
        let ses_id = required(self.ses_id, UserValidationError::EmptySesId)?;
        if !is_valid_email(&self.email) {
            return Err(UserValidationError::InvalidEmail);
        }
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(UserValidationError::PasswordMismatch);
        }
        let user_type = self.user_type.ok_or(UserValidationError::MissingRole)?;
        let region = self.region.ok_or(UserValidationError::MissingRegion)?;
        let country = self.country.ok_or(UserValidationError::MissingCountry)?;
        let department = required(self.department, UserValidationError::EmptyDepartment)?;
        let designation = required(self.designation, UserValidationError::EmptyDesignation)?;

        let activated = origin == RegistrationOrigin::Administrator;
        Ok(NewUser {
            name,
            ses_id,
            email: self.email.trim().to_owned(),
            password: Zeroizing::new(self.password),
            user_type,
            region,
            country,
            department,
            designation,
            is_active: activated,
            is_approved: activated,
            verification_token: self.verification_token,
        })
    }
}

fn required(value: String, error: UserValidationError) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub ses_id: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub user_type: EntityId,
    pub region: EntityId,
    pub country: EntityId,
    pub department: String,
    pub designation: String,
    pub is_active: bool,
    pub is_approved: bool,
    pub verification_token: Option<String>,
}

/// Partial update sent as a `PATCH`; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub region: Option<EntityId>,
    pub country: Option<EntityId>,
    pub user_type: Option<EntityId>,
    pub is_active: Option<bool>,
    pub is_approved: Option<bool>,
}

impl UserUpdate {
    /// Toggle only the active flag.
    pub fn activation(active: bool) -> Self {
        Self {
            is_active: Some(active),
            ..Self::default()
        }
    }

    /// Approve or reject a registration; approval also activates.
    pub fn approval(approved: bool) -> Self {
        Self {
            is_active: Some(approved),
            is_approved: Some(approved),
            ..Self::default()
        }
    }

    /// Validate the fields that are present.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(UserValidationError::EmptyName);
        }
        if self.email.as_deref().is_some_and(|email| !is_valid_email(email)) {
            return Err(UserValidationError::InvalidEmail);
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        if self.region.is_some() && self.country.is_none() {
            // A new region without a country would leave the old country
            // pointing at the previous region.
            return Err(UserValidationError::MissingCountry);
        }
        Ok(())
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the present fields to `user`; used by in-memory adapters.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(department) = &self.department {
            user.department.clone_from(department);
        }
        if let Some(designation) = &self.designation {
            user.designation.clone_from(designation);
        }
        if let Some(region) = &self.region {
            user.region = Some(Reference::new(region.clone()));
        }
        if let Some(country) = &self.country {
            user.country = Some(Reference::new(country.clone()));
        }
        if let Some(user_type) = &self.user_type {
            user.user_type = Some(Reference::new(user_type.clone()));
        }
        if let Some(active) = self.is_active {
            user.is_active = active;
        }
        if let Some(approved) = self.is_approved {
            user.is_approved = approved;
        }
    }
}

/// Complete criteria for the "filter users" lookup.
///
/// Only [`crate::domain::SelectionState::filter_criteria`] builds one, so an
/// instance always carries all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub region: EntityId,
    pub country: EntityId,
    pub department: String,
    pub designation: String,
}

impl UserFilter {
    /// Whether `user` satisfies every criterion.
    pub fn matches(&self, user: &User) -> bool {
        user.region.as_ref().is_some_and(|r| r.points_to(&self.region))
            && user.country.as_ref().is_some_and(|c| c.points_to(&self.country))
            && user.department == self.department
            && user.designation == self.designation
    }
}
