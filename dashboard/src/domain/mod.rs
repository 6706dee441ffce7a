//! Domain primitives, view state and the dashboard service.
//!
//! Purpose: Define strongly typed records mirrored from the backend, the
//! validated inputs sent to it, the tag-invalidated query cache and the
//! client-side view state. Backend access goes through the driven ports in
//! [`ports`]; adapters live in `crate::outbound`.
//!
//! Public surface:
//! - [`Dashboard`]: cached reads, invalidating writes, bulk assignment and
//!   session handling over any [`ports::DashboardApi`].
//! - [`QueryCache`] with [`CacheTag`] and [`Mutation`]: the invalidation
//!   contract.
//! - [`SelectionState`], [`AssignmentDraft`], [`TableState`]: view slices.
//! - [`Role`] and [`Affordance`]: advisory role gating.
//! - [`Error`] and [`ErrorCode`]: the single displayable failure type.

pub mod access;
pub mod auth;
pub mod cache;
mod dashboard_service;
pub mod error;
pub mod geography;
pub mod ids;
pub mod organization;
pub mod ports;
pub mod product;
pub mod reference;
pub mod role;
pub mod slices;
pub mod user;

pub use self::access::{Affordance, ApprovalQueue, UserRow, UsersTableView};
pub use self::auth::{
    ActivationChallenge, AuthToken, DeviceType, EmailAddress, EmailVerification,
    LoginCredentials, LoginResponse, LoginValidationError, PasswordReset, Session, SessionError,
};
pub(crate) use self::cache::{FetchOutcome, Probe};
pub use self::cache::{
    CacheTag, EntityKind, Mutation, QueryCache, QueryData, QueryKey, QueryPayload, QuerySnapshot,
    QueryStatus, QuerySubscription, TagScope, ViewScope,
};
pub use self::dashboard_service::Dashboard;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geography::{
    City, Country, CountryUpdate, GeographyValidationError, NewCity, NewCountry, NewRegion,
    Region, RegionUpdate,
};
pub use self::ids::{EntityId, EntityIdValidationError};
pub use self::organization::{
    ImportFile, NewOrgUnit, OrgUnit, OrgUnitKind, OrgUnitValidationError,
};
pub use self::product::{
    DemoProduct, MappedProduct, NewMapping, ProductUpdate, ProductValidationError,
};
pub use self::reference::Reference;
pub use self::role::{Role, UnknownRole, UserType};
pub use self::slices::{
    ALREADY_ASSIGNED, ASSIGNMENT_FAILED, AssignedUser, AssignmentDraft, AssignmentError,
    AssignmentOutcome, BulkAssignmentReport, INCOMPLETE_ASSIGNMENT, INCOMPLETE_FILTERS,
    IncompleteFilters, Modal, SelectionState, TABLE_PAGE_SIZE, TableState, ViewState,
};
pub use self::user::{
    NewUser, PASSWORD_MIN, RegistrationForm, RegistrationOrigin, User, UserFilter, UserUpdate,
    UserValidationError, is_valid_email, validate_password,
};

/// Convenient result alias for dashboard operations.
///
/// # Examples
/// ```
/// use dashboard::domain::{DashResult, Error};
///
/// fn open_modal() -> DashResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(open_modal().is_err());
/// ```
pub type DashResult<T> = Result<T, Error>;
