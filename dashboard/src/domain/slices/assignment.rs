//! Assignment draft and bulk assignment report.

use std::fmt;

use serde_json::json;

use crate::domain::{EntityId, Error, User};

/// Message for adding a user already present in the draft.
pub const ALREADY_ASSIGNED: &str = "User already assigned";
/// Message for submitting without a product or without users.
pub const INCOMPLETE_ASSIGNMENT: &str = "Please select a product and user";
/// Message for a batch where at least one request failed.
pub const ASSIGNMENT_FAILED: &str = "Failed to assign product";

/// Raised by draft edits and submission checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// The user is already in the draft.
    AlreadyAssigned(EntityId),
    /// Product or users missing.
    Incomplete,
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAssigned(_) => f.write_str(ALREADY_ASSIGNED),
            Self::Incomplete => f.write_str(INCOMPLETE_ASSIGNMENT),
        }
    }
}

impl std::error::Error for AssignmentError {}

/// User picked for assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedUser {
    /// User id.
    pub id: EntityId,
    /// Name shown on the chip.
    pub name: String,
}

impl From<&User> for AssignedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

/// Product and users collected before a bulk assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDraft {
    product: Option<EntityId>,
    users: Vec<AssignedUser>,
}

impl AssignmentDraft {
    /// Selected product.
    pub fn product(&self) -> Option<&EntityId> {
        self.product.as_ref()
    }

    /// Picked users in insertion order.
    pub fn users(&self) -> &[AssignedUser] {
        &self.users
    }

    /// Select or clear the product.
    pub fn select_product(&mut self, product: Option<EntityId>) {
        self.product = product;
    }

    /// Add one user; rejects duplicates.
    pub fn add(&mut self, user: AssignedUser) -> Result<(), AssignmentError> {
        if self.contains(&user.id) {
            return Err(AssignmentError::AlreadyAssigned(user.id));
        }
        self.users.push(user);
        Ok(())
    }

    /// Remove a user; returns whether it was present.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        let before = self.users.len();
        self.users.retain(|user| &user.id != id);
        self.users.len() != before
    }

    /// Replace the picked users, dropping duplicate ids.
    pub fn replace_all(&mut self, users: impl IntoIterator<Item = AssignedUser>) {
        self.users.clear();
        for user in users {
            if !self.contains(&user.id) {
                self.users.push(user);
            }
        }
    }

    /// Remove every picked user, keeping the product.
    pub fn clear_users(&mut self) {
        self.users.clear();
    }

    /// Reset product and users.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `id` is picked.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.users.iter().any(|user| &user.id == id)
    }

    /// Product and user ids ready for submission.
    pub fn submission(&self) -> Result<(EntityId, Vec<EntityId>), AssignmentError> {
        match &self.product {
            Some(product) if !self.users.is_empty() => Ok((
                product.clone(),
                self.users.iter().map(|user| user.id.clone()).collect(),
            )),
            _ => Err(AssignmentError::Incomplete),
        }
    }
}

/// Outcome of one (product, user) request.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentOutcome {
    /// Mapping created.
    Assigned,
    /// Request failed.
    Failed(Error),
}

/// Per-user outcomes of a bulk assignment.
///
/// The batch counts as successful only when every request succeeded.
/// Successful requests are not rolled back when others fail; the outcomes
/// show which mappings landed.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAssignmentReport {
    product: EntityId,
    outcomes: Vec<(EntityId, AssignmentOutcome)>,
}

impl BulkAssignmentReport {
    /// Build a report from outcomes in submission order.
    pub fn new(product: EntityId, outcomes: Vec<(EntityId, AssignmentOutcome)>) -> Self {
        Self { product, outcomes }
    }

    /// Assigned product.
    pub fn product(&self) -> &EntityId {
        &self.product
    }

    /// Outcomes in submission order.
    pub fn outcomes(&self) -> &[(EntityId, AssignmentOutcome)] {
        &self.outcomes
    }

    /// Whether every request succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, outcome)| matches!(outcome, AssignmentOutcome::Assigned))
    }

    /// Users whose mapping was created.
    pub fn assigned(&self) -> Vec<&EntityId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, AssignmentOutcome::Assigned))
            .map(|(user, _)| user)
            .collect()
    }

    /// Users whose request failed, with the failure.
    pub fn failed(&self) -> Vec<(&EntityId, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|(user, outcome)| match outcome {
                AssignmentOutcome::Failed(error) => Some((user, error)),
                AssignmentOutcome::Assigned => None,
            })
            .collect()
    }

    /// Aggregate verdict: the report itself, or one failure for the batch.
    ///
    /// The failure's details list assigned and failed user ids.
    pub fn verdict(&self) -> Result<(), Error> {
        if self.is_success() {
            return Ok(());
        }
        let assigned: Vec<&str> = self.assigned().into_iter().map(EntityId::as_str).collect();
        let failed: Vec<_> = self
            .failed()
            .into_iter()
            .map(|(user, error)| json!({ "user": user.as_str(), "message": error.message() }))
            .collect();
        Err(Error::service_unavailable(ASSIGNMENT_FAILED).with_details(json!({
            "product": self.product.as_str(),
            "assigned": assigned,
            "failed": failed,
        })))
    }
}
