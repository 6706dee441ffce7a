//! Role-gated view models.
//!
//! Roles only choose which controls a view offers. Every write is still
//! authorised by the backend, so nothing here guards a request.

use std::collections::BTreeSet;

use super::{EntityId, Role, User};

/// Control a view may present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Affordance {
    /// Open the edit dialog for a user.
    EditUser,
    /// Delete a user.
    DeleteUser,
    /// Activate or deactivate the selected users in one action.
    BulkActivate,
    /// Approve or reject a pending registration.
    ApproveUser,
    /// Create an employee account.
    CreateUser,
    /// Create an administrator account.
    CreateAdmin,
    /// Create, edit or delete regions and countries.
    ManageGeography,
    /// Add or import departments and designations.
    ManageOrgUnits,
    /// Assign demo products to users.
    AssignProducts,
    /// Edit or delete demo products.
    ManageProducts,
}

impl Affordance {
    /// Every affordance.
    pub const ALL: [Self; 10] = [
        Self::EditUser,
        Self::DeleteUser,
        Self::BulkActivate,
        Self::ApproveUser,
        Self::CreateUser,
        Self::CreateAdmin,
        Self::ManageGeography,
        Self::ManageOrgUnits,
        Self::AssignProducts,
        Self::ManageProducts,
    ];

    /// Affordances that act on one table row.
    const ROW: [Self; 3] = [Self::EditUser, Self::DeleteUser, Self::ApproveUser];
}

impl Role {
    /// Whether this role is offered `affordance`.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{Affordance, Role};
    ///
    /// assert!(Role::Admin.allows(Affordance::DeleteUser));
    /// assert!(Role::Regional.allows(Affordance::ApproveUser));
    /// assert!(!Role::Employee.allows(Affordance::EditUser));
    /// ```
    pub fn allows(self, affordance: Affordance) -> bool {
        match self {
            Self::Admin => true,
            Self::Regional => matches!(
                affordance,
                Affordance::EditUser | Affordance::ApproveUser | Affordance::CreateUser
            ),
            Self::Employee => false,
        }
    }

    /// Every affordance offered to this role.
    pub fn affordances(self) -> BTreeSet<Affordance> {
        Affordance::ALL
            .into_iter()
            .filter(|affordance| self.allows(*affordance))
            .collect()
    }

    /// Whether rows of `subject` are listed for this role.
    ///
    /// Regional administrators only see employee accounts.
    pub fn sees(self, subject: &User) -> bool {
        match self {
            Self::Regional => subject.role() == Some(Self::Employee),
            Self::Admin | Self::Employee => true,
        }
    }
}

/// One row of the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    /// User id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Login name.
    pub ses_id: String,
    /// Email.
    pub email: String,
    /// Role title, or the raw type name when unknown.
    pub role_title: String,
    /// Region label.
    pub region: Option<String>,
    /// Country label.
    pub country: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Row controls.
    pub actions: BTreeSet<Affordance>,
}

impl UserRow {
    fn build(viewer: Role, user: &User) -> Self {
        let role_title = user.role().map_or_else(
            || {
                user.user_type
                    .as_ref()
                    .map(|reference| reference.label().to_owned())
                    .unwrap_or_default()
            },
            |role| role.display_title().to_owned(),
        );
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            ses_id: user.ses_id.clone(),
            email: user.email.clone(),
            role_title,
            region: user.region.as_ref().map(|r| r.label().to_owned()),
            country: user.country.as_ref().map(|c| c.label().to_owned()),
            is_active: user.is_active,
            actions: Affordance::ROW
                .into_iter()
                .filter(|affordance| viewer.allows(*affordance))
                .filter(|affordance| *affordance != Affordance::ApproveUser || !user.is_active)
                .collect(),
        }
    }
}

/// Users table as presented to one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersTableView {
    /// Visible rows.
    pub rows: Vec<UserRow>,
    /// Table-level controls (create, bulk actions).
    pub controls: BTreeSet<Affordance>,
}

impl UsersTableView {
    /// Build the table for `viewer` from `users`, applying the search text.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{Role, UsersTableView};
    ///
    /// let view = UsersTableView::build(Role::Employee, &[], "");
    /// assert!(view.controls.is_empty());
    /// ```
    pub fn build(viewer: Role, users: &[User], search: &str) -> Self {
        let rows = users
            .iter()
            .filter(|user| viewer.sees(user))
            .filter(|user| user.matches_search(search))
            .map(|user| UserRow::build(viewer, user))
            .collect();
        let controls = [
            Affordance::BulkActivate,
            Affordance::CreateUser,
            Affordance::CreateAdmin,
        ]
        .into_iter()
        .filter(|affordance| viewer.allows(*affordance))
        .collect();
        Self { rows, controls }
    }

    /// Whether any row or table control is offered.
    pub fn has_controls(&self) -> bool {
        !self.controls.is_empty() || self.rows.iter().any(|row| !row.actions.is_empty())
    }
}

/// Pending registrations awaiting review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalQueue {
    /// Pending rows, oldest first when timestamps are known.
    pub rows: Vec<UserRow>,
    /// Whether the viewer may approve.
    pub can_approve: bool,
}

impl ApprovalQueue {
    /// Inactive users visible to `viewer`.
    pub fn build(viewer: Role, users: &[User]) -> Self {
        let mut pending: Vec<&User> = users
            .iter()
            .filter(|user| user.is_pending() && viewer.sees(user))
            .collect();
        pending.sort_by_key(|user| user.created_at);
        Self {
            rows: pending
                .into_iter()
                .map(|user| UserRow::build(viewer, user))
                .collect(),
            can_approve: viewer.allows(Affordance::ApproveUser),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Reference;
    use rstest::{fixture, rstest};

    fn user(id: &str, type_name: &str, active: bool) -> User {
        User {
            id: EntityId::new(id).expect("id"),
            ses_id: id.to_uppercase(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            is_active: active,
            is_approved: active,
            department: "Sales".into(),
            designation: "Engineer".into(),
            region: None,
            country: None,
            user_type: Some(Reference::named(EntityId::new("t").expect("id"), type_name)),
            created_at: None,
        }
    }

    #[fixture]
    fn users() -> Vec<User> {
        vec![
            user("a1", "admin", true),
            user("r1", "regional", true),
            user("e1", "employee", true),
            user("e2", "employee", false),
        ]
    }

    #[rstest]
    fn employee_sees_no_controls(users: Vec<User>) {
        let view = UsersTableView::build(Role::Employee, &users, "");
        assert_eq!(view.rows.len(), 4);
        assert!(!view.has_controls());
    }

    #[rstest]
    fn admin_sees_edit_delete_and_bulk(users: Vec<User>) {
        let view = UsersTableView::build(Role::Admin, &users, "");
        assert!(view.controls.contains(&Affordance::BulkActivate));
        assert!(view.controls.contains(&Affordance::CreateAdmin));
        assert!(view.rows.iter().all(|row| row.actions.contains(&Affordance::EditUser)
            && row.actions.contains(&Affordance::DeleteUser)));
    }

    #[rstest]
    fn regional_sees_only_employees(users: Vec<User>) {
        let view = UsersTableView::build(Role::Regional, &users, "");
        let ids: Vec<&str> = view.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["e1", "e2"]);
        assert!(!view.controls.contains(&Affordance::CreateAdmin));
        assert!(view.controls.contains(&Affordance::CreateUser));
    }

    #[rstest]
    fn approve_is_offered_only_on_pending_rows(users: Vec<User>) {
        let view = UsersTableView::build(Role::Regional, &users, "");
        let pending = view.rows.iter().find(|row| row.id.as_str() == "e2").expect("row");
        let active = view.rows.iter().find(|row| row.id.as_str() == "e1").expect("row");
        assert!(pending.actions.contains(&Affordance::ApproveUser));
        assert!(!active.actions.contains(&Affordance::ApproveUser));
    }

    #[rstest]
    #[case(Role::Admin, "The Maestro")]
    #[case(Role::Regional, "Experience Leader")]
    fn rows_show_role_titles(users: Vec<User>, #[case] subject: Role, #[case] title: &str) {
        let view = UsersTableView::build(Role::Admin, &users, "");
        let row = view
            .rows
            .iter()
            .find(|row| row.role_title == title)
            .expect("row with title");
        assert_eq!(users.iter().find(|u| u.id == row.id).and_then(User::role), Some(subject));
    }

    #[rstest]
    fn search_filters_rows(users: Vec<User>) {
        let view = UsersTableView::build(Role::Admin, &users, "e2@");
        assert_eq!(view.rows.len(), 1);
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::Regional, true)]
    #[case(Role::Employee, false)]
    fn approval_queue_lists_pending_users(
        users: Vec<User>,
        #[case] viewer: Role,
        #[case] can_approve: bool,
    ) {
        let queue = ApprovalQueue::build(viewer, &users);
        assert_eq!(queue.rows.len(), 1);
        assert_eq!(queue.can_approve, can_approve);
    }
}
