//! Bulk product assignment.

use futures_util::future::join_all;
use tracing::{info, warn};

use super::Dashboard;
use crate::domain::ports::{DashboardApi, MappingsApi};
use crate::domain::{
    AssignmentDraft, AssignmentOutcome, AuthToken, BulkAssignmentReport, EntityId, Error,
    INCOMPLETE_ASSIGNMENT, Mutation, NewMapping, Session, ViewState,
};

/// Send one create-mapping request per user, concurrently.
///
/// Every request is awaited; failures do not cancel or roll back the others.
pub(crate) async fn assign_to_users<M: MappingsApi + ?Sized>(
    api: &M,
    token: &AuthToken,
    product: &EntityId,
    users: Vec<EntityId>,
) -> BulkAssignmentReport {
    let requests = users.iter().map(|user| {
        let mapping = NewMapping {
            product: product.clone(),
            user: user.clone(),
        };
        async move { api.create_mapping(token, &mapping).await }
    });
    let results = join_all(requests).await;
    let outcomes = users
        .into_iter()
        .zip(results)
        .map(|(user, result)| match result {
            Ok(_) => (user, AssignmentOutcome::Assigned),
            Err(error) => {
                warn!(product = %product, user = %user, error = %error, "mapping request failed");
                (user, AssignmentOutcome::Failed(Error::from(error)))
            }
        })
        .collect();
    BulkAssignmentReport::new(product.clone(), outcomes)
}

impl<B: DashboardApi> Dashboard<B> {
    /// Assign the draft's product to every user in the draft.
    ///
    /// Returns the per-user report when every request succeeded. If any
    /// request failed the whole batch is reported as one failure whose
    /// details list what landed; mappings already created stay in place and
    /// the mapping list is still refreshed.
    pub async fn assign_product(
        &self,
        session: &Session,
        draft: &AssignmentDraft,
    ) -> Result<BulkAssignmentReport, Error> {
        let (product, users) = draft
            .submission()
            .map_err(|_| Error::invalid_request(INCOMPLETE_ASSIGNMENT))?;
        let requested = users.len();
        let report =
            assign_to_users(self.backend.as_ref(), session.token(), &product, users).await;
        let assigned = report.assigned().len();
        if assigned > 0 {
            self.refresh_after(session, &Mutation::CreateMapping).await;
        }
        info!(product = %product, requested, assigned, "bulk assignment finished");
        report.verdict()?;
        Ok(report)
    }

    /// Submit the view's draft and reset the view after full success.
    ///
    /// On failure the draft and selection are kept so the user can retry.
    pub async fn submit_assignment(
        &self,
        session: &Session,
        view: &mut ViewState,
    ) -> Result<BulkAssignmentReport, Error> {
        let report = self.assign_product(session, &view.draft).await?;
        view.finish_assignment();
        Ok(report)
    }
}
