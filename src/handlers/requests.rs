use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{ModificationRequest, NewRequest, RequestStatus, TerminalStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::RequestFilter;

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub customer_id: Option<i64>,
    pub status: Option<RequestStatus>,
    pub created_by: Option<Uuid>,
}

impl ListQuery {
    /// At most one filter dimension per call; two or more is a caller bug
    /// and fails loudly instead of picking a winner.
    fn into_filter(self) -> Result<RequestFilter, ApiError> {
        let dimensions = [
            self.customer_id.is_some(),
            self.status.is_some(),
            self.created_by.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if dimensions > 1 {
            return Err(ApiError::validation_error(
                "At most one of customerId, status, createdBy may be given",
            ));
        }

        Ok(if let Some(customer_id) = self.customer_id {
            RequestFilter::ByCustomer(customer_id)
        } else if let Some(status) = self.status {
            RequestFilter::ByStatus(status)
        } else if let Some(created_by) = self.created_by {
            RequestFilter::ByCreator(created_by)
        } else {
            RequestFilter::All
        })
    }
}

/// GET /api/requests?customerId=|status=|createdBy= - newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<ModificationRequest>> {
    let filter = query.into_filter()?;
    let requests = state.requests.list(auth_user.id, filter).await?;
    Ok(ApiResponse::success(requests))
}

/// GET /api/requests/:id - single request by surrogate id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<ModificationRequest> {
    let request = state.requests.get(auth_user.id, id).await?;
    Ok(ApiResponse::success(request))
}

/// POST /api/requests - file a modification request (operator and up)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(new): Json<NewRequest>,
) -> ApiResult<ModificationRequest> {
    let request = state.requests.create(auth_user.id, new).await?;
    Ok(ApiResponse::created(request))
}

/// PATCH /api/requests/:id/approve - supervisor verdict
pub async fn approve(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<ModificationRequest> {
    let request = state
        .requests
        .transition(auth_user.id, id, TerminalStatus::Approved)
        .await?;
    Ok(ApiResponse::success(request))
}

/// PATCH /api/requests/:id/reject - supervisor verdict
pub async fn reject(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<ModificationRequest> {
    let request = state
        .requests
        .transition(auth_user.id, id, TerminalStatus::Rejected)
        .await?;
    Ok(ApiResponse::success(request))
}

/// GET /api/pending-approvals - the supervisor work queue
pub async fn pending_approvals(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<ModificationRequest>> {
    let requests = state.requests.pending_approvals(auth_user.id).await?;
    Ok(ApiResponse::success(requests))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        customer_id: Option<i64>,
        status: Option<RequestStatus>,
        created_by: Option<Uuid>,
    ) -> ListQuery {
        ListQuery {
            customer_id,
            status,
            created_by,
        }
    }

    #[test]
    fn single_dimension_filters_are_accepted() {
        assert_eq!(
            query(Some(7), None, None).into_filter().unwrap(),
            RequestFilter::ByCustomer(7)
        );
        assert_eq!(
            query(None, Some(RequestStatus::Pending), None)
                .into_filter()
                .unwrap(),
            RequestFilter::ByStatus(RequestStatus::Pending)
        );
        assert_eq!(
            query(None, None, None).into_filter().unwrap(),
            RequestFilter::All
        );
    }

    #[test]
    fn combined_dimensions_are_rejected() {
        let err = query(Some(7), Some(RequestStatus::Pending), None)
            .into_filter()
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
