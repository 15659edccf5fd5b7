pub mod customer_service;
pub mod request_id;
pub mod request_service;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::role::{self, Role};
use crate::database::models::{RequestStatus, User};
use crate::store::{StoreError, UserStore};

pub use customer_service::CustomerService;
pub use request_id::RequestIdGenerator;
pub use request_service::{RequestFilter, RequestService};

/// Expected, recoverable outcomes of the workflow, surfaced to the caller
/// with enough detail to render a message. Store failures pass through
/// opaquely as `Storage`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("request {request_id} is already {status}")]
    InvalidTransition {
        request_id: String,
        status: RequestStatus,
    },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Resolve the acting user and check their stored role against the
/// required minimum. The stored role wins over whatever the token claims,
/// so a demoted or deleted user loses access on their next call.
pub(crate) async fn require_role(
    users: &dyn UserStore,
    actor: Uuid,
    required: Role,
) -> Result<User, ServiceError> {
    let user = users
        .get(actor)
        .await?
        .ok_or_else(|| ServiceError::PermissionDenied(format!("unknown user: {actor}")))?;

    if !role::has_permission(&user.role, required) {
        return Err(ServiceError::PermissionDenied(format!(
            "role '{}' does not satisfy required role '{}'",
            user.role, required
        )));
    }

    Ok(user)
}
