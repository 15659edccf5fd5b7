use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::role::Role;
use crate::database::models::{ModificationRequest, NewRequest, RequestStatus, TerminalStatus};
use crate::store::{CustomerStore, InsertRequest, RequestStore, UserStore};

use super::{require_role, RequestIdGenerator, ServiceError};

/// One filter dimension per call. Multi-dimension filtering is rejected at
/// the HTTP layer before a filter is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFilter {
    ByCustomer(i64),
    ByStatus(RequestStatus),
    ByCreator(Uuid),
    All,
}

/// Request lifecycle controller.
///
/// Owns the pending → approved | rejected state machine and the role gates
/// in front of it. Every operation resolves the actor through the user
/// store and rejects before touching the request store.
#[derive(Clone)]
pub struct RequestService {
    requests: Arc<dyn RequestStore>,
    customers: Arc<dyn CustomerStore>,
    users: Arc<dyn UserStore>,
    id_generator: Arc<RequestIdGenerator>,
}

impl RequestService {
    pub fn new(
        requests: Arc<dyn RequestStore>,
        customers: Arc<dyn CustomerStore>,
        users: Arc<dyn UserStore>,
        id_generator: Arc<RequestIdGenerator>,
    ) -> Self {
        Self {
            requests,
            customers,
            users,
            id_generator,
        }
    }

    /// File a new modification request. Requires `operator`.
    pub async fn create(
        &self,
        actor: Uuid,
        new: NewRequest,
    ) -> Result<ModificationRequest, ServiceError> {
        let user = require_role(self.users.as_ref(), actor, Role::Operator).await?;

        if new.request_type.trim().is_empty() {
            return Err(ServiceError::Validation("requestType is required".into()));
        }
        if new.reason.trim().is_empty() {
            return Err(ServiceError::Validation("reason is required".into()));
        }
        if new.new_value.is_null() {
            return Err(ServiceError::Validation("newValue is required".into()));
        }

        // The referenced customer must exist at creation time.
        self.customers
            .get_by_id(new.customer_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {} not found", new.customer_id)))?;

        let request_id = self.id_generator.next();
        let request = self
            .requests
            .insert(InsertRequest {
                request_id,
                customer_id: new.customer_id,
                request_type: new.request_type,
                current_value: new.current_value,
                new_value: new.new_value,
                reason: new.reason,
                created_by: user.id,
            })
            .await?;

        info!(
            request_id = %request.request_id,
            customer_id = request.customer_id,
            request_type = %request.request_type,
            "modification request created"
        );
        Ok(request)
    }

    /// Move a pending request to its terminal state. Requires `supervisor`.
    ///
    /// The store update is guarded on the pre-transition status, so of two
    /// racing verdicts exactly one wins and the loser sees
    /// `InvalidTransition`.
    pub async fn transition(
        &self,
        actor: Uuid,
        id: i64,
        verdict: TerminalStatus,
    ) -> Result<ModificationRequest, ServiceError> {
        let user = require_role(self.users.as_ref(), actor, Role::Supervisor).await?;

        match self.requests.update_status(id, verdict, user.id).await? {
            Some(request) => {
                info!(
                    request_id = %request.request_id,
                    status = %request.status,
                    approved_by = %user.id,
                    "modification request decided"
                );
                Ok(request)
            }
            None => match self.requests.get_by_id(id).await? {
                Some(existing) => Err(ServiceError::InvalidTransition {
                    request_id: existing.request_id,
                    status: existing.status,
                }),
                None => Err(ServiceError::NotFound(format!("request {id} not found"))),
            },
        }
    }

    /// Fetch a single request. Requires `readonly`.
    pub async fn get(&self, actor: Uuid, id: i64) -> Result<ModificationRequest, ServiceError> {
        require_role(self.users.as_ref(), actor, Role::Readonly).await?;

        self.requests
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("request {id} not found")))
    }

    /// List requests for one filter dimension, newest first. Requires
    /// `readonly`. Ordering comes from the store query, not from here.
    pub async fn list(
        &self,
        actor: Uuid,
        filter: RequestFilter,
    ) -> Result<Vec<ModificationRequest>, ServiceError> {
        require_role(self.users.as_ref(), actor, Role::Readonly).await?;

        let requests = match filter {
            RequestFilter::ByCustomer(customer_id) => {
                self.requests.query_by_customer(customer_id).await?
            }
            RequestFilter::ByStatus(status) => self.requests.query_by_status(status).await?,
            RequestFilter::ByCreator(user_id) => self.requests.query_by_creator(user_id).await?,
            RequestFilter::All => self.requests.list_all().await?,
        };
        Ok(requests)
    }

    /// Pending queue for the approvals screen. Requires `supervisor`.
    pub async fn pending_approvals(
        &self,
        actor: Uuid,
    ) -> Result<Vec<ModificationRequest>, ServiceError> {
        require_role(self.users.as_ref(), actor, Role::Supervisor).await?;
        Ok(self.requests.query_by_status(RequestStatus::Pending).await?)
    }
}
