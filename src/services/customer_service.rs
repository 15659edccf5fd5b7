use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::role::Role;
use crate::config;
use crate::database::models::{Customer, CustomerDetail, NewCustomer};
use crate::store::{CustomerStore, SearchField, UserStore};

use super::{require_role, ServiceError};

/// Customer record plus its auxiliary detail rows, the shape the profile
/// screen consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    #[serde(flatten)]
    pub customer: Customer,
    pub details: Vec<CustomerDetail>,
}

/// Field-scoped customer lookup and the admin-gated creation path.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
    users: Arc<dyn UserStore>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerStore>, users: Arc<dyn UserStore>) -> Self {
        Self { customers, users }
    }

    /// Substring search over the chosen field. Requires `readonly`.
    ///
    /// An empty term returns an empty set rather than everything; the
    /// store is not consulted at all.
    pub async fn search(
        &self,
        actor: Uuid,
        term: &str,
        field: SearchField,
    ) -> Result<Vec<Customer>, ServiceError> {
        require_role(self.users.as_ref(), actor, Role::Readonly).await?;

        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let limit = config::config().api.max_search_results;
        Ok(self.customers.search(term, field, limit).await?)
    }

    /// Profile by surrogate id. Requires `readonly`.
    pub async fn profile(&self, actor: Uuid, id: i64) -> Result<CustomerProfile, ServiceError> {
        require_role(self.users.as_ref(), actor, Role::Readonly).await?;

        let customer = self
            .customers
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {id} not found")))?;
        let details = self.customers.details_for(customer.id).await?;
        Ok(CustomerProfile { customer, details })
    }

    /// Profile by UCC. Requires `readonly`.
    pub async fn profile_by_ucc(
        &self,
        actor: Uuid,
        ucc: &str,
    ) -> Result<CustomerProfile, ServiceError> {
        require_role(self.users.as_ref(), actor, Role::Readonly).await?;

        let customer = self
            .customers
            .get_by_ucc(ucc)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {ucc} not found")))?;
        let details = self.customers.details_for(customer.id).await?;
        Ok(CustomerProfile { customer, details })
    }

    /// Register a new customer record. Requires `admin`.
    pub async fn create(
        &self,
        actor: Uuid,
        new: NewCustomer,
    ) -> Result<Customer, ServiceError> {
        require_role(self.users.as_ref(), actor, Role::Admin).await?;

        if new.ucc.trim().is_empty() {
            return Err(ServiceError::Validation("ucc is required".into()));
        }
        if new.full_name.trim().is_empty() {
            return Err(ServiceError::Validation("fullName is required".into()));
        }

        let customer = self.customers.insert(new).await?;
        info!(customer_id = customer.id, ucc = %customer.ucc, "customer created");
        Ok(customer)
    }
}
