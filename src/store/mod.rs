pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{
    Customer, CustomerDetail, ModificationRequest, NewCustomer, RequestStatus, TerminalStatus, User,
};

pub use postgres::PgStore;

/// Errors from the persistence layer. Anything unexpected surfaces as
/// `Sqlx` and is logged at the HTTP boundary, never swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Which customer attribute a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Ucc,
    Pan,
    Name,
    Mobile,
    Email,
    #[default]
    Any,
}

/// Fields the lifecycle hands to the store at creation time. Status,
/// approver and timestamps are fixed by the store (pending / null / now).
#[derive(Debug, Clone)]
pub struct InsertRequest {
    pub request_id: String,
    pub customer_id: i64,
    pub request_type: String,
    pub current_value: Option<Value>,
    pub new_value: Value,
    pub reason: String,
    pub created_by: Uuid,
}

/// Persistence seam for modification requests.
///
/// `update_status` is the only mutation path after insert, and it is a
/// guarded update: rows leave `pending` exactly once. Every query method
/// returns rows ordered by creation time descending.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn insert(&self, request: InsertRequest) -> Result<ModificationRequest, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<ModificationRequest>, StoreError>;

    async fn get_by_request_id(
        &self,
        request_id: &str,
    ) -> Result<Option<ModificationRequest>, StoreError>;

    /// Compare-and-swap transition out of `pending`. Returns the updated
    /// row, or `None` when the row is missing or already terminal; the
    /// caller distinguishes the two.
    async fn update_status(
        &self,
        id: i64,
        verdict: TerminalStatus,
        approved_by: Uuid,
    ) -> Result<Option<ModificationRequest>, StoreError>;

    async fn query_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ModificationRequest>, StoreError>;

    async fn query_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<ModificationRequest>, StoreError>;

    async fn query_by_creator(
        &self,
        created_by: Uuid,
    ) -> Result<Vec<ModificationRequest>, StoreError>;

    async fn list_all(&self) -> Result<Vec<ModificationRequest>, StoreError>;
}

/// Persistence seam for customer identity records. Read-mostly; `insert`
/// exists for the admin-gated creation path and seeding.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn search(
        &self,
        term: &str,
        field: SearchField,
        limit: i64,
    ) -> Result<Vec<Customer>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Customer>, StoreError>;

    async fn get_by_ucc(&self, ucc: &str) -> Result<Option<Customer>, StoreError>;

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StoreError>;

    async fn insert_detail(
        &self,
        customer_id: i64,
        detail_type: &str,
        details: Value,
    ) -> Result<CustomerDetail, StoreError>;

    async fn details_for(&self, customer_id: i64) -> Result<Vec<CustomerDetail>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn upsert(&self, user: User) -> Result<User, StoreError>;
}
