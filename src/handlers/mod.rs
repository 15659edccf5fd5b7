pub mod auth;
pub mod customers;
pub mod requests;

use sqlx::PgPool;

use crate::services::{CustomerService, RequestService};

/// Shared handler state: the two controllers plus the raw pool for the
/// health probe. Stores are injected into the services at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub requests: RequestService,
    pub customers: CustomerService,
}
