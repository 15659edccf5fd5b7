use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Customer, NewCustomer};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::customer_service::CustomerProfile;
use crate::store::SearchField;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
    #[serde(default)]
    pub field: SearchField,
}

/// GET /api/customers/search?term=&field= - field-scoped substring search
pub async fn search(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Customer>> {
    let term = query
        .term
        .ok_or_else(|| ApiError::validation_error("Search term is required"))?;

    let customers = state.customers.search(auth_user.id, &term, query.field).await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/:id - profile with detail rows
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<CustomerProfile> {
    let profile = state.customers.profile(auth_user.id, id).await?;
    Ok(ApiResponse::success(profile))
}

/// GET /api/customers/ucc/:ucc - profile looked up by UCC
pub async fn get_by_ucc(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(ucc): Path<String>,
) -> ApiResult<CustomerProfile> {
    let profile = state.customers.profile_by_ucc(auth_user.id, &ucc).await?;
    Ok(ApiResponse::success(profile))
}

/// POST /api/customers - register a customer record (admin only)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(new): Json<NewCustomer>,
) -> ApiResult<Customer> {
    let customer = state.customers.create(auth_user.id, new).await?;
    Ok(ApiResponse::created(customer))
}
