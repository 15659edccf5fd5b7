use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub ucc: String,
    pub pan: Option<String>,
    pub full_name: String,
    pub father_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub alternate_mobile: Option<String>,
    pub account_type: Option<String>,
    pub status: Option<String>,
    pub registration_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Auxiliary profile rows (address, bank, fatca, nominee, ...) rendered as
/// tabs alongside the core identity record. `details` stays schemaless.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    pub id: i64,
    pub customer_id: i64,
    pub detail_type: String,
    pub details: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub ucc: String,
    pub pan: Option<String>,
    pub full_name: String,
    pub father_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub alternate_mobile: Option<String>,
    pub account_type: Option<String>,
    pub status: Option<String>,
    pub registration_date: Option<String>,
}
