use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Customer, CustomerDetail, ModificationRequest, NewCustomer, RequestStatus, TerminalStatus, User,
};

use super::{CustomerStore, InsertRequest, RequestStore, SearchField, StoreError, UserStore};

const REQUEST_COLUMNS: &str = "id, request_id, customer_id, request_type, current_value, \
     new_value, reason, status, created_by, approved_by, created_at, updated_at";

/// sqlx-backed implementation of all three store seams.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_unique_violation(err: sqlx::Error, key: &str) -> StoreError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(key.to_string())
            }
            _ => StoreError::Sqlx(err),
        }
    }
}

#[async_trait]
impl RequestStore for PgStore {
    async fn insert(&self, request: InsertRequest) -> Result<ModificationRequest, StoreError> {
        let sql = format!(
            "INSERT INTO modification_requests \
                 (request_id, customer_id, request_type, current_value, new_value, reason, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {REQUEST_COLUMNS}"
        );

        sqlx::query_as::<_, ModificationRequest>(&sql)
            .bind(&request.request_id)
            .bind(request.customer_id)
            .bind(&request.request_type)
            .bind(&request.current_value)
            .bind(&request.new_value)
            .bind(&request.reason)
            .bind(request.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_unique_violation(e, "request_id"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ModificationRequest>, StoreError> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM modification_requests WHERE id = $1");

        let row = sqlx::query_as::<_, ModificationRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_by_request_id(
        &self,
        request_id: &str,
    ) -> Result<Option<ModificationRequest>, StoreError> {
        let sql =
            format!("SELECT {REQUEST_COLUMNS} FROM modification_requests WHERE request_id = $1");

        let row = sqlx::query_as::<_, ModificationRequest>(&sql)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_status(
        &self,
        id: i64,
        verdict: TerminalStatus,
        approved_by: Uuid,
    ) -> Result<Option<ModificationRequest>, StoreError> {
        // Guarded update: the status predicate makes two racing verdicts
        // resolve to exactly one winner.
        let sql = format!(
            "UPDATE modification_requests \
             SET status = $2, approved_by = $3, updated_at = now() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {REQUEST_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ModificationRequest>(&sql)
            .bind(id)
            .bind(verdict.as_status().as_str())
            .bind(approved_by)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn query_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ModificationRequest>, StoreError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM modification_requests \
             WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, ModificationRequest>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn query_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<ModificationRequest>, StoreError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM modification_requests \
             WHERE status = $1 ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, ModificationRequest>(&sql)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn query_by_creator(
        &self,
        created_by: Uuid,
    ) -> Result<Vec<ModificationRequest>, StoreError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM modification_requests \
             WHERE created_by = $1 ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, ModificationRequest>(&sql)
            .bind(created_by)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<ModificationRequest>, StoreError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM modification_requests \
             ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, ModificationRequest>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl CustomerStore for PgStore {
    async fn search(
        &self,
        term: &str,
        field: SearchField,
        limit: i64,
    ) -> Result<Vec<Customer>, StoreError> {
        // Case-insensitive substring match, uniformly across fields (UCC
        // included). `mobile` also covers the alternate number.
        let predicate = match field {
            SearchField::Ucc => "ucc ILIKE $1",
            SearchField::Pan => "pan ILIKE $1",
            SearchField::Name => "full_name ILIKE $1",
            SearchField::Mobile => "(mobile ILIKE $1 OR alternate_mobile ILIKE $1)",
            SearchField::Email => "email ILIKE $1",
            SearchField::Any => {
                "(ucc ILIKE $1 OR pan ILIKE $1 OR full_name ILIKE $1 \
                 OR mobile ILIKE $1 OR alternate_mobile ILIKE $1 OR email ILIKE $1)"
            }
        };

        let sql = format!("SELECT * FROM customers WHERE {predicate} ORDER BY id LIMIT $2");
        let pattern = format!("%{}%", term);

        let rows = sqlx::query_as::<_, Customer>(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_by_ucc(&self, ucc: &str) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE ucc = $1")
            .bind(ucc)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers \
                 (ucc, pan, full_name, father_name, date_of_birth, gender, marital_status, \
                  mobile, email, alternate_mobile, account_type, status, registration_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING *",
        )
        .bind(&customer.ucc)
        .bind(&customer.pan)
        .bind(&customer.full_name)
        .bind(&customer.father_name)
        .bind(&customer.date_of_birth)
        .bind(&customer.gender)
        .bind(&customer.marital_status)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(&customer.alternate_mobile)
        .bind(&customer.account_type)
        .bind(&customer.status)
        .bind(&customer.registration_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, "ucc"))
    }

    async fn insert_detail(
        &self,
        customer_id: i64,
        detail_type: &str,
        details: Value,
    ) -> Result<CustomerDetail, StoreError> {
        let row = sqlx::query_as::<_, CustomerDetail>(
            "INSERT INTO customer_details (customer_id, detail_type, details) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(customer_id)
        .bind(detail_type)
        .bind(&details)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn details_for(&self, customer_id: i64) -> Result<Vec<CustomerDetail>, StoreError> {
        let rows = sqlx::query_as::<_, CustomerDetail>(
            "SELECT * FROM customer_details WHERE customer_id = $1 ORDER BY id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, first_name, last_name, role) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 email = EXCLUDED.email, \
                 first_name = EXCLUDED.first_name, \
                 last_name = EXCLUDED.last_name, \
                 role = EXCLUDED.role, \
                 updated_at = now() \
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
