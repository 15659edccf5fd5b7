//! In-memory store doubles backing the unit and HTTP test suites. Same
//! CAS and ordering semantics as the Postgres store, behind the same
//! trait seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::{
    Customer, CustomerDetail, ModificationRequest, NewCustomer, RequestStatus, TerminalStatus, User,
};
use crate::store::{
    CustomerStore, InsertRequest, RequestStore, SearchField, StoreError, UserStore,
};

#[derive(Default)]
pub struct MemoryStore {
    requests: Mutex<Vec<ModificationRequest>>,
    customers: Mutex<Vec<Customer>>,
    details: Mutex<Vec<CustomerDetail>>,
    users: Mutex<HashMap<Uuid, User>>,
    next_request_id: AtomicI64,
    next_customer_id: AtomicI64,
    next_detail_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test fixture helper; panics on a duplicate UCC.
    pub async fn insert_customer(&self, new: NewCustomer) -> Customer {
        CustomerStore::insert(self, new).await.expect("fixture customer")
    }

    fn newest_first(mut rows: Vec<ModificationRequest>) -> Vec<ModificationRequest> {
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows
    }
}

fn matches_field(customer: &Customer, needle: &str, field: SearchField) -> bool {
    let contains = |value: &Option<String>| {
        value
            .as_deref()
            .map(|v| v.to_lowercase().contains(needle))
            .unwrap_or(false)
    };

    match field {
        SearchField::Ucc => customer.ucc.to_lowercase().contains(needle),
        SearchField::Pan => contains(&customer.pan),
        SearchField::Name => customer.full_name.to_lowercase().contains(needle),
        SearchField::Mobile => contains(&customer.mobile) || contains(&customer.alternate_mobile),
        SearchField::Email => contains(&customer.email),
        SearchField::Any => {
            customer.ucc.to_lowercase().contains(needle)
                || contains(&customer.pan)
                || customer.full_name.to_lowercase().contains(needle)
                || contains(&customer.mobile)
                || contains(&customer.alternate_mobile)
                || contains(&customer.email)
        }
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn insert(&self, request: InsertRequest) -> Result<ModificationRequest, StoreError> {
        let mut requests = self.requests.lock().unwrap();
        if requests.iter().any(|r| r.request_id == request.request_id) {
            return Err(StoreError::Duplicate("request_id".into()));
        }

        let now = Utc::now();
        let row = ModificationRequest {
            id: self.next_request_id.fetch_add(1, Ordering::SeqCst) + 1,
            request_id: request.request_id,
            customer_id: request.customer_id,
            request_type: request.request_type,
            current_value: request.current_value,
            new_value: request.new_value,
            reason: request.reason,
            status: RequestStatus::Pending,
            created_by: request.created_by,
            approved_by: None,
            created_at: now,
            updated_at: now,
        };
        requests.push(row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ModificationRequest>, StoreError> {
        let requests = self.requests.lock().unwrap();
        Ok(requests.iter().find(|r| r.id == id).cloned())
    }

    async fn get_by_request_id(
        &self,
        request_id: &str,
    ) -> Result<Option<ModificationRequest>, StoreError> {
        let requests = self.requests.lock().unwrap();
        Ok(requests.iter().find(|r| r.request_id == request_id).cloned())
    }

    async fn update_status(
        &self,
        id: i64,
        verdict: TerminalStatus,
        approved_by: Uuid,
    ) -> Result<Option<ModificationRequest>, StoreError> {
        let mut requests = self.requests.lock().unwrap();
        match requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RequestStatus::Pending)
        {
            Some(row) => {
                row.status = verdict.as_status();
                row.approved_by = Some(approved_by);
                row.updated_at = Utc::now();
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn query_by_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ModificationRequest>, StoreError> {
        let requests = self.requests.lock().unwrap();
        Ok(Self::newest_first(
            requests
                .iter()
                .filter(|r| r.customer_id == customer_id)
                .cloned()
                .collect(),
        ))
    }

    async fn query_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<ModificationRequest>, StoreError> {
        let requests = self.requests.lock().unwrap();
        Ok(Self::newest_first(
            requests.iter().filter(|r| r.status == status).cloned().collect(),
        ))
    }

    async fn query_by_creator(
        &self,
        created_by: Uuid,
    ) -> Result<Vec<ModificationRequest>, StoreError> {
        let requests = self.requests.lock().unwrap();
        Ok(Self::newest_first(
            requests
                .iter()
                .filter(|r| r.created_by == created_by)
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<ModificationRequest>, StoreError> {
        let requests = self.requests.lock().unwrap();
        Ok(Self::newest_first(requests.clone()))
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn search(
        &self,
        term: &str,
        field: SearchField,
        limit: i64,
    ) -> Result<Vec<Customer>, StoreError> {
        let needle = term.to_lowercase();
        let customers = self.customers.lock().unwrap();
        Ok(customers
            .iter()
            .filter(|c| matches_field(c, &needle, field))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let customers = self.customers.lock().unwrap();
        Ok(customers.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_ucc(&self, ucc: &str) -> Result<Option<Customer>, StoreError> {
        let customers = self.customers.lock().unwrap();
        Ok(customers.iter().find(|c| c.ucc == ucc).cloned())
    }

    async fn insert(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let mut customers = self.customers.lock().unwrap();
        if customers.iter().any(|c| c.ucc == new.ucc) {
            return Err(StoreError::Duplicate("ucc".into()));
        }

        let now = Utc::now();
        let row = Customer {
            id: self.next_customer_id.fetch_add(1, Ordering::SeqCst) + 1,
            ucc: new.ucc,
            pan: new.pan,
            full_name: new.full_name,
            father_name: new.father_name,
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            marital_status: new.marital_status,
            mobile: new.mobile,
            email: new.email,
            alternate_mobile: new.alternate_mobile,
            account_type: new.account_type,
            status: new.status,
            registration_date: new.registration_date,
            created_at: now,
            updated_at: now,
        };
        customers.push(row.clone());
        Ok(row)
    }

    async fn insert_detail(
        &self,
        customer_id: i64,
        detail_type: &str,
        details: Value,
    ) -> Result<CustomerDetail, StoreError> {
        let now = Utc::now();
        let row = CustomerDetail {
            id: self.next_detail_id.fetch_add(1, Ordering::SeqCst) + 1,
            customer_id,
            detail_type: detail_type.to_string(),
            details,
            created_at: now,
            updated_at: now,
        };
        self.details.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn details_for(&self, customer_id: i64) -> Result<Vec<CustomerDetail>, StoreError> {
        let details = self.details.lock().unwrap();
        Ok(details
            .iter()
            .filter(|d| d.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn upsert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// One seeded user per role, plus one whose role name nothing recognizes.
#[derive(Debug, Clone, Copy)]
pub struct TestActors {
    pub admin: Uuid,
    pub supervisor: Uuid,
    pub operator: Uuid,
    pub readonly: Uuid,
    pub unrecognized: Uuid,
}

impl TestActors {
    pub async fn seed(users: &dyn UserStore) -> Self {
        let mut ids = [Uuid::nil(); 5];
        for (slot, role) in ["admin", "supervisor", "operator", "readonly", "auditor"]
            .iter()
            .enumerate()
        {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                email: Some(format!("{role}@example.com")),
                first_name: Some(role.to_string()),
                last_name: None,
                role: role.to_string(),
                created_at: now,
                updated_at: now,
            };
            ids[slot] = users.upsert(user).await.expect("seed user").id;
        }

        Self {
            admin: ids[0],
            supervisor: ids[1],
            operator: ids[2],
            readonly: ids[3],
            unrecognized: ids[4],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_insert(request_id: &str) -> InsertRequest {
        InsertRequest {
            request_id: request_id.to_string(),
            customer_id: 1,
            request_type: "Name Modification".into(),
            current_value: None,
            new_value: json!("New Name"),
            reason: "typo".into(),
            created_by: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn request_ids_are_unique_in_the_store() {
        let store = MemoryStore::new();
        RequestStore::insert(&store, sample_insert("REQ-2026-1")).await.unwrap();

        let err = RequestStore::insert(&store, sample_insert("REQ-2026-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn lookup_by_request_id_matches_lookup_by_id() {
        let store = MemoryStore::new();
        let inserted = RequestStore::insert(&store, sample_insert("REQ-2026-2"))
            .await
            .unwrap();

        let by_request_id = store.get_by_request_id("REQ-2026-2").await.unwrap().unwrap();
        assert_eq!(by_request_id.id, inserted.id);
        assert!(store.get_by_request_id("REQ-2026-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_status_only_moves_pending_rows() {
        let store = MemoryStore::new();
        let inserted = RequestStore::insert(&store, sample_insert("REQ-2026-3"))
            .await
            .unwrap();
        let approver = Uuid::new_v4();

        let updated = store
            .update_status(inserted.id, TerminalStatus::Approved, approver)
            .await
            .unwrap()
            .expect("pending row must transition");
        assert_eq!(updated.status, RequestStatus::Approved);
        assert_eq!(updated.approved_by, Some(approver));

        // Second attempt finds no pending row
        let second = store
            .update_status(inserted.id, TerminalStatus::Rejected, approver)
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = RequestStore::get_by_id(&store, inserted.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, RequestStatus::Approved);
    }
}
