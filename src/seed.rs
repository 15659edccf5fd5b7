//! Demo dataset for local development: one user per role, three customer
//! profiles and a few requests in each lifecycle state. Everything goes
//! through the normal store paths; re-running is safe.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::database::models::{NewCustomer, TerminalStatus, User};
use crate::services::RequestIdGenerator;
use crate::store::{CustomerStore, InsertRequest, PgStore, RequestStore, UserStore};

// Fixed ids so demo tokens stay valid across reseeds.
const ADMIN_ID: Uuid = Uuid::from_u128(0xA1);
const SUPERVISOR_ID: Uuid = Uuid::from_u128(0xA2);
const OPERATOR_ID: Uuid = Uuid::from_u128(0xA3);
const READONLY_ID: Uuid = Uuid::from_u128(0xA4);

pub async fn run(store: &PgStore) -> anyhow::Result<()> {
    seed_users(store).await?;
    let customer_ids = seed_customers(store).await?;
    seed_requests(store, &customer_ids).await?;
    print_demo_tokens()?;
    Ok(())
}

async fn seed_users(store: &PgStore) -> anyhow::Result<()> {
    let users = [
        (ADMIN_ID, "admin", "Anita", "Desai"),
        (SUPERVISOR_ID, "supervisor", "Vikram", "Singh"),
        (OPERATOR_ID, "operator", "Meera", "Iyer"),
        (READONLY_ID, "readonly", "Arjun", "Nair"),
    ];

    for (id, role, first, last) in users {
        let now = Utc::now();
        store
            .upsert(User {
                id,
                email: Some(format!("{role}@cdms.example.com")),
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                role: role.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("Seeded 4 users (admin, supervisor, operator, readonly)");
    Ok(())
}

async fn seed_customers(store: &PgStore) -> anyhow::Result<Vec<i64>> {
    let customers = [
        NewCustomer {
            ucc: "123456789012".into(),
            pan: Some("ABCDE1234F".into()),
            full_name: "Rajesh Kumar".into(),
            father_name: Some("Suresh Kumar".into()),
            date_of_birth: Some("1985-05-15".into()),
            gender: Some("Male".into()),
            marital_status: Some("Married".into()),
            mobile: Some("9876543210".into()),
            email: Some("rajesh.kumar@email.com".into()),
            alternate_mobile: Some("9876543211".into()),
            account_type: Some("Individual".into()),
            status: Some("Active".into()),
            registration_date: Some("2020-01-15".into()),
        },
        NewCustomer {
            ucc: "234567890123".into(),
            pan: Some("BCDEF2345G".into()),
            full_name: "Priya Sharma".into(),
            father_name: Some("Ramesh Sharma".into()),
            date_of_birth: Some("1990-08-22".into()),
            gender: Some("Female".into()),
            marital_status: Some("Single".into()),
            mobile: Some("8765432109".into()),
            email: Some("priya.sharma@email.com".into()),
            alternate_mobile: Some("8765432108".into()),
            account_type: Some("Individual".into()),
            status: Some("Active".into()),
            registration_date: Some("2021-03-10".into()),
        },
        NewCustomer {
            ucc: "345678901234".into(),
            pan: Some("CDEFG3456H".into()),
            full_name: "Amit Patel".into(),
            father_name: Some("Kiran Patel".into()),
            date_of_birth: Some("1988-12-03".into()),
            gender: Some("Male".into()),
            marital_status: Some("Married".into()),
            mobile: Some("7654321098".into()),
            email: Some("amit.patel@email.com".into()),
            alternate_mobile: Some("7654321097".into()),
            account_type: Some("Individual".into()),
            status: Some("Active".into()),
            registration_date: Some("2019-11-25".into()),
        },
    ];

    let mut ids = Vec::new();
    for new in customers {
        match store.get_by_ucc(&new.ucc).await? {
            Some(existing) => ids.push(existing.id),
            None => {
                let created = CustomerStore::insert(store, new).await?;
                ids.push(created.id);
            }
        }
    }

    // Detail tabs for the first customer
    if store.details_for(ids[0]).await?.is_empty() {
        store
            .insert_detail(
                ids[0],
                "address",
                json!({
                    "current": "123 Main Street, Mumbai, Maharashtra 400001",
                    "permanent": "456 Oak Avenue, Delhi, Delhi 110001"
                }),
            )
            .await?;
        store
            .insert_detail(
                ids[0],
                "bank",
                json!({
                    "bankName": "HDFC Bank",
                    "accountNumber": "1234567890",
                    "ifscCode": "HDFC0001234",
                    "accountType": "Savings"
                }),
            )
            .await?;
    }

    println!("Seeded {} customers", ids.len());
    Ok(ids)
}

async fn seed_requests(store: &PgStore, customer_ids: &[i64]) -> anyhow::Result<()> {
    if !store.list_all().await?.is_empty() {
        println!("Requests already present, skipping request seed");
        return Ok(());
    }

    let id_generator = RequestIdGenerator::new();

    let pending = RequestStore::insert(
        store,
        InsertRequest {
            request_id: id_generator.next(),
            customer_id: customer_ids[0],
            request_type: "Name Modification".into(),
            current_value: Some(json!("Rajesh Kumar")),
            new_value: json!("Rajesh Kumar Gupta"),
            reason: "Name change after marriage".into(),
            created_by: OPERATOR_ID,
        },
    )
    .await?;

    let approved = RequestStore::insert(
        store,
        InsertRequest {
            request_id: id_generator.next(),
            customer_id: customer_ids[1],
            request_type: "Email & Mobile Modification".into(),
            current_value: Some(json!({
                "email": "priya.sharma@email.com",
                "mobile": "8765432109"
            })),
            new_value: json!({
                "email": "priya.s@newmail.com",
                "mobile": "8765430000"
            }),
            reason: "Email compromised, new mobile number".into(),
            created_by: OPERATOR_ID,
        },
    )
    .await?;
    store
        .update_status(approved.id, TerminalStatus::Approved, SUPERVISOR_ID)
        .await?;

    let rejected = RequestStore::insert(
        store,
        InsertRequest {
            request_id: id_generator.next(),
            customer_id: customer_ids[2],
            request_type: "DOB Modification".into(),
            current_value: Some(json!("1988-12-03")),
            new_value: json!("1988-12-04"),
            reason: "Aadhaar mismatch".into(),
            created_by: OPERATOR_ID,
        },
    )
    .await?;
    store
        .update_status(rejected.id, TerminalStatus::Rejected, SUPERVISOR_ID)
        .await?;

    println!(
        "Seeded requests: {} (pending), {} (approved), {} (rejected)",
        pending.request_id, approved.request_id, rejected.request_id
    );
    Ok(())
}

fn print_demo_tokens() -> anyhow::Result<()> {
    println!("\nDemo tokens:");
    for (id, role) in [
        (ADMIN_ID, "admin"),
        (SUPERVISOR_ID, "supervisor"),
        (OPERATOR_ID, "operator"),
        (READONLY_ID, "readonly"),
    ] {
        let token = generate_jwt(&Claims::new(id, role.to_string()))?;
        println!("  {role:<10} {token}");
    }
    Ok(())
}
