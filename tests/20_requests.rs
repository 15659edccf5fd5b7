mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

async fn seed_customer(app: &TestApp) -> i64 {
    let auth = common::bearer(app.actors.admin, "admin");
    let (status, body) = common::send(
        &app.router,
        common::request(
            "POST",
            "/api/customers",
            Some(&auth),
            Some(json!({
                "ucc": "123456789012",
                "pan": "ABCDE1234F",
                "fullName": "Rajesh Kumar",
                "mobile": "9876543210",
                "email": "rajesh.kumar@email.com"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed customer: {body}");
    body["data"]["id"].as_i64().expect("customer id")
}

async fn file_request(app: &TestApp, customer_id: i64) -> i64 {
    let auth = common::bearer(app.actors.operator, "operator");
    let (status, body) = common::send(
        &app.router,
        common::request(
            "POST",
            "/api/requests",
            Some(&auth),
            Some(json!({
                "customerId": customer_id,
                "requestType": "Name Modification",
                "currentValue": "Rajesh Kumar",
                "newValue": "Rajesh Kumar Gupta",
                "reason": "marriage"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "file request: {body}");
    assert_eq!(body["data"]["status"], "pending");
    assert!(body["data"]["requestId"]
        .as_str()
        .expect("request id")
        .starts_with("REQ-"));
    body["data"]["id"].as_i64().expect("request id")
}

#[tokio::test]
async fn maker_checker_flow_over_http() {
    let app = common::spawn_app().await;
    let customer_id = seed_customer(&app).await;
    let request_id = file_request(&app, customer_id).await;

    let supervisor = common::bearer(app.actors.supervisor, "supervisor");
    let (status, body) = common::send(
        &app.router,
        common::request(
            "PATCH",
            &format!("/api/requests/{request_id}/approve"),
            Some(&supervisor),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(
        body["data"]["approvedBy"],
        app.actors.supervisor.to_string()
    );

    // The verdict is final; flipping it conflicts
    let (status, body) = common::send(
        &app.router,
        common::request(
            "PATCH",
            &format!("/api/requests/{request_id}/reject"),
            Some(&supervisor),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn readonly_cannot_file_and_operator_cannot_decide() {
    let app = common::spawn_app().await;
    let customer_id = seed_customer(&app).await;

    let readonly = common::bearer(app.actors.readonly, "readonly");
    let (status, body) = common::send(
        &app.router,
        common::request(
            "POST",
            "/api/requests",
            Some(&readonly),
            Some(json!({
                "customerId": customer_id,
                "requestType": "Name Modification",
                "newValue": "X",
                "reason": "r"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let request_id = file_request(&app, customer_id).await;
    let operator = common::bearer(app.actors.operator, "operator");
    let (status, _) = common::send(
        &app.router,
        common::request(
            "PATCH",
            &format!("/api/requests/{request_id}/approve"),
            Some(&operator),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_accepts_one_filter_dimension() {
    let app = common::spawn_app().await;
    let customer_id = seed_customer(&app).await;
    file_request(&app, customer_id).await;

    let readonly = common::bearer(app.actors.readonly, "readonly");
    let (status, body) = common::send(
        &app.router,
        common::request(
            "GET",
            &format!("/api/requests?customerId={customer_id}"),
            Some(&readonly),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().expect("list").len(), 1);

    let (status, body) = common::send(
        &app.router,
        common::request(
            "GET",
            &format!("/api/requests?customerId={customer_id}&status=pending"),
            Some(&readonly),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn pending_approvals_is_supervisor_only() {
    let app = common::spawn_app().await;
    let customer_id = seed_customer(&app).await;
    file_request(&app, customer_id).await;

    let operator = common::bearer(app.actors.operator, "operator");
    let (status, _) = common::send(
        &app.router,
        common::request("GET", "/api/pending-approvals", Some(&operator), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let supervisor = common::bearer(app.actors.supervisor, "supervisor");
    let (status, body) = common::send(
        &app.router,
        common::request("GET", "/api/pending-approvals", Some(&supervisor), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pending = body["data"].as_array().expect("pending list");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["status"], "pending");
}

#[tokio::test]
async fn missing_request_and_unknown_customer_are_not_found() {
    let app = common::spawn_app().await;

    let readonly = common::bearer(app.actors.readonly, "readonly");
    let (status, body) = common::send(
        &app.router,
        common::request("GET", "/api/requests/404", Some(&readonly), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let operator = common::bearer(app.actors.operator, "operator");
    let (status, _) = common::send(
        &app.router,
        common::request(
            "POST",
            "/api/requests",
            Some(&operator),
            Some(json!({
                "customerId": 9999,
                "requestType": "Name Modification",
                "newValue": "X",
                "reason": "r"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
