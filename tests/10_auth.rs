mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn public_endpoints_respond_without_a_token() {
    let app = common::spawn_app().await;

    let (status, body) = common::send(&app.router, common::request("GET", "/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "CDMS API");

    // Health is allowed to report degraded when no database is reachable
    let (status, body) =
        common::send(&app.router, common::request("GET", "/health", None, None)).await;
    assert!(
        status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {status}"
    );
    assert!(body["data"]["status"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app = common::spawn_app().await;

    let (status, body) = common::send(
        &app.router,
        common::request("GET", "/api/auth/whoami", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = common::send(
        &app.router,
        common::request("GET", "/api/auth/whoami", Some("Bearer not.a.token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_echoes_the_token_identity() {
    let app = common::spawn_app().await;
    let auth = common::bearer(app.actors.operator, "operator");

    let (status, body) = common::send(
        &app.router,
        common::request("GET", "/api/auth/whoami", Some(&auth), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], app.actors.operator.to_string());
    assert_eq!(body["data"]["role"], "operator");
}
