//! Authentication integration tests.
//!
//! Tests verify:
//! - Login issues a usable session token (header and cookie)
//! - Wrong passwords are rejected without creating a session
//! - Every mutating route is gated; reads are not
//! - Logout revokes the session

use axum::http::{header, StatusCode};

use catalog_server::SESSION_HEADER;

use super::test_utils::{
    bare_request, body_json, json_request, login, multipart_image_request, send, test_app,
};

// =============================================================================
// Login / Logout / Check-Auth
// =============================================================================

#[tokio::test]
async fn test_login_issues_token_in_header_and_cookie() {
    let app = test_app().await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/login",
            None,
            serde_json::json!({ "password": super::test_utils::TEST_PASSWORD }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let token = response
        .headers()
        .get(SESSION_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(!token.is_empty());

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("session_id={}", token)));

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let app = test_app().await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/login",
            None,
            serde_json::json!({ "password": "wrong-password" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);

    // check-auth still reports unauthenticated
    let response = send(&app.router, bare_request("GET", "/check-auth", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["isAuthenticated"], false);
}

#[tokio::test]
async fn test_check_auth_with_valid_token() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(&app.router, bare_request("GET", "/check-auth", Some(&token))).await;
    let json = body_json(response).await;
    assert_eq!(json["isAuthenticated"], true);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(&app.router, bare_request("POST", "/logout", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app.router, bare_request("GET", "/check-auth", Some(&token))).await;
    let json = body_json(response).await;
    assert_eq!(json["isAuthenticated"], false);
}

#[tokio::test]
async fn test_logout_without_session_is_ok() {
    let app = test_app().await;
    let response = send(&app.router, bare_request("POST", "/logout", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Gate on Mutating Routes
// =============================================================================

#[tokio::test]
async fn test_add_product_requires_session() {
    let app = test_app().await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            None,
            serde_json::json!({ "name": "Strap", "img": "x.png" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);

    // No record was created
    let response = send(&app.router, bare_request("GET", "/products", None)).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_delete_product_requires_session() {
    let app = test_app().await;
    let response = send(&app.router, bare_request("DELETE", "/products/some-id", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_image_requires_session() {
    let app = test_app().await;
    let response = send(
        &app.router,
        multipart_image_request(None, "strap.png", "image/png", b"bytes"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_forged_token_rejected() {
    let app = test_app().await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some("deadbeefdeadbeefdeadbeefdeadbeef"),
            serde_json::json!({ "name": "Strap", "img": "x.png" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reads_do_not_require_session() {
    let app = test_app().await;

    let response = send(&app.router, bare_request("GET", "/products", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cookie_token_accepted_on_mutating_route() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/add-product")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .header(
            axum::http::header::COOKIE,
            format!("session_id={}", token),
        )
        .body(axum::body::Body::from(
            serde_json::json!({ "name": "Strap", "img": "x.png" }).to_string(),
        ))
        .unwrap();

    let response = send(&app.router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}
