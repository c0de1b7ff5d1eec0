//! Product CRUD integration tests.

use axum::http::StatusCode;

use super::test_utils::{
    bare_request, body_json, json_request, login, send, test_app, upload_test_image,
};

// =============================================================================
// Create / Get
// =============================================================================

#[tokio::test]
async fn test_add_product_then_get_round_trips() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some(&token),
            serde_json::json!({
                "name": "Luggage strap",
                "img": "strap.png",
                "description": "Full-color custom strap",
                "minOrder": "10+",
                "productionTime": "7-10 days",
                "shopeeLink": "https://example.com/strap"
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["totalProducts"], 1);

    let product = &json["product"];
    let id = product["id"].as_str().unwrap();
    assert_eq!(product["name"], "Luggage strap");
    assert_eq!(product["minOrder"], "10+");
    assert!(product["createdAt"].is_string());

    let response = send(
        &app.router,
        bare_request("GET", &format!("/products/{}", id), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["product"], *product);
}

#[tokio::test]
async fn test_add_product_missing_name_rejected() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some(&token),
            serde_json::json!({ "img": "strap.png" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_add_product_whitespace_name_rejected() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some(&token),
            serde_json::json!({ "name": "   ", "img": "strap.png" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_product_missing_img_rejected() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some(&token),
            serde_json::json!({ "name": "Strap" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("img"));
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_empty_list_is_success() {
    let app = test_app().await;

    let response = send(&app.router, bare_request("GET", "/products", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 0);
    assert_eq!(json["products"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_tracks_creates_and_deletes() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let response = send(
            &app.router,
            json_request(
                "POST",
                "/add-product",
                Some(&token),
                serde_json::json!({ "name": format!("Product {}", i), "img": "x.png" }),
            ),
        )
        .await;
        let json = body_json(response).await;
        ids.push(json["product"]["id"].as_str().unwrap().to_string());
    }

    let response = send(
        &app.router,
        bare_request("DELETE", &format!("/products/{}", ids[1]), Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app.router, bare_request("GET", "/products", None)).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);

    // Insertion order is preserved across the delete
    let names: Vec<&str> = json["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Product 0", "Product 2"]);
}

// =============================================================================
// Get / Delete Errors
// =============================================================================

#[tokio::test]
async fn test_get_unknown_product_is_404() {
    let app = test_app().await;

    let response = send(&app.router, bare_request("GET", "/products/no-such-id", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_delete_unknown_product_is_404() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(
        &app.router,
        bare_request("DELETE", "/products/no-such-id", Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some(&token),
            serde_json::json!({ "name": "Strap", "img": "x.png" }),
        ),
    )
    .await;
    let json = body_json(response).await;
    let id = json["product"]["id"].as_str().unwrap().to_string();

    let response = send(
        &app.router,
        bare_request("DELETE", &format!("/products/{}", id), Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["deletedProduct"]["id"], id.as_str());

    let response = send(
        &app.router,
        bare_request("GET", &format!("/products/{}", id), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Image Cleanup on Delete
// =============================================================================

#[tokio::test]
async fn test_delete_product_removes_its_image() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let filename = upload_test_image(&app.router, &token).await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some(&token),
            serde_json::json!({ "name": "Strap", "img": filename }),
        ),
    )
    .await;
    let json = body_json(response).await;
    let id = json["product"]["id"].as_str().unwrap().to_string();

    // Image is being served before the delete
    let response = send(
        &app.router,
        bare_request("GET", &format!("/uploads/{}", filename), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app.router,
        bare_request("DELETE", &format!("/products/{}", id), Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // ... and gone afterwards
    let response = send(
        &app.router,
        bare_request("GET", &format!("/uploads/{}", filename), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_with_missing_image_still_succeeds() {
    let app = test_app().await;
    let token = login(&app.router).await;

    let response = send(
        &app.router,
        json_request(
            "POST",
            "/add-product",
            Some(&token),
            serde_json::json!({ "name": "Strap", "img": "never-uploaded.png" }),
        ),
    )
    .await;
    let json = body_json(response).await;
    let id = json["product"]["id"].as_str().unwrap().to_string();

    let response = send(
        &app.router,
        bare_request("DELETE", &format!("/products/{}", id), Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
}
