//! Integration tests for the safebaby-web API endpoints
//!
//! Drives the real router in-process with an in-memory database and stub
//! collaborators.

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

use helpers::*;

/// Test helper: create GET request
fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: create JSON POST request
fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let pool = setup_test_db().await;
    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "safebaby-web");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_lookup_endpoint_lab_tested() {
    let pool = setup_test_db().await;
    seed_lab_tested_product(&pool, "890180001894", "Organic Oat Cereal").await;

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .oneshot(get_request("/api/lookup/890180001894"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["type"], "lab_tested");
    assert_eq!(body["barcode"], "890180001894");
    assert_eq!(body["has_lab_results"], true);
    assert_eq!(body["product"]["name"], "Organic Oat Cereal");
}

#[tokio::test]
async fn test_lookup_endpoint_invalid_barcode_returns_error_envelope() {
    let pool = setup_test_db().await;
    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    // Invalid input still answers 200 with the error variant
    let response = app.oneshot(get_request("/api/lookup/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["type"], "error");
}

#[tokio::test]
async fn test_lookup_endpoint_not_found() {
    let pool = setup_test_db().await;
    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .oneshot(get_request("/api/lookup/000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["type"], "not_found");
    assert_eq!(body["barcode"], "000000000000");
    assert!(body["suggestion"].is_string());
}

#[tokio::test]
async fn test_scan_endpoint_rejects_empty_payload() {
    let pool = setup_test_db().await;
    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .oneshot(post_json("/api/scan", json!({ "photo_base64": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_search_endpoint_with_pagination() {
    let pool = setup_test_db().await;
    for i in 0..25 {
        seed_product(
            &pool,
            &format!("8901800018{:02}", i),
            &format!("Oat Cereal {}", i),
            80,
        )
        .await;
    }

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .clone()
        .oneshot(get_request("/api/search?q=Oat&page=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["query"], "Oat");
    assert_eq!(body["total_results"], 25);
    assert_eq!(body["page"], 2);
    assert_eq!(body["page_size"], 20);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["products"].as_array().unwrap().len(), 5);

    // No matches is an empty page, not an error
    let response = app
        .oneshot(get_request("/api/search?q=zzzz"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_results"], 0);
    assert_eq!(body["products"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_search_endpoint_rejects_empty_query() {
    let pool = setup_test_db().await;
    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .oneshot(get_request("/api/search?q=%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_detail_endpoint() {
    let pool = setup_test_db().await;
    seed_lab_tested_product(&pool, "890180001894", "Organic Oat Cereal").await;

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .clone()
        .oneshot(get_request("/api/products/890180001894"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Organic Oat Cereal");
    assert_eq!(body["lab_results"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["lab_results"][0]["contaminants"][0]["name"],
        "Lead"
    );

    let response = app
        .oneshot(get_request("/api/products/000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recalls_endpoint() {
    let pool = setup_test_db().await;
    let product_guid = seed_product(&pool, "890180001894", "Organic Oat Cereal", 85).await;

    sqlx::query(
        "INSERT INTO recalls (guid, product_guid, reason, risk_class, recall_date, fda_url, active)
         VALUES ('r1', ?, 'Elevated lead levels', 'I', '2026-02-01', NULL, 1)",
    )
    .bind(&product_guid)
    .execute(&pool)
    .await
    .unwrap();

    // Inactive recalls are filtered out
    sqlx::query(
        "INSERT INTO recalls (guid, product_guid, reason, risk_class, recall_date, fda_url, active)
         VALUES ('r2', ?, 'Labeling issue', 'III', '2025-06-01', NULL, 0)",
    )
    .bind(&product_guid)
    .execute(&pool)
    .await
    .unwrap();

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app.oneshot(get_request("/api/recalls")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["risk_class"], "I");
    assert_eq!(listings[0]["product_name"], "Organic Oat Cereal");
}

#[tokio::test]
async fn test_favorites_flow_and_free_tier_gate() {
    let pool = setup_test_db().await;
    let user = seed_user(&pool, "parent@example.com", "free").await;
    let p1 = seed_product(&pool, "890180001894", "Oat Cereal", 85).await;
    let p2 = seed_product(&pool, "012345678905", "Sweet Potato Puree", 90).await;

    // Lower the free-tier cap so the gate is reachable in one test
    sqlx::query("UPDATE settings SET value = '1' WHERE key = 'free_favorite_limit'")
        .execute(&pool)
        .await
        .unwrap();

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    // First favorite fits under the cap
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/users/{}/favorites", user),
            json!({ "product_guid": p1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Second favorite hits the paywall
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/users/{}/favorites", user),
            json!({ "product_guid": p2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "UPGRADE_REQUIRED");

    // The list still holds exactly the first favorite
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/users/{}/favorites", user)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["products"][0]["name"], "Oat Cereal");

    // Removing frees a slot
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{}/favorites/{}", user, p1))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            &format!("/api/users/{}/favorites", user),
            json!({ "product_guid": p2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_premium_user_is_not_capped() {
    let pool = setup_test_db().await;
    let user = seed_user(&pool, "premium@example.com", "premium").await;
    let p1 = seed_product(&pool, "890180001894", "Oat Cereal", 85).await;
    let p2 = seed_product(&pool, "012345678905", "Sweet Potato Puree", 90).await;

    sqlx::query("UPDATE settings SET value = '1' WHERE key = 'free_favorite_limit'")
        .execute(&pool)
        .await
        .unwrap();

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    for guid in [&p1, &p2] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/users/{}/favorites", user),
                json!({ "product_guid": guid }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_duplicate_favorite_conflicts() {
    let pool = setup_test_db().await;
    let user = seed_user(&pool, "parent@example.com", "free").await;
    let p1 = seed_product(&pool, "890180001894", "Oat Cereal", 85).await;

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let request = || {
        post_json(
            &format!("/api/users/{}/favorites", user),
            json!({ "product_guid": p1 }),
        )
    };

    let response = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_meal_plan_generate_and_fetch() {
    let pool = setup_test_db().await;
    let user = seed_user(&pool, "parent@example.com", "free").await;
    for i in 0..5 {
        seed_product(&pool, &format!("89018000180{}", i), &format!("Food {}", i), 80 + i).await;
    }

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/users/{}/meal-plan", user),
            json!({ "week_start": "2026-08-10" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["week_start"], "2026-08-10");
    let assignments: Value =
        serde_json::from_str(body["assignments"].as_str().unwrap()).unwrap();
    assert_eq!(assignments.as_object().unwrap().len(), 21);
    assert!(assignments.get("monday.breakfast").is_some());

    let first_guid = body["guid"].as_str().unwrap().to_string();

    // Regeneration replaces the assignments but keeps one row per week
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/users/{}/meal-plan", user),
            json!({ "week_start": "2026-08-10" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["guid"].as_str().unwrap(), first_guid);

    let response = app
        .oneshot(get_request(&format!(
            "/api/users/{}/meal-plan/2026-08-10",
            user
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_meal_plan_rejects_bad_week_start() {
    let pool = setup_test_db().await;
    let user = seed_user(&pool, "parent@example.com", "free").await;

    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .oneshot(post_json(
            &format!("/api/users/{}/meal-plan", user),
            json!({ "week_start": "next monday" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let pool = setup_test_db().await;
    let app = test_app(
        pool,
        Arc::new(StubProductSource::empty()),
        Arc::new(StubAnalyzer::succeeding()),
    );

    let response = app
        .oneshot(get_request("/api/users/nope/favorites"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
