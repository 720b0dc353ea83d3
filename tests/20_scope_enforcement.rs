mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{barangay_admin, municipality_admin, super_admin, TestApp};

#[tokio::test]
async fn barangay_admin_reads_own_zone_only() {
    let app = TestApp::new().await;
    let token = barangay_admin(1, 10);

    let (status, body) = app.get("/api/zones/100", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["barangayId"], 10);

    let (status, body) = app.get("/api/zones/200", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found or access denied");
}

#[tokio::test]
async fn missing_and_hidden_entities_look_identical() {
    let app = TestApp::new().await;
    let token = barangay_admin(1, 10);

    let hidden = app.get("/api/zones/300", &token).await;
    let missing = app.get("/api/zones/9999", &token).await;
    assert_eq!(hidden, missing);
}

#[tokio::test]
async fn listings_are_filtered_by_scope() {
    let app = TestApp::new().await;

    let (_, body) = app.get("/api/barangays", &municipality_admin(1)).await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 20]);

    let (_, body) = app.get("/api/zones", &barangay_admin(1, 10)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app.get("/api/zones", &super_admin()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn child_listing_requires_readable_parent() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/zones/100/households", &barangay_admin(1, 10)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], 1000);

    let (status, _) = app.get("/api/barangays/30/zones", &municipality_admin(1)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zone_under_foreign_barangay_is_parent_mismatch() {
    let app = TestApp::new().await;
    let token = barangay_admin(1, 10);

    // barangay 20 exists, 999 does not; the answer is the same
    for barangay_id in [20, 999] {
        let (status, body) = app
            .post("/api/zones", &token, json!({"name": "Z-new", "barangayId": barangay_id}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "barangay {}", barangay_id);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    let (status, body) = app
        .post("/api/zones", &token, json!({"name": "Z-new", "barangayId": 10}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["barangayId"], 10);
    assert!(body["data"]["id"].as_i64().unwrap() > 300);
}

#[tokio::test]
async fn household_placement_does_not_reveal_which_zones_exist() {
    let app = TestApp::new().await;
    let token = barangay_admin(1, 10);

    let foreign = app
        .post("/api/households", &token, json!({"name": "H-new", "zoneId": 200}))
        .await;
    let missing = app
        .post("/api/households", &token, json!({"name": "H-new", "zoneId": 9999}))
        .await;
    assert_eq!(foreign.0, StatusCode::FORBIDDEN);
    assert_eq!(foreign, missing);

    // moving an existing household behaves the same way
    let (status, _) = app
        .put("/api/households/1000", &token, json!({"name": "H1", "zoneId": 9999}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // SuperAdmin sees everything, so a missing parent stays a 404
    let (status, _) = app
        .post("/api/households", &super_admin(), json!({"name": "H-new", "zoneId": 9999}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_super_admin_creates_municipalities() {
    let app = TestApp::new().await;
    let body = json!({"name": "Gamma", "code": "GAM", "region": "R", "province": "P"});

    let (status, _) = app.post("/api/municipalities", &municipality_admin(1), body.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = app.post("/api/municipalities", &super_admin(), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["name"], "Gamma");
}

#[tokio::test]
async fn update_cannot_reparent_outside_scope() {
    let app = TestApp::new().await;
    let token = barangay_admin(1, 10);

    let (status, _) = app
        .put("/api/zones/100", &token, json!({"name": "Z-A", "barangayId": 20}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // the id in the path wins over the body
    let (status, body) = app
        .put(
            "/api/zones/100",
            &token,
            json!({"id": 555, "name": "Z-A renamed", "barangayId": 10}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 100);
    assert_eq!(body["data"]["name"], "Z-A renamed");
}

#[tokio::test]
async fn municipality_admin_moves_household_within_municipality() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put("/api/households/1000", &municipality_admin(1), json!({"name": "H1", "zoneId": 200}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["zoneId"], 200);

    let (status, _) = app
        .put("/api/households/1000", &municipality_admin(1), json!({"name": "H1", "zoneId": 300}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_body_is_rejected_before_the_service() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post("/api/zones", &super_admin(), json!({"name": "no parent"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = app
        .put("/api/zones/100", &super_admin(), json!({"name": 7, "barangayId": 10}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}
