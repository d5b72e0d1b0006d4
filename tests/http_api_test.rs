mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{seed_client, test_app};
use serde_json::{json, Value};
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_endpoints_start_empty() {
    let (app, _db) = test_app().await;

    for uri in ["/api/clients", "/api/products", "/api/invoices", "/api/presets"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }
}

#[tokio::test]
async fn client_create_and_update_round_trip() {
    let (app, _db) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/clients",
            json!({"name": "Acme", "email": "a@x.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await, json!({"id": 1}));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/clients/1",
            json!({"phone": "555-0100"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "updated"}));

    let response = app.clone().oneshot(get("/api/clients")).await.unwrap();
    let clients = body_json(response).await;
    assert_eq!(clients[0]["name"], "Acme");
    assert_eq!(clients[0]["phone"], "555-0100");
}

#[tokio::test]
async fn missing_invoice_returns_json_not_found() {
    let (app, _db) = test_app().await;

    let response = app.oneshot(get("/api/invoices/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn invalid_invoice_payload_is_rejected_with_bad_request() {
    let (app, db) = test_app().await;
    seed_client(&db, "Acme", "a@x.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/invoices",
            json!({
                "client_id": 1,
                "date": "2024-01-01",
                "items": [{"product_id": 1, "quantity": 0, "unit_price": 10.0}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Bad Request");
}
