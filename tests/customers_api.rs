//! HTTP-level tests: the full router over the in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use customer_service::{
    app, config::CorsConfig, routes::BODY_LIMIT_BYTES, AppState, ConfigError, CustomerResponse,
    MemoryCustomerStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> Router {
    app(AppState::new(MemoryCustomerStore::new()), &CorsConfig::default()).unwrap()
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(router: &Router, name: &str, phone: &str, area: &str) -> CustomerResponse {
    let (status, body) = send(
        router,
        Method::POST,
        "/customers",
        Some(json!({ "name": name, "phone": phone, "area": area })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn welcome_and_health() {
    let r = router();
    let (status, body) = send(&r, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "It's working");

    let (status, body) = send(&r, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&r, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn create_then_fetch_by_id() {
    let r = router();
    let created = create(&r, "Anna", "5551234", "North").await;
    assert!(created.id > 0);

    let (status, body) = send(&r, Method::GET, &format!("/customers/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: CustomerResponse = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(fetched, created);
    assert!(body.get("created_at").is_some());
    assert_eq!(body.as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn duplicate_phone_is_rejected_with_400() {
    let r = router();
    create(&r, "Anna", "5551234", "North").await;
    let (status, body) = send(
        &r,
        Method::POST,
        "/customers",
        Some(json!({ "name": "Other", "phone": "5551234", "area": "South" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "conflict");
    assert!(body["error"]["message"].as_str().unwrap().contains("5551234"));

    let (_, list) = send(&r, Method::GET, "/customers", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_bodies_are_422() {
    let r = router();
    let cases = [
        json!({ "phone": "1", "area": "x" }),
        json!({ "name": 12, "phone": "1", "area": "x" }),
        json!({ "name": "Anna" }),
        json!({ "name": "n".repeat(51), "phone": "1", "area": "x" }),
    ];
    for body in cases {
        let (status, resp) = send(&r, Method::POST, "/customers", Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {body} -> {resp}");
        assert_eq!(resp["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn missing_body_is_422() {
    let r = router();
    let (status, body) = send(&r, Method::POST, "/customers", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let res = r.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let (_, list) = send(&r, Method::GET, "/customers", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn whitespace_only_fields_are_422() {
    let r = router();
    let (status, body) = send(
        &r,
        Method::POST,
        "/customers",
        Some(json!({ "name": "  ", "phone": " ", "area": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn oversized_body_is_413() {
    let r = router();
    let payload = json!({ "name": "n".repeat(BODY_LIMIT_BYTES), "phone": "1", "area": "x" }).to_string();

    // Declared length is checked before the body is read.
    let req = Request::builder()
        .method(Method::POST)
        .uri("/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload.clone()))
        .unwrap();
    let res = r.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    // Without a declared length the limit trips while buffering.
    let req = Request::builder()
        .method(Method::POST)
        .uri("/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload))
        .unwrap();
    let res = r.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "payload_too_large");
}

#[tokio::test]
async fn missing_customer_is_404() {
    let r = router();
    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&r, method, "/customers/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]["message"].as_str().unwrap().contains("42"));
    }
    let (status, _) = send(&r, Method::PUT, "/customers/42", Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_422() {
    let r = router();
    let (status, _) = send(&r, Method::GET, "/customers/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn out_of_range_id_is_404() {
    let r = router();
    let (status, body) = send(&r, Method::GET, "/customers/99999999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn put_merges_only_supplied_fields() {
    let r = router();
    let created = create(&r, "Juan", "777", "East").await;
    let (status, body) = send(
        &r,
        Method::PUT,
        &format!("/customers/{}", created.id),
        Some(json!({ "name": "John" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "John");
    assert_eq!(body["phone"], "777");
    assert_eq!(body["area"], "East");

    let (status, _) = send(
        &r,
        Method::PUT,
        &format!("/customers/{}", created.id),
        Some(json!({ "area": null })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let r = router();
    let created = create(&r, "Anna", "1", "x").await;
    let uri = format!("/customers/{}", created.id);
    let (status, body) = send(&r, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    let (status, _) = send(&r, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_honours_skip_and_limit() {
    let r = router();
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(create(&r, &format!("C{i}"), &format!("100{i}"), "x").await.id);
    }
    let (status, body) = send(&r, Method::GET, "/customers?skip=0&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let got: Vec<i32> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap() as i32)
        .collect();
    assert_eq!(got, ids[..2]);

    let (_, body) = send(&r, Method::GET, "/customers?skip=3", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&r, Method::GET, "/customers?limit=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_routes() {
    let r = router();
    let anna = create(&r, "Anna", "5551234", "North").await;
    create(&r, "Juan", "5550000", "South").await;
    create(&r, "Bob", "5559999", "West").await;

    let (status, body) = send(&r, Method::GET, "/customers/search/by-phone/5551234", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], anna.id);

    let (status, _) = send(&r, Method::GET, "/customers/search/by-phone/000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&r, Method::GET, "/customers/search/by-name/AN", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Anna", "Juan"]);

    let (status, body) = send(&r, Method::GET, "/customers/search/by-name/zzz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let r = router();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/customers")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = r.clone().oneshot(req).await.unwrap();
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "http://evil.test")
        .body(Body::empty())
        .unwrap();
    let res = r.oneshot(req).await.unwrap();
    assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn wildcard_origin_allows_any_origin_without_credentials() {
    let cors = CorsConfig {
        allowed_origins: vec!["*".into()],
    };
    let r = app(AppState::new(MemoryCustomerStore::new()), &cors).unwrap();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/customers")
        .header(header::ORIGIN, "http://anywhere.test")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = r.oneshot(req).await.unwrap();
    assert_eq!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
}

#[test]
fn unusable_origin_fails_router_construction() {
    let cors = CorsConfig {
        allowed_origins: vec!["http://bad\norigin".into()],
    };
    let result = app(AppState::new(MemoryCustomerStore::new()), &cors);
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            var: "ALLOWED_ORIGINS",
            ..
        })
    ));
}

#[tokio::test]
async fn openapi_document_lists_customer_paths() {
    let r = router();
    let (status, body) = send(&r, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/customers"));
    assert!(paths.contains_key("/customers/{id}"));
    assert!(paths.contains_key("/customers/search/by-name/{name}"));
}
