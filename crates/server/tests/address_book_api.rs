use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use server::identity::USER_ID_HEADER;
use server::routes::{self, AppState};
use service::address_book::repo::memory::MemoryAddressBookRepository;
use service::geocoder::mock::StaticGeocoder;
use service::AddressBookService;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn build_app(geocoder: StaticGeocoder) -> Router {
    let repo = Arc::new(MemoryAddressBookRepository::new());
    let state = AppState { address_book: AddressBookService::new(repo, Arc::new(geocoder)) };
    routes::build_router(state, cors())
}

fn upsert_body(city: &str, is_default: u8) -> Value {
    json!({
        "name": "Li Lei",
        "phone": "13800000000",
        "province": "Beijing",
        "city": city,
        "county": "Chaoyang",
        "address": "1 Jianguo Rd",
        "tag": "home",
        "is_default": is_default
    })
}

async fn send(app: &Router, method: &str, uri: &str, user: Option<Uuid>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(u) = user {
        req = req.header(USER_ID_HEADER, u.to_string());
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(b.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    // extractor rejections are plain text
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| if bytes.is_empty() { Value::Null } else { Value::String(String::from_utf8_lossy(&bytes).into_owned()) });
    (status, value)
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app(StaticGeocoder::empty());
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_lists_address_routes() {
    let app = build_app(StaticGeocoder::empty());
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/address-books/page"].is_object());
}

#[tokio::test]
async fn requests_without_identity_are_rejected() {
    let app = build_app(StaticGeocoder::empty());
    let (status, body) = send(&app, "GET", "/address-books/default", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 4001);

    let req = Request::builder()
        .uri("/address-books/default")
        .header(USER_ID_HEADER, "42")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn add_then_fetch_default_and_page() {
    let app = build_app(StaticGeocoder::always("116.4,39.9"));
    let me = Uuid::new_v4();

    let (status, created) = send(&app, "POST", "/address-books", Some(me), Some(upsert_body("010", 1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["is_default"], 1);
    assert_eq!(created["lon"], 116.4);
    assert_eq!(created["lat"], 39.9);
    assert_eq!(created["user_id"], me.to_string());

    let (status, default) = send(&app, "GET", "/address-books/default", Some(me), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(default["id"], created["id"]);

    let (status, page) = send(&app, "GET", "/address-books/page?page=1&per_page=10", Some(me), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["list"].as_array().unwrap().len(), 1);

    let other = Uuid::new_v4();
    let (_, none) = send(&app, "GET", "/address-books/default", Some(other), None).await;
    assert!(none.is_null());
}

#[tokio::test]
async fn set_default_via_query_flag() {
    let app = build_app(StaticGeocoder::always("116.4,39.9"));
    let me = Uuid::new_v4();
    let (_, a) = send(&app, "POST", "/address-books", Some(me), Some(upsert_body("010", 1))).await;
    let (_, b) = send(&app, "POST", "/address-books", Some(me), Some(upsert_body("010", 0))).await;
    let b_id = b["id"].as_str().unwrap().to_string();

    let uri = format!("/address-books/default?id={b_id}&flag=1");
    let (status, _) = send(&app, "PUT", &uri, Some(me), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, default) = send(&app, "GET", "/address-books/default", Some(me), None).await;
    assert_eq!(default["id"], b["id"]);
    assert_ne!(default["id"], a["id"]);

    let bad = format!("/address-books/default?id={b_id}&flag=2");
    let (status, _) = send(&app, "PUT", &bad, Some(me), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_foreign_address_is_404() {
    let app = build_app(StaticGeocoder::always("116.4,39.9"));
    let owner = Uuid::new_v4();
    let (_, a) = send(&app, "POST", "/address-books", Some(owner), Some(upsert_body("010", 0))).await;
    let uri = format!("/address-books/{}", a["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(Uuid::new_v4()), Some(upsert_body("010", 1))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 2003);

    let (status, updated) = send(&app, "PUT", &uri, Some(owner), Some(upsert_body("021", 1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "021");
    assert_eq!(updated["is_default"], 1);
}

#[tokio::test]
async fn malformed_location_is_400() {
    let app = build_app(StaticGeocoder::empty());
    let mut body = upsert_body("010", 0);
    body["location"] = json!("east,north");
    let (status, err) = send(&app, "POST", "/address-books", Some(Uuid::new_v4()), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], 2002);
}

#[tokio::test]
async fn geocoder_outage_is_502() {
    let app = build_app(StaticGeocoder::failing());
    let (status, err) = send(&app, "POST", "/address-books", Some(Uuid::new_v4()), Some(upsert_body("010", 0))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(err["code"], 2101);
}

#[tokio::test]
async fn inner_lookup_by_user_and_city() {
    let app = build_app(StaticGeocoder::always("116.4,39.9"));
    let me = Uuid::new_v4();
    send(&app, "POST", "/address-books", Some(me), Some(upsert_body("010", 0))).await;
    send(&app, "POST", "/address-books", Some(me), Some(upsert_body("021", 0))).await;

    let (status, list) = send(&app, "GET", &format!("/inner/address-books/users/{me}?city=010"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["city"], "010");

    let (_, empty) = send(&app, "GET", &format!("/inner/address-books/users/{me}?city=0755"), None, None).await;
    assert_eq!(empty, json!([]));
}
