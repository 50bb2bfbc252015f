mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use train_station_backend::{routes::create_router, AppState};

async fn app() -> (Router, AppState) {
    let state = common::test_state().await;
    (create_router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

#[tokio::test]
async fn catalogue_requires_a_token() {
    let (app, _) = app().await;

    let (status, body) = send(&app, Method::GET, "/api/stations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].is_string());

    let (status, _) = send(&app, Method::GET, "/api/journeys", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_authorization_is_unauthorized() {
    let (app, _) = app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/stations")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .expect("build request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn only_staff_write_to_the_catalogue() {
    let (app, state) = app().await;
    let traveller = common::user(&state.db, "traveller@example.com", false).await;
    let staff = common::user(&state.db, "staff@example.com", true).await;
    let station = json!({ "name": "Kharkiv", "latitude": 49.99, "longitude": 36.23 });

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/stations",
        Some(&common::token_for(&traveller)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/stations",
        Some(&common::token_for(&traveller)),
        Some(station.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/stations",
        Some(&common::token_for(&staff)),
        Some(station),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Kharkiv");

    let (_, listed) = send(
        &app,
        Method::GET,
        "/api/stations",
        Some(&common::token_for(&traveller)),
        None,
    )
    .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn register_then_login() {
    let (app, _) = app().await;
    let email = common::random_email();
    let credentials = json!({ "email": email, "password": "correct-horse" });

    let (status, registered) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["is_staff"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, logged_in) =
        send(&app, Method::POST, "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    let token = logged_in["token"].as_str().expect("token");

    let (status, _) = send(&app, Method::GET, "/api/journeys", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn short_password_is_a_field_error() {
    let (app, _) = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": common::random_email(), "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["password"][0].is_string());
}

#[tokio::test]
async fn booking_through_the_api() {
    let (app, state) = app().await;
    let journey = common::small_journey(&state.db).await;
    let buyer = common::user(&state.db, "buyer@example.com", false).await;
    let token = common::token_for(&buyer);
    let id = journey.journey.id;

    let (status, order) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({ "tickets": [
            { "journey": id, "carriage": 1, "seat": 4 },
            { "journey": id, "carriage": 2, "seat": 7 }
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["tickets"].as_array().map(Vec::len), Some(2));
    assert_eq!(order["tickets"][1]["seat"], 7);

    let (status, detail) = send(
        &app,
        Method::GET,
        &format!("/api/journeys/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["tickets_available"], 18);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({ "tickets": [{ "journey": id, "carriage": 3, "seat": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "carriage": ["carriage number must be in available range: (1, carriage_num): (1, 2)"] })
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({ "tickets": [{ "journey": id, "carriage": 1, "seat": 4 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["non_field_errors"][0].is_string());
}

#[tokio::test]
async fn orders_are_private_to_their_owner() {
    let (app, state) = app().await;
    let journey = common::small_journey(&state.db).await;
    let alice = common::user(&state.db, "alice@example.com", false).await;
    let bob = common::user(&state.db, "bob@example.com", false).await;
    let id = journey.journey.id;

    let (_, order) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&common::token_for(&alice)),
        Some(json!({ "tickets": [{ "journey": id, "carriage": 1, "seat": 1 }] })),
    )
    .await;
    let order_id = order["id"].as_i64().expect("order id");

    let (status, page) = send(
        &app,
        Method::GET,
        "/api/orders",
        Some(&common::token_for(&bob)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 0);
    assert_eq!(page["results"], json!([]));

    let (status, page) = send(
        &app,
        Method::GET,
        "/api/orders?page_size=5",
        Some(&common::token_for(&alice)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["next"], Value::Null);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/orders/{}", order_id),
        Some(&common::token_for(&bob)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_order_body_is_a_bad_request() {
    let (app, state) = app().await;
    let journey = common::small_journey(&state.db).await;
    let buyer = common::user(&state.db, "buyer@example.com", false).await;
    let token = common::token_for(&buyer);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({ "tickets": [{ "journey": journey.journey.id, "carriage": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().expect("detail");
    assert!(detail.contains("seat"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(&token),
        Some(json!({ "tickets": [{ "journey": journey.journey.id, "carriage": 1, "seat": "aisle" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}
