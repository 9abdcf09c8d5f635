mod support;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use storefront_back::routes;
use support::FakeGateway;

fn payment_request(token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/product/braintree/payment")
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }

    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn app(gateway: std::sync::Arc<FakeGateway>) -> Router {
    routes::create_router(support::offline_state(gateway))
}

#[tokio::test]
async fn payment_without_token_is_unauthorized() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let response = app
        .oneshot(payment_request(
            None,
            json!({ "nonce": "n", "cart": [{ "price": 1.0 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(gateway.sale_count(), 0);
}

#[tokio::test]
async fn payment_with_garbage_token_is_unauthorized() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let response = app
        .oneshot(payment_request(
            Some("not-a-jwt"),
            json!({ "nonce": "n", "cart": [{ "price": 1.0 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn payment_with_expired_token_reports_expiry() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let token = support::expired_token_for(1, "j@x.com");
    let response = app
        .oneshot(payment_request(
            Some(&token),
            json!({ "nonce": "n", "cart": [{ "price": 1.0 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn bearer_prefixed_token_is_accepted() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let token = format!("Bearer {}", support::token_for(1, "j@x.com"));
    let response = app
        .oneshot(payment_request(
            Some(&token),
            json!({ "nonce": "", "cart": [{ "price": 1.0 }] }),
        ))
        .await
        .expect("response");

    // Past the auth gate: the empty nonce fails validation, not the token.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_with_empty_nonce_is_bad_request() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let token = support::token_for(1, "j@x.com");
    let response = app
        .oneshot(payment_request(
            Some(&token),
            json!({ "nonce": "", "cart": [{ "price": 1.0 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.sale_count(), 0);
}

#[tokio::test]
async fn payment_with_empty_cart_is_bad_request() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let token = support::token_for(1, "j@x.com");
    let response = app
        .oneshot(payment_request(
            Some(&token),
            json!({ "nonce": "n", "cart": [] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.sale_count(), 0);
}

#[tokio::test]
async fn payment_with_negative_price_never_reaches_the_gateway() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let token = support::token_for(1, "j@x.com");
    let response = app
        .oneshot(payment_request(
            Some(&token),
            json!({ "nonce": "n", "cart": [{ "price": -5 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(gateway.sale_count(), 0);
}

#[tokio::test]
async fn declined_charge_maps_to_payment_required() {
    let gateway = FakeGateway::declining();
    let app = app(gateway.clone());

    let token = support::token_for(1, "j@x.com");
    let response = app
        .oneshot(payment_request(
            Some(&token),
            json!({ "nonce": "n", "cart": [{ "price": 10.0 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(gateway.sale_count(), 1);
}

#[tokio::test]
async fn captured_charge_with_failed_write_is_reported_distinctly() {
    // The fake gateway captures the charge, then the order write fails
    // against the unreachable pool: the partial-failure class, not a
    // generic 500 body.
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let token = support::token_for(1, "j@x.com");
    let response = app
        .oneshot(payment_request(
            Some(&token),
            json!({ "nonce": "n", "cart": [{ "price": 19.99 }, { "price": 25.50 }] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(gateway.sale_count(), 1);

    let body = body_json(response).await;
    let message = body["message"].as_str().expect("message");
    assert!(message.contains("payment was captured"));
    assert!(message.contains(support::FAKE_TRANSACTION_ID));
}

#[tokio::test]
async fn client_token_endpoint_returns_gateway_token() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/product/braintree/token")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["client_token"], "fake-client-token");
}

#[tokio::test]
async fn register_validation_runs_before_any_lookup() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "name": "J",
                        "email": "not-an-email",
                        "password": "abcdef",
                        "phone": "1",
                        "address": "A",
                        "answer": "blue"
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid email address");
}

#[tokio::test]
async fn admin_listing_requires_authentication() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/all-orders")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn category_creation_requires_authentication() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/category/create-category")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "name": "Books" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn liveness_probe_needs_no_dependencies() {
    let gateway = FakeGateway::new();
    let app = app(gateway.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}
