mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    InMemoryUsers, TEST_JWT_SECRET, TestAppBuilder, body_json, fake_user, get_with_token,
    test_app, token_for,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use staybook_auth::Claims;
use staybook_models::{Role, SessionPrincipal};
use tower::ServiceExt;

#[tokio::test]
async fn test_authenticated_principal_matches_user_record() {
    let app = test_app();
    let user = app.users.add(Role::HotelManager);

    let response = app
        .router
        .oneshot(get_with_token("/api/account/me", &token_for(&user.email)))
        .await
        .unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);

    let expected = SessionPrincipal::try_from(user).unwrap();
    let actual: SessionPrincipal = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(actual, expected);
    assert_eq!(body["role"], "hotel-manager");
}

#[tokio::test]
async fn test_missing_token() {
    let app = test_app();

    let request = Request::builder()
        .uri("/api/account/me")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied. No Token Provided");
    assert_eq!(app.users.lookups(), 0);
}

#[tokio::test]
async fn test_unknown_user() {
    let app = test_app();

    let response = app
        .router
        .oneshot(get_with_token("/api/account/me", &token_for("nobody@example.com")))
        .await
        .unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert_eq!(app.users.lookups(), 1);
}

#[tokio::test]
async fn test_cookie_fallback() {
    let app = test_app();
    let user = app.users.add(Role::Customer);

    let request = Request::builder()
        .uri("/api/account/me")
        .header("cookie", format!("access_token={}", token_for(&user.email)))
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], user.email);
}

#[tokio::test]
async fn test_header_takes_precedence_over_cookie() {
    let app = test_app();
    let from_header = app.users.add(Role::Customer);
    let from_cookie = app.users.add(Role::ViaAdmin);

    let request = Request::builder()
        .uri("/api/account/me")
        .header("authorization", format!("Bearer {}", token_for(&from_header.email)))
        .header("cookie", format!("access_token={}", token_for(&from_cookie.email)))
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], from_header.email);
    assert_eq!(body["role"], "customer");
}

#[tokio::test]
async fn test_expired_token() {
    let app = test_app();
    let user = app.users.add(Role::Customer);

    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.email.clone(),
        exp: now - 3600,
        iat: now - 7200,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app
        .router
        .oneshot(get_with_token("/api/account/me", &token))
        .await
        .unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
    assert!(body["error"].as_str().unwrap().contains("ExpiredSignature"));
    assert_eq!(app.users.lookups(), 0);
}

#[tokio::test]
async fn test_token_signed_with_another_secret() {
    let app = test_app();
    let user = app.users.add(Role::Customer);

    let token = encode(
        &Header::default(),
        &Claims {
            sub: user.email,
            exp: chrono::Utc::now().timestamp() as usize + 3600,
            iat: chrono::Utc::now().timestamp() as usize,
        },
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let response = app
        .router
        .oneshot(get_with_token("/api/account/me", &token))
        .await
        .unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_repository_error_is_internal() {
    let app = TestAppBuilder::new().users(InMemoryUsers::failing()).build();

    let response = app
        .router
        .oneshot(get_with_token("/api/account/me", &token_for("guest@example.com")))
        .await
        .unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_unrecognised_role_is_internal() {
    let app = test_app();
    let user = fake_user("superuser");
    app.users.insert(user.clone());

    let response = app
        .router
        .oneshot(get_with_token("/api/account/me", &token_for(&user.email)))
        .await
        .unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_access_lists_satisfied_policies() {
    let app = test_app();
    let user = app.users.add(Role::HotelManager);

    let response = app
        .router
        .oneshot(get_with_token("/api/account/access", &token_for(&user.email)))
        .await
        .unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "hotel-manager");
    assert_eq!(
        body["policies"],
        serde_json::json!([
            "customer_excluded",
            "hotel_manager_only",
            "hotel_manager_or_via_admin"
        ])
    );
}

#[tokio::test]
async fn test_role_gate_on_admin_route() {
    let app = test_app();
    let customer = app.users.add(Role::Customer);
    let admin = app.users.add(Role::ViaAdmin);

    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings/expire")
        .header("authorization", format!("Bearer {}", token_for(&customer.email)))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied. Via admins only");

    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings/expire")
        .header("authorization", format!("Bearer {}", token_for(&admin.email)))
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
