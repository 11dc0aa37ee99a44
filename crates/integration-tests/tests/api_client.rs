//! REST client behavior: authentication, error classification, uploads and
//! demo fallback.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use taponn_client::api::UploadFile;
use taponn_client::navigation::LOGIN_PATH;
use taponn_client::storage::{TOKEN_KEY, USER_KEY};
use taponn_client::{ApiError, AuthError, Credentials, DemoFallback, NoticeLevel, demo};
use taponn_core::{OrderId, OrderStatus, QrCodeId};
use taponn_integration_tests::{TestClient, connect, user_json};

#[tokio::test]
async fn test_login_persists_token_and_user() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::POST,
        "/auth/login",
        StatusCode::OK,
        json!({"success": true, "token": "jwt-login", "user": user_json()}),
    );

    let user = client
        .services
        .session
        .login(&Credentials::new("asha@example.com", "hunter22"))
        .await
        .unwrap();

    assert_eq!(user.name, "Asha Rao");
    assert!(client.services.session.is_authenticated());
    let store = client.services.api.local_store();
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("jwt-login"));
    assert!(store.get(USER_KEY).unwrap().contains("asha@example.com"));

    let login = &client.backend.requests_to(&Method::POST, "/auth/login")[0];
    assert_eq!(login.json()["password"], "hunter22");
    assert!(login.authorization.is_none());
}

#[tokio::test]
async fn test_rejected_login_stores_nothing() {
    let client = TestClient::start_at("/app/login").await;
    client.backend.respond(
        Method::POST,
        "/auth/login",
        StatusCode::UNAUTHORIZED,
        json!({"success": false, "message": "Invalid credentials"}),
    );

    let err = client
        .services
        .session
        .login(&Credentials::new("asha@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Api(ref e) if e.is_unauthorized()));
    assert!(client.services.api.token().is_none());
    assert_eq!(client.navigator.history(), vec!["/app/login".to_owned()]);
}

#[tokio::test]
async fn test_hydrate_sends_bearer_token() {
    let client = TestClient::start().await.with_token("jwt-stored");
    client.backend.respond(
        Method::GET,
        "/auth/me",
        StatusCode::OK,
        json!({"success": true, "data": user_json()}),
    );

    let user = client.services.session.hydrate().await.unwrap();

    assert_eq!(user.email, "asha@example.com");
    let me = &client.backend.requests_to(&Method::GET, "/auth/me")[0];
    assert_eq!(me.authorization.as_deref(), Some("Bearer jwt-stored"));
}

#[tokio::test]
async fn test_hydrate_without_token_skips_backend() {
    let client = TestClient::start().await;

    assert!(client.services.session.hydrate().await.is_none());
    assert!(client.backend.requests().is_empty());
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_redirects() {
    let client = TestClient::start_at("/app/dashboard")
        .await
        .with_token("jwt-expired");
    client.backend.respond(
        Method::GET,
        "/orders",
        StatusCode::UNAUTHORIZED,
        json!({"success": false, "message": "Token expired"}),
    );

    let err = client.services.api.get_orders().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Token expired"));
    assert!(client.services.api.token().is_none());
    assert_eq!(client.current_path(), LOGIN_PATH);
}

#[tokio::test]
async fn test_server_error_is_classified() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/admin/dashboard",
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"success": false, "message": "Maintenance"}),
    );

    let err = client.services.api.admin_dashboard_stats().await.unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.server_message(), Some("Maintenance"));
}

#[tokio::test]
async fn test_client_error_keeps_body() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::PATCH,
        "/orders/o-1/cancel",
        StatusCode::CONFLICT,
        json!({"success": false, "message": "Order already shipped", "code": "SHIPPED"}),
    );

    let err = client.services.api.cancel_order(&OrderId::from("o-1")).await.unwrap_err();

    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status, 409);
            assert_eq!(body["code"], "SHIPPED");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_closed_port_is_network_error() {
    let connected = connect("http://127.0.0.1:9/api", "/");

    let err = connected.services.api.health().await.unwrap_err();

    assert!(err.is_network_error());
    assert!(err.allows_demo_fallback());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_demo_fallback_on_unreachable_backend() {
    let connected = connect("http://127.0.0.1:9/api", "/app/admin");

    let stats = connected
        .services
        .api
        .admin_dashboard_stats()
        .await
        .or_demo(connected.notifier.as_ref(), demo::dashboard_stats)
        .unwrap();

    assert!(stats.success);
    let notice = connected.notifier.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.message, demo::DEMO_NOTICE);
}

#[tokio::test]
async fn test_demo_fallback_skips_client_errors() {
    let client = TestClient::start().await;
    client.backend.respond(
        Method::GET,
        "/admin/dashboard",
        StatusCode::FORBIDDEN,
        json!({"success": false, "message": "Admin only"}),
    );

    let result = client
        .services
        .api
        .admin_dashboard_stats()
        .await
        .or_demo(client.notifier.as_ref(), demo::dashboard_stats);

    assert_eq!(result.unwrap_err().status(), Some(403));
    assert!(client.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_upload_image_is_multipart() {
    let client = TestClient::start().await.with_token("jwt-abc");
    client.backend.respond(
        Method::POST,
        "/upload/image",
        StatusCode::OK,
        json!({"success": true, "data": {"url": "/uploads/avatar.png"}}),
    );

    let mut file = UploadFile::new("avatar.png", vec![0x89, b'P', b'N', b'G']);
    file.content_type = Some("image/png".to_owned());
    let envelope = client
        .services
        .api
        .upload_image(file, "avatar")
        .await
        .unwrap();

    assert_eq!(envelope.data.unwrap()["url"], "/uploads/avatar.png");
    let upload = &client.backend.requests_to(&Method::POST, "/upload/image")[0];
    assert!(
        upload
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data")
    );
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"image\"; filename=\"avatar.png\""));
    assert!(body.contains("name=\"type\""));
    assert_eq!(upload.authorization.as_deref(), Some("Bearer jwt-abc"));
}

#[tokio::test]
async fn test_profile_analytics_period_query() {
    let client = TestClient::start().await.with_token("jwt-abc");
    client.backend.respond(
        Method::GET,
        "/analytics/profile/p-1",
        StatusCode::OK,
        json!({"success": true, "data": {"views": 12}}),
    );

    let envelope = client
        .services
        .api
        .get_profile_analytics("p-1", Some("7d"))
        .await
        .unwrap();

    assert_eq!(envelope.data.unwrap()["views"], 12);
    let request = &client.backend.requests_to(&Method::GET, "/analytics/profile/p-1")[0];
    assert_eq!(request.query.as_deref(), Some("period=7d"));
}

#[tokio::test]
async fn test_admin_order_status_update() {
    let client = TestClient::start().await.with_token("jwt-admin");
    client.backend.respond(
        Method::PATCH,
        "/admin/orders/o-7/status",
        StatusCode::OK,
        json!({"success": true, "message": "Order updated"}),
    );

    let envelope = client
        .services
        .api
        .admin_update_order_status(&OrderId::from("o-7"), OrderStatus::Shipped)
        .await
        .unwrap();

    assert!(envelope.success);
    let request = &client
        .backend
        .requests_to(&Method::PATCH, "/admin/orders/o-7/status")[0];
    assert_eq!(request.json()["status"], "shipped");
}

#[tokio::test]
async fn test_delete_qr_code_encodes_id() {
    let client = TestClient::start().await.with_token("jwt-abc");

    let err = client
        .services
        .api
        .delete_qr_code(&QrCodeId::from("qr 1"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    let request = &client.backend.requests()[0];
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/qr/qr%201");
}
