//! API Integration Tests
//!
//! Every test spawns the full router on an ephemeral port with in-memory
//! repositories and storage, so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use axum::{routing::get, Json, Router};
use chrono::Utc;
use integration_tests::{
    assert_error, assert_json, fixtures::*, TestServer, API,
};
use reqwest::{multipart::Part, StatusCode};
use serde_json::{json, Value};
use tracker_api::{extractors::RefreshUser, AppState};
use tracker_common::{Claims, TokenType};
use tracker_core::{TokenRecord, TokenRepository};
use tracker_service::AuthService;
use uuid::Uuid;

async fn register(server: &TestServer, request: &RegisterRequest) -> Uuid {
    let response = server
        .post(&format!("{API}/auth/register"), request)
        .await
        .unwrap();
    let body: IdResponse = assert_json(response, StatusCode::OK).await.unwrap();
    Uuid::parse_str(&body.id).unwrap()
}

async fn login(server: &TestServer, request: &RegisterRequest) -> String {
    let response = server
        .post(&format!("{API}/auth/login"), &LoginRequest::from_register(request))
        .await
        .unwrap();
    let body: LoginResponse = assert_json(response, StatusCode::OK).await.unwrap();
    body.access_token
}

/// Register a fresh user and return `(user id, access token)`
async fn signed_in(server: &TestServer) -> (Uuid, String) {
    let request = RegisterRequest::unique();
    let user_id = register(server, &request).await;
    (user_id, login(server, &request).await)
}

async fn create_workspace(server: &TestServer, token: &str, name: &str) -> Uuid {
    let response = server
        .post_form_auth(&format!("{API}/workspaces"), token, workspace_form(name))
        .await
        .unwrap();
    let body: IdResponse = assert_json(response, StatusCode::OK).await.unwrap();
    Uuid::parse_str(&body.id).unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready_without_database() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "not_configured");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Session Scenario
// ============================================================================

#[tokio::test]
async fn test_session_lifecycle() {
    let server = TestServer::start_with(&[("JWT_ACCESS_TOKEN_EXPIRY", "2")])
        .await
        .expect("Failed to start server");
    let alice = RegisterRequest::alice();

    let user_id = register(&server, &alice).await;

    let response = server
        .post(&format!("{API}/auth/login"), &LoginRequest::from_register(&alice))
        .await
        .unwrap();
    let session: LoginResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(session.token_type, "Bearer");
    assert!(!session.access_token.is_empty());

    let wrong = LoginRequest {
        username: "alice".to_string(),
        password: "wrong".to_string(),
    };
    let response = server.post(&format!("{API}/auth/login"), &wrong).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &session.access_token)
        .await
        .unwrap();
    let info: UserInfoResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(info.id, user_id.to_string());
    assert_eq!(info.username, "alice");
    assert_eq!(info.email, "alice@example.com");

    // Login does not hand out the refresh half; mint a pair directly
    let pair = AuthService::new(&server.context)
        .issue_session(user_id)
        .await
        .unwrap();
    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &pair.refresh_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_WRONG");

    tokio::time::sleep(Duration::from_millis(3500)).await;

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &session.access_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_EXPIRED");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    register(&server, &request).await;

    let mut again = RegisterRequest::unique();
    again.username.clone_from(&request.username);
    let response = server
        .post(&format!("{API}/auth/register"), &again)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();

    assert_eq!(code, "USER_ALREADY_EXISTS");
    assert_eq!(server.backend.users.count_by_username(&request.username), 1);
}

#[tokio::test]
async fn test_register_invalid_email_has_details() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.email = "not-an-email".to_string();

    let response = server
        .post(&format!("{API}/auth/register"), &request)
        .await
        .unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(body.error.details.unwrap()["email"].is_array());
}

#[tokio::test]
async fn test_register_overlong_email_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.email = format!(
        "{}@{}.{}.{}.{}.com",
        "a".repeat(64),
        "b".repeat(60),
        "c".repeat(60),
        "d".repeat(60),
        "e".repeat(60)
    );

    let response = server
        .post(&format!("{API}/auth/register"), &request)
        .await
        .unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(body.error.details.unwrap()["email"].is_array());
    assert_eq!(server.backend.users.count_by_username(&request.username), 0);
}

#[tokio::test]
async fn test_register_missing_field() {
    let server = TestServer::start().await.expect("Failed to start server");
    let body = json!({ "username": "bob", "password": "secret123" });

    let response = server
        .post(&format!("{API}/auth/register"), &body)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "FIELD_WRONG_TYPE");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = LoginRequest {
        username: "nobody".to_string(),
        password: "whatever".to_string(),
    };

    let response = server.post(&format!("{API}/auth/login"), &request).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_each_login_creates_a_token_record() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    register(&server, &request).await;

    login(&server, &request).await;
    login(&server, &request).await;

    assert_eq!(server.backend.tokens.len(), 2);
}

// ============================================================================
// Guard Tests
// ============================================================================

#[tokio::test]
async fn test_guard_missing_header() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get(&format!("{API}/auth/user-info")).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_REQUIRED");
}

#[tokio::test]
async fn test_guard_wrong_scheme() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;

    let response = server
        .get_with_authorization(&format!("{API}/auth/user-info"), &format!("Basic {token}"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_WRONG_FORMAT");
}

#[tokio::test]
async fn test_guard_custom_scheme() {
    let server = TestServer::start_with(&[("JWT_TOKEN_TYPE", "JWT")])
        .await
        .expect("Failed to start server");
    let (_, token) = signed_in(&server).await;

    let response = server
        .get_with_authorization(&format!("{API}/auth/user-info"), &format!("JWT {token}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_WRONG_FORMAT");
}

#[tokio::test]
async fn test_guard_garbage_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get_auth(&format!("{API}/auth/user-info"), "not.a.jwt")
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_WRONG");
}

#[tokio::test]
async fn test_guard_expired_signature() {
    let server = TestServer::start().await.expect("Failed to start server");
    signed_in(&server).await;
    let record_id = server.backend.tokens.ids()[0];

    let now = Utc::now().timestamp();
    let token = server
        .backend
        .jwt
        .encode_claims(&Claims {
            sub: record_id.to_string(),
            iat: now - 7200,
            exp: now - 3600,
            token_type: TokenType::Access,
        })
        .unwrap();

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_guard_revoked_record() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let record_id = server.backend.tokens.ids()[0];

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &token)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(AuthService::new(&server.context).revoke(record_id).await.unwrap());

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_REVOKED");
}

#[tokio::test]
async fn test_guard_expired_record() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let record_id = server.backend.tokens.ids()[0];

    // The signature is still valid; only the record lapsed
    server.backend.tokens.expire(record_id);

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_REVOKED");
}

#[tokio::test]
async fn test_guard_unknown_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let record = TokenRecord::new(Uuid::new_v4(), chrono::Duration::hours(1));
    server.backend.tokens.create(&record).await.unwrap();

    let pair = server
        .backend
        .jwt
        .generate_pair_token(record.id, chrono::Duration::hours(1), chrono::Duration::hours(2))
        .unwrap();

    let response = server
        .get_auth(&format!("{API}/auth/user-info"), &pair.access_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_refresh_guard() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    let user_id = register(&server, &request).await;
    let pair = AuthService::new(&server.context)
        .issue_session(user_id)
        .await
        .unwrap();

    let router: Router<AppState> = Router::new().route(
        "/refresh",
        get(|RefreshUser(identity): RefreshUser| async move {
            Json(json!({
                "user_id": identity.user.id,
                "token_id": identity.token_id,
            }))
        }),
    );
    let base = server.spawn_router(router).await.unwrap();

    let response = server
        .client
        .get(format!("{base}/refresh"))
        .header("Authorization", format!("Bearer {}", pair.refresh_token))
        .send()
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["user_id"], user_id.to_string());

    let token_id = Uuid::parse_str(body["token_id"].as_str().unwrap()).unwrap();
    assert!(server.backend.tokens.ids().contains(&token_id));

    let response = server
        .client
        .get(format!("{base}/refresh"))
        .header("Authorization", format!("Bearer {}", pair.access_token))
        .send()
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_WRONG");
}

// ============================================================================
// Workspace Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_workspace() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user_id, token) = signed_in(&server).await;
    let name = format!("Roadmap {}", unique_suffix());

    let id = create_workspace(&server, &token, &name).await;

    let response = server
        .get_auth(&format!("{API}/workspaces/{id}"), &token)
        .await
        .unwrap();
    let workspace: WorkspaceResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(workspace.id, id.to_string());
    assert_eq!(workspace.name, name);
    assert_eq!(workspace.user_id, user_id.to_string());
    assert!(workspace.image.is_none());
}

#[tokio::test]
async fn test_create_workspace_with_image() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let form = workspace_form_with_image(&format!("Design {}", unique_suffix()), "logo.PNG", 2048);

    let response = server
        .post_form_auth(&format!("{API}/workspaces"), &token, form)
        .await
        .unwrap();
    let created: IdResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth(&format!("{API}/workspaces/{}", created.id), &token)
        .await
        .unwrap();
    let workspace: WorkspaceResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let key = workspace.image.unwrap();
    assert!(key.starts_with("workspaces/"));
    assert!(key.ends_with(".png"));
    assert_eq!(
        server.backend.storage.object(&key),
        Some(("image/png".to_string(), 2048))
    );
}

#[tokio::test]
async fn test_image_content_type_follows_extension() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let image = Part::bytes(b"<svg/>".to_vec())
        .file_name("icon.svg")
        .mime_str("text/html")
        .unwrap();
    let form = workspace_form(&format!("Icons {}", unique_suffix())).part("image", image);

    let response = server
        .post_form_auth(&format!("{API}/workspaces"), &token, form)
        .await
        .unwrap();
    let _: IdResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let key = server.backend.storage.keys().pop().unwrap();
    assert!(key.ends_with(".svg"));
    assert_eq!(
        server.backend.storage.object(&key),
        Some(("image/svg+xml".to_string(), 6))
    );
    assert_eq!(server.backend.workspaces.len(), 1);
}

#[tokio::test]
async fn test_create_workspace_rejects_image_type() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let form = workspace_form_with_image("Animated", "loop.gif", 64);

    let response = server
        .post_form_auth(&format!("{API}/workspaces"), &token, form)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(code, "UNSUPPORTED_IMAGE_TYPE");
    assert!(server.backend.storage.keys().is_empty());
}

#[tokio::test]
async fn test_create_workspace_rejects_large_image() {
    let server = TestServer::start_with(&[("UPLOAD_MAX_BYTES", "1024")])
        .await
        .expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let form = workspace_form_with_image("Huge", "big.jpg", 1025);

    let response = server
        .post_form_auth(&format!("{API}/workspaces"), &token, form)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(code, "IMAGE_TOO_LARGE");
    assert!(server.backend.storage.keys().is_empty());
}

#[tokio::test]
async fn test_create_workspace_requires_name() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;

    let response = server
        .post_form_auth(&format!("{API}/workspaces"), &token, workspace_form(""))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_workspace_duplicate_name() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let name = format!("Shared {}", unique_suffix());

    create_workspace(&server, &token, &name).await;

    let response = server
        .post_form_auth(&format!("{API}/workspaces"), &token, workspace_form(&name))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "WORKSPACE_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_get_workspace_of_other_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, owner_token) = signed_in(&server).await;
    let (_, other_token) = signed_in(&server).await;
    let id = create_workspace(&server, &owner_token, &format!("Private {}", unique_suffix())).await;

    let response = server
        .get_auth(&format!("{API}/workspaces/{id}"), &other_token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "WORKSPACE_NOT_FOUND");
}

#[tokio::test]
async fn test_get_workspace_bad_id() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;

    let response = server
        .get_auth(&format!("{API}/workspaces/not-a-uuid"), &token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_search_workspaces_paginates() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    let (_, other_token) = signed_in(&server).await;
    let tag = unique_suffix();

    for i in 0..5 {
        create_workspace(&server, &token, &format!("Alpha {tag}-{i}")).await;
    }
    create_workspace(&server, &token, &format!("Beta {tag}")).await;
    create_workspace(&server, &other_token, &format!("Alpha {tag}-other")).await;

    let response = server
        .get_auth(&format!("{API}/workspaces?name=ALPHA&page=1&page_size=2"), &token)
        .await
        .unwrap();
    let first: PaginatedResponse<WorkspaceResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(first.data.len(), 2);
    assert_eq!(first.pagination.page, 1);
    assert_eq!(first.pagination.page_size, 2);
    assert_eq!(first.pagination.total, 5);
    assert_eq!(first.pagination.total_pages, 3);

    let response = server
        .get_auth(&format!("{API}/workspaces?name=alpha&page=3&page_size=2"), &token)
        .await
        .unwrap();
    let last: PaginatedResponse<WorkspaceResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(last.data.len(), 1);
    assert!(first.data.iter().all(|w| w.id != last.data[0].id));
}

#[tokio::test]
async fn test_search_workspaces_defaults() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = signed_in(&server).await;
    create_workspace(&server, &token, &format!("Gamma {}", unique_suffix())).await;

    let response = server
        .get_auth(&format!("{API}/workspaces"), &token)
        .await
        .unwrap();
    let page: PaginatedResponse<WorkspaceResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.page_size, 10);

    let response = server
        .get_auth(&format!("{API}/workspaces?page_size=500"), &token)
        .await
        .unwrap();
    let page: PaginatedResponse<WorkspaceResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.pagination.page_size, 50);
}

#[tokio::test]
async fn test_search_workspaces_requires_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get(&format!("{API}/workspaces")).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "TOKEN_REQUIRED");
}

// ============================================================================
// Fallback Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_url() {
    let server = TestServer::start().await.expect("Failed to start server");

    for path in [format!("{API}/projects"), "/nowhere".to_string()] {
        let response = server.get(&path).await.unwrap();
        let body: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
        assert_eq!(body.error.code, "URL_NOT_FOUND");
        assert_eq!(body.error.message, "URL not found");
    }
}
