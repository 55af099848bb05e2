//! Integration tests for storerate-client.
//!
//! Uses wiremock to mock HTTP responses from the store-rating API.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use std::time::Duration;
use storerate_client::flows::{self, LOGIN_FAILED, SIGNUP_FAILED, SIGNUP_SUCCEEDED};
use storerate_client::{
    ApiClient, Dashboard, Error, HttpRepository, StoreRepository, UserRepository,
};
use storerate_core::{
    LoginForm, MemorySessionStore, NewStore, NewUser, Role, Route, SessionError, SessionRecord,
    SessionStore, SignupForm, StoreId, UNKNOWN_ROLE_MESSAGE, UserId,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// HELPERS
// =============================================================================

async fn mock_login(server: &MockServer, role: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": { "id": 7, "name": "Pat", "role": role }
        })))
        .mount(server)
        .await;
}

fn login_form() -> LoginForm {
    LoginForm::new("pat@example.com", "secret-pass")
}

fn signup_form() -> SignupForm {
    SignupForm {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        password: "correct-horse".to_string(),
        address: "123 Main Street, City".to_string(),
        role: "user".to_string(),
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[tokio::test]
async fn test_login_routes_known_roles() {
    for (role, expected) in [
        ("admin", Route::Admin),
        ("owner", Route::Owner),
        ("user", Route::User),
    ] {
        let server = MockServer::start().await;
        mock_login(&server, role).await;

        let api = ApiClient::new(server.uri());
        let mut sessions = MemorySessionStore::new();
        let route = flows::login(&api, &login_form(), &mut sessions).await.unwrap();

        assert_eq!(route, expected);
        let record = sessions.load().unwrap().unwrap();
        assert_eq!(record.user_id, UserId(7));
        assert_eq!(record.name, "Pat");
        assert_eq!(record.role, Role::parse(role));
    }
}

#[tokio::test]
async fn test_login_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "pat@example.com",
            "password": "secret-pass"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": { "id": 1, "name": "Pat", "role": "admin" },
            "token": "tok-123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let mut sessions = MemorySessionStore::new();
    flows::login(&api, &login_form(), &mut sessions).await.unwrap();

    assert_eq!(
        sessions.load().unwrap().and_then(|r| r.token),
        Some("tok-123".to_string())
    );
}

#[tokio::test]
async fn test_login_unknown_role_clears_session() {
    let server = MockServer::start().await;
    mock_login(&server, "superuser").await;

    let api = ApiClient::new(server.uri());
    let mut sessions = MemorySessionStore::new();
    sessions
        .save(&SessionRecord::new(UserId(99), "Stale", Role::User))
        .unwrap();

    let err = flows::login(&api, &login_form(), &mut sessions)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownRole(_)));
    assert_eq!(
        err.user_message(LOGIN_FAILED),
        "Unknown role. Please contact support."
    );
    assert_eq!(sessions.load().unwrap(), None);
}

/// Session store whose `clear` always fails.
struct BrokenClearStore;

impl SessionStore for BrokenClearStore {
    fn load(&self) -> Result<Option<SessionRecord>, SessionError> {
        Ok(None)
    }

    fn save(&mut self, _record: &SessionRecord) -> Result<(), SessionError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        Err(SessionError::Corrupt("read-only".to_string()))
    }
}

#[tokio::test]
async fn test_login_unknown_role_survives_failed_clear() {
    let server = MockServer::start().await;
    mock_login(&server, "superuser").await;

    let api = ApiClient::new(server.uri());
    let err = flows::login(&api, &login_form(), &mut BrokenClearStore)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownRole(_)));
    assert_eq!(err.user_message(LOGIN_FAILED), UNKNOWN_ROLE_MESSAGE);
}

#[tokio::test]
async fn test_login_rejected_uses_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let mut sessions = MemorySessionStore::new();
    let err = flows::login(&api, &login_form(), &mut sessions)
        .await
        .unwrap_err();

    match &err {
        Error::Server { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message.as_deref(), Some("Invalid credentials"));
        }
        other => panic!("Expected Server error, got: {:?}", other),
    }
    assert_eq!(err.user_message(LOGIN_FAILED), "Invalid credentials");
    assert_eq!(sessions.load().unwrap(), None);
}

#[tokio::test]
async fn test_login_rejected_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let mut sessions = MemorySessionStore::new();
    let err = flows::login(&api, &login_form(), &mut sessions)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(LOGIN_FAILED), "Login failed");
}

#[tokio::test]
async fn test_login_invalid_form_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let mut sessions = MemorySessionStore::new();
    let err = flows::login(&api, &LoginForm::new("not-an-email", ""), &mut sessions)
        .await
        .unwrap_err();

    match err {
        Error::Validation(errors) => assert_eq!(errors.errors().len(), 2),
        other => panic!("Expected Validation error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_login_connection_refused() {
    // Use a port that's definitely not listening
    let api = ApiClient::new("http://127.0.0.1:1");
    let mut sessions = MemorySessionStore::new();
    let err = flows::login(&api, &login_form(), &mut sessions)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert_eq!(err.user_message(LOGIN_FAILED), "Login failed");
}

#[test]
fn test_logout_clears_session() {
    let mut sessions = MemorySessionStore::new();
    sessions
        .save(&SessionRecord::new(UserId(1), "Admin", Role::Admin))
        .unwrap();

    let route = flows::logout(&mut sessions).unwrap();

    assert_eq!(route, Route::Login);
    assert_eq!(sessions.load().unwrap(), None);
}

// =============================================================================
// SIGNUP
// =============================================================================

#[tokio::test]
async fn test_signup_posts_form_and_redirects_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(serde_json::json!({
            "name": "John Doe",
            "email": "john@example.com",
            "password": "correct-horse",
            "address": "123 Main Street, City",
            "role": "user"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let outcome = flows::signup(&api, &signup_form()).await.unwrap();

    assert_eq!(outcome.next, Route::Login);
    assert_eq!(outcome.message, SIGNUP_SUCCEEDED);
}

#[tokio::test]
async fn test_signup_conflict_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "message": "Email already registered"
        })))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let err = flows::signup(&api, &signup_form()).await.unwrap_err();

    assert_eq!(err.user_message(SIGNUP_FAILED), "Email already registered");
}

#[tokio::test]
async fn test_signup_short_password_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let form = SignupForm {
        password: "short".to_string(),
        ..signup_form()
    };
    let err = flows::signup(&api, &form).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(err.user_message(SIGNUP_FAILED).contains("password"));
}

// =============================================================================
// HTTP REPOSITORY
// =============================================================================

#[tokio::test]
async fn test_http_add_store_sends_coerced_rating() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stores"))
        .and(body_json(serde_json::json!({
            "name": "X",
            "address": "Y",
            "rating": 0.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 4, "name": "X", "address": "Y", "ownerId": null, "rating": 0.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = HttpRepository::new(ApiClient::new(server.uri()));
    let store = repo
        .add_store(NewStore::new("X", "Y").with_rating("abc"))
        .await
        .unwrap();

    assert_eq!(store.id, StoreId(4));
    assert_eq!(store.rating, 0.0);
}

#[tokio::test]
async fn test_http_add_user_sends_new_user_and_reads_record_without_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(serde_json::json!({
            "name": "Dana Reviewer",
            "email": "dana@example.com",
            "password": "pw-123456",
            "address": "4 Quay",
            "role": "owner"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 9, "name": "Dana Reviewer", "email": "dana@example.com",
            "address": "4 Quay", "role": "owner"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 9, "name": "Dana Reviewer", "email": "dana@example.com",
             "address": "4 Quay", "role": "owner"}
        ])))
        .mount(&server)
        .await;

    let repo = HttpRepository::new(ApiClient::new(format!("{}/", server.uri())));
    assert_eq!(repo.api().base_url(), server.uri());

    let user = repo
        .add_user(NewUser::new(
            "Dana Reviewer",
            "dana@example.com",
            "pw-123456",
            "4 Quay",
            "owner",
        ))
        .await
        .unwrap();
    assert_eq!(user.id, UserId(9));
    assert_eq!(user.role, Role::Owner);
    assert!(user.password.is_empty());

    let users = repo.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "dana@example.com");
}

#[tokio::test]
async fn test_http_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stores"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::with_options(server.uri(), Duration::from_secs(5), Some("tok-123")).unwrap();
    let stores = HttpRepository::new(api).list_stores().await.unwrap();
    assert!(stores.is_empty());
}

#[tokio::test]
async fn test_dashboard_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ratings"))
        .and(body_json(serde_json::json!({ "storeId": 1, "rating": 4.5 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "storeId": 1, "rating": 4.5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Admin", "email": "admin@example.com",
             "address": "HQ", "role": "admin"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Bakery", "address": "1 Bread St", "rating": 4.5}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"storeId": 1, "rating": 4.5}
        ])))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(HttpRepository::new(ApiClient::new(server.uri())));
    let rating = dashboard.set_rating(StoreId(1), 4.5).await.unwrap();
    assert_eq!(rating.store_id, StoreId(1));

    let stats = dashboard.stats().await.unwrap();
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_stores, 1);
    assert_eq!(stats.total_ratings, 1);
    assert_eq!(stats.stores[0].average_submitted, Some(4.5));
}

#[tokio::test]
async fn test_http_list_failure_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(HttpRepository::new(ApiClient::new(server.uri())));
    let err = dashboard.stats().await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 503, message: None }));
}

// =============================================================================
// ERROR TYPE TESTS
// =============================================================================

#[test]
fn test_error_display_server() {
    let err = Error::Server {
        status: 400,
        message: Some("bad".to_string()),
    };
    assert_eq!(format!("{}", err), "Server error 400: bad");
}

#[test]
fn test_error_display_json() {
    let json_err = serde_json::from_str::<SessionRecord>("invalid").unwrap_err();
    let err = Error::Json(json_err);
    assert!(format!("{}", err).starts_with("JSON error:"));
    assert_eq!(err.user_message(SIGNUP_FAILED), "Signup failed");
}
