//! Session store tests against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use blogdesk_core::error::AuthError;
use blogdesk_core::model::Registration;
use blogdesk_core::{
    ApiConfig, CredentialToken, Credentials, Environment, Error, MemoryTokenStore, TokenStore,
};
use blogdesk_http::{BlogClient, BootstrapOutcome};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, tokens: &Arc<MemoryTokenStore>) -> BlogClient {
    let config = ApiConfig::for_env(Environment::Development)
        .with_server_override(server.uri())
        .unwrap();
    BlogClient::new(config, tokens.clone()).unwrap()
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200, "message": "success", "data": data}))
}

fn fail(code: i32, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": code, "message": message, "data": null}))
}

fn stored(tokens: &MemoryTokenStore) -> Option<String> {
    tokens.load().unwrap().map(|t| t.as_str().to_string())
}

fn ann() -> Credentials {
    Credentials::new("ann@example.com", "hunter2")
}

async fn mount_login(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(
            ok(json!({
                "token": "fresh-token",
                "user": {"id": "u1", "name": "Ann"}
            }))
            .set_delay(delay),
        )
        .mount(server)
        .await;
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_success_persists_sanitized_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({"email": "ann@example.com", "password": "hunter2"})))
        .respond_with(ok(json!({
            "token": " abc\u{00A0}def\n",
            "user": {"id": "u1", "name": "Ann"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    let response = client.session().login(&ann()).await.unwrap();
    assert_eq!(response.token.as_str(), "abcdef");
    assert_eq!(stored(&tokens).as_deref(), Some("abcdef"));

    let session = client.session().snapshot();
    assert!(session.is_authenticated);
    assert_eq!(session.user_id, "u1");
    assert_eq!(session.display_name, "Ann");
    assert_eq!(session.avatar_url, "/assets/default-avatar.png");
    assert!(!session.loading);
    assert_eq!(session.last_error, None);
}

#[tokio::test]
async fn test_login_rejected_records_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(fail(400, "Wrong email or password"))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    let err = client.session().login(&ann()).await.unwrap_err();
    assert!(matches!(err, Error::Api(ref e) if e.code == 400));

    let session = client.session().snapshot();
    assert!(!session.is_authenticated);
    assert_eq!(session.last_error.as_deref(), Some("Wrong email or password"));
    assert!(!session.loading);
    assert_eq!(stored(&tokens), None);
}

#[tokio::test]
async fn test_login_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    assert!(client.session().login(&ann()).await.is_err());
    assert_eq!(
        client.session().snapshot().last_error.as_deref(),
        Some("Login failed, please try again")
    );
}

#[tokio::test]
async fn test_login_clears_previous_error() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::ZERO).await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    // Blank code fails locally and leaves an error behind.
    assert!(client.session().verify_registration_code(" ").await.is_err());
    assert!(client.session().snapshot().last_error.is_some());

    client.session().login(&ann()).await.unwrap();
    assert_eq!(client.session().snapshot().last_error, None);
}

// ============================================================================
// Bootstrap
// ============================================================================

#[tokio::test]
async fn test_bootstrap_without_token_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ok(json!({"id": "u1", "name": "Ann"})))
        .expect(0)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    assert_eq!(client.session().bootstrap().await, BootstrapOutcome::NoToken);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_bootstrap_restores_identity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ok(json!({"id": "u7", "name": "Bo"})))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token(
        CredentialToken::new("stored-token").unwrap(),
    ));
    let client = client_for(&server, &tokens);

    assert_eq!(client.session().bootstrap().await, BootstrapOutcome::Restored);

    let session = client.session().snapshot();
    assert!(session.is_authenticated);
    assert_eq!(session.user_id, "u7");
    assert_eq!(session.display_name, "Bo");
    assert_eq!(session.avatar_url, "/assets/user-avatar.png");
    assert_eq!(client.session().user_id().as_deref(), Some("u7"));
}

#[tokio::test]
async fn test_bootstrap_rejected_token_is_discarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(fail(401, "Token expired"))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token(
        CredentialToken::new("old-token").unwrap(),
    ));
    let client = client_for(&server, &tokens);

    assert_eq!(client.session().bootstrap().await, BootstrapOutcome::Rejected);
    assert_eq!(stored(&tokens), None);

    let session = client.session().snapshot();
    assert!(!session.is_authenticated);
    assert!(session.user_id.is_empty());
    assert_eq!(session.last_error.as_deref(), Some("Token expired"));
}

#[tokio::test]
async fn test_bootstrap_http_401_without_envelope_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token(
        CredentialToken::new("old-token").unwrap(),
    ));
    let client = client_for(&server, &tokens);

    assert_eq!(client.session().bootstrap().await, BootstrapOutcome::Rejected);
    assert_eq!(stored(&tokens), None);
}

#[tokio::test]
async fn test_bootstrap_server_error_keeps_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token(
        CredentialToken::new("kept-token").unwrap(),
    ));
    let client = client_for(&server, &tokens);

    assert_eq!(client.session().bootstrap().await, BootstrapOutcome::Deferred);
    assert_eq!(stored(&tokens).as_deref(), Some("kept-token"));

    let session = client.session().snapshot();
    assert!(!session.is_authenticated);
    assert_eq!(
        session.last_error.as_deref(),
        Some("Could not restore your session")
    );
}

#[tokio::test]
async fn test_bootstrap_unreachable_server_keeps_token() {
    let config = ApiConfig::for_env(Environment::Development)
        .with_server_override("http://127.0.0.1:1")
        .unwrap();
    let tokens = Arc::new(MemoryTokenStore::with_token(
        CredentialToken::new("kept-token").unwrap(),
    ));
    let client = BlogClient::new(config, tokens.clone()).unwrap();

    assert_eq!(client.session().bootstrap().await, BootstrapOutcome::Deferred);
    assert_eq!(stored(&tokens).as_deref(), Some("kept-token"));

    let session = client.session().snapshot();
    assert!(!session.is_authenticated);
    assert!(!session.loading);
    assert_eq!(
        session.last_error.as_deref(),
        Some("Could not restore your session")
    );
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_sends_token_then_clears_it() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::ZERO).await;

    Mock::given(method("POST"))
        .and(path("/api/users/logout"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ok(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    client.session().login(&ann()).await.unwrap();
    client.session().logout().await;

    assert_eq!(stored(&tokens), None);
    let session = client.session().snapshot();
    assert!(!session.is_authenticated);
    assert!(session.display_name.is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_when_remote_fails() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::ZERO).await;

    Mock::given(method("POST"))
        .and(path("/api/users/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    client.session().login(&ann()).await.unwrap();
    client.session().logout().await;

    assert_eq!(stored(&tokens), None);
    assert!(!client.session().is_authenticated());
    assert_eq!(client.session().user_id(), None);
}

#[tokio::test]
async fn test_stale_login_after_logout_is_discarded() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::from_millis(300)).await;

    Mock::given(method("POST"))
        .and(path("/api/users/logout"))
        .respond_with(ok(Value::Null))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);
    let session = client.session();

    let credentials = ann();
    let (login, ()) = tokio::join!(session.login(&credentials), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.logout().await;
    });

    assert!(matches!(
        login,
        Err(Error::Auth(AuthError::Superseded))
    ));
    assert_eq!(stored(&tokens), None);
    assert!(!session.is_authenticated());
    assert!(!session.snapshot().loading);
}

#[tokio::test]
async fn test_failed_login_does_not_discard_pending_restore() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ok(json!({"id": "u7", "name": "Bo"})).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(fail(400, "Wrong email or password"))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token(
        CredentialToken::new("stored-token").unwrap(),
    ));
    let client = client_for(&server, &tokens);
    let session = client.session();

    let credentials = ann();
    let (outcome, login) = tokio::join!(session.bootstrap(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.login(&credentials).await
    });

    assert!(login.is_err());
    assert_eq!(outcome, BootstrapOutcome::Restored);
    assert!(session.is_authenticated());
    assert_eq!(session.user_id().as_deref(), Some("u7"));
    assert_eq!(stored(&tokens).as_deref(), Some("stored-token"));
}

#[tokio::test]
async fn test_bootstrap_without_token_does_not_discard_pending_login() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::from_millis(300)).await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);
    let session = client.session();

    let credentials = ann();
    let (login, outcome) = tokio::join!(session.login(&credentials), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.bootstrap().await
    });

    assert_eq!(outcome, BootstrapOutcome::NoToken);
    assert!(login.is_ok());
    assert!(session.is_authenticated());
    assert_eq!(stored(&tokens).as_deref(), Some("fresh-token"));
    assert!(!session.snapshot().loading);
}

// ============================================================================
// Loading flag
// ============================================================================

#[tokio::test]
async fn test_loading_tracks_overlapping_actions() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::from_millis(600)).await;

    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(ok(Value::Null).set_delay(Duration::from_millis(150)))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);
    let session = client.session();

    assert!(!session.snapshot().loading);

    let credentials = ann();
    let (avatar, login, during) = tokio::join!(
        session.update_avatar("/img/new.png"),
        session.login(&credentials),
        async {
            tokio::time::sleep(Duration::from_millis(350)).await;
            session.snapshot().loading
        }
    );

    avatar.unwrap();
    login.unwrap();
    // The avatar update had finished; the login was still running.
    assert!(during);
    assert!(!session.snapshot().loading);
}

// ============================================================================
// Avatar
// ============================================================================

#[tokio::test]
async fn test_update_avatar_success() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::ZERO).await;

    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(body_json(json!({"avatarUrl": "/img/new.png"})))
        .respond_with(ok(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    client.session().login(&ann()).await.unwrap();
    client.session().update_avatar("/img/new.png").await.unwrap();
    assert_eq!(client.session().snapshot().avatar_url, "/img/new.png");
}

#[tokio::test]
async fn test_update_avatar_failure_keeps_avatar() {
    let server = MockServer::start().await;
    mount_login(&server, Duration::ZERO).await;

    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .respond_with(fail(500, "  "))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    client.session().login(&ann()).await.unwrap();
    assert!(client.session().update_avatar("/img/new.png").await.is_err());

    let session = client.session().snapshot();
    assert_eq!(session.avatar_url, "/assets/default-avatar.png");
    assert_eq!(session.last_error.as_deref(), Some("Failed to update avatar"));
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_verify_without_pending_registration_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/verify-code"))
        .respond_with(ok(Value::Null))
        .expect(0)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    let err = client
        .session()
        .verify_registration_code("123456")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::NoPendingRegistration)));
    assert!(client.session().snapshot().last_error.is_some());
}

#[tokio::test]
async fn test_register_then_verify() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .and(body_json(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "hunter2"
        })))
        .respond_with(ok(json!("verification code sent")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users/verify-code"))
        .and(body_json(json!({"email": "ann@example.com", "code": "000000"})))
        .respond_with(fail(400, "Invalid code"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users/verify-code"))
        .and(body_json(json!({"email": "ann@example.com", "code": "123456"})))
        .respond_with(ok(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);
    let session = client.session();

    let registration = Registration {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        password: "hunter2".into(),
    };
    session.register(&registration).await.unwrap();
    assert_eq!(
        session.snapshot().pending_registration_email.as_deref(),
        Some("ann@example.com")
    );

    // A wrong code keeps the registration pending for another attempt.
    assert!(session.verify_registration_code("000000").await.is_err());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.last_error.as_deref(), Some("Invalid code"));
    assert_eq!(
        snapshot.pending_registration_email.as_deref(),
        Some("ann@example.com")
    );

    session.verify_registration_code(" 123456 ").await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.pending_registration_email, None);
    assert_eq!(snapshot.last_error, None);
    // Registration does not sign in.
    assert!(!snapshot.is_authenticated);
    assert_eq!(stored(&tokens), None);
}

#[tokio::test]
async fn test_verify_blank_code_fails_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ok(Value::Null))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users/verify-code"))
        .respond_with(ok(Value::Null))
        .expect(0)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    let registration = Registration {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        password: "hunter2".into(),
    };
    client.session().register(&registration).await.unwrap();

    let err = client
        .session()
        .verify_registration_code("   ")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::MissingVerificationCode)));
    assert_eq!(
        client.session().snapshot().last_error.as_deref(),
        Some("please enter the verification code")
    );
}

#[tokio::test]
async fn test_register_failure_records_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(fail(409, "Email already registered"))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::new());
    let client = client_for(&server, &tokens);

    let registration = Registration {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        password: "hunter2".into(),
    };
    assert!(client.session().register(&registration).await.is_err());

    let session = client.session().snapshot();
    assert_eq!(session.pending_registration_email, None);
    assert_eq!(session.last_error.as_deref(), Some("Email already registered"));
}
