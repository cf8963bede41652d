use axum::{
    extract::FromRequestParts,
    http::{Method, Request, Uri, header, request::Parts},
};
use chrono::{Duration, Utc};
use habit_tracker::{
    AppState, MemoryRepository,
    auth::{self, AuthUser, Claims},
    config::{AppConfig, Env},
    errors::ApiError,
    models::NewUser,
    password,
    repository::RepositoryState,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn create_app_state(env: Env) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState::new(Arc::new(MemoryRepository::new()) as RepositoryState, config)
}

async fn seed_user(state: &AppState, email: &str) -> i64 {
    state
        .repo
        .create_user(NewUser {
            email: email.to_string(),
            full_name: None,
            password_hash: "not-used-here".to_string(),
        })
        .await
        .unwrap()
        .id
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(token: &str) -> Parts {
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    parts
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_bearer_token() {
    let state = create_app_state(Env::Production);
    let user_id = seed_user(&state, "ada@example.com").await;
    let session = auth::start_session(&state.repo, &state.config, user_id)
        .await
        .unwrap();

    let mut parts = with_bearer(&session.token.access_token);
    let user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    assert_eq!(user.id, user_id);
    assert_eq!(session.token.token_type, "Bearer");
}

#[tokio::test]
async fn test_auth_success_with_session_cookie() {
    let state = create_app_state(Env::Local);
    let user_id = seed_user(&state, "ada@example.com").await;
    let session = auth::start_session(&state.repo, &state.config, user_id)
        .await
        .unwrap();

    let mut parts = get_request_parts(Method::GET, "/api/boards".parse().unwrap());
    parts.headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(&format!(
            "theme=dark; habit_session={}",
            session.token.access_token
        ))
        .unwrap(),
    );

    let user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(user.id, user_id);
}

#[tokio::test]
async fn test_auth_failure_with_missing_credentials() {
    let state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_auth_failure_with_foreign_signature() {
    let state = create_app_state(Env::Production);
    let user_id = seed_user(&state, "ada@example.com").await;
    let session = state
        .repo
        .create_session(user_id, Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let token = sign(
        &Claims {
            sub: user_id,
            sid: session.id,
            iat: Utc::now().timestamp(),
            exp: session.expires_at.timestamp(),
        },
        "some-other-secret",
    );

    let result = AuthUser::from_request_parts(&mut with_bearer(&token), &state).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_auth_failure_after_session_deleted() {
    let state = create_app_state(Env::Production);
    let user_id = seed_user(&state, "ada@example.com").await;
    let session = auth::start_session(&state.repo, &state.config, user_id)
        .await
        .unwrap();
    let claims = auth::verify_session_token(&session.token.access_token, &state.config).unwrap();

    assert!(state.repo.delete_session(claims.sid).await.unwrap());

    let result =
        AuthUser::from_request_parts(&mut with_bearer(&session.token.access_token), &state).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_auth_failure_with_expired_session() {
    let state = create_app_state(Env::Production);
    let user_id = seed_user(&state, "ada@example.com").await;
    let session = state
        .repo
        .create_session(user_id, Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    let token = auth::sign_session_token(&session, &state.config).unwrap();

    let result = AuthUser::from_request_parts(&mut with_bearer(&token), &state).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_auth_failure_when_session_belongs_to_someone_else() {
    let state = create_app_state(Env::Production);
    let owner = seed_user(&state, "ada@example.com").await;
    let intruder = seed_user(&state, "eve@example.com").await;
    let session = state
        .repo
        .create_session(owner, Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let forged = sign(
        &Claims {
            sub: intruder,
            sid: session.id,
            iat: Utc::now().timestamp(),
            exp: session.expires_at.timestamp(),
        },
        TEST_JWT_SECRET,
    );

    let result = AuthUser::from_request_parts(&mut with_bearer(&forged), &state).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_auth_reuses_identity_from_extensions() {
    let state = create_app_state(Env::Production);
    let resolved = AuthUser {
        id: 42,
        session_id: Uuid::new_v4(),
    };

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.extensions.insert(resolved.clone());

    let user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(user, resolved);
}

#[test]
fn test_session_cookie_attributes() {
    let mut config = AppConfig::default();
    config.session_ttl_hours = 2;

    let cookie = auth::session_cookie("abc", &config);
    assert_eq!(
        cookie,
        "habit_session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=7200"
    );

    config.env = Env::Production;
    assert!(auth::session_cookie("abc", &config).ends_with("; Secure"));
    assert!(auth::clear_cookie(&config).contains("Max-Age=0"));
}

#[tokio::test]
async fn test_password_round_trip() {
    let hash = password::hash_password("Analytical1!Engine".to_string())
        .await
        .unwrap();
    assert_ne!(hash, "Analytical1!Engine");
    assert!(
        password::verify_password("Analytical1!Engine".to_string(), hash.clone())
            .await
            .unwrap()
    );
    assert!(
        !password::verify_password("analytical1!engine".to_string(), hash)
            .await
            .unwrap()
    );
}
