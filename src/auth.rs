use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    errors::ApiError,
    models::{Session, SessionToken},
    repository::RepositoryState,
};

/// Claims
///
/// Payload of a session token. The token is only a pointer to the `sessions` row:
/// it is honoured while that row exists, so logout revokes it immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the id of the user who logged in.
    pub sub: i64,
    /// Session id (sid): primary key of the backing `sessions` row.
    pub sid: Uuid,
    /// Issued At (iat): Unix timestamp when the token was signed.
    pub iat: i64,
    /// Expiration Time (exp): equal to the session's `expires_at`.
    pub exp: i64,
}

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request. Handlers use `id` for every
/// ownership filter and `session_id` to end the current session.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub session_id: Uuid,
}

/// AuthUser Extractor Implementation
///
/// Makes `AuthUser` usable as a handler argument. The process:
/// 1. Reuse: an identity already resolved by `auth_middleware` is taken from the
///    request extensions.
/// 2. Token Extraction: the session cookie first, then `Authorization: Bearer`.
/// 3. Token Validation: signature and `exp` of the HS256 JWT.
/// 4. Session Lookup: the session row must exist, belong to `sub` and be live.
/// 5. User Lookup: the user must still exist.
///
/// Rejection: `ApiError::Unauthorized` (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // 1. Reuse
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // 2. Token Extraction
        let token = session_cookie_value(parts, &config.session_cookie_name)
            .or_else(|| bearer_token(parts))
            .ok_or(ApiError::Unauthorized)?;

        // 3. Token Validation
        let claims = verify_session_token(&token, &config)?;

        // 4. Session Lookup
        let session = repo
            .find_session(claims.sid)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        if session.user_id != claims.sub || session.is_expired(Utc::now()) {
            tracing::debug!(session_id = %session.id, "Rejected stale or mismatched session");
            return Err(ApiError::Unauthorized);
        }

        // 5. User Lookup
        let user = repo
            .find_user(claims.sub)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            session_id: session.id,
        })
    }
}

fn session_cookie_value(parts: &Parts, cookie_name: &str) -> Option<String> {
    let cookie_header = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

/// Decodes and checks a session token. Expired or tampered tokens are `Unauthorized`.
pub fn verify_session_token(token: &str, config: &AppConfig) -> Result<Claims, ApiError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Session token rejected: {:?}", e.kind());
            ApiError::Unauthorized
        })
}

/// Signs the token for an already persisted session.
pub fn sign_session_token(session: &Session, config: &AppConfig) -> Result<String, ApiError> {
    let claims = Claims {
        sub: session.user_id,
        sid: session.id,
        iat: session.created_at.timestamp(),
        exp: session.expires_at.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal {
        operation: format!("sign session token: {e}"),
    })
}

/// IssuedSession
///
/// A freshly created session: the body part for API clients and the
/// `Set-Cookie` value for browsers.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub cookie: String,
}

/// start_session
///
/// Persists a new session row for `user_id` and signs its token. The session
/// lives for `SESSION_TTL_HOURS`.
pub async fn start_session(
    repo: &RepositoryState,
    config: &AppConfig,
    user_id: i64,
) -> Result<IssuedSession, ApiError> {
    let expires_at = Utc::now() + Duration::hours(config.session_ttl_hours);
    let session = repo.create_session(user_id, expires_at).await?;
    let access_token = sign_session_token(&session, config)?;

    tracing::info!(user_id, session_id = %session.id, "Session started");

    Ok(IssuedSession {
        cookie: session_cookie(&access_token, config),
        token: SessionToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
        },
    })
}

/// `Set-Cookie` value carrying `token`.
pub fn session_cookie(token: &str, config: &AppConfig) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        config.session_cookie_name,
        token,
        config.session_ttl_hours * 3600,
        if config.cookie_secure() { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_cookie(config: &AppConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        config.session_cookie_name,
        if config.cookie_secure() { "; Secure" } else { "" }
    )
}
