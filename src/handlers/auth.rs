use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{
    AppState,
    auth::{self, AuthUser},
    errors::{ApiError, DbError, ErrorBody},
    extract::ValidatedJson,
    models::{
        AuthResponse, LoginRequest, MessageResponse, NewUser, RegisterRequest, UserProfile,
        UserResponse,
    },
    password,
    scope::{OwnerScope, email_taken},
};

/// register
///
/// [Public Route] Creates an account and logs it in.
///
/// *Flow*: rejects an email that is already registered, hashes the password with
/// Argon2id, inserts the user and opens a session. The session token is set as an
/// HttpOnly cookie and returned in the body.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered and logged in", body = AuthResponse),
        (status = 422, description = "Validation failed or email taken", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if state.repo.find_user_by_email(&payload.email).await?.is_some() {
        return Err(email_taken());
    }

    let password_hash = password::hash_password(payload.password).await?;
    let user = state
        .repo
        .create_user(NewUser {
            email: payload.email,
            full_name: payload.full_name,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => email_taken(),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.id, "User registered");

    let session = auth::start_session(&state.repo, &state.config, user.id).await?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session.cookie)],
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            user: user.into(),
            session: session.token,
        }),
    ))
}

/// login
///
/// [Public Route] Verifies email and password and opens a new session.
///
/// *Security*: an unknown email and a wrong password produce the same 401 and
/// both pay for one Argon2 computation, so neither the status nor the timing
/// tells whether an account exists.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(user) = state.repo.find_user_by_email(&payload.email).await? else {
        password::simulate_verification(payload.password).await?;
        return Err(ApiError::InvalidCredentials);
    };

    if !password::verify_password(payload.password, user.password.clone()).await? {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let session = auth::start_session(&state.repo, &state.config, user.id).await?;
    Ok((
        [(header::SET_COOKIE, session.cookie)],
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: user.into(),
            session: session.token,
        }),
    ))
}

/// logout
///
/// [Authenticated Route] Deletes the current session row and clears the cookie.
/// The token stops working immediately, whether it came from the cookie or a
/// Bearer header.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn logout(
    AuthUser { id, session_id }: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state.repo.delete_session(session_id).await?;
    tracing::info!(user_id = id, %session_id, "Session ended");

    Ok((
        [(header::SET_COOKIE, auth::clear_cookie(&state.config))],
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// me
///
/// [Authenticated Route] Returns the caller's profile.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn me(scope: OwnerScope) -> Result<Json<UserResponse>, ApiError> {
    let user: UserProfile = scope.me().await?;
    Ok(Json(UserResponse { user }))
}

/// refresh_token
///
/// [Authenticated Route] Replaces the current session with a fresh one, extending
/// its lifetime. The old token is revoked.
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    responses(
        (status = 200, description = "Session refreshed", body = AuthResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn refresh_token(
    AuthUser { id, session_id }: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .repo
        .find_user(id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    state.repo.delete_session(session_id).await?;
    let session = auth::start_session(&state.repo, &state.config, user.id).await?;

    Ok((
        [(header::SET_COOKIE, session.cookie)],
        Json(AuthResponse {
            message: "Session refreshed".to_string(),
            user: user.into(),
            session: session.token,
        }),
    ))
}
