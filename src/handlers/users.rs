use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    AppState, auth,
    errors::{ApiError, ErrorBody},
    extract::ValidatedJson,
    models::{MessageResponse, UpdateUserRequest, UserListResponse, UserResponse},
    scope::OwnerScope,
};

/// list_users
///
/// [Authenticated Route] Lists the users visible to the caller, which is only the
/// caller.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "The caller", body = UserListResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn list_users(scope: OwnerScope) -> Result<Json<UserListResponse>, ApiError> {
    let users = scope.list_users().await?;
    Ok(Json(UserListResponse { users }))
}

/// get_user
///
/// [Authenticated Route] Shows the caller's own record. Any other id is a 404.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Found", body = UserResponse),
        (status = 404, description = "Not the caller", body = ErrorBody)
    )
)]
pub async fn get_user(
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = scope.user(id).await?;
    Ok(Json(UserResponse { user }))
}

/// update_user
///
/// [Authenticated Route] Updates the caller's name or email. A new email must not
/// belong to another account.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserResponse),
        (status = 404, description = "Not the caller", body = ErrorBody),
        (status = 422, description = "Validation failed or email taken", body = ErrorBody)
    )
)]
pub async fn update_user(
    scope: OwnerScope,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = scope.update_user(id, payload).await?;
    Ok(Json(UserResponse { user }))
}

/// delete_user
///
/// [Authenticated Route] Deletes the caller's account with all of its boards,
/// check-ins and sessions, and clears the session cookie.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not the caller", body = ErrorBody)
    )
)]
pub async fn delete_user(
    scope: OwnerScope,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    scope.delete_user(id).await?;
    Ok((
        [(header::SET_COOKIE, auth::clear_cookie(&state.config))],
        Json(MessageResponse::new("User deleted successfully")),
    ))
}
