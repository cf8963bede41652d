use axum::{
    Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::{ApiError, ErrorBody},
    extract::ValidatedJson,
    models::{
        CheckInListResponse, CheckInResponse, CreateCheckInRequest, MessageResponse,
        UpdateCheckInRequest,
    },
    scope::OwnerScope,
};

/// CheckInFilter
///
/// Query parameters accepted by `GET /api/check-ins`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CheckInFilter {
    /// Only return check-ins of this board.
    pub board_id: Option<i64>,
}

/// list_check_ins
///
/// [Authenticated Route] Lists the caller's check-ins, most recent check date
/// first. Each check-in embeds its board.
#[utoipa::path(
    get,
    path = "/api/check-ins",
    params(CheckInFilter),
    responses(
        (status = 200, description = "Check-ins owned by the caller", body = CheckInListResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn list_check_ins(
    scope: OwnerScope,
    Query(filter): Query<CheckInFilter>,
) -> Result<Json<CheckInListResponse>, ApiError> {
    let check_ins = scope.list_check_ins(filter.board_id).await?;
    Ok(Json(CheckInListResponse { check_ins }))
}

/// create_check_in
///
/// [Authenticated Route] Records a check-in on one of the caller's boards.
///
/// On a quantitative board, a request without `value` inherits the board's
/// default value, unit and symbol. `completed` defaults to true.
#[utoipa::path(
    post,
    path = "/api/check-ins",
    request_body = CreateCheckInRequest,
    responses(
        (status = 201, description = "Check-in created", body = CheckInResponse),
        (status = 404, description = "Board absent or not owned", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn create_check_in(
    scope: OwnerScope,
    ValidatedJson(payload): ValidatedJson<CreateCheckInRequest>,
) -> Result<(StatusCode, Json<CheckInResponse>), ApiError> {
    let check_in = scope.create_check_in(payload).await?;
    Ok((StatusCode::CREATED, Json(CheckInResponse { check_in })))
}

/// get_check_in
#[utoipa::path(
    get,
    path = "/api/check-ins/{id}",
    params(("id" = i64, Path, description = "Check-in ID")),
    responses(
        (status = 200, description = "Found", body = CheckInResponse),
        (status = 404, description = "Absent or not owned", body = ErrorBody)
    )
)]
pub async fn get_check_in(
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let check_in = scope.check_in(id).await?;
    Ok(Json(CheckInResponse { check_in }))
}

/// update_check_in
///
/// [Authenticated Route] Partially updates a check-in. A new `boardId` must name
/// one of the caller's boards.
#[utoipa::path(
    put,
    path = "/api/check-ins/{id}",
    params(("id" = i64, Path, description = "Check-in ID")),
    request_body = UpdateCheckInRequest,
    responses(
        (status = 200, description = "Updated", body = CheckInResponse),
        (status = 404, description = "Check-in or board absent or not owned", body = ErrorBody)
    )
)]
pub async fn update_check_in(
    scope: OwnerScope,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateCheckInRequest>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let check_in = scope.update_check_in(id, payload).await?;
    Ok(Json(CheckInResponse { check_in }))
}

/// delete_check_in
#[utoipa::path(
    delete,
    path = "/api/check-ins/{id}",
    params(("id" = i64, Path, description = "Check-in ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Absent or not owned", body = ErrorBody)
    )
)]
pub async fn delete_check_in(
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    scope.delete_check_in(id).await?;
    Ok(Json(MessageResponse::new("Check-in deleted successfully")))
}
