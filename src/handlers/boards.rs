use axum::{Json, extract::Path, http::StatusCode};

use crate::{
    errors::{ApiError, ErrorBody},
    extract::ValidatedJson,
    models::{
        BoardDetailsResponse, BoardListResponse, BoardResponse, CreateBoardRequest,
        MessageResponse, UpdateBoardRequest,
    },
    scope::OwnerScope,
};

/// list_boards
///
/// [Authenticated Route] Lists the caller's boards, newest first. Each board
/// embeds its check-ins.
#[utoipa::path(
    get,
    path = "/api/boards",
    responses(
        (status = 200, description = "Boards owned by the caller", body = BoardListResponse),
        (status = 401, description = "Not logged in", body = ErrorBody)
    )
)]
pub async fn list_boards(scope: OwnerScope) -> Result<Json<BoardListResponse>, ApiError> {
    let boards = scope.list_boards().await?;
    Ok(Json(BoardListResponse { boards }))
}

/// create_board
///
/// [Authenticated Route] Creates a board for the caller.
///
/// A quantitative board that names a known unit and sends no `defaultValue` gets
/// the unit's default value and symbol.
#[utoipa::path(
    post,
    path = "/api/boards",
    request_body = CreateBoardRequest,
    responses(
        (status = 201, description = "Board created", body = BoardResponse),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn create_board(
    scope: OwnerScope,
    ValidatedJson(payload): ValidatedJson<CreateBoardRequest>,
) -> Result<(StatusCode, Json<BoardResponse>), ApiError> {
    let board = scope.create_board(payload).await?;
    Ok((StatusCode::CREATED, Json(BoardResponse { board })))
}

/// get_board
///
/// [Authenticated Route] Shows one of the caller's boards with its check-ins.
#[utoipa::path(
    get,
    path = "/api/boards/{id}",
    params(("id" = i64, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Found", body = BoardDetailsResponse),
        (status = 404, description = "Absent or not owned", body = ErrorBody)
    )
)]
pub async fn get_board(
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<Json<BoardDetailsResponse>, ApiError> {
    let board = scope.board_details(id).await?;
    Ok(Json(BoardDetailsResponse { board }))
}

/// update_board
///
/// [Authenticated Route] Partially updates a board. Omitted fields are unchanged.
#[utoipa::path(
    put,
    path = "/api/boards/{id}",
    params(("id" = i64, Path, description = "Board ID")),
    request_body = UpdateBoardRequest,
    responses(
        (status = 200, description = "Updated", body = BoardResponse),
        (status = 404, description = "Absent or not owned", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn update_board(
    scope: OwnerScope,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateBoardRequest>,
) -> Result<Json<BoardResponse>, ApiError> {
    let board = scope.update_board(id, payload).await?;
    Ok(Json(BoardResponse { board }))
}

/// delete_board
///
/// [Authenticated Route] Deletes a board together with its check-ins.
#[utoipa::path(
    delete,
    path = "/api/boards/{id}",
    params(("id" = i64, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Absent or not owned", body = ErrorBody)
    )
)]
pub async fn delete_board(
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    scope.delete_board(id).await?;
    Ok(Json(MessageResponse::new("Board deleted successfully")))
}
