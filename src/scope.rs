//! Owner-scoped access to boards, check-ins and the caller's own user record.
//!
//! Every operation filters by the authenticated user's id. A row that does not
//! match (absent, or owned by someone else) is reported as `404` so the API never
//! reveals whether another user's resource exists.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::collections::HashMap;

use crate::{
    auth::AuthUser,
    config::AppConfig,
    defaults,
    errors::{ApiError, DbError},
    models::{
        Board, BoardDetails, CheckIn, CheckInDetails, CreateBoardRequest, CreateCheckInRequest,
        UpdateBoardRequest, UpdateCheckInRequest, UpdateUserRequest, UserChanges, UserProfile,
    },
    repository::RepositoryState,
    units,
};

const BOARD: &str = "Board";
const CHECK_IN: &str = "Check-in";
const USER: &str = "User";

/// OwnerScope
///
/// The authenticated user paired with the repository. Handlers for boards,
/// check-ins and users receive one of these instead of the raw repository.
#[derive(Clone)]
pub struct OwnerScope {
    user_id: i64,
    repo: RepositoryState,
}

impl<S> FromRequestParts<S> for OwnerScope
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(OwnerScope::new(user.id, RepositoryState::from_ref(state)))
    }
}

impl OwnerScope {
    pub fn new(user_id: i64, repo: RepositoryState) -> Self {
        Self { user_id, repo }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    // --- Boards ---

    /// The caller's boards, newest first, each with its check-ins.
    pub async fn list_boards(&self) -> Result<Vec<BoardDetails>, ApiError> {
        let boards = self.repo.list_boards(self.user_id).await?;
        let mut by_board: HashMap<i64, Vec<CheckIn>> = HashMap::new();
        for check_in in self.repo.list_check_ins(self.user_id, None).await? {
            by_board.entry(check_in.board_id).or_default().push(check_in);
        }

        Ok(boards
            .into_iter()
            .map(|board| BoardDetails {
                check_ins: by_board.remove(&board.id).unwrap_or_default(),
                board,
            })
            .collect())
    }

    pub async fn board(&self, id: i64) -> Result<Board, ApiError> {
        self.repo
            .find_board(id, self.user_id)
            .await?
            .ok_or(ApiError::NotFound { resource: BOARD })
    }

    pub async fn board_details(&self, id: i64) -> Result<BoardDetails, ApiError> {
        let board = self.board(id).await?;
        let check_ins = self.repo.list_check_ins(self.user_id, Some(id)).await?;
        Ok(BoardDetails { board, check_ins })
    }

    /// Creates a board, filling quantitative defaults from the unit table.
    pub async fn create_board(&self, req: CreateBoardRequest) -> Result<Board, ApiError> {
        let new_board = defaults::board_from_request(req);
        let board = self.repo.create_board(self.user_id, new_board).await?;
        tracing::debug!(board_id = board.id, user_id = self.user_id, "Board created");
        Ok(board)
    }

    pub async fn update_board(&self, id: i64, req: UpdateBoardRequest) -> Result<Board, ApiError> {
        self.repo
            .update_board(id, self.user_id, req.into())
            .await?
            .ok_or(ApiError::NotFound { resource: BOARD })
    }

    /// Deletes a board and, through the cascade, its check-ins.
    pub async fn delete_board(&self, id: i64) -> Result<(), ApiError> {
        if self.repo.delete_board(id, self.user_id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound { resource: BOARD })
        }
    }

    // --- Check-ins ---

    /// The caller's check-ins, most recent check date first, each with its board.
    pub async fn list_check_ins(
        &self,
        board_id: Option<i64>,
    ) -> Result<Vec<CheckInDetails>, ApiError> {
        let check_ins = self.repo.list_check_ins(self.user_id, board_id).await?;
        let boards: HashMap<i64, Board> = self
            .repo
            .list_boards(self.user_id)
            .await?
            .into_iter()
            .map(|board| (board.id, board))
            .collect();

        Ok(check_ins
            .into_iter()
            .filter_map(|check_in| {
                boards.get(&check_in.board_id).map(|board| CheckInDetails {
                    board: board.clone(),
                    check_in,
                })
            })
            .collect())
    }

    pub async fn check_in(&self, id: i64) -> Result<CheckInDetails, ApiError> {
        let check_in = self
            .repo
            .find_check_in(id, self.user_id)
            .await?
            .ok_or(ApiError::NotFound { resource: CHECK_IN })?;
        self.with_board(check_in).await
    }

    /// Creates a check-in on one of the caller's boards. Missing quantities are
    /// inherited from the board.
    pub async fn create_check_in(
        &self,
        req: CreateCheckInRequest,
    ) -> Result<CheckInDetails, ApiError> {
        let board = self.board(req.board_id).await?;
        let new_check_in = defaults::check_in_from_request(&board, req);
        let check_in = self.repo.create_check_in(self.user_id, new_check_in).await?;
        tracing::debug!(
            check_in_id = check_in.id,
            board_id = board.id,
            value = %describe_value(&check_in),
            "Check-in created"
        );
        Ok(CheckInDetails { check_in, board })
    }

    pub async fn update_check_in(
        &self,
        id: i64,
        req: UpdateCheckInRequest,
    ) -> Result<CheckInDetails, ApiError> {
        // Moving to another board requires owning that board.
        if let Some(board_id) = req.board_id {
            self.board(board_id).await?;
        }
        let check_in = self
            .repo
            .update_check_in(id, self.user_id, req.into())
            .await?
            .ok_or(ApiError::NotFound { resource: CHECK_IN })?;
        self.with_board(check_in).await
    }

    pub async fn delete_check_in(&self, id: i64) -> Result<(), ApiError> {
        if self.repo.delete_check_in(id, self.user_id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound { resource: CHECK_IN })
        }
    }

    async fn with_board(&self, check_in: CheckIn) -> Result<CheckInDetails, ApiError> {
        let board = self.board(check_in.board_id).await?;
        Ok(CheckInDetails { check_in, board })
    }

    // --- Users ---

    /// Only the caller's own id resolves; every other id is a 404.
    fn own_id(&self, id: i64) -> Result<i64, ApiError> {
        if id == self.user_id {
            Ok(id)
        } else {
            Err(ApiError::NotFound { resource: USER })
        }
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.repo
            .find_user(self.user_id)
            .await?
            .map(UserProfile::from)
            .ok_or(ApiError::NotFound { resource: USER })
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        Ok(vec![self.me().await?])
    }

    pub async fn user(&self, id: i64) -> Result<UserProfile, ApiError> {
        self.own_id(id)?;
        self.me().await
    }

    pub async fn update_user(
        &self,
        id: i64,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, ApiError> {
        let id = self.own_id(id)?;

        if let Some(email) = req.email.as_deref() {
            if let Some(existing) = self.repo.find_user_by_email(email).await? {
                if existing.id != id {
                    return Err(email_taken());
                }
            }
        }

        let changes = UserChanges {
            email: req.email,
            full_name: req.full_name,
        };
        match self.repo.update_user(id, changes).await {
            Ok(Some(user)) => Ok(user.into()),
            Ok(None) => Err(ApiError::NotFound { resource: USER }),
            // Lost a race with another registration.
            Err(DbError::UniqueViolation { .. }) => Err(email_taken()),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the caller's account together with all of its data and sessions.
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let id = self.own_id(id)?;
        if self.repo.delete_user(id).await? {
            tracing::info!(user_id = id, "User deleted");
            Ok(())
        } else {
            Err(ApiError::NotFound { resource: USER })
        }
    }
}

fn describe_value(check_in: &CheckIn) -> String {
    match (check_in.value, check_in.unit.as_deref()) {
        (Some(value), Some(unit)) => units::format_value(value, unit),
        (Some(value), None) => value.to_string(),
        (None, _) => "-".to_string(),
    }
}

pub fn email_taken() -> ApiError {
    ApiError::Field {
        field: "email",
        message: "The email has already been taken".to_string(),
    }
}
