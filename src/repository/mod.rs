use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    errors::DbError,
    models::{
        Board, BoardChanges, CheckIn, CheckInChanges, NewBoard, NewCheckIn, NewUser, Session,
        User, UserChanges,
    },
};

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// Repository Trait
///
/// Persistence contract shared by the PostgreSQL and in-memory implementations.
/// Every board and check-in method takes the owner's id and filters on it, so a
/// row owned by someone else is indistinguishable from a missing one.
///
/// **Send + Sync + async_trait** let the trait object (`Arc<dyn Repository>`)
/// cross Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> Result<User, DbError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, DbError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
    // COALESCE semantics: `None` fields keep their stored value.
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>, DbError>;
    // Cascades to the user's boards, check-ins and sessions.
    async fn delete_user(&self, id: i64) -> Result<bool, DbError>;

    // --- Boards (owner-scoped) ---
    // Newest first.
    async fn list_boards(&self, user_id: i64) -> Result<Vec<Board>, DbError>;
    async fn find_board(&self, id: i64, user_id: i64) -> Result<Option<Board>, DbError>;
    async fn create_board(&self, user_id: i64, board: NewBoard) -> Result<Board, DbError>;
    async fn update_board(
        &self,
        id: i64,
        user_id: i64,
        changes: BoardChanges,
    ) -> Result<Option<Board>, DbError>;
    // Cascades to the board's check-ins.
    async fn delete_board(&self, id: i64, user_id: i64) -> Result<bool, DbError>;

    // --- Check-ins (owner-scoped) ---
    // Most recent check date first; optional board filter.
    async fn list_check_ins(
        &self,
        user_id: i64,
        board_id: Option<i64>,
    ) -> Result<Vec<CheckIn>, DbError>;
    async fn find_check_in(&self, id: i64, user_id: i64) -> Result<Option<CheckIn>, DbError>;
    async fn create_check_in(&self, user_id: i64, check_in: NewCheckIn)
    -> Result<CheckIn, DbError>;
    async fn update_check_in(
        &self,
        id: i64,
        user_id: i64,
        changes: CheckInChanges,
    ) -> Result<Option<CheckIn>, DbError>;
    async fn delete_check_in(&self, id: i64, user_id: i64) -> Result<bool, DbError>;

    // --- Sessions ---
    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DbError>;
    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, DbError>;
    async fn delete_session(&self, id: Uuid) -> Result<bool, DbError>;
    // Returns the number of sessions removed.
    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
