use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::Repository;
use crate::{
    errors::DbError,
    models::{
        Board, BoardChanges, CheckIn, CheckInChanges, NewBoard, NewCheckIn, NewUser, Session,
        User, UserChanges,
    },
};

const USER_COLUMNS: &str = "id, email, full_name, password, created_at, updated_at";
const BOARD_COLUMNS: &str =
    "id, user_id, name, is_quantity, default_value, unit, unit_symbol, created_at, updated_at";
const CHECK_IN_COLUMNS: &str = "id, board_id, user_id, check_date, notes, completed, value, unit, unit_symbol, created_at, updated_at";

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL. Queries are checked at
/// runtime, so building the crate never needs a live database.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        let sql = format!(
            "INSERT INTO users (email, full_name, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user.email)
            .bind(user.full_name)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>, DbError> {
        let sql = format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.full_name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_boards(&self, user_id: i64) -> Result<Vec<Board>, DbError> {
        let sql = format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, Board>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_board(&self, id: i64, user_id: i64) -> Result<Option<Board>, DbError> {
        let sql = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1 AND user_id = $2");
        Ok(sqlx::query_as::<_, Board>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_board(&self, user_id: i64, board: NewBoard) -> Result<Board, DbError> {
        let sql = format!(
            r#"
            INSERT INTO boards (user_id, name, is_quantity, default_value, unit, unit_symbol)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BOARD_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Board>(&sql)
            .bind(user_id)
            .bind(board.name)
            .bind(board.is_quantity)
            .bind(board.default_value)
            .bind(board.unit)
            .bind(board.unit_symbol)
            .fetch_one(&self.pool)
            .await?)
    }

    /// Only the owner's row matches; `None` fields keep their stored value.
    async fn update_board(
        &self,
        id: i64,
        user_id: i64,
        changes: BoardChanges,
    ) -> Result<Option<Board>, DbError> {
        let sql = format!(
            r#"
            UPDATE boards
            SET name = COALESCE($3, name),
                is_quantity = COALESCE($4, is_quantity),
                default_value = COALESCE($5, default_value),
                unit = COALESCE($6, unit),
                unit_symbol = COALESCE($7, unit_symbol),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {BOARD_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Board>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.name)
            .bind(changes.is_quantity)
            .bind(changes.default_value)
            .bind(changes.unit)
            .bind(changes.unit_symbol)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_board(&self, id: i64, user_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_check_ins(
        &self,
        user_id: i64,
        board_id: Option<i64>,
    ) -> Result<Vec<CheckIn>, DbError> {
        let sql = format!(
            r#"
            SELECT {CHECK_IN_COLUMNS} FROM check_ins
            WHERE user_id = $1 AND ($2::BIGINT IS NULL OR board_id = $2)
            ORDER BY check_date DESC, id DESC
            "#
        );
        Ok(sqlx::query_as::<_, CheckIn>(&sql)
            .bind(user_id)
            .bind(board_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_check_in(&self, id: i64, user_id: i64) -> Result<Option<CheckIn>, DbError> {
        let sql =
            format!("SELECT {CHECK_IN_COLUMNS} FROM check_ins WHERE id = $1 AND user_id = $2");
        Ok(sqlx::query_as::<_, CheckIn>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_check_in(
        &self,
        user_id: i64,
        check_in: NewCheckIn,
    ) -> Result<CheckIn, DbError> {
        let sql = format!(
            r#"
            INSERT INTO check_ins (board_id, user_id, check_date, notes, completed, value, unit, unit_symbol)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CHECK_IN_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, CheckIn>(&sql)
            .bind(check_in.board_id)
            .bind(user_id)
            .bind(check_in.check_date)
            .bind(check_in.notes)
            .bind(check_in.completed)
            .bind(check_in.value)
            .bind(check_in.unit)
            .bind(check_in.unit_symbol)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_check_in(
        &self,
        id: i64,
        user_id: i64,
        changes: CheckInChanges,
    ) -> Result<Option<CheckIn>, DbError> {
        let sql = format!(
            r#"
            UPDATE check_ins
            SET board_id = COALESCE($3, board_id),
                check_date = COALESCE($4, check_date),
                notes = COALESCE($5, notes),
                completed = COALESCE($6, completed),
                value = COALESCE($7, value),
                unit = COALESCE($8, unit),
                unit_symbol = COALESCE($9, unit_symbol),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {CHECK_IN_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, CheckIn>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.board_id)
            .bind(changes.check_date)
            .bind(changes.notes)
            .bind(changes.completed)
            .bind(changes.value)
            .bind(changes.unit)
            .bind(changes.unit_symbol)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_check_in(&self, id: i64, user_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM check_ins WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DbError> {
        Ok(sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, DbError> {
        Ok(sqlx::query_as::<_, Session>(
            "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_session(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
