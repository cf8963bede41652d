use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::Repository;
use crate::{
    errors::DbError,
    models::{
        Board, BoardChanges, CheckIn, CheckInChanges, NewBoard, NewCheckIn, NewUser, Session,
        User, UserChanges,
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    boards: Vec<Board>,
    check_ins: Vec<CheckIn>,
    sessions: Vec<Session>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owns_board(&self, board_id: i64, user_id: i64) -> bool {
        self.boards
            .iter()
            .any(|b| b.id == board_id && b.user_id == user_id)
    }
}

/// MemoryRepository
///
/// In-process `Repository` used by the router and scope tests. It mirrors the
/// database constraints the handlers depend on: unique emails, the check-in to
/// board ownership key and cascading deletes.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken() -> DbError {
    DbError::UniqueViolation {
        constraint: Some("users_email_key".to_string()),
    }
}

fn board_not_owned() -> DbError {
    DbError::ForeignKeyViolation {
        constraint: Some("check_ins_board_owner_fkey".to_string()),
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, DbError> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(email_taken());
        }
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            email: user.email,
            full_name: user.full_name,
            password: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DbError> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<User>, DbError> {
        let mut tables = self.tables.write();
        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(email_taken());
            }
        }
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(full_name) = changes.full_name {
            user.full_name = Some(full_name);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let mut tables = self.tables.write();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.boards.retain(|b| b.user_id != id);
        tables.check_ins.retain(|c| c.user_id != id);
        tables.sessions.retain(|s| s.user_id != id);
        Ok(true)
    }

    async fn list_boards(&self, user_id: i64) -> Result<Vec<Board>, DbError> {
        let mut boards: Vec<Board> = self
            .tables
            .read()
            .boards
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(boards)
    }

    async fn find_board(&self, id: i64, user_id: i64) -> Result<Option<Board>, DbError> {
        Ok(self
            .tables
            .read()
            .boards
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn create_board(&self, user_id: i64, board: NewBoard) -> Result<Board, DbError> {
        let mut tables = self.tables.write();
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("boards_user_id_fkey".to_string()),
            });
        }
        let now = Utc::now();
        let board = Board {
            id: tables.next_id(),
            user_id,
            name: board.name,
            is_quantity: board.is_quantity,
            default_value: board.default_value,
            unit: board.unit,
            unit_symbol: board.unit_symbol,
            created_at: now,
            updated_at: now,
        };
        tables.boards.push(board.clone());
        Ok(board)
    }

    async fn update_board(
        &self,
        id: i64,
        user_id: i64,
        changes: BoardChanges,
    ) -> Result<Option<Board>, DbError> {
        let mut tables = self.tables.write();
        let Some(board) = tables
            .boards
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            board.name = name;
        }
        if let Some(is_quantity) = changes.is_quantity {
            board.is_quantity = is_quantity;
        }
        board.default_value = changes.default_value.or(board.default_value);
        board.unit = changes.unit.or(board.unit.take());
        board.unit_symbol = changes.unit_symbol.or(board.unit_symbol.take());
        board.updated_at = Utc::now();
        Ok(Some(board.clone()))
    }

    async fn delete_board(&self, id: i64, user_id: i64) -> Result<bool, DbError> {
        let mut tables = self.tables.write();
        let before = tables.boards.len();
        tables
            .boards
            .retain(|b| !(b.id == id && b.user_id == user_id));
        if tables.boards.len() == before {
            return Ok(false);
        }
        tables.check_ins.retain(|c| c.board_id != id);
        Ok(true)
    }

    async fn list_check_ins(
        &self,
        user_id: i64,
        board_id: Option<i64>,
    ) -> Result<Vec<CheckIn>, DbError> {
        let mut check_ins: Vec<CheckIn> = self
            .tables
            .read()
            .check_ins
            .iter()
            .filter(|c| c.user_id == user_id && board_id.is_none_or(|id| c.board_id == id))
            .cloned()
            .collect();
        check_ins.sort_by(|a, b| b.check_date.cmp(&a.check_date).then(b.id.cmp(&a.id)));
        Ok(check_ins)
    }

    async fn find_check_in(&self, id: i64, user_id: i64) -> Result<Option<CheckIn>, DbError> {
        Ok(self
            .tables
            .read()
            .check_ins
            .iter()
            .find(|c| c.id == id && c.user_id == user_id)
            .cloned())
    }

    async fn create_check_in(
        &self,
        user_id: i64,
        check_in: NewCheckIn,
    ) -> Result<CheckIn, DbError> {
        let mut tables = self.tables.write();
        if !tables.owns_board(check_in.board_id, user_id) {
            return Err(board_not_owned());
        }
        let now = Utc::now();
        let check_in = CheckIn {
            id: tables.next_id(),
            board_id: check_in.board_id,
            user_id,
            check_date: check_in.check_date,
            notes: check_in.notes,
            completed: check_in.completed,
            value: check_in.value,
            unit: check_in.unit,
            unit_symbol: check_in.unit_symbol,
            created_at: now,
            updated_at: now,
        };
        tables.check_ins.push(check_in.clone());
        Ok(check_in)
    }

    async fn update_check_in(
        &self,
        id: i64,
        user_id: i64,
        changes: CheckInChanges,
    ) -> Result<Option<CheckIn>, DbError> {
        let mut tables = self.tables.write();
        if let Some(board_id) = changes.board_id {
            if !tables.owns_board(board_id, user_id) {
                return Err(board_not_owned());
            }
        }
        let Some(check_in) = tables
            .check_ins
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(board_id) = changes.board_id {
            check_in.board_id = board_id;
        }
        if let Some(check_date) = changes.check_date {
            check_in.check_date = check_date;
        }
        if let Some(completed) = changes.completed {
            check_in.completed = completed;
        }
        check_in.notes = changes.notes.or(check_in.notes.take());
        check_in.value = changes.value.or(check_in.value);
        check_in.unit = changes.unit.or(check_in.unit.take());
        check_in.unit_symbol = changes.unit_symbol.or(check_in.unit_symbol.take());
        check_in.updated_at = Utc::now();
        Ok(Some(check_in.clone()))
    }

    async fn delete_check_in(&self, id: i64, user_id: i64) -> Result<bool, DbError> {
        let mut tables = self.tables.write();
        let before = tables.check_ins.len();
        tables
            .check_ins
            .retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(tables.check_ins.len() < before)
    }

    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DbError> {
        let mut tables = self.tables.write();
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("sessions_user_id_fkey".to_string()),
            });
        }
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            expires_at,
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, DbError> {
        Ok(self
            .tables
            .read()
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn delete_session(&self, id: Uuid) -> Result<bool, DbError> {
        let mut tables = self.tables.write();
        let before = tables.sessions.len();
        tables.sessions.retain(|s| s.id != id);
        Ok(tables.sessions.len() < before)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
        let mut tables = self.tables.write();
        let before = tables.sessions.len();
        tables.sessions.retain(|s| !s.is_expired(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn seeded() -> (MemoryRepository, User, Board) {
        let repo = MemoryRepository::new();
        let user = repo
            .create_user(NewUser {
                email: "ada@example.com".to_string(),
                full_name: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let board = repo
            .create_board(
                user.id,
                NewBoard {
                    name: "Read".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        (repo, user, board)
    }

    fn check_in_on(board_id: i64) -> NewCheckIn {
        NewCheckIn {
            board_id,
            check_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            notes: None,
            completed: true,
            value: None,
            unit: None,
            unit_symbol: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let (repo, _, _) = seeded().await;
        let err = repo
            .create_user(NewUser {
                email: "ada@example.com".to_string(),
                full_name: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn deleting_user_cascades() {
        let (repo, user, board) = seeded().await;
        repo.create_check_in(user.id, check_in_on(board.id))
            .await
            .unwrap();
        repo.create_session(user.id, Utc::now()).await.unwrap();

        assert!(repo.delete_user(user.id).await.unwrap());
        assert!(repo.list_boards(user.id).await.unwrap().is_empty());
        assert!(repo.list_check_ins(user.id, None).await.unwrap().is_empty());
        assert_eq!(repo.purge_expired_sessions(Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_get_distinct_ids() {
        let (repo, user, board) = seeded().await;
        let repo = std::sync::Arc::new(repo);
        let (user_id, board_id) = (user.id, board.id);

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let created = repo
                        .create_check_in(user_id, check_in_on(board_id))
                        .await
                        .unwrap();
                    // Readers run alongside the writers.
                    repo.list_check_ins(user_id, Some(board_id)).await.unwrap();
                    created.id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(repo.list_check_ins(user_id, None).await.unwrap().len(), 32);
    }

    #[tokio::test]
    async fn check_in_on_foreign_board_is_rejected() {
        let (repo, _, board) = seeded().await;
        let other = repo
            .create_user(NewUser {
                email: "grace@example.com".to_string(),
                full_name: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let err = repo
            .create_check_in(other.id, check_in_on(board.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
