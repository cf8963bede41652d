use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The `users` row, including the password hash. Never serialised directly; use
/// [`UserProfile`] for responses.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    // Argon2 PHC string.
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Board
///
/// A habit definition from the `boards` table. Quantitative boards carry the unit
/// and default value used to pre-fill check-ins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Board {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub user_id: i64,
    pub name: String,
    pub is_quantity: bool,
    pub default_value: Option<f64>,
    pub unit: Option<String>,
    pub unit_symbol: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// CheckIn
///
/// A dated record against a board, from the `check_ins` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckIn {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub board_id: i64,
    #[ts(type = "number")]
    pub user_id: i64,
    #[ts(type = "string")]
    pub check_date: NaiveDate,
    pub notes: Option<String>,
    pub completed: bool,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub unit_symbol: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Session
///
/// Server-side half of a login. Deleting the row revokes every token minted for it.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// --- Repository Inputs (already validated and defaulted) ---

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewBoard {
    pub name: String,
    pub is_quantity: bool,
    pub default_value: Option<f64>,
    pub unit: Option<String>,
    pub unit_symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardChanges {
    pub name: Option<String>,
    pub is_quantity: Option<bool>,
    pub default_value: Option<f64>,
    pub unit: Option<String>,
    pub unit_symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckIn {
    pub board_id: i64,
    pub check_date: NaiveDate,
    pub notes: Option<String>,
    pub completed: bool,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub unit_symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckInChanges {
    pub board_id: Option<i64>,
    pub check_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub unit_symbol: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// Trims free-text fields before validation runs.
pub trait Normalize {
    fn normalize(self) -> Self;
}

fn trim(value: String) -> String {
    value.trim().to_string()
}

fn trim_opt(value: Option<String>) -> Option<String> {
    value.map(trim)
}

fn normalize_email(value: String) -> String {
    value.trim().to_lowercase()
}

/// Lower, upper, digit and special character; nothing outside that alphabet.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    const SPECIALS: &str = "@$!%*?&";
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SPECIALS.contains(c));
    let strong = password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIALS.contains(c));

    if allowed && strong {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "The password must contain a lowercase letter, an uppercase letter, a digit and one of @$!%*?&"
                .into(),
        );
        Err(err)
    }
}

/// RegisterRequest
///
/// Input payload for `POST /api/auth/register`. The password is hashed before it
/// reaches the repository and is never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "The full name must be at most 255 characters"))]
    pub full_name: Option<String>,
    #[validate(
        email(message = "The email must be a valid email address"),
        length(max = 254, message = "The email must be at most 254 characters")
    )]
    pub email: String,
    #[validate(
        length(min = 12, message = "The password must be at least 12 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

impl Normalize for RegisterRequest {
    fn normalize(self) -> Self {
        Self {
            full_name: trim_opt(self.full_name).filter(|n| !n.is_empty()),
            email: normalize_email(self.email),
            password: self.password,
        }
    }
}

/// LoginRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct LoginRequest {
    #[validate(
        email(message = "The email must be a valid email address"),
        length(max = 254, message = "The email must be at most 254 characters")
    )]
    pub email: String,
    #[validate(length(min = 12, message = "The password must be at least 12 characters"))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(self) -> Self {
        Self {
            email: normalize_email(self.email),
            password: self.password,
        }
    }
}

/// UpdateUserRequest
///
/// Partial update of the caller's profile. Email uniqueness is checked against the
/// database by the handler.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255, message = "The full name must be at most 255 characters"))]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        email(message = "The email must be a valid email address"),
        length(max = 254, message = "The email must be at most 254 characters")
    )]
    pub email: Option<String>,
}

impl Normalize for UpdateUserRequest {
    fn normalize(self) -> Self {
        Self {
            full_name: trim_opt(self.full_name),
            email: self.email.map(normalize_email),
        }
    }
}

/// CreateBoardRequest
///
/// Input payload for `POST /api/boards`. For quantitative boards a missing
/// `defaultValue` is filled from the unit table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub is_quantity: Option<bool>,
    #[serde(default)]
    pub default_value: Option<f64>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "The unit must be between 1 and 50 characters"))]
    pub unit: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 20, message = "The unit symbol must be between 1 and 20 characters"))]
    pub unit_symbol: Option<String>,
}

impl Normalize for CreateBoardRequest {
    fn normalize(self) -> Self {
        Self {
            name: trim(self.name),
            unit: trim_opt(self.unit),
            unit_symbol: trim_opt(self.unit_symbol),
            ..self
        }
    }
}

/// UpdateBoardRequest
///
/// Partial update payload; only present fields change.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateBoardRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_quantity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "The unit must be between 1 and 50 characters"))]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20, message = "The unit symbol must be between 1 and 20 characters"))]
    pub unit_symbol: Option<String>,
}

impl Normalize for UpdateBoardRequest {
    fn normalize(self) -> Self {
        Self {
            name: trim_opt(self.name),
            unit: trim_opt(self.unit),
            unit_symbol: trim_opt(self.unit_symbol),
            ..self
        }
    }
}

impl From<UpdateBoardRequest> for BoardChanges {
    fn from(req: UpdateBoardRequest) -> Self {
        Self {
            name: req.name,
            is_quantity: req.is_quantity,
            default_value: req.default_value,
            unit: req.unit,
            unit_symbol: req.unit_symbol,
        }
    }
}

/// CreateCheckInRequest
///
/// Input payload for `POST /api/check-ins`. `checkDate` is a calendar date
/// (`YYYY-MM-DD`); `completed` defaults to true.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCheckInRequest {
    #[ts(type = "number")]
    #[validate(range(min = 1, message = "The boardId must be a positive number"))]
    pub board_id: i64,
    #[ts(type = "string")]
    pub check_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "The unit must be between 1 and 50 characters"))]
    pub unit: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 20, message = "The unit symbol must be between 1 and 20 characters"))]
    pub unit_symbol: Option<String>,
}

impl Normalize for CreateCheckInRequest {
    fn normalize(self) -> Self {
        Self {
            notes: trim_opt(self.notes),
            unit: trim_opt(self.unit),
            unit_symbol: trim_opt(self.unit_symbol),
            ..self
        }
    }
}

/// UpdateCheckInRequest
///
/// Partial update payload. Moving a check-in to another board requires owning
/// that board.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateCheckInRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    #[validate(range(min = 1, message = "The boardId must be a positive number"))]
    pub board_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub check_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "The unit must be between 1 and 50 characters"))]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20, message = "The unit symbol must be between 1 and 20 characters"))]
    pub unit_symbol: Option<String>,
}

impl Normalize for UpdateCheckInRequest {
    fn normalize(self) -> Self {
        Self {
            notes: trim_opt(self.notes),
            unit: trim_opt(self.unit),
            unit_symbol: trim_opt(self.unit_symbol),
            ..self
        }
    }
}

impl From<UpdateCheckInRequest> for CheckInChanges {
    fn from(req: UpdateCheckInRequest) -> Self {
        Self {
            board_id: req.board_id,
            check_date: req.check_date,
            notes: req.notes,
            completed: req.completed,
            value: req.value,
            unit: req.unit,
            unit_symbol: req.unit_symbol,
        }
    }
}

// --- Response Schemas (Output) ---

/// UserProfile
///
/// Public view of a user. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    #[ts(type = "number")]
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// BoardDetails
///
/// A board with its check-ins preloaded, newest check date first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BoardDetails {
    #[serde(flatten)]
    pub board: Board,
    pub check_ins: Vec<CheckIn>,
}

/// CheckInDetails
///
/// A check-in with its board preloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckInDetails {
    #[serde(flatten)]
    pub check_in: CheckIn,
    pub board: Board,
}

/// SessionToken
///
/// Returned alongside the session cookie so non-browser clients can send
/// `Authorization: Bearer <accessToken>`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    #[ts(type = "string")]
    pub expires_at: DateTime<Utc>,
}

// --- Response Envelopes ---

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
    pub session: SessionToken,
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserListResponse {
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BoardResponse {
    pub board: Board,
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BoardDetailsResponse {
    pub board: BoardDetails,
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BoardListResponse {
    pub boards: Vec<BoardDetails>,
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckInResponse {
    pub check_in: CheckInDetails,
}

#[derive(Debug, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckInListResponse {
    pub check_ins: Vec<CheckInDetails>,
}
