use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// DbError
///
/// Persistence failures, independent of the HTTP layer. Both repository
/// implementations report through this type.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("row not found")]
    NotFound,

    #[error("unique constraint violated ({constraint:?})")]
    UniqueViolation { constraint: Option<String> },

    #[error("foreign key constraint violated ({constraint:?})")]
    ForeignKeyViolation { constraint: Option<String> },

    #[error(transparent)]
    Other(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(ToOwned::to_owned);
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation { constraint }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation { constraint }
                } else {
                    DbError::Other(sqlx::Error::Database(db_err))
                }
            }
            other => DbError::Other(other),
        }
    }
}

/// ApiError
///
/// Every failure a handler or extractor can surface. The response body always has
/// the shape `{"errors": [{"message": ..., "field": ...}]}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid, expired or revoked session.
    #[error("Unauthorized access")]
    Unauthorized,

    /// Login with an unknown email or a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Absent, or owned by someone else.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Body could not be parsed.
    #[error("{message}")]
    BadRequest { message: String },

    /// Field-level validation failure from the request validators.
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// Well-formed JSON whose shape does not match the payload: a missing field or a
    /// value of the wrong type.
    #[error("{message}")]
    InvalidBody {
        field: Option<String>,
        message: String,
    },

    /// A single field rejected by a check that needs the database (e.g. uniqueness).
    #[error("{field}: {message}")]
    Field { field: &'static str, message: String },

    #[error("Failed to {operation}")]
    Internal { operation: String },

    #[error(transparent)]
    Database(#[from] DbError),
}

/// ErrorBody
///
/// Wire format of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEntry {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorEntry {
    fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) | ApiError::InvalidBody { .. } | ApiError::Field { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// User-safe entries. Internal details never leave the process.
    fn entries(&self) -> Vec<ErrorEntry> {
        match self {
            ApiError::Validation(errors) => validation_entries(errors),
            ApiError::InvalidBody { field, message } => vec![ErrorEntry {
                message: message.clone(),
                field: field.clone(),
            }],
            ApiError::Field { field, message } => vec![ErrorEntry {
                message: message.clone(),
                field: Some((*field).to_string()),
            }],
            ApiError::Internal { .. } => vec![ErrorEntry::plain("Internal server error")],
            ApiError::Database(db_err) => vec![ErrorEntry::plain(match db_err {
                DbError::NotFound => "Resource not found",
                DbError::UniqueViolation { .. } => "Resource already exists",
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource",
                DbError::Other(_) => "Internal server error",
            })],
            other => vec![ErrorEntry::plain(other.to_string())],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal { .. } | ApiError::Database(DbError::Other(_)) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            ApiError::Database(_) => tracing::warn!("Database constraint error: {}", self),
            ApiError::Unauthorized | ApiError::InvalidCredentials => {
                tracing::info!("Authentication error: {}", self)
            }
            _ => tracing::debug!("Client error: {}", self),
        }

        let body = ErrorBody {
            errors: self.entries(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

fn validation_entries(errors: &ValidationErrors) -> Vec<ErrorEntry> {
    let mut entries: Vec<ErrorEntry> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = camel_case(&field.to_string());
            field_errors.iter().map(move |err| ErrorEntry {
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid ({})", field, err.code)),
                field: Some(field.clone()),
            })
        })
        .collect();
    // HashMap iteration order is random.
    entries.sort_by(|a, b| a.field.cmp(&b.field));
    entries
}

/// Request fields are snake_case in Rust and camelCase on the wire.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_converts_snake_fields() {
        assert_eq!(camel_case("board_id"), "boardId");
        assert_eq!(camel_case("unit_symbol"), "unitSymbol");
        assert_eq!(camel_case("name"), "name");
    }

    #[test]
    fn scope_misses_map_to_not_found() {
        let err = ApiError::NotFound { resource: "Board" };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Board not found");
    }

    #[test]
    fn invalid_body_is_unprocessable() {
        let err = ApiError::InvalidBody {
            field: Some("checkDate".to_string()),
            message: "The checkDate field has an invalid value".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let entries = err.entries();
        assert_eq!(entries[0].field.as_deref(), Some("checkDate"));
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = ApiError::from(DbError::UniqueViolation {
            constraint: Some("users_email_key".to_string()),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
