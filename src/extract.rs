use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{errors::ApiError, models::Normalize};

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// ValidatedJson
///
/// JSON body extractor that trims the payload and runs its validators before the
/// handler sees it. Unparseable bodies are rejected with 400. A body with a
/// missing or mistyped field, or one that fails validation, is rejected with 422
/// and names the field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Normalize,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        let payload = payload.normalize();
        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let (field, message) = describe_data_error(&err.body_text());
            ApiError::InvalidBody { field, message }
        }
        other => ApiError::BadRequest {
            message: other.body_text(),
        },
    }
}

/// Turns axum's data-error text (`<prefix>: [path: ]<reason> at line L column C`)
/// into the offending field and a client-facing message.
fn describe_data_error(text: &str) -> (Option<String>, String) {
    let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);
    let detail = detail
        .rsplit_once(" at line ")
        .map_or(detail, |(reason, _)| reason);

    if let Some(rest) = detail.strip_prefix("missing field `") {
        if let Some((field, _)) = rest.split_once('`') {
            return (
                Some(field.to_string()),
                format!("The {field} field is required"),
            );
        }
    }

    match detail.split_once(": ") {
        Some((path, reason)) if !path.is_empty() && !path.contains(char::is_whitespace) => (
            Some(path.to_string()),
            format!("The {path} field is invalid: {reason}"),
        ),
        _ => (None, format!("The request body is invalid: {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_named() {
        let (field, message) = describe_data_error(
            "Failed to deserialize the JSON body into the target type: missing field `name` at line 1 column 19",
        );
        assert_eq!(field.as_deref(), Some("name"));
        assert_eq!(message, "The name field is required");
    }

    #[test]
    fn mistyped_field_is_named_by_its_path() {
        let (field, message) = describe_data_error(
            "Failed to deserialize the JSON body into the target type: checkDate: input contains invalid characters at line 1 column 40",
        );
        assert_eq!(field.as_deref(), Some("checkDate"));
        assert_eq!(
            message,
            "The checkDate field is invalid: input contains invalid characters"
        );
    }

    #[test]
    fn root_type_error_has_no_field() {
        let (field, message) = describe_data_error(
            "Failed to deserialize the JSON body into the target type: invalid type: sequence, expected struct LoginRequest at line 1 column 0",
        );
        assert_eq!(field, None);
        assert!(message.starts_with("The request body is invalid: invalid type"));
    }
}
