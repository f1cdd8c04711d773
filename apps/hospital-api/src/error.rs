use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use hospital_lib::errors_service::{AccountServiceError, AuthenticationError, PatientServiceError};

use crate::constants::BASIC_AUTH_REALM;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn patient_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("patient {id} not found"))
    }

    pub fn user_not_found(username: &str) -> Self {
        ApiError::NotFound(format!("user {username} not found"))
    }

    pub fn missing_credentials() -> Self {
        ApiError::Unauthorized("authentication required".to_string())
    }

    pub fn bad_credentials() -> Self {
        ApiError::Unauthorized("bad credentials".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", Some(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", Some(msg)),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg)),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", Some(msg)),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            let challenge = format!("Basic realm=\"{BASIC_AUTH_REALM}\"");
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

impl From<AccountServiceError> for ApiError {
    fn from(err: AccountServiceError) -> Self {
        match err {
            AccountServiceError::Validation(msg) => ApiError::BadRequest(msg),
            AccountServiceError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            AccountServiceError::DuplicateEntity(what) => {
                ApiError::Conflict(format!("{what} already exists"))
            }
            AccountServiceError::InvalidUuid(msg) => ApiError::Internal(format!("invalid uuid: {msg}")),
            AccountServiceError::Internal(err) => ApiError::Internal(err.to_string()),
            _ => ApiError::Internal("unexpected error".to_string()),
        }
    }
}

impl From<PatientServiceError> for ApiError {
    fn from(err: PatientServiceError) -> Self {
        match err {
            PatientServiceError::Validation(msg) => ApiError::BadRequest(msg),
            PatientServiceError::NotFound(id) => ApiError::patient_not_found(id),
            PatientServiceError::Internal(err) => ApiError::Internal(err.to_string()),
            _ => ApiError::Internal("unexpected error".to_string()),
        }
    }
}

/// Check if environment is production-like (prod, prod01, prod02, etc.)
pub fn is_prod_like(env: &str) -> bool {
    env.to_lowercase().starts_with("prod")
}

/// Logs an internal error and hides its details in production.
fn internal(detail: ApiError, env: &str, operation: &str, error: String) -> ApiError {
    tracing::error!(env = %env, error = %error, operation = %operation, "service error");
    if is_prod_like(env) {
        ApiError::Internal("internal server error".to_string())
    } else {
        detail
    }
}

pub fn handle_account_error(err: AccountServiceError, env: &str, operation: &str) -> ApiError {
    match &err {
        AccountServiceError::Validation(_)
        | AccountServiceError::NotFound(_)
        | AccountServiceError::DuplicateEntity(_) => ApiError::from(err),
        _ => {
            let debug = format!("{err:?}");
            internal(ApiError::from(err), env, operation, debug)
        }
    }
}

pub fn handle_patient_error(err: PatientServiceError, env: &str, operation: &str) -> ApiError {
    match &err {
        PatientServiceError::Validation(_) | PatientServiceError::NotFound(_) => ApiError::from(err),
        _ => {
            let debug = format!("{err:?}");
            internal(ApiError::from(err), env, operation, debug)
        }
    }
}

/// Unknown users and wrong passwords look the same to the client.
pub fn handle_authentication_error(err: AuthenticationError, env: &str) -> ApiError {
    match err {
        AuthenticationError::UserNotFound(_) | AuthenticationError::BadCredentials => {
            ApiError::bad_credentials()
        }
        AuthenticationError::Account(err) => handle_account_error(err, env, "authenticate"),
        other => {
            let debug = format!("{other:?}");
            internal(ApiError::Internal(other.to_string()), env, "authenticate", debug)
        }
    }
}

#[cfg(test)]
mod tests {
    use hospital_lib::repository::RepositoryError;

    use super::*;

    #[test]
    fn prod_like_envs() {
        assert!(is_prod_like("prod"));
        assert!(is_prod_like("PROD01"));
        assert!(!is_prod_like("local"));
        assert!(!is_prod_like("dev01"));
    }

    #[test]
    fn unauthorized_carries_basic_challenge() {
        let response = ApiError::missing_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().starts_with("Basic"));
    }

    #[test]
    fn internal_details_hidden_in_prod() {
        let err = PatientServiceError::from(RepositoryError::Inconsistent("db down".to_string()));
        match handle_patient_error(err, "prod01", "test") {
            ApiError::Internal(msg) => assert_eq!(msg, "internal server error"),
            other => panic!("unexpected {other:?}"),
        }

        let err = PatientServiceError::from(RepositoryError::Inconsistent("db down".to_string()));
        match handle_patient_error(err, "local", "test") {
            ApiError::Internal(msg) => assert!(msg.contains("db down")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let conflict = handle_account_error(
            AccountServiceError::DuplicateEntity("user user1".to_string()),
            "prod01",
            "test",
        );
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let not_found = handle_patient_error(PatientServiceError::NotFound(3), "prod01", "test");
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let bad = handle_authentication_error(AuthenticationError::BadCredentials, "local");
        assert_eq!(bad.into_response().status(), StatusCode::UNAUTHORIZED);
    }

}
