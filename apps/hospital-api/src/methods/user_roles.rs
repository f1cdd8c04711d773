use axum::{extract::Path, http::StatusCode};

use crate::error::{handle_account_error, ApiError, ErrorResponse};
use crate::methods::routes::USER_ROLE_PATH;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct UserRolePath {
    pub username: String,
    pub role: String,
}

#[utoipa::path(
    post,
    path = USER_ROLE_PATH,
    tag = "users",
    params(
        ("username" = String, Path, description = "Username"),
        ("role" = String, Path, description = "Role name")
    ),
    security(("basic_auth" = [])),
    responses(
        (status = 204, description = "Role granted; granting a held role changes nothing"),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "User or role not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn add_role_to_user(
    Path(path): Path<UserRolePath>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .accounts
        .add_role_to_user(&path.username, &path.role)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| handle_account_error(e, &state.env, "add_role_to_user"))
}

#[utoipa::path(
    delete,
    path = USER_ROLE_PATH,
    tag = "users",
    params(
        ("username" = String, Path, description = "Username"),
        ("role" = String, Path, description = "Role name")
    ),
    security(("basic_auth" = [])),
    responses(
        (status = 204, description = "Role revoked"),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "User or role not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn remove_role_from_user(
    Path(path): Path<UserRolePath>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .accounts
        .remove_role_from_user(&path.username, &path.role)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| handle_account_error(e, &state.env, "remove_role_from_user"))
}
