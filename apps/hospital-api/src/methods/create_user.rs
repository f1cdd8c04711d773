use axum::{http::StatusCode, Json};
use validator::Validate;

use crate::error::{handle_account_error, ApiError, ErrorResponse};
use crate::methods::entities::{CreateUserRequest, UserResponse};
use crate::methods::routes::USERS_PATH;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = USERS_PATH,
    tag = "users",
    request_body = CreateUserRequest,
    security(("basic_auth" = [])),
    responses(
        (status = 201, description = "User created without roles", body = UserResponse),
        (status = 400, description = "Validation error or password mismatch", body = ErrorResponse),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn create_user(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .accounts
        .add_new_user(
            &payload.username,
            &payload.password,
            &payload.email,
            &payload.confirm_password,
        )
        .await
        .map(|user| (StatusCode::CREATED, Json(UserResponse::from(user))))
        .map_err(|e| handle_account_error(e, &state.env, "create_user"))
}
