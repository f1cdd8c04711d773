use axum::{extract::Path, Json};

use crate::error::{handle_account_error, ApiError, ErrorResponse};
use crate::methods::entities::UserResponse;
use crate::methods::routes::USER_BY_USERNAME_PATH;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = USER_BY_USERNAME_PATH,
    tag = "users",
    params(
        ("username" = String, Path, description = "Username")
    ),
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "User with its roles", body = UserResponse),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn get_user(
    Path(username): Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .accounts
        .load_user_by_username(&username)
        .await
        .map_err(|e| handle_account_error(e, &state.env, "get_user"))?
        .ok_or_else(|| ApiError::user_not_found(&username))?;

    Ok(Json(UserResponse::from(user)))
}
