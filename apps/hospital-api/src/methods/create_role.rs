use axum::{http::StatusCode, Json};
use validator::Validate;

use crate::error::{handle_account_error, ApiError, ErrorResponse};
use crate::methods::entities::{CreateRoleRequest, RoleResponse};
use crate::methods::routes::ROLES_PATH;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = ROLES_PATH,
    tag = "roles",
    request_body = CreateRoleRequest,
    security(("basic_auth" = [])),
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 409, description = "Role already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn create_role(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .accounts
        .add_new_role(&payload.name)
        .await
        .map(|role| (StatusCode::CREATED, Json(RoleResponse::from(role))))
        .map_err(|e| handle_account_error(e, &state.env, "create_role"))
}
