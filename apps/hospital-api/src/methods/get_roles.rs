use axum::Json;

use crate::error::{handle_account_error, ApiError, ErrorResponse};
use crate::methods::entities::RoleResponse;
use crate::methods::routes::ROLES_PATH;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = ROLES_PATH,
    tag = "roles",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "All roles, ordered by name", body = Vec<RoleResponse>),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn get_roles(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<Vec<RoleResponse>>, ApiError> {
    state
        .accounts
        .list_roles()
        .await
        .map(|roles| Json(roles.into_iter().map(RoleResponse::from).collect()))
        .map_err(|e| handle_account_error(e, &state.env, "get_roles"))
}
