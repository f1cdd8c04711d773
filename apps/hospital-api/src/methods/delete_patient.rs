use axum::{extract::Path, http::StatusCode};

use crate::error::{handle_patient_error, ApiError, ErrorResponse};
use crate::methods::routes::PATIENT_BY_ID_PATH;
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = PATIENT_BY_ID_PATH,
    tag = "patients",
    params(
        ("id" = i64, Path, description = "Patient ID")
    ),
    security(("basic_auth" = [])),
    responses(
        (status = 204, description = "Patient deleted, or there was none with this id"),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn delete_patient(
    Path(id): Path<i64>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .patients
        .delete_by_id(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| handle_patient_error(e, &state.env, "delete_patient"))
}
