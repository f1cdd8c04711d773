use axum::{extract::Path, Json};

use crate::error::{handle_patient_error, ApiError, ErrorResponse};
use crate::methods::entities::PatientResponse;
use crate::methods::routes::PATIENT_BY_ID_PATH;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = PATIENT_BY_ID_PATH,
    tag = "patients",
    params(
        ("id" = i64, Path, description = "Patient ID")
    ),
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Patient found", body = PatientResponse),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "USER or ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn get_patient(
    Path(id): Path<i64>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<PatientResponse>, ApiError> {
    let patient = state
        .patients
        .find_by_id(id)
        .await
        .map_err(|e| handle_patient_error(e, &state.env, "get_patient"))?
        .ok_or_else(|| ApiError::patient_not_found(id))?;

    Ok(Json(PatientResponse::from(patient)))
}
