use axum::{extract::Path, Json};

use crate::error::{handle_patient_error, ApiError, ErrorResponse};
use crate::methods::entities::{PatientRequest, PatientResponse};
use crate::methods::routes::PATIENT_BY_ID_PATH;
use crate::state::AppState;

#[utoipa::path(
    put,
    path = PATIENT_BY_ID_PATH,
    tag = "patients",
    params(
        ("id" = i64, Path, description = "Patient ID")
    ),
    request_body = PatientRequest,
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "Patient updated", body = PatientResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn update_patient(
    Path(id): Path<i64>,
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(payload): Json<PatientRequest>,
) -> Result<Json<PatientResponse>, ApiError> {
    let patient = payload.into_patient(Some(id));

    state
        .patients
        .save(&patient)
        .await
        .map(|saved| Json(PatientResponse::from(saved)))
        .map_err(|e| handle_patient_error(e, &state.env, "update_patient"))
}
